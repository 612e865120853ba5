//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the core runner.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌──────────────────────────────────────────────┐
//  │  Winit Event Loop                            │
//  │   ↓                                          │
//  │  InputProcessor (Winit key → InputEvent)     │
//  │   ↓                                          │
//  │  InputBuffer (per-frame batch)               │
//  │   ↓                                          │
//  │  RedrawRequested                             │
//  │   ├─ flush → Controls::send_inputs           │
//  │   ├─ Runner::frame(now)                      │
//  │   └─ Rearm → request_redraw / Halt → poll    │
//  └──────────────────────────────────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent atomically
//    → One simulation step per displayed frame
//    → No redraw is requested once the run is over
// ```
//
// While halted (idle or game over) the loop wakes on input or every
// `HALTED_POLL`, drains the command queue, and resumes drawing as soon as
// a run is live again.
//
// Responsibilities:
// - Create and manage the OS window
// - Convert Winit keyboard events → engine InputEvents
// - Buffer input until frame boundary
// - Drive `Runner::frame` from RedrawRequested
// - Paint snapshots into the window framebuffer (`WindowSurface`)
// - Show score, pause and final text in the window title
// - Play cues through the default audio device (`ToneAudio`)
//
//=========================================================================

//=== Submodules ==========================================================

mod canvas;
mod input_buffer;
mod input_processor;
mod tone_audio;

//=== Standard Library Imports ============================================

use std::sync::Arc;
use std::time::{Duration, Instant};

//=== External Crates =====================================================

use log::*;
use pixels::{Pixels, SurfaceTexture};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::render::{Screen, Snapshot, Surface};
use crate::core::{Controls, FrameControl, Runner};
use canvas::Canvas;
use input_buffer::InputBuffer;
use input_processor::InputProcessor;
pub(crate) use tone_audio::ToneAudio;

//=== Constants ===========================================================

const WINDOW_TITLE: &str = "Vote Dash";
pub(crate) const WINDOW_HEIGHT: u32 = 300;

/// Command poll period while no frames are scheduled.
const HALTED_POLL: Duration = Duration::from_millis(50);

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal: without an event loop the game cannot run.
#[derive(Debug)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    EventLoopCreation(winit::error::EventLoopError),

    /// Event loop execution error.
    EventLoopExecution(winit::error::EventLoopError),
}

//--- Trait Implementations -----------------------------------------------

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventLoopCreation(e) => write!(f, "Event loop creation failed: {}", e),
            Self::EventLoopExecution(e) => write!(f, "Event loop error: {}", e),
        }
    }
}

impl std::error::Error for PlatformError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoopCreation(e) | Self::EventLoopExecution(e) => Some(e),
        }
    }
}

//=== WindowSurface =======================================================

/// Surface backed by the window.
///
/// Snapshots are painted into a [`Canvas`] and presented through a
/// `pixels` framebuffer; the title carries the score, pause state and
/// final result.
pub(crate) struct WindowSurface {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    canvas: Canvas,
    screen: Screen,
    score: String,
    final_score: String,
    pause_label: String,
    volume: f32,
    title: String,
}

impl WindowSurface {
    /// Creates a surface whose canvas is `width x height` pixels.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            window: None,
            pixels: None,
            canvas: Canvas::new(width.max(1), height.max(1)),
            screen: Screen::Start,
            score: String::new(),
            final_score: String::new(),
            pause_label: String::new(),
            volume: 0.0,
            title: String::new(),
        }
    }

    /// Binds the surface to a window and creates its framebuffer.
    ///
    /// # Errors
    ///
    /// Returns the `pixels` error if no GPU surface can be created for the
    /// window.
    pub(crate) fn attach(&mut self, window: Arc<Window>) -> Result<(), pixels::Error> {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = Pixels::new(self.canvas.width(), self.canvas.height(), texture)?;

        self.pixels = Some(pixels);
        self.window = Some(window);
        self.title.clear();
        self.refresh_title();
        self.present();
        Ok(())
    }

    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_deref()
    }

    /// Follows a window resize; the canvas keeps its logical size.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(width, height) {
                warn!(target: "platform", "Framebuffer resize failed: {}", e);
            }
        }
    }

    /// Copies the canvas into the framebuffer and shows it.
    fn present(&mut self) {
        let Some(pixels) = &mut self.pixels else {
            return;
        };
        pixels.frame_mut().copy_from_slice(self.canvas.frame());
        if let Err(e) = pixels.render() {
            warn!(target: "platform", "Frame presentation failed: {}", e);
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub(crate) fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    //--- Internal Helpers -------------------------------------------------

    fn compose_title(&self) -> String {
        match self.screen {
            Screen::Start => format!(
                "{} | Enter to start | volume {:.0}%",
                WINDOW_TITLE,
                self.volume * 100.0
            ),
            Screen::Playing => format!("{} | {} | P: {}", WINDOW_TITLE, self.score, self.pause_label),
            Screen::GameOver => format!("{} | {} | R: restart", WINDOW_TITLE, self.final_score),
        }
    }

    fn refresh_title(&mut self) {
        let title = self.compose_title();
        if title == self.title {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&title);
        }
        self.title = title;
    }
}

impl Surface for WindowSurface {
    fn draw(&mut self, snapshot: &Snapshot) {
        trace!(
            target: "platform",
            "draw: player bottom={} height={}, {} obstacles",
            snapshot.player.bottom,
            snapshot.player.height,
            snapshot.obstacles.len()
        );
        self.canvas.paint(snapshot);
        self.present();
    }

    fn show_score(&mut self, text: &str) {
        self.score = text.to_string();
        self.refresh_title();
    }

    fn show_final_score(&mut self, text: &str) {
        self.final_score = text.to_string();
        self.refresh_title();
    }

    fn show_screen(&mut self, screen: Screen) {
        self.screen = screen;
        if screen == Screen::Start {
            self.canvas.clear();
            self.present();
        }
        self.refresh_title();
    }

    fn set_pause_label(&mut self, label: &str) {
        self.pause_label = label.to_string();
        self.refresh_title();
    }

    fn sync_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.refresh_title();
    }
}

//=== Platform ============================================================

/// Window owner and frame scheduler.
///
/// Runs on the main thread (Winit requirement on macOS/iOS) and owns the
/// runner outright; no other thread touches the simulation.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(runner)`
/// 2. **Execution**: `platform.run()` - blocks in the event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: User closes window → event loop exits → `run` returns
pub(crate) struct Platform {
    runner: Runner<WindowSurface, ToneAudio>,

    /// Handle used to feed buffered keys into the runner's queue.
    controls: Controls,

    /// Buffers key events until the next frame or poll.
    buffer: InputBuffer,

    input_processor: InputProcessor,

    /// Time origin for frame timestamps.
    epoch: Instant,

    /// No redraw is pending; the loop polls instead.
    halted: bool,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(runner: Runner<WindowSurface, ToneAudio>) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        let controls = runner.controls();
        Self {
            runner,
            controls,
            buffer: InputBuffer::new(),
            input_processor: InputProcessor::new(),
            epoch: Instant::now(),
            halted: true,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the window is closed.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// terminates abnormally.
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop = EventLoop::new().map_err(PlatformError::EventLoopCreation)?;

        event_loop
            .run_app(&mut self)
            .map_err(PlatformError::EventLoopExecution)
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends buffered key events to the runner's queue.
    fn flush_input_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let events = self.buffer.drain();
        trace!(target: "platform", "Flushing {} key events", events.len());
        self.controls.send_inputs(events);
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// One scheduled frame. Returns whether another should follow.
    fn on_frame(&mut self) -> FrameControl {
        self.flush_input_buffer();
        let timestamp = self.now_ms();
        self.runner.frame(timestamp)
    }

    /// Drains commands while no frames are scheduled.
    fn on_poll(&mut self) -> FrameControl {
        self.flush_input_buffer();
        self.runner.pump()
    }

    fn request_redraw(&self) {
        if let Some(window) = self.runner.surface().window() {
            window.request_redraw();
        }
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.runner.surface().window().is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let width = self.runner.game().config().play_width.round() as u32;
        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(width, WINDOW_HEIGHT));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                if let Err(e) = self.runner.surface_mut().attach(Arc::new(window)) {
                    error!(target: "platform", "Framebuffer creation failed: {}", e);
                    event_loop.exit();
                    return;
                }
                if !self.halted {
                    self.request_redraw();
                }
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                trace!(target: "platform", "Resized to {}x{}", size.width, size.height);
                self.runner.surface_mut().resize(size.width, size.height);
            }

            WindowEvent::Focused(false) => {
                debug!(target: "platform", "Focus lost, releasing held keys");
                self.buffer.drain();
                self.runner.release_keys();
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = self.input_processor.process_key_event(key_event) {
                    self.buffer.push(event);
                } else {
                    trace!(target: "platform", "Unmapped or repeated key ignored");
                }
            }

            WindowEvent::RedrawRequested => {
                // Frame boundary: flush input, step, and re-arm if live.
                match self.on_frame() {
                    FrameControl::Rearm => self.request_redraw(),
                    FrameControl::Halt => {
                        debug!(target: "platform", "Frame loop halted");
                        self.halted = true;
                    }
                }
            }

            _ => {
                // Ignore: Moved, mouse, etc.
            }
        }
    }

    /// Polls the runner while no frames are scheduled.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.halted {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }

        match self.on_poll() {
            FrameControl::Rearm => {
                debug!(target: "platform", "Frame loop armed");
                self.halted = false;
                self.request_redraw();
                event_loop.set_control_flow(ControlFlow::Wait);
            }
            FrameControl::Halt => {
                event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + HALTED_POLL));
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
