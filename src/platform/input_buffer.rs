//=========================================================================
// Input Buffer
//
// Collects key transitions between two frames. Acts as a transient
// event aggregator between the Platform and the runner's command queue.
//
// Responsibilities:
// - Store incoming key events per frame, in arrival order
// - Deduplicate consecutive identical events
// - Hand the whole batch over via `drain()`
//
// Notes:
// The buffer is drained on every RedrawRequested (and on every poll while
// no frames are scheduled), so it never holds more than one frame.
//=========================================================================

//=== Internal Modules ====================================================
use crate::core::input::InputEvent;

//=== InputBuffer Struct ==================================================

pub struct InputBuffer {
    events: Vec<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    //
    // Preallocates so typical frames do not reallocate.
    //
    pub fn new() -> Self {
        const BASE_CAPACITY: usize = 32;

        Self {
            events: Vec::with_capacity(BASE_CAPACITY),
        }
    }

    //--- push() -----------------------------------------------------------
    //
    // Appends a key transition. Duplicate consecutive events are ignored
    // to prevent flooding.
    //
    pub fn push(&mut self, event: InputEvent) {
        if self.events.last() != Some(&event) {
            self.events.push(event);
        }
    }

    //--- drain() ----------------------------------------------------------
    //
    // Returns this frame's events and empties the buffer. The buffer keeps
    // its capacity for the next frame.
    //
    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }

    //--- Utilities --------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
