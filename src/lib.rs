//=========================================================================
// Vote Dash — Library Root
//
// This crate defines the public API surface of the Vote Dash runner game.
//
// Responsibilities:
// - Expose the engine facade (`EngineBuilder`, `Engine`)
// - Expose the simulation (`core`) for embedding and testing
// - Keep the window and Winit integration (`platform`) hidden
//
// Typical usage:
// ```no_run
// use vote_dash::EngineBuilder;
//
// fn main() -> Result<(), vote_dash::PlatformError> {
//     EngineBuilder::new().build().run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the game loop, input mapping, audio mixing and render
// bridge. It does not depend on Winit, so it can be driven by any
// surface that implements `core::render::Surface`.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains the window, Winit integration and event loop and is
// kept private. `engine` wires configuration into the platform.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder};
pub use platform::PlatformError;
