// src/state/mod.rs
//
// Host-facing state layer.
//
// Commands describe what the host wants; readback describes what the
// engine is doing. The host never touches the engine's run directly.

mod command;
mod readback;

pub use command::*;
pub use readback::*;
