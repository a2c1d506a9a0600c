// src/lib.rs
//
// Library entry point for FFI consumers (game engines, iOS/Swift, web).

mod animator;
mod bars;
mod bridge;
mod clock;
mod config;
mod engine;
mod event;
mod generator;
mod sort;
mod stage;
mod state;

pub mod ffi;

#[cfg(feature = "web")]
pub mod wasm;

// Re-export key types for Rust consumers
pub use animator::SwapAnimator;
pub use bars::{Bar, BarId, BarSet};
pub use bridge::{ControlHandle, EngineHandle, create_bridge};
pub use config::{
    ConfigError, ConfigResult, Distribution, MAX_SAMPLES, SortConfig, SwapCompletion,
};
pub use engine::Engine;
pub use event::{Cue, StageEvent};
pub use generator::{SampleGenerator, generate};
pub use sort::{ShakerSort, SortPhase, SortStats, Suspend, SwapPair};
pub use stage::{BarTransform, HeadlessStage, LiveBar, RecordingStage, Stage};
pub use state::{Command, CommandResult, EngineReadback, RunId};
