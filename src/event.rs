// src/event.rs

use crate::bars::BarId;

/// ===============================
/// Sort-side cues
/// ===============================

/// A visual request raised by the sort task, addressed by array slot.
///
/// These cues:
/// - live ONLY between the sort task and the engine
/// - know nothing about bar handles
/// - are resolved to bars through the current slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Highlight { slot: usize },

    Unhighlight { slot: usize },
}

/// ===============================
/// Stage-side events
/// ===============================

/// A visual request addressed to a concrete bar.
///
/// These events:
/// - are what a host actually renders
/// - carry bar handles, never slots
/// - are recorded verbatim by `RecordingStage`
#[derive(Debug, Clone, PartialEq)]
pub enum StageEvent {
    Spawn {
        bar: BarId,
        value: i32,
        x: f32,
        y: f32,
        height: f32,
    },

    Destroy { bar: BarId },

    Highlight { bar: BarId, on: bool },

    Move { bar: BarId, x: f32 },
}

impl StageEvent {
    pub fn bar(&self) -> BarId {
        match self {
            StageEvent::Spawn { bar, .. }
            | StageEvent::Destroy { bar }
            | StageEvent::Highlight { bar, .. }
            | StageEvent::Move { bar, .. } => *bar,
        }
    }
}
