// src/state/readback.rs
//
// Read-only engine state for host display.

use crate::sort::{SortPhase, SwapPair};

/// Identifier of a run; increases with every accepted start.
pub type RunId = u64;

/// Snapshot of the run state.
///
/// This is produced by the engine and read by the host.
/// Contains the shrinking sort window, the swap in flight and counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineReadback {
    /// Current run, if any.
    pub run_id: Option<RunId>,

    pub phase: SortPhase,

    /// Left end of the unsorted window.
    pub left_bound: usize,

    /// Right end of the unsorted window.
    pub right_bound: usize,

    /// Whether a swap animation is in flight.
    pub animation_in_flight: bool,

    /// Slots of the swap in flight.
    pub swap_indices: Option<SwapPair>,

    pub comparisons: u64,
    pub swaps: u64,
    pub forward_passes: u32,
    pub backward_passes: u32,

    /// Number of live bars.
    pub bar_count: usize,

    /// Frames ticked since the run started.
    pub frame: u64,

    /// Seconds since the run started.
    pub elapsed: f64,

    /// Set once the host has been asked to quit.
    pub exit_requested: bool,
}

impl EngineReadback {
    /// Whether a run exists and has not finished.
    pub fn is_running(&self) -> bool {
        self.run_id.is_some() && self.phase != SortPhase::Done
    }
}
