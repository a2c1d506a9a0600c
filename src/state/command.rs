// Commands from host to engine.
//
// Commands are the ONLY way a host can change a running engine.
// They are queued and applied on the frame thread.

use crate::config::SortConfig;

use super::RunId;

/// A command from the host to the engine.
///
/// Commands are:
/// - Immutable once created
/// - Applied in the order they were sent
/// - Applied before the frame they arrive in is ticked
#[derive(Debug, Clone)]
pub enum Command {
    // ═══════════════════════════════════════════
    // Run lifecycle
    // ═══════════════════════════════════════════
    /// Cancel any current run, clear its bars, and start a new run.
    Start { config: SortConfig },

    /// Start again with the last accepted configuration.
    Restart,

    /// Abort the current run. Bars stay where they are.
    Cancel,

    // ═══════════════════════════════════════════
    // Live controls
    // ═══════════════════════════════════════════
    /// Change the speed factor of the current and future runs.
    SetSpeed { speed: f32 },

    // ═══════════════════════════════════════════
    // Application
    // ═══════════════════════════════════════════
    /// Cancel the current run and ask the host to quit.
    Exit,
}

/// Response from the engine after processing a command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command succeeded.
    Ok,

    /// A new run was started.
    Started { run_id: RunId },

    /// Command failed.
    Error { message: String },
}
