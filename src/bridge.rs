//! Thread-safe bridge between the host's controls and the frame loop.
//!
//! This module provides the communication layer that lets whatever owns
//! the start/exit controls talk to the engine without sharing it.
//!
//! # Architecture
//!
//! - **Control side** owns [`ControlHandle`] and only sends commands
//! - **Frame side** owns [`EngineHandle`] with the [`Engine`]
//! - Communication uses MPSC channels for commands and atomics for readback
//!
//! # Usage
//!
//! ```ignore
//! let (mut control, mut frame) = create_bridge(Engine::new());
//!
//! // Control side: trigger a run
//! control.start(SortConfig::default());
//!
//! // Frame side: once per frame
//! frame.process_commands(&mut stage);
//! frame.tick(delta, &mut stage);
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU8, AtomicU64, Ordering},
    mpsc::{self, Receiver, Sender, TryRecvError},
};

use log::warn;

use crate::config::SortConfig;
use crate::engine::Engine;
use crate::sort::SortPhase;
use crate::stage::Stage;
use crate::state::{Command, CommandResult, EngineReadback};

/// Handle for the control side.
///
/// All methods are non-blocking and safe to call from any thread that
/// owns the handle.
pub struct ControlHandle {
    /// Channel to send commands to the engine.
    command_tx: Sender<Command>,

    /// Channel to receive command results.
    result_rx: Receiver<CommandResult>,

    /// Shared readback state (updated by engine, read by control side).
    readback: Arc<SharedReadback>,
}

/// Handle for the frame loop containing the engine and communication channels.
pub struct EngineHandle {
    /// The engine (owned by the frame loop).
    engine: Engine,

    /// Channel to receive commands from the control side.
    command_rx: Receiver<Command>,

    /// Channel to send results back.
    result_tx: Sender<CommandResult>,

    /// Shared readback state (written by engine).
    readback: Arc<SharedReadback>,
}

/// Lock-free shared state for engine -> control readback.
struct SharedReadback {
    /// Zero when there is no run.
    run_id: AtomicU64,
    phase: AtomicU8,
    comparisons: AtomicU64,
    swaps: AtomicU64,
    bar_count: AtomicU64,
    animation_in_flight: AtomicBool,
    running: AtomicBool,
    exit_requested: AtomicBool,
}

impl SharedReadback {
    fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            phase: AtomicU8::new(SortPhase::Idle.as_u8()),
            comparisons: AtomicU64::new(0),
            swaps: AtomicU64::new(0),
            bar_count: AtomicU64::new(0),
            animation_in_flight: AtomicBool::new(false),
            running: AtomicBool::new(false),
            exit_requested: AtomicBool::new(false),
        }
    }
}

/// Create a linked pair of handles around `engine`.
pub fn create_bridge(engine: Engine) -> (ControlHandle, EngineHandle) {
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let readback = Arc::new(SharedReadback::new());

    let control = ControlHandle {
        command_tx: cmd_tx,
        result_rx,
        readback: Arc::clone(&readback),
    };

    let engine_handle = EngineHandle {
        engine,
        command_rx: cmd_rx,
        result_tx,
        readback,
    };

    engine_handle.sync_readback();
    (control, engine_handle)
}

// ═══════════════════════════════════════════════════════════════════
// ControlHandle - Control Side API
// ═══════════════════════════════════════════════════════════════════

impl ControlHandle {
    /// Send a command to the engine.
    pub fn send(&self, cmd: Command) {
        if self.command_tx.send(cmd).is_err() {
            warn!("Engine handle dropped; command discarded");
        }
    }

    /// Start (or restart) a run with `config`.
    pub fn start(&self, config: SortConfig) {
        self.send(Command::Start { config });
    }

    /// Start again with the last accepted configuration.
    pub fn restart(&self) {
        self.send(Command::Restart);
    }

    pub fn cancel(&self) {
        self.send(Command::Cancel);
    }

    pub fn set_speed(&self, speed: f32) {
        self.send(Command::SetSpeed { speed });
    }

    /// Ask the engine to stop and the host to quit.
    pub fn exit(&self) {
        self.send(Command::Exit);
    }

    /// Poll for any command results from the engine.
    pub fn poll_results(&self) -> Vec<CommandResult> {
        let mut results = Vec::new();
        loop {
            match self.result_rx.try_recv() {
                Ok(result) => results.push(result),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        results
    }

    /// Get the current engine readback state.
    ///
    /// Note: only run id, phase, counters, bar count and flags are
    /// mirrored; window bounds and timing stay zero. Read those from the
    /// engine itself on the frame side.
    pub fn readback(&self) -> EngineReadback {
        let run_id = self.readback.run_id.load(Ordering::Relaxed);
        EngineReadback {
            run_id: (run_id != 0).then_some(run_id),
            phase: SortPhase::from_u8(self.readback.phase.load(Ordering::Relaxed)),
            animation_in_flight: self.readback.animation_in_flight.load(Ordering::Relaxed),
            comparisons: self.readback.comparisons.load(Ordering::Relaxed),
            swaps: self.readback.swaps.load(Ordering::Relaxed),
            bar_count: self.readback.bar_count.load(Ordering::Relaxed) as usize,
            exit_requested: self.readback.exit_requested.load(Ordering::Relaxed),
            ..EngineReadback::default()
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.readback.running.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn exit_requested(&self) -> bool {
        self.readback.exit_requested.load(Ordering::Relaxed)
    }
}

// ═══════════════════════════════════════════════════════════════════
// EngineHandle - Frame Loop API
// ═══════════════════════════════════════════════════════════════════

impl EngineHandle {
    // ───────────────────────────────────────────────────────────────
    // Command Processing
    // ───────────────────────────────────────────────────────────────

    /// Apply all pending commands, in order.
    ///
    /// Call this at the start of each frame. Returns the number of
    /// commands applied.
    pub fn process_commands(&mut self, stage: &mut dyn Stage) -> usize {
        let mut applied = 0;

        while let Ok(cmd) = self.command_rx.try_recv() {
            let result = self.engine.process_command(cmd, stage);
            let _ = self.result_tx.send(result);
            applied += 1;
        }

        if applied > 0 {
            self.sync_readback();
        }
        applied
    }

    // ───────────────────────────────────────────────────────────────
    // Frame Processing (delegates to Engine)
    // ───────────────────────────────────────────────────────────────

    /// Advance the engine by one frame and publish readback.
    pub fn tick(&mut self, delta: f32, stage: &mut dyn Stage) {
        self.engine.tick(delta, stage);
        self.sync_readback();
    }

    /// Commands first, then the frame.
    pub fn frame(&mut self, delta: f32, stage: &mut dyn Stage) {
        self.process_commands(stage);
        self.tick(delta, stage);
    }

    // ───────────────────────────────────────────────────────────────
    // Engine State Access
    // ───────────────────────────────────────────────────────────────

    /// Get a reference to the engine.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Get a mutable reference to the engine.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    // ───────────────────────────────────────────────────────────────
    // Readback Updates
    // ───────────────────────────────────────────────────────────────

    /// Sync readback state from engine.
    pub fn sync_readback(&self) {
        let readback = self.engine.readback();
        let shared = &self.readback;

        shared
            .run_id
            .store(readback.run_id.unwrap_or(0), Ordering::Relaxed);
        shared.phase.store(readback.phase.as_u8(), Ordering::Relaxed);
        shared
            .comparisons
            .store(readback.comparisons, Ordering::Relaxed);
        shared.swaps.store(readback.swaps, Ordering::Relaxed);
        shared
            .bar_count
            .store(readback.bar_count as u64, Ordering::Relaxed);
        shared
            .animation_in_flight
            .store(readback.animation_in_flight, Ordering::Relaxed);
        shared
            .running
            .store(readback.is_running(), Ordering::Relaxed);
        shared
            .exit_requested
            .store(readback.exit_requested, Ordering::Relaxed);
    }
}
