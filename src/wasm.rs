//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { sortviz_init, SortvizConfig, SortvizVisualizer } from './sortviz.js';
//!
//! await init();
//! sortviz_init();
//!
//! const viz = new SortvizVisualizer();
//! const config = new SortvizConfig();
//! config.sample_count = 40;
//! viz.start(config);
//!
//! function frame(dt) {
//!     viz.tick(dt);
//!     draw(viz.bar_positions(), viz.bar_heights(), viz.highlighted());
//! }
//! ```
//!
//! Bars are read back every frame instead of being pushed through
//! callbacks; the browser side owns drawing.

use wasm_bindgen::prelude::*;

use crate::engine::Engine;
use crate::stage::HeadlessStage;
use crate::state::EngineReadback;

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn sortviz_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════

/// The C run configuration, exported to JavaScript as a class.
pub use crate::ffi::SortvizConfig;

#[wasm_bindgen]
impl SortvizConfig {
    /// Create a new configuration with default values.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Readback Data
// ═══════════════════════════════════════════════════════════════════════════

/// Readback data from the engine (for status displays).
#[wasm_bindgen]
#[derive(Clone, Copy, Default)]
pub struct SortvizReadback {
    /// Zero when there is no run.
    pub run_id: u64,
    /// 0 idle, 1 forward, 2 awaiting swap, 3 backward, 4 done.
    pub phase: u8,
    pub left_bound: u32,
    pub right_bound: u32,
    pub animation_in_flight: bool,
    pub comparisons: u64,
    pub swaps: u64,
    pub bar_count: u32,
    pub elapsed: f64,
    pub running: bool,
    pub exit_requested: bool,
}

impl From<EngineReadback> for SortvizReadback {
    fn from(r: EngineReadback) -> Self {
        Self {
            run_id: r.run_id.unwrap_or(0),
            phase: r.phase.as_u8(),
            left_bound: r.left_bound as u32,
            right_bound: r.right_bound as u32,
            animation_in_flight: r.animation_in_flight,
            comparisons: r.comparisons,
            swaps: r.swaps,
            bar_count: r.bar_count as u32,
            elapsed: r.elapsed,
            running: r.is_running(),
            exit_requested: r.exit_requested,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Visualizer
// ═══════════════════════════════════════════════════════════════════════════

/// Engine handle driven from `requestAnimationFrame`.
#[wasm_bindgen]
pub struct SortvizVisualizer {
    inner: Engine,
    stage: HeadlessStage,
}

#[wasm_bindgen]
impl SortvizVisualizer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SortvizVisualizer {
        SortvizVisualizer {
            inner: Engine::new(),
            stage: HeadlessStage,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Run Control
    // ─────────────────────────────────────────────────────────────────────────

    /// Start (or restart) a run. Returns the run id.
    pub fn start(&mut self, config: SortvizConfig) -> Result<u64, JsValue> {
        self.inner
            .start(config.into(), &mut self.stage)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start again with the last accepted configuration.
    pub fn restart(&mut self) -> Result<u64, JsValue> {
        self.inner
            .restart(&mut self.stage)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Abort the current run. Returns `false` if nothing was running.
    pub fn cancel(&mut self) -> bool {
        self.inner.cancel(&mut self.stage)
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.inner.set_speed(speed);
    }

    /// Cancel the current run and flag the page to tear down.
    pub fn exit(&mut self) {
        self.inner.request_exit(&mut self.stage);
    }

    /// Advance by one frame of `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        self.inner.tick(delta, &mut self.stage);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Readback
    // ─────────────────────────────────────────────────────────────────────────

    pub fn get_readback(&self) -> SortvizReadback {
        self.inner.readback().into()
    }

    pub fn exit_requested(&self) -> bool {
        self.inner.exit_requested()
    }

    /// Current array, in slot order.
    pub fn values(&self) -> Vec<i32> {
        self.inner.data().to_vec()
    }

    /// Horizontal position of each bar, in slot order.
    pub fn bar_positions(&self) -> Vec<f32> {
        self.inner.bars().iter().map(|bar| bar.x).collect()
    }

    pub fn bar_heights(&self) -> Vec<f32> {
        self.inner.bars().iter().map(|bar| bar.height).collect()
    }

    /// 1 for highlighted bars, 0 otherwise, in slot order.
    pub fn highlighted(&self) -> Vec<u8> {
        self.inner
            .bars()
            .iter()
            .map(|bar| bar.highlighted as u8)
            .collect()
    }
}

impl Default for SortvizVisualizer {
    fn default() -> Self {
        Self::new()
    }
}
