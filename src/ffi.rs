// C-compatible FFI bindings for native hosts (game engines, Swift/iOS).
//
// Safety requirements:
// - Engine handles must be created by this module and not fabricated
// - Stage callbacks may be NULL; a NULL stage pointer means "no visuals"
// - Stage callbacks are invoked synchronously, on the calling thread
// - Caller must call sortviz_engine_destroy for each sortviz_engine_create

use std::ffi::c_void;

use crate::bars::BarId;
use crate::config::{Distribution, SortConfig, SwapCompletion};
use crate::engine::Engine;
use crate::stage::{BarTransform, HeadlessStage, Stage};
use crate::state::EngineReadback;

use log::error;

#[cfg(feature = "ios")]
use log::LevelFilter;
#[cfg(feature = "ios")]
use oslog::OsLogger;

#[cfg(feature = "web")]
use wasm_bindgen::prelude::*;

/// Returned by start/restart when the engine handle is NULL.
pub const SORTVIZ_ERR_NULL_HANDLE: i64 = -1;
/// Returned by start/restart when the configuration is rejected.
pub const SORTVIZ_ERR_INVALID_CONFIG: i64 = -2;

// Logger subsystem identifier
#[cfg(feature = "ios")]
const LOG_SUBSYSTEM: &str = "com.sortviz.engine";

// ═══════════════════════════════════════════════════════════════════════════
// Logger Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the oslog logger.
///
/// This should be called once at application startup before using any other
/// FFI functions. Output appears in Console.app and Xcode's debug console.
#[cfg(feature = "ios")]
#[unsafe(no_mangle)]
pub extern "C" fn sortviz_init_logger() {
    OsLogger::new(LOG_SUBSYSTEM)
        .level_filter(LevelFilter::Debug)
        .init()
        .ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Opaque Handle Types
// ═══════════════════════════════════════════════════════════════════════════

/// Opaque handle to the engine.
pub struct SortvizEngine {
    inner: Engine,
}

// ═══════════════════════════════════════════════════════════════════════════
// FFI Types
// ═══════════════════════════════════════════════════════════════════════════

/// Run configuration.
///
/// Shared with the wasm bindings, which export it as a JavaScript class.
#[cfg_attr(feature = "web", wasm_bindgen)]
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SortvizConfig {
    pub sample_count: u32,
    pub min_value: i32,
    /// Exclusive.
    pub max_value: i32,
    /// 0 = uniform, 1 = ascending, 2 = descending.
    pub distribution: i32,
    /// Seconds between comparisons at speed 1.
    pub step_delay: f32,
    pub speed: f32,
    /// `true` for shared-progress swap completion.
    pub symmetric_completion: bool,
    pub bar_height_scale: f32,
    pub use_seed: bool,
    pub seed: u64,
}

impl Default for SortvizConfig {
    fn default() -> Self {
        SortConfig::default().into()
    }
}

impl From<SortConfig> for SortvizConfig {
    fn from(c: SortConfig) -> Self {
        Self {
            sample_count: c.sample_count as u32,
            min_value: c.min_value,
            max_value: c.max_value,
            distribution: c.distribution.index(),
            step_delay: c.step_delay,
            speed: c.speed,
            symmetric_completion: c.completion == SwapCompletion::Symmetric,
            bar_height_scale: c.bar_height_scale,
            use_seed: c.seed.is_some(),
            seed: c.seed.unwrap_or(0),
        }
    }
}

impl From<SortvizConfig> for SortConfig {
    fn from(c: SortvizConfig) -> Self {
        Self {
            sample_count: c.sample_count as usize,
            min_value: c.min_value,
            max_value: c.max_value,
            distribution: Distribution::from_index(c.distribution),
            step_delay: c.step_delay,
            speed: c.speed,
            completion: if c.symmetric_completion {
                SwapCompletion::Symmetric
            } else {
                SwapCompletion::Truncated
            },
            bar_height_scale: c.bar_height_scale,
            seed: c.use_seed.then_some(c.seed),
        }
    }
}

/// Readback data from the engine.
#[repr(C)]
pub struct SortvizReadback {
    /// Zero when there is no run.
    pub run_id: u64,
    /// 0 idle, 1 forward, 2 awaiting swap, 3 backward, 4 done.
    pub phase: u8,
    pub left_bound: u32,
    pub right_bound: u32,
    pub animation_in_flight: bool,
    /// -1 when no swap is in flight.
    pub swap_left: i32,
    pub swap_right: i32,
    pub comparisons: u64,
    pub swaps: u64,
    pub bar_count: u32,
    pub frame: u64,
    pub elapsed: f64,
    pub exit_requested: bool,
}

impl From<EngineReadback> for SortvizReadback {
    fn from(r: EngineReadback) -> Self {
        let (swap_left, swap_right) = r
            .swap_indices
            .map(|p| (p.left as i32, p.right as i32))
            .unwrap_or((-1, -1));
        Self {
            run_id: r.run_id.unwrap_or(0),
            phase: r.phase.as_u8(),
            left_bound: r.left_bound as u32,
            right_bound: r.right_bound as u32,
            animation_in_flight: r.animation_in_flight,
            swap_left,
            swap_right,
            comparisons: r.comparisons,
            swaps: r.swaps,
            bar_count: r.bar_count as u32,
            frame: r.frame,
            elapsed: r.elapsed,
            exit_requested: r.exit_requested,
        }
    }
}

/// Host callbacks that provision bars.
#[repr(C)]
pub struct SortvizStage {
    /// Passed back verbatim as the first argument of every callback.
    pub user_data: *mut c_void,
    /// (user_data, bar, value, x, y, height)
    pub spawn_bar: Option<unsafe extern "C" fn(*mut c_void, u32, i32, f32, f32, f32)>,
    /// (user_data, bar)
    pub destroy_bar: Option<unsafe extern "C" fn(*mut c_void, u32)>,
    /// (user_data, bar, highlighted)
    pub set_highlight: Option<unsafe extern "C" fn(*mut c_void, u32, bool)>,
    /// (user_data, bar, x)
    pub move_bar: Option<unsafe extern "C" fn(*mut c_void, u32, f32)>,
}

/// Stage that forwards to C callbacks.
struct CallbackStage<'a> {
    callbacks: &'a SortvizStage,
}

impl Stage for CallbackStage<'_> {
    fn spawn_bar(&mut self, bar: BarId, value: i32, t: BarTransform) {
        if let Some(f) = self.callbacks.spawn_bar {
            unsafe { f(self.callbacks.user_data, bar, value, t.x, t.y, t.height) };
        }
    }

    fn destroy_bar(&mut self, bar: BarId) {
        if let Some(f) = self.callbacks.destroy_bar {
            unsafe { f(self.callbacks.user_data, bar) };
        }
    }

    fn set_highlight(&mut self, bar: BarId, highlighted: bool) {
        if let Some(f) = self.callbacks.set_highlight {
            unsafe { f(self.callbacks.user_data, bar, highlighted) };
        }
    }

    fn move_bar(&mut self, bar: BarId, x: f32) {
        if let Some(f) = self.callbacks.move_bar {
            unsafe { f(self.callbacks.user_data, bar, x) };
        }
    }
}

/// Run `f` against the stage described by `stage` (or a headless one).
///
/// # Safety
/// `stage` must be NULL or point to a valid `SortvizStage`.
unsafe fn with_stage<R>(stage: *const SortvizStage, f: impl FnOnce(&mut dyn Stage) -> R) -> R {
    match unsafe { stage.as_ref() } {
        Some(callbacks) => f(&mut CallbackStage { callbacks }),
        None => f(&mut HeadlessStage),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Engine Lifecycle
// ═══════════════════════════════════════════════════════════════════════════

/// Get the default configuration values.
#[unsafe(no_mangle)]
pub extern "C" fn sortviz_default_config() -> SortvizConfig {
    SortvizConfig::default()
}

/// Create a new engine.
///
/// Returns an opaque pointer that must be freed with `sortviz_engine_destroy`.
#[unsafe(no_mangle)]
pub extern "C" fn sortviz_engine_create() -> *mut SortvizEngine {
    Box::into_raw(Box::new(SortvizEngine {
        inner: Engine::new(),
    }))
}

/// Destroy an engine.
///
/// Bars still alive are NOT reported to the stage; the host owns them.
///
/// # Safety
/// `engine` must be a valid pointer returned by `sortviz_engine_create`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_destroy(engine: *mut SortvizEngine) {
    if !engine.is_null() {
        unsafe { drop(Box::from_raw(engine)) };
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Run Control
// ═══════════════════════════════════════════════════════════════════════════

/// Start (or restart) a run.
///
/// Returns the new run id, or a negative `SORTVIZ_ERR_*` code.
/// A NULL `config` uses the defaults.
///
/// # Safety
/// - `engine` must be a valid engine handle
/// - `config` must be NULL or point to a valid `SortvizConfig`
/// - `stage` must be NULL or point to a valid `SortvizStage`
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_start(
    engine: *mut SortvizEngine,
    config: *const SortvizConfig,
    stage: *const SortvizStage,
) -> i64 {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        error!("sortviz_engine_start: null engine handle");
        return SORTVIZ_ERR_NULL_HANDLE;
    };

    let config: SortConfig = match unsafe { config.as_ref() } {
        Some(c) => (*c).into(),
        None => SortConfig::default(),
    };

    let result = unsafe { with_stage(stage, |s| engine.inner.start(config, s)) };
    match result {
        Ok(run_id) => run_id as i64,
        Err(_) => SORTVIZ_ERR_INVALID_CONFIG,
    }
}

/// Start again with the last accepted configuration.
///
/// # Safety
/// Same as `sortviz_engine_start`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_restart(
    engine: *mut SortvizEngine,
    stage: *const SortvizStage,
) -> i64 {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        error!("sortviz_engine_restart: null engine handle");
        return SORTVIZ_ERR_NULL_HANDLE;
    };

    match unsafe { with_stage(stage, |s| engine.inner.restart(s)) } {
        Ok(run_id) => run_id as i64,
        Err(_) => SORTVIZ_ERR_INVALID_CONFIG,
    }
}

/// Abort the current run. Returns `false` if nothing was running.
///
/// # Safety
/// Same as `sortviz_engine_start`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_cancel(
    engine: *mut SortvizEngine,
    stage: *const SortvizStage,
) -> bool {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        return false;
    };
    unsafe { with_stage(stage, |s| engine.inner.cancel(s)) }
}

/// Advance the engine by one frame of `delta` seconds.
///
/// # Safety
/// Same as `sortviz_engine_start`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_tick(
    engine: *mut SortvizEngine,
    delta: f32,
    stage: *const SortvizStage,
) {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        return;
    };
    unsafe { with_stage(stage, |s| engine.inner.tick(delta, s)) };
}

/// Change the speed factor of the current run.
///
/// # Safety
/// `engine` must be a valid engine handle or NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_set_speed(engine: *mut SortvizEngine, speed: f32) {
    if let Some(engine) = unsafe { engine.as_mut() } {
        engine.inner.set_speed(speed);
    }
}

/// Cancel the current run and raise the exit flag.
///
/// # Safety
/// Same as `sortviz_engine_start`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_exit(
    engine: *mut SortvizEngine,
    stage: *const SortvizStage,
) {
    let Some(engine) = (unsafe { engine.as_mut() }) else {
        return;
    };
    unsafe { with_stage(stage, |s| engine.inner.request_exit(s)) };
}

// ═══════════════════════════════════════════════════════════════════════════
// State Access
// ═══════════════════════════════════════════════════════════════════════════

/// Get the current engine readback state.
///
/// # Safety
/// `engine` must be a valid engine handle or NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_readback(engine: *const SortvizEngine) -> SortvizReadback {
    match unsafe { engine.as_ref() } {
        Some(engine) => engine.inner.readback().into(),
        None => EngineReadback::default().into(),
    }
}

/// Whether the host has been asked to quit.
///
/// # Safety
/// `engine` must be a valid engine handle or NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_exit_requested(engine: *const SortvizEngine) -> bool {
    unsafe { engine.as_ref() }.is_some_and(|e| e.inner.exit_requested())
}

/// Copy the current array into `out`.
///
/// Returns the number of values written (at most `capacity`).
///
/// # Safety
/// - `engine` must be a valid engine handle or NULL
/// - `out` must be NULL or valid for `capacity` writes
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sortviz_engine_copy_values(
    engine: *const SortvizEngine,
    out: *mut i32,
    capacity: u32,
) -> u32 {
    let Some(engine) = (unsafe { engine.as_ref() }) else {
        return 0;
    };
    if out.is_null() {
        return 0;
    }

    let data = engine.inner.data();
    let count = data.len().min(capacity as usize);
    unsafe { std::ptr::copy_nonoverlapping(data.as_ptr(), out, count) };
    count as u32
}
