// src/engine.rs

use log::{debug, info, warn};

use crate::animator::SwapAnimator;
use crate::bars::BarSet;
use crate::clock::FrameClock;
use crate::config::{ConfigResult, MAX_SAMPLES, SortConfig};
use crate::event::Cue;
use crate::generator::SampleGenerator;
use crate::sort::{ShakerSort, SortPhase, SortStats, Suspend};
use crate::stage::Stage;
use crate::state::{Command, CommandResult, EngineReadback, RunId};

/// What the current run is waiting on.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Wait {
    /// Started but not resumed yet.
    Pending,

    /// Fixed step delay; resumes once it runs out.
    Delay { remaining: f32 },

    /// Swap animation in flight; resumes once the animator is idle.
    Animation,

    /// Sort is done.
    Finished,
}

/// The run currently owning the array and the bars.
struct SortRun {
    id: RunId,
    sort: ShakerSort,
    wait: Wait,
}

/// Frame-driven sort visualiser.
///
/// This struct runs on the host's frame thread.
/// It owns at most one run; starting a new run always cancels the
/// previous one before its bars are cleared.
pub struct Engine {
    /// Configuration of the current (or last) run
    config: SortConfig,

    generator: SampleGenerator,

    /// Bar handles in array order
    bars: BarSet,

    animator: SwapAnimator,

    clock: FrameClock,

    run: Option<SortRun>,

    /// Pre-allocated scratch for cues raised by one resume
    cue_scratch: Vec<Cue>,

    next_run_id: RunId,

    exit_requested: bool,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_generator(SampleGenerator::new())
    }

    pub fn with_generator(generator: SampleGenerator) -> Self {
        let config = SortConfig::default();
        Self {
            animator: SwapAnimator::new(config.completion),
            config,
            generator,
            bars: BarSet::new(),
            clock: FrameClock::new(),
            run: None,
            cue_scratch: Vec::with_capacity(8),
            next_run_id: 1,
            exit_requested: false,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Run lifecycle
    // ───────────────────────────────────────────────────────────────

    /// Start a new run.
    ///
    /// Cancels the current run, clears its bars, generates a fresh
    /// array and runs the sort up to its first suspension point. A
    /// rejected configuration leaves the current run untouched.
    pub fn start(&mut self, config: SortConfig, stage: &mut dyn Stage) -> ConfigResult<RunId> {
        if let Err(e) = config.validate() {
            warn!("Rejected run configuration: {}", e);
            return Err(e);
        }

        self.cancel(stage);
        self.reset(stage);

        self.config = config;
        self.animator.set_completion(self.config.completion);
        if let Some(seed) = self.config.seed {
            self.generator.reseed(seed);
        }

        let data = self.generator.generate(&self.config);
        self.bars.spawn(&data, self.config.bar_height_scale, stage);

        let id = self.next_run_id;
        self.next_run_id += 1;

        info!(
            "Run {} started: {} samples in [{}, {}), {:?}, speed {}",
            id,
            data.len(),
            self.config.min_value,
            self.config.max_value,
            self.config.distribution,
            self.config.effective_speed()
        );

        self.clock.reset();
        self.run = Some(SortRun {
            id,
            sort: ShakerSort::new(data),
            wait: Wait::Pending,
        });

        self.drive(stage);
        Ok(id)
    }

    /// Start again with the configuration of the last run.
    pub fn restart(&mut self, stage: &mut dyn Stage) -> ConfigResult<RunId> {
        self.start(self.config.clone(), stage)
    }

    /// Abort the current run.
    ///
    /// A swap in flight is rolled back to its starting slots and all
    /// highlights are cleared. Returns `false` if nothing was running.
    pub fn cancel(&mut self, stage: &mut dyn Stage) -> bool {
        let Some(run) = self.run.take() else {
            return false;
        };

        if let Some(pair) = self.animator.swap_indices() {
            self.bars.place(pair.left, pair.left as f32, stage);
            self.bars.place(pair.right, pair.right as f32, stage);
        }
        self.animator.cancel();
        self.bars.clear_highlights(stage);

        if run.sort.is_done() {
            debug!("Run {} released", run.id);
        } else {
            info!("Run {} cancelled", run.id);
        }
        true
    }

    /// Cancel the current run and raise the exit flag for the host.
    pub fn request_exit(&mut self, stage: &mut dyn Stage) {
        self.cancel(stage);
        if !self.exit_requested {
            info!("Exit requested");
        }
        self.exit_requested = true;
    }

    /// Change the speed factor. Takes effect from the next frame.
    pub fn set_speed(&mut self, speed: f32) {
        self.config.speed = speed;
    }

    /// Remove the previous run's bars.
    fn reset(&mut self, stage: &mut dyn Stage) {
        self.animator.cancel();

        let removed = self.bars.clear_bounded(MAX_SAMPLES, stage);
        if removed > 0 {
            debug!("Removed {} stale bars", removed);
        }
        if !self.bars.is_empty() {
            warn!("{} stale bars left after cleanup", self.bars.len());
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Frame processing
    // ───────────────────────────────────────────────────────────────

    /// Advance by one host frame of `delta` seconds.
    ///
    /// The swap animation steps first; the sort task is then resumed if
    /// whatever it waits on is over. At most one step delay expires per
    /// frame.
    pub fn tick(&mut self, delta: f32, stage: &mut dyn Stage) {
        let delta = self.clock.advance(delta);

        let distance = delta * self.config.effective_speed();
        if self.animator.is_in_flight() && distance.is_finite() {
            self.animator.step(distance, &mut self.bars, stage);
        }

        let ready = match self.run.as_mut().map(|run| &mut run.wait) {
            Some(Wait::Pending) => true,
            Some(Wait::Delay { remaining }) => {
                *remaining -= delta;
                *remaining <= 0.0
            }
            Some(Wait::Animation) => !self.animator.is_in_flight(),
            Some(Wait::Finished) | None => false,
        };

        if ready {
            self.drive(stage);
        }
    }

    /// Resume the sort task until it suspends again.
    fn drive(&mut self, stage: &mut dyn Stage) {
        let Some(run) = self.run.as_mut() else {
            return;
        };

        self.cue_scratch.clear();
        let suspend = run.sort.resume(&mut self.cue_scratch);

        for cue in self.cue_scratch.drain(..) {
            self.bars.apply_cue(cue, stage);
        }

        run.wait = match suspend {
            Suspend::Delay => Wait::Delay {
                remaining: self.config.scaled_step_delay(),
            },
            Suspend::Swap(pair) => {
                self.animator.begin(pair);
                Wait::Animation
            }
            Suspend::Done => {
                let stats = run.sort.stats();
                info!(
                    "Run {} done: {} comparisons, {} swaps, {} frames",
                    run.id,
                    stats.comparisons,
                    stats.swaps,
                    self.clock.frame()
                );
                Wait::Finished
            }
        };
    }

    // ───────────────────────────────────────────────────────────────
    // Commands
    // ───────────────────────────────────────────────────────────────

    /// Apply a host command immediately.
    pub fn process_command(&mut self, command: Command, stage: &mut dyn Stage) -> CommandResult {
        match command {
            Command::Start { config } => Self::started(self.start(config, stage)),

            Command::Restart => Self::started(self.restart(stage)),

            Command::Cancel => {
                self.cancel(stage);
                CommandResult::Ok
            }

            Command::SetSpeed { speed } => {
                self.set_speed(speed);
                CommandResult::Ok
            }

            Command::Exit => {
                self.request_exit(stage);
                CommandResult::Ok
            }
        }
    }

    fn started(result: ConfigResult<RunId>) -> CommandResult {
        match result {
            Ok(run_id) => CommandResult::Started { run_id },
            Err(e) => CommandResult::Error {
                message: e.to_string(),
            },
        }
    }

    // ───────────────────────────────────────────────────────────────
    // State access
    // ───────────────────────────────────────────────────────────────

    /// Phase of the current run; `Idle` when there is none.
    pub fn phase(&self) -> SortPhase {
        self.run
            .as_ref()
            .map(|run| run.sort.phase())
            .unwrap_or(SortPhase::Idle)
    }

    /// Whether a run exists and has not finished.
    pub fn is_running(&self) -> bool {
        self.run.as_ref().is_some_and(|run| !run.sort.is_done())
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.run.as_ref().map(|run| run.id)
    }

    /// Sample array of the current run, in its current order.
    pub fn data(&self) -> &[i32] {
        self.run.as_ref().map(|run| run.sort.data()).unwrap_or(&[])
    }

    pub fn stats(&self) -> SortStats {
        self.run
            .as_ref()
            .map(|run| run.sort.stats())
            .unwrap_or_default()
    }

    pub fn bars(&self) -> &BarSet {
        &self.bars
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn animator(&self) -> &SwapAnimator {
        &self.animator
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn readback(&self) -> EngineReadback {
        let (left_bound, right_bound) = self
            .run
            .as_ref()
            .map(|run| (run.sort.left_bound(), run.sort.right_bound()))
            .unwrap_or((0, 0));
        let stats = self.stats();

        EngineReadback {
            run_id: self.run_id(),
            phase: self.phase(),
            left_bound,
            right_bound,
            animation_in_flight: self.animator.is_in_flight(),
            swap_indices: self.animator.swap_indices(),
            comparisons: stats.comparisons,
            swaps: stats.swaps,
            forward_passes: stats.forward_passes,
            backward_passes: stats.backward_passes,
            bar_count: self.bars.len(),
            frame: self.clock.frame(),
            elapsed: self.clock.elapsed(),
            exit_requested: self.exit_requested,
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Distribution, SwapCompletion};
    use crate::sort::SwapPair;
    use crate::stage::RecordingStage;

    const FRAME: f32 = 1.0 / 60.0;

    fn engine() -> Engine {
        Engine::with_generator(SampleGenerator::with_seed(99))
    }

    fn config(count: usize) -> SortConfig {
        SortConfig::new()
            .with_samples(count)
            .with_range(1, 50)
            .with_step_delay(0.05)
            .with_speed(4.0)
            .with_seed(1234)
    }

    /// Tick until the run is done, returning the frames taken.
    fn run_to_end(engine: &mut Engine, stage: &mut RecordingStage) -> usize {
        for frame in 0..200_000 {
            if engine.phase() == SortPhase::Done {
                return frame;
            }
            engine.tick(FRAME, stage);
        }
        panic!("run did not finish: {:?}", engine.readback());
    }

    #[test]
    fn test_run_sorts_data_and_bars() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();

        for distribution in [
            Distribution::Uniform,
            Distribution::Ascending,
            Distribution::Descending,
        ] {
            let config = config(24).with_distribution(distribution);
            engine.start(config, &mut stage).unwrap();
            run_to_end(&mut engine, &mut stage);

            let data = engine.data().to_vec();
            assert!(data.windows(2).all(|w| w[0] <= w[1]), "{:?}", data);
            assert_eq!(engine.bars().values(), data);
            assert_eq!(stage.values_by_position(), data);
            assert_eq!(stage.live_count(), 24);
            assert_eq!(stage.highlighted_count(), 0);
            assert!(!engine.animator().is_in_flight());
        }
    }

    #[test]
    fn test_bars_snap_to_slots_after_run() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        engine.start(config(12), &mut stage).unwrap();
        run_to_end(&mut engine, &mut stage);

        for (slot, bar) in engine.bars().iter().enumerate() {
            assert_eq!(bar.x, slot as f32);
            assert_eq!(stage.bar(bar.id).unwrap().x, slot as f32);
        }
    }

    #[test]
    fn test_symmetric_completion_also_sorts() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let config = config(16).with_completion(SwapCompletion::Symmetric);
        engine.start(config, &mut stage).unwrap();
        run_to_end(&mut engine, &mut stage);

        assert!(engine.data().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stage.values_by_position(), engine.data());
    }

    #[test]
    fn test_zero_samples_done_immediately() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        engine.start(config(0), &mut stage).unwrap();

        assert_eq!(engine.phase(), SortPhase::Done);
        assert!(engine.data().is_empty());
        assert_eq!(stage.spawned_count(), 0);
        assert!(stage.events().is_empty());

        engine.tick(FRAME, &mut stage);
        assert_eq!(engine.phase(), SortPhase::Done);
    }

    #[test]
    fn test_first_comparison_runs_at_start() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        engine.start(config(8), &mut stage).unwrap();

        assert_ne!(engine.phase(), SortPhase::Idle);
        assert_eq!(engine.stats().comparisons, 1);
        assert_eq!(stage.highlighted_count(), 2);
    }

    #[test]
    fn test_sorted_input_single_pass() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        // One value per band: strictly ascending.
        let config = config(5)
            .with_range(0, 50)
            .with_distribution(Distribution::Ascending);
        engine.start(config, &mut stage).unwrap();
        run_to_end(&mut engine, &mut stage);

        let stats = engine.stats();
        assert_eq!(stats.swaps, 0);
        assert_eq!(stats.forward_passes, 1);
        assert_eq!(stats.backward_passes, 0);
        assert_eq!(stats.comparisons, 4);
    }

    #[test]
    fn test_waits_for_animation_before_next_comparison() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let config = config(2)
            .with_range(0, 100)
            .with_distribution(Distribution::Descending)
            .with_speed(1.0);
        engine.start(config, &mut stage).unwrap();

        let readback = engine.readback();
        assert_eq!(readback.phase, SortPhase::AwaitingSwapAnimation);
        assert!(readback.animation_in_flight);
        assert_eq!(readback.swap_indices, Some(SwapPair::new(0)));

        // Half a slot of travel: still in flight, array untouched.
        engine.tick(0.5, &mut stage);
        assert!(engine.animator().is_in_flight());
        assert_eq!(engine.phase(), SortPhase::AwaitingSwapAnimation);
        assert!(engine.data()[0] > engine.data()[1]);

        // Completing frame resumes the sort in the same frame.
        engine.tick(0.5, &mut stage);
        assert!(!engine.animator().is_in_flight());
        assert!(engine.data()[0] <= engine.data()[1]);
        assert_eq!(engine.stats().swaps, 1);
    }

    #[test]
    fn test_delay_paces_comparisons() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let config = config(5)
            .with_range(0, 50)
            .with_distribution(Distribution::Ascending)
            .with_step_delay(1.0)
            .with_speed(2.0);
        engine.start(config, &mut stage).unwrap();
        assert_eq!(engine.stats().comparisons, 1);

        // Scaled delay is 0.5s.
        engine.tick(0.25, &mut stage);
        assert_eq!(engine.stats().comparisons, 1);
        engine.tick(0.25, &mut stage);
        assert_eq!(engine.stats().comparisons, 2);

        // A long frame still releases only one step.
        engine.tick(10.0, &mut stage);
        assert_eq!(engine.stats().comparisons, 3);
    }

    #[test]
    fn test_restart_mid_run_keeps_one_run() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();

        let first = engine.start(config(30), &mut stage).unwrap();
        for _ in 0..20 {
            engine.tick(FRAME, &mut stage);
        }
        let second = engine.start(config(30), &mut stage).unwrap();

        assert_ne!(first, second);
        assert_eq!(engine.run_id(), Some(second));
        assert_eq!(engine.bars().len(), 30);
        assert_eq!(stage.live_count(), 30);
        assert_eq!(stage.spawned_count(), 60);

        run_to_end(&mut engine, &mut stage);
        assert_eq!(stage.live_count(), 30);
        assert_eq!(stage.values_by_position(), engine.data());
    }

    #[test]
    fn test_infinite_speed_with_empty_frame_still_finishes() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let config = config(2)
            .with_range(0, 100)
            .with_distribution(Distribution::Descending)
            .with_speed(f32::INFINITY);
        engine.start(config, &mut stage).unwrap();
        assert!(engine.animator().is_in_flight());

        engine.tick(0.0, &mut stage);
        for bar in engine.bars().iter() {
            assert!(bar.x.is_finite());
        }

        run_to_end(&mut engine, &mut stage);
        assert!(engine.data()[0] <= engine.data()[1]);
        for (slot, bar) in engine.bars().iter().enumerate() {
            assert_eq!(bar.x, slot as f32);
            assert_eq!(stage.bar(bar.id).unwrap().x, slot as f32);
        }
    }

    #[test]
    fn test_restart_during_swap_in_flight() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let config = config(2)
            .with_range(0, 100)
            .with_distribution(Distribution::Descending)
            .with_speed(1.0);
        engine.start(config.clone(), &mut stage).unwrap();
        engine.tick(0.3, &mut stage);
        assert!(engine.animator().is_in_flight());

        // Ascending input: no swap is requested by the new run.
        let second = engine
            .start(config.with_distribution(Distribution::Ascending), &mut stage)
            .unwrap();

        assert_eq!(engine.run_id(), Some(second));
        assert!(!engine.animator().is_in_flight());
        assert_eq!(engine.bars().len(), 2);
        assert_eq!(stage.live_count(), 2);
        assert_eq!(engine.phase(), SortPhase::ComparingForward);

        // Only the new run's first comparison is highlighted.
        assert_eq!(stage.highlighted_count(), 2);
        run_to_end(&mut engine, &mut stage);
        assert_eq!(stage.highlighted_count(), 0);
        assert_eq!(stage.values_by_position(), engine.data());
    }

    #[test]
    fn test_back_to_back_starts() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        engine.start(config(10), &mut stage).unwrap();
        engine.start(config(7), &mut stage).unwrap();

        assert_eq!(engine.bars().len(), 7);
        assert_eq!(stage.live_count(), 7);
        assert_eq!(engine.data().len(), 7);
    }

    #[test]
    fn test_invalid_config_keeps_current_run() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let id = engine.start(config(10), &mut stage).unwrap();

        let bad = config(10).with_range(5, 5);
        assert!(engine.start(bad, &mut stage).is_err());
        assert_eq!(engine.run_id(), Some(id));
        assert_eq!(stage.live_count(), 10);
        assert_eq!(engine.config().min_value, 1);
    }

    #[test]
    fn test_cancel_rolls_back_swap_in_flight() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        let config = config(2)
            .with_range(0, 100)
            .with_distribution(Distribution::Descending)
            .with_speed(1.0);
        engine.start(config, &mut stage).unwrap();
        engine.tick(0.3, &mut stage);

        assert!(engine.cancel(&mut stage));
        assert_eq!(engine.phase(), SortPhase::Idle);
        assert!(!engine.animator().is_in_flight());
        assert_eq!(stage.highlighted_count(), 0);
        for (slot, bar) in engine.bars().iter().enumerate() {
            assert_eq!(bar.x, slot as f32);
        }

        // Nothing left to cancel.
        assert!(!engine.cancel(&mut stage));
        engine.tick(FRAME, &mut stage);
        assert_eq!(engine.phase(), SortPhase::Idle);
    }

    #[test]
    fn test_restart_reuses_seeded_config() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        engine.start(config(9), &mut stage).unwrap();
        let first = engine.data().to_vec();

        engine.restart(&mut stage).unwrap();
        assert_eq!(engine.data(), first.as_slice());
        assert_eq!(stage.live_count(), 9);
    }

    #[test]
    fn test_commands() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();

        let result = engine.process_command(Command::Start { config: config(6) }, &mut stage);
        assert!(matches!(result, CommandResult::Started { .. }));

        let result = engine.process_command(Command::SetSpeed { speed: -1.0 }, &mut stage);
        assert_eq!(result, CommandResult::Ok);
        assert_eq!(engine.config().effective_speed(), 1.0);

        let bad = config(MAX_SAMPLES + 5);
        let result = engine.process_command(Command::Start { config: bad }, &mut stage);
        assert!(matches!(result, CommandResult::Error { .. }));

        let result = engine.process_command(Command::Exit, &mut stage);
        assert_eq!(result, CommandResult::Ok);
        assert!(engine.exit_requested());
        assert!(engine.readback().exit_requested);
        assert!(!engine.is_running());
    }

    #[test]
    fn test_readback_tracks_window() {
        let mut engine = engine();
        let mut stage = RecordingStage::new();
        engine.start(config(10), &mut stage).unwrap();

        let readback = engine.readback();
        assert_eq!(readback.left_bound, 0);
        assert_eq!(readback.right_bound, 9);
        assert_eq!(readback.bar_count, 10);
        assert!(readback.is_running());

        run_to_end(&mut engine, &mut stage);
        let readback = engine.readback();
        assert_eq!(readback.phase, SortPhase::Done);
        assert!(!readback.is_running());
        assert!(readback.frame > 0);
        assert!(readback.left_bound <= readback.right_bound + 1);
    }
}
