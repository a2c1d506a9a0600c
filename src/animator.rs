// src/animator.rs
//
// Per-frame swap animation.
//
// While a swap is in flight the two bars glide toward each other's
// slot. Once the completion check passes they are snapped into place,
// their handles are exchanged, and the in-flight flag is cleared. The
// engine polls that flag to decide when the sort task may resume.

use log::debug;

use crate::bars::BarSet;
use crate::config::SwapCompletion;
use crate::sort::SwapPair;
use crate::stage::Stage;

/// Animates one swap at a time.
#[derive(Debug, Default)]
pub struct SwapAnimator {
    /// Slots being swapped; `None` when idle.
    active: Option<SwapPair>,

    /// Distance travelled by each bar (symmetric completion only).
    progress: f32,

    completion: SwapCompletion,
}

impl SwapAnimator {
    pub fn new(completion: SwapCompletion) -> Self {
        Self {
            active: None,
            progress: 0.0,
            completion,
        }
    }

    pub fn set_completion(&mut self, completion: SwapCompletion) {
        self.completion = completion;
    }

    pub fn completion(&self) -> SwapCompletion {
        self.completion
    }

    /// Mark `pair` as in flight.
    pub fn begin(&mut self, pair: SwapPair) {
        debug!("swap begin {} <-> {}", pair.left, pair.right);
        self.active = Some(pair);
        self.progress = 0.0;
    }

    /// Drop the current swap without touching the bars.
    pub fn cancel(&mut self) {
        self.active = None;
        self.progress = 0.0;
    }

    #[inline]
    pub fn is_in_flight(&self) -> bool {
        self.active.is_some()
    }

    /// Slots of the swap in flight.
    #[inline]
    pub fn swap_indices(&self) -> Option<SwapPair> {
        self.active
    }

    /// Advance the animation by `distance` slots.
    ///
    /// Returns `true` on the frame the swap completes.
    pub fn step(&mut self, distance: f32, bars: &mut BarSet, stage: &mut dyn Stage) -> bool {
        let Some(pair) = self.active else {
            return false;
        };

        let left_x = bars.translate(pair.left, distance, stage);
        let right_x = bars.translate(pair.right, -distance, stage);

        let (Some(left_x), Some(right_x)) = (left_x, right_x) else {
            // Bars vanished under us; nothing left to animate.
            self.cancel();
            return true;
        };

        self.progress += distance;

        let arrived = match self.completion {
            SwapCompletion::Truncated => {
                left_x as i64 != pair.left as i64 && right_x as i64 != pair.right as i64
            }
            SwapCompletion::Symmetric => self.progress >= 1.0,
        };

        if !arrived {
            return false;
        }

        bars.place(pair.left, pair.right as f32, stage);
        bars.place(pair.right, pair.left as f32, stage);
        bars.swap_slots(pair.left, pair.right);

        debug!("swap done {} <-> {}", pair.left, pair.right);
        self.cancel();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::RecordingStage;

    fn setup() -> (BarSet, RecordingStage) {
        let mut stage = RecordingStage::new();
        let mut bars = BarSet::new();
        bars.spawn(&[30, 10, 20], 1.0, &mut stage);
        (bars, stage)
    }

    /// Step until completion, returning the number of frames taken.
    fn frames_until_done(
        animator: &mut SwapAnimator,
        distance: f32,
        bars: &mut BarSet,
        stage: &mut RecordingStage,
    ) -> usize {
        for frame in 1..=10_000 {
            if animator.step(distance, bars, stage) {
                return frame;
            }
        }
        panic!("swap never completed");
    }

    #[test]
    fn test_swap_exchanges_bars_and_clears_flag() {
        let (mut bars, mut stage) = setup();
        let left_id = bars.get(0).unwrap().id;
        let right_id = bars.get(1).unwrap().id;

        let mut animator = SwapAnimator::new(SwapCompletion::Truncated);
        animator.begin(SwapPair::new(0));
        assert!(animator.is_in_flight());
        assert_eq!(animator.swap_indices(), Some(SwapPair::new(0)));

        frames_until_done(&mut animator, 0.1, &mut bars, &mut stage);

        assert!(!animator.is_in_flight());
        assert_eq!(animator.swap_indices(), None);
        assert_eq!(bars.get(0).unwrap().id, right_id);
        assert_eq!(bars.get(1).unwrap().id, left_id);
        assert_eq!(bars.get(0).unwrap().x, 0.0);
        assert_eq!(bars.get(1).unwrap().x, 1.0);
        assert_eq!(bars.values(), vec![10, 30, 20]);
        assert_eq!(stage.values_by_position(), vec![10, 30, 20]);
    }

    #[test]
    fn test_truncated_completion_waits_for_left_bar() {
        let (mut bars, mut stage) = setup();
        let mut animator = SwapAnimator::new(SwapCompletion::Truncated);
        animator.begin(SwapPair::new(1));

        // 0.25 per frame: left bar leaves slot 1 once it reaches 2.0.
        let frames = frames_until_done(&mut animator, 0.25, &mut bars, &mut stage);
        assert_eq!(frames, 4);
    }

    #[test]
    fn test_truncated_completion_ignores_zero_step() {
        let (mut bars, mut stage) = setup();
        let mut animator = SwapAnimator::new(SwapCompletion::Truncated);
        animator.begin(SwapPair::new(0));

        assert!(!animator.step(0.0, &mut bars, &mut stage));
        assert!(animator.is_in_flight());
    }

    #[test]
    fn test_symmetric_completion_after_one_slot() {
        let (mut bars, mut stage) = setup();
        let mut animator = SwapAnimator::new(SwapCompletion::Symmetric);
        animator.begin(SwapPair::new(0));

        let frames = frames_until_done(&mut animator, 0.3, &mut bars, &mut stage);
        assert_eq!(frames, 4);
        assert_eq!(bars.values(), vec![10, 30, 20]);
    }

    #[test]
    fn test_overshoot_is_snapped() {
        let (mut bars, mut stage) = setup();
        let mut animator = SwapAnimator::new(SwapCompletion::Truncated);
        animator.begin(SwapPair::new(0));

        assert!(animator.step(3.5, &mut bars, &mut stage));
        assert_eq!(bars.get(0).unwrap().x, 0.0);
        assert_eq!(bars.get(1).unwrap().x, 1.0);
    }

    #[test]
    fn test_idle_step_is_noop() {
        let (mut bars, mut stage) = setup();
        let mut animator = SwapAnimator::default();
        assert!(!animator.step(1.0, &mut bars, &mut stage));
        assert!(stage.events().iter().all(|e| matches!(e, crate::event::StageEvent::Spawn { .. })));
    }
}
