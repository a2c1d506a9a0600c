// src/sort.rs
//
// Shaker sort as a resumable task.
//
// The sort never waits on its own. Each call to `resume` runs until the
// next suspension point and reports what it is waiting for: a step
// delay, a swap animation, or nothing (done). The engine owns the
// timing and calls `resume` again once the wait is over.

use log::trace;

use crate::event::Cue;

/// Observable state of a sort task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortPhase {
    /// Created but not resumed yet.
    #[default]
    Idle,

    /// Scanning left to right.
    ComparingForward,

    /// An inversion was found; waiting for the bars to trade places.
    AwaitingSwapAnimation,

    /// Scanning right to left.
    ComparingBackward,

    /// Array is sorted.
    Done,
}

impl SortPhase {
    /// Compact encoding for atomics and C/wasm hosts.
    pub fn as_u8(self) -> u8 {
        match self {
            SortPhase::Idle => 0,
            SortPhase::ComparingForward => 1,
            SortPhase::AwaitingSwapAnimation => 2,
            SortPhase::ComparingBackward => 3,
            SortPhase::Done => 4,
        }
    }

    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => SortPhase::ComparingForward,
            2 => SortPhase::AwaitingSwapAnimation,
            3 => SortPhase::ComparingBackward,
            4 => SortPhase::Done,
            _ => SortPhase::Idle,
        }
    }
}

/// Two adjacent slots that must trade places.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPair {
    pub left: usize,
    pub right: usize,
}

impl SwapPair {
    #[inline]
    pub fn new(left: usize) -> Self {
        Self {
            left,
            right: left + 1,
        }
    }
}

/// What the task is waiting on after a `resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suspend {
    /// Wait one step delay, then resume.
    Delay,

    /// Animate the pair, then resume once the animation is over.
    Swap(SwapPair),

    /// Finished; further resumes are no-ops.
    Done,
}

/// Counters collected while sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    pub comparisons: u64,
    pub swaps: u64,
    pub forward_passes: u32,
    pub backward_passes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn phase(self) -> SortPhase {
        match self {
            Direction::Forward => SortPhase::ComparingForward,
            Direction::Backward => SortPhase::ComparingBackward,
        }
    }
}

/// Where the task picks up on the next `resume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Begin,
    Compare,
    Swapped,
    Advance,
    Finished,
}

/// Shaker (cocktail) sort over an owned array.
///
/// Passes alternate direction over a shrinking window
/// `[left_bound, right_bound]`. A pass without swaps ends the sort.
#[derive(Debug, Clone)]
pub struct ShakerSort {
    data: Vec<i32>,
    left_bound: usize,
    right_bound: usize,
    direction: Direction,
    /// Forward: left slot of the compared pair. Backward: right slot.
    cursor: usize,
    swapped: bool,
    step: Step,
    phase: SortPhase,
    stats: SortStats,
}

impl ShakerSort {
    pub fn new(data: Vec<i32>) -> Self {
        let right_bound = data.len().saturating_sub(1);
        Self {
            data,
            left_bound: 0,
            right_bound,
            direction: Direction::Forward,
            cursor: 0,
            swapped: false,
            step: Step::Begin,
            phase: SortPhase::Idle,
            stats: SortStats::default(),
        }
    }

    /// Run until the next suspension point.
    ///
    /// Highlight/unhighlight requests raised on the way are appended to
    /// `cues`.
    pub fn resume(&mut self, cues: &mut Vec<Cue>) -> Suspend {
        loop {
            match self.step {
                Step::Begin => {
                    if self.data.len() < 2 {
                        return self.finish();
                    }
                    self.left_bound = 0;
                    self.right_bound = self.data.len() - 1;
                    self.begin_pass(Direction::Forward);
                }

                Step::Compare => {
                    let pair = self.pair();
                    cues.push(Cue::Highlight { slot: pair.left });
                    cues.push(Cue::Highlight { slot: pair.right });
                    self.stats.comparisons += 1;

                    trace!(
                        "compare [{}]={} [{}]={}",
                        pair.left,
                        self.data[pair.left],
                        pair.right,
                        self.data[pair.right]
                    );

                    if self.data[pair.left] > self.data[pair.right] {
                        self.phase = SortPhase::AwaitingSwapAnimation;
                        self.step = Step::Swapped;
                        return Suspend::Swap(pair);
                    }

                    self.step = Step::Advance;
                    return Suspend::Delay;
                }

                Step::Swapped => {
                    let pair = self.pair();
                    self.data.swap(pair.left, pair.right);
                    self.stats.swaps += 1;
                    self.swapped = true;
                    self.phase = self.direction.phase();
                    self.step = Step::Advance;
                    return Suspend::Delay;
                }

                Step::Advance => {
                    let pair = self.pair();
                    cues.push(Cue::Unhighlight { slot: pair.left });
                    cues.push(Cue::Unhighlight { slot: pair.right });
                    self.advance();
                }

                Step::Finished => return Suspend::Done,
            }
        }
    }

    fn begin_pass(&mut self, direction: Direction) {
        self.direction = direction;
        self.swapped = false;
        self.phase = direction.phase();
        self.step = Step::Compare;

        match direction {
            Direction::Forward => {
                self.cursor = self.left_bound;
                self.stats.forward_passes += 1;
            }
            Direction::Backward => {
                self.cursor = self.right_bound;
                self.stats.backward_passes += 1;
            }
        }
    }

    /// Move to the next comparison, closing the pass at its end.
    fn advance(&mut self) {
        match self.direction {
            Direction::Forward => {
                self.cursor += 1;
                if self.cursor < self.right_bound {
                    self.step = Step::Compare;
                    return;
                }

                // Largest remaining value is now at right_bound.
                self.right_bound -= 1;
                if !self.swapped || self.left_bound >= self.right_bound {
                    self.finish();
                    return;
                }
                self.begin_pass(Direction::Backward);
            }

            Direction::Backward => {
                self.cursor -= 1;
                if self.cursor > self.left_bound {
                    self.step = Step::Compare;
                    return;
                }

                // Smallest remaining value is now at left_bound.
                self.left_bound += 1;
                if !self.swapped || self.left_bound >= self.right_bound {
                    self.finish();
                    return;
                }
                self.begin_pass(Direction::Forward);
            }
        }
    }

    fn finish(&mut self) -> Suspend {
        self.step = Step::Finished;
        self.phase = SortPhase::Done;
        Suspend::Done
    }

    #[inline]
    fn pair(&self) -> SwapPair {
        match self.direction {
            Direction::Forward => SwapPair::new(self.cursor),
            Direction::Backward => SwapPair::new(self.cursor - 1),
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    #[inline]
    pub fn phase(&self) -> SortPhase {
        self.phase
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.phase == SortPhase::Done
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    #[inline]
    pub fn left_bound(&self) -> usize {
        self.left_bound
    }

    #[inline]
    pub fn right_bound(&self) -> usize {
        self.right_bound
    }

    /// Pair waiting on its swap animation, if any.
    pub fn pending_swap(&self) -> Option<SwapPair> {
        (self.step == Step::Swapped).then(|| self.pair())
    }

    pub fn stats(&self) -> SortStats {
        self.stats
    }
}
