// src/config.rs
//
// Run configuration.
//
// A SortConfig is read once when a run starts. Hosts build it from
// whatever controls they expose (sliders, dropdowns, CLI flags) and
// hand it to the engine as a plain value.

/// Upper bound on the number of samples in a run.
///
/// Also bounds how many stale bars a single reset removes.
pub const MAX_SAMPLES: usize = 100;

pub const DEFAULT_SAMPLE_COUNT: usize = 20;
pub const DEFAULT_MIN_VALUE: i32 = 1;
pub const DEFAULT_MAX_VALUE: i32 = 30;

/// Seconds between two comparisons at speed 1.0.
pub const DEFAULT_STEP_DELAY: f32 = 0.1;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Bar height per unit of sample value.
pub const DEFAULT_BAR_HEIGHT_SCALE: f32 = 0.3;

// ═══════════════════════════════════════════════════════════════════
// Distribution
// ═══════════════════════════════════════════════════════════════════

/// How sample values are laid out across the array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Every value drawn independently over the whole range.
    #[default]
    Uniform,

    /// Value `i` drawn from the `i`-th equal-width band of the range.
    Ascending,

    /// Mirror of `Ascending`: value `i` drawn from band `count - 1 - i`.
    Descending,
}

impl Distribution {
    /// Map a host dropdown index to a distribution.
    ///
    /// Unknown indices fall back to `Uniform`.
    pub fn from_index(index: i32) -> Self {
        match index {
            1 => Distribution::Ascending,
            2 => Distribution::Descending,
            _ => Distribution::Uniform,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            Distribution::Uniform => 0,
            Distribution::Ascending => 1,
            Distribution::Descending => 2,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Swap completion
// ═══════════════════════════════════════════════════════════════════

/// How the swap animator decides that two bars have finished trading places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwapCompletion {
    /// Each bar's position is truncated to an integer and compared with
    /// the slot it started from. The swap is done once neither bar
    /// truncates to its own starting slot.
    ///
    /// The right-hand bar leaves its slot on the first non-zero step
    /// while the left-hand bar needs a full unit, so completion is
    /// driven by the left bar alone.
    #[default]
    Truncated,

    /// A single shared progress value; the swap is done once both bars
    /// have travelled one full slot.
    Symmetric,
}

// ═══════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════

/// Rejected run configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The value range `[min, max)` is empty but samples were requested.
    InvalidRange { min: i32, max: i32 },

    /// More samples than a run can hold.
    TooManySamples { count: usize, max: usize },

    /// Per-step delay is negative or not finite.
    InvalidDelay { delay: f32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidRange { min, max } => {
                write!(f, "Value range [{}, {}) is empty", min, max)
            }
            ConfigError::TooManySamples { count, max } => {
                write!(f, "Sample count {} exceeds the maximum of {}", count, max)
            }
            ConfigError::InvalidDelay { delay } => {
                write!(f, "Step delay {} is not a valid duration", delay)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ═══════════════════════════════════════════════════════════════════
// SortConfig
// ═══════════════════════════════════════════════════════════════════

/// Everything a run needs to know up front.
#[derive(Debug, Clone, PartialEq)]
pub struct SortConfig {
    /// Number of samples (and bars).
    pub sample_count: usize,

    /// Inclusive lower bound of sample values.
    pub min_value: i32,

    /// Exclusive upper bound of sample values.
    pub max_value: i32,

    pub distribution: Distribution,

    /// Seconds between comparisons, before speed scaling.
    pub step_delay: f32,

    /// Speed factor. Non-positive or non-finite values run at 1.0.
    pub speed: f32,

    pub completion: SwapCompletion,

    /// Bar height per unit of sample value.
    pub bar_height_scale: f32,

    /// Fixed RNG seed for reproducible samples.
    pub seed: Option<u64>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            distribution: Distribution::Uniform,
            step_delay: DEFAULT_STEP_DELAY,
            speed: DEFAULT_SPEED,
            completion: SwapCompletion::Truncated,
            bar_height_scale: DEFAULT_BAR_HEIGHT_SCALE,
            seed: None,
        }
    }
}

impl SortConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_samples(mut self, count: usize) -> Self {
        self.sample_count = count;
        self
    }

    pub fn with_range(mut self, min: i32, max: i32) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_step_delay(mut self, seconds: f32) -> Self {
        self.step_delay = seconds;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_completion(mut self, completion: SwapCompletion) -> Self {
        self.completion = completion;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Speed factor actually applied to delays and animation.
    #[inline]
    pub fn effective_speed(&self) -> f32 {
        effective_speed(self.speed)
    }

    /// Wait between two comparisons, in seconds.
    #[inline]
    pub fn scaled_step_delay(&self) -> f32 {
        self.step_delay / self.effective_speed()
    }

    /// Check that a run can be built from this configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.sample_count > MAX_SAMPLES {
            return Err(ConfigError::TooManySamples {
                count: self.sample_count,
                max: MAX_SAMPLES,
            });
        }

        if self.sample_count > 0 && self.max_value <= self.min_value {
            return Err(ConfigError::InvalidRange {
                min: self.min_value,
                max: self.max_value,
            });
        }

        if !self.step_delay.is_finite() || self.step_delay < 0.0 {
            return Err(ConfigError::InvalidDelay {
                delay: self.step_delay,
            });
        }

        Ok(())
    }
}

/// Floor-clamp a speed factor: anything not finite and strictly positive
/// runs at 1.0.
#[inline]
pub fn effective_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed > 0.0 { speed } else { 1.0 }
}
