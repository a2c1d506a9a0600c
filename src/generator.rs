// src/generator.rs
//
// Sample generation.
//
// Produces the array a run sorts. Values always land in
// [min_value, max_value); the distribution decides how they are
// spread across the array.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Distribution, SortConfig};

/// Random source for sample arrays.
///
/// Owned by the engine so that a seeded configuration reproduces the
/// same array on every start.
pub struct SampleGenerator {
    rng: StdRng,
}

impl SampleGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Restart the random sequence from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Generate the sample array for a run.
    pub fn generate(&mut self, config: &SortConfig) -> Vec<i32> {
        generate(
            &mut self.rng,
            config.sample_count,
            config.min_value,
            config.max_value,
            config.distribution,
        )
    }
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate `count` values in `[min, max)`.
///
/// `count == 0` yields an empty array. An empty range yields `min`
/// for every slot.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    min: i32,
    max: i32,
    distribution: Distribution,
) -> Vec<i32> {
    if count == 0 {
        return Vec::new();
    }

    if max <= min {
        return vec![min; count];
    }

    let range = max as i64 - min as i64;
    let band_width = range as f64 / count as f64;

    (0..count)
        .map(|index| match distribution {
            Distribution::Uniform => rng.gen_range(min..max),
            Distribution::Ascending => draw_from_band(rng, min, max, band_width, index),
            Distribution::Descending => {
                draw_from_band(rng, min, max, band_width, count - 1 - index)
            }
        })
        .collect()
}

/// Draw a value from the `band`-th slice of width `band_width` above `min`.
#[inline]
fn draw_from_band<R: Rng + ?Sized>(
    rng: &mut R,
    min: i32,
    max: i32,
    band_width: f64,
    band: usize,
) -> i32 {
    let low = band_width * band as f64;
    let high = band_width * (band + 1) as f64;

    let offset = if high > low {
        rng.gen_range(low..high)
    } else {
        low
    };

    // Truncation keeps neighbouring bands ordered.
    let value = min as i64 + offset as i64;
    value.clamp(min as i64, max as i64 - 1) as i32
}
