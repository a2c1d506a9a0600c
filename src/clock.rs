// src/clock.rs

//
// ===============================
// MARK: Frame clock
// ===============================
//

/// Frame time as seen by a run.
///
/// This struct:
/// - is advanced once per host frame
/// - is reset when a run starts
/// - never goes backwards (negative or non-finite deltas count as zero)
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct FrameClock {
    /// Frames ticked since the run started
    frame: u64,

    /// Seconds elapsed since the run started
    elapsed: f64,

    /// Delta of the most recent frame
    last_delta: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------
    // MARK: Time advancement
    // -------------------------------

    /// Advance by one frame of `delta` seconds.
    ///
    /// Returns the sanitised delta actually applied.
    pub fn advance(&mut self, delta: f32) -> f32 {
        let delta = sanitize_delta(delta);
        self.frame += 1;
        self.elapsed += delta as f64;
        self.last_delta = delta;
        delta
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // -------------------------------
    // MARK: Accessors
    // -------------------------------

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    #[inline]
    pub fn last_delta(&self) -> f32 {
        self.last_delta
    }
}

/// Clamp a host-supplied frame delta to a usable value.
#[inline]
pub fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() && delta > 0.0 { delta } else { 0.0 }
}
