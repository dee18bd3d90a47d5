//! Atomic Layer: release velocity from pointer move deltas
//!
//! Velocity is kept in pixels per frame-equivalent so it feeds the
//! per-frame friction model directly.

/// Duration of one frame-equivalent (60 Hz) in milliseconds
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// Shortest interval a sample is normalized over. Terminal and OS event
/// queues deliver buffered moves microseconds apart.
pub const MIN_SAMPLE_MS: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct VelocityTracker {
    velocity: f64,
    /// Weight of the newest sample; 1.0 keeps only the last sample
    smoothing: f64,
    /// Magnitude cap for a single sample, pixels per frame
    max_velocity: f64,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(1.0, f64::INFINITY)
    }
}

impl VelocityTracker {
    pub fn new(smoothing: f64, max_velocity: f64) -> Self {
        let max_velocity = if max_velocity > 0.0 {
            max_velocity
        } else {
            f64::INFINITY
        };
        Self {
            velocity: 0.0,
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
            max_velocity,
        }
    }

    /// Record a move of `delta` pixels that took `dt_ms`.
    ///
    /// A sample without a usable duration counts as one frame; shorter
    /// intervals than `MIN_SAMPLE_MS` count as `MIN_SAMPLE_MS`.
    pub fn update(&mut self, delta: f64, dt_ms: f64) -> f64 {
        let sample = if dt_ms > 0.0 && dt_ms.is_finite() {
            delta * FRAME_MS / dt_ms.max(MIN_SAMPLE_MS)
        } else {
            delta
        };
        let sample = sample.clamp(-self.max_velocity, self.max_velocity);
        self.velocity = self.smoothing * sample + (1.0 - self.smoothing) * self.velocity;
        self.velocity
    }

    #[inline]
    pub fn dampen(&mut self, factor: f64) {
        self.velocity *= factor;
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.velocity
    }

    pub fn reset(&mut self) {
        self.velocity = 0.0;
    }
}
