//! Atomic Layer: friction decay after a flick
//!
//! Per frame-equivalent the offset moves by the velocity and the velocity
//! is multiplied by the friction. A frame that spans `n` frame-equivalents
//! applies the closed form of `n` such steps, so the result does not depend
//! on the display refresh rate.

use super::velocity::FRAME_MS;

/// Result of one momentum frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MomentumFrame {
    /// Distance travelled this frame, in pointer space (subtract from offset)
    pub displacement: f64,
    /// Velocity dropped below the stop threshold; the run is over
    pub settled: bool,
}

#[derive(Debug, Clone)]
pub struct MomentumSimulator {
    friction: f64,
    stop_threshold: f64,
    velocity: f64,
    last_frame_ms: Option<f64>,
    running: bool,
}

impl MomentumSimulator {
    pub fn new(friction: f64, stop_threshold: f64) -> Self {
        Self {
            friction,
            stop_threshold,
            velocity: 0.0,
            last_frame_ms: None,
            running: false,
        }
    }

    /// Begin decaying from `velocity`. Returns false (and stays stopped)
    /// when the velocity is already below the stop threshold.
    pub fn start(&mut self, velocity: f64, now_ms: f64) -> bool {
        if !velocity.is_finite() || velocity.abs() < self.stop_threshold {
            self.cancel();
            return false;
        }
        self.velocity = velocity;
        self.last_frame_ms = Some(now_ms);
        self.running = true;
        true
    }

    /// Advance to `now_ms`. `None` when not running.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<MomentumFrame> {
        if !self.running {
            return None;
        }
        let last = self.last_frame_ms.replace(now_ms).unwrap_or(now_ms);
        let dt = now_ms - last;
        if dt <= 0.0 {
            return Some(MomentumFrame {
                displacement: 0.0,
                settled: false,
            });
        }

        let frames = dt / FRAME_MS;
        let decay = self.friction.powf(frames);
        let displacement = self.velocity * (1.0 - decay) / (1.0 - self.friction);
        self.velocity *= decay;

        let settled = self.velocity.abs() < self.stop_threshold;
        if settled {
            self.cancel();
        }
        Some(MomentumFrame {
            displacement,
            settled,
        })
    }

    /// Skip a frame without moving (nothing measured to move against).
    pub fn hold(&mut self, now_ms: f64) {
        if self.running {
            self.last_frame_ms = Some(now_ms);
        }
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.velocity = 0.0;
        self.last_frame_ms = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}
