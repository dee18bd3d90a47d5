//! Atomic Layer: constant-speed autoplay advance
//!
//! A resumable frame scheduler: the host calls `on_frame` once per display
//! frame and gets back how far the offset should move. Distance is speed
//! times elapsed time, never a fixed per-frame step.

use crate::config::Direction;

#[derive(Debug, Clone)]
pub struct AutoplayScheduler {
    speed_px_per_ms: f64,
    direction: Direction,
    last_frame_ms: Option<f64>,
    running: bool,
}

impl Default for AutoplayScheduler {
    fn default() -> Self {
        Self {
            speed_px_per_ms: 0.0,
            direction: Direction::Forward,
            last_frame_ms: None,
            running: false,
        }
    }
}

impl AutoplayScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start advancing. Calling again while running only updates the
    /// parameters; the frame clock keeps its seed.
    pub fn start(&mut self, speed_px_per_ms: f64, direction: Direction) {
        self.speed_px_per_ms = speed_px_per_ms;
        self.direction = direction;
        if !self.running {
            self.running = true;
            self.last_frame_ms = None;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.last_frame_ms = None;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Signed offset advance for the frame at `now_ms`.
    ///
    /// The first frame after `start` only seeds the clock and yields 0.
    pub fn on_frame(&mut self, now_ms: f64) -> Option<f64> {
        if !self.running {
            return None;
        }
        let Some(last) = self.last_frame_ms.replace(now_ms) else {
            return Some(0.0);
        };
        let dt = (now_ms - last).max(0.0);
        Some(self.direction.sign() * self.speed_px_per_ms * dt)
    }

    /// Re-seed the clock without advancing.
    pub fn hold(&mut self, now_ms: f64) {
        if self.running {
            self.last_frame_ms = Some(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance(step_ms: f64, steps: usize) -> f64 {
        let mut scheduler = AutoplayScheduler::new();
        scheduler.start(0.072, Direction::Forward);
        let mut total = scheduler.on_frame(0.0).unwrap();
        for i in 1..=steps {
            total += scheduler.on_frame(i as f64 * step_ms).unwrap();
        }
        total
    }

    #[test]
    fn test_frame_rate_independent() {
        let at_30 = advance(1000.0 / 30.0, 30);
        let at_60 = advance(1000.0 / 60.0, 60);
        let at_144 = advance(1000.0 / 144.0, 144);
        let single = advance(1000.0, 1);
        for total in [at_60, at_144, single] {
            assert!((total - at_30).abs() < 1e-9, "{total} vs {at_30}");
        }
        assert!((at_30 - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_frame_is_seed() {
        let mut scheduler = AutoplayScheduler::new();
        scheduler.start(1.0, Direction::Forward);
        assert_eq!(scheduler.on_frame(5_000.0), Some(0.0));
        assert_eq!(scheduler.on_frame(5_010.0), Some(10.0));
    }

    #[test]
    fn test_stop_forgets_stale_clock() {
        let mut scheduler = AutoplayScheduler::new();
        scheduler.start(1.0, Direction::Forward);
        scheduler.on_frame(0.0);
        scheduler.stop();
        scheduler.stop();
        assert_eq!(scheduler.on_frame(100.0), None);

        scheduler.start(1.0, Direction::Forward);
        assert_eq!(scheduler.on_frame(10_000.0), Some(0.0));
    }

    #[test]
    fn test_restart_while_running_keeps_seed() {
        let mut scheduler = AutoplayScheduler::new();
        scheduler.start(1.0, Direction::Forward);
        scheduler.on_frame(0.0);
        scheduler.start(2.0, Direction::Reverse);
        assert_eq!(scheduler.on_frame(10.0), Some(-20.0));
    }

    #[test]
    fn test_hold_and_backwards_clock() {
        let mut scheduler = AutoplayScheduler::new();
        scheduler.start(1.0, Direction::Forward);
        scheduler.on_frame(0.0);
        scheduler.hold(1_000.0);
        assert_eq!(scheduler.on_frame(1_010.0), Some(10.0));
        assert_eq!(scheduler.on_frame(1_000.0), Some(0.0));
    }
}
