//! Atomic Layer: autoplay suppression
//!
//! Two kinds of pause: level-triggered flags (hover, external) that hold
//! until cleared, and one timed deadline that is replaced on every re-arm.
//! A live timed pause outranks the flags.

use super::state::PauseReason;

#[derive(Debug, Clone, Copy, PartialEq)]
struct TimedPause {
    reason: PauseReason,
    until_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PauseController {
    hover: bool,
    external: bool,
    timed: Option<TimedPause>,
}

impl PauseController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) the timed pause. Returns the new deadline.
    pub fn pause_for(&mut self, duration_ms: f64, reason: PauseReason, now_ms: f64) -> f64 {
        let until_ms = now_ms + duration_ms.max(0.0);
        self.timed = Some(TimedPause { reason, until_ms });
        until_ms
    }

    pub fn set_hover(&mut self, hover: bool) {
        self.hover = hover;
    }

    pub fn set_external(&mut self, paused: bool) {
        self.external = paused;
    }

    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.external
    }

    /// Drop an expired timed pause. Returns true when one just expired.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.timed {
            Some(timed) if timed.until_ms <= now_ms => {
                self.timed = None;
                true
            }
            _ => false,
        }
    }

    /// The pause in force at `now_ms`, with its deadline when timed
    pub fn active(&self, now_ms: f64) -> Option<(PauseReason, Option<f64>)> {
        if let Some(timed) = self.timed.filter(|t| t.until_ms > now_ms) {
            return Some((timed.reason, Some(timed.until_ms)));
        }
        if self.external {
            return Some((PauseReason::External, None));
        }
        if self.hover {
            return Some((PauseReason::Hover, None));
        }
        None
    }

    #[inline]
    pub fn is_suppressing(&self, now_ms: f64) -> bool {
        self.active(now_ms).is_some()
    }

    pub fn clear(&mut self) {
        self.hover = false;
        self.external = false;
        self.timed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_pause_expires() {
        let mut pause = PauseController::new();
        pause.pause_for(1_000.0, PauseReason::Interaction, 0.0);
        assert!(pause.is_suppressing(999.0));
        assert!(!pause.poll(999.0));
        assert!(!pause.is_suppressing(1_000.0));
        assert!(pause.poll(1_000.0));
        assert!(!pause.poll(1_001.0));
    }

    #[test]
    fn test_rearm_resets_instead_of_stacking() {
        let mut pause = PauseController::new();
        pause.pause_for(1_000.0, PauseReason::Interaction, 0.0);
        let until = pause.pause_for(1_000.0, PauseReason::Wheel, 500.0);
        assert_eq!(until, 1_500.0);
        assert_eq!(
            pause.active(1_200.0),
            Some((PauseReason::Wheel, Some(1_500.0)))
        );
        assert!(!pause.is_suppressing(1_500.0));
    }

    #[test]
    fn test_hover_is_level_triggered() {
        let mut pause = PauseController::new();
        pause.set_hover(true);
        assert_eq!(pause.active(1e9), Some((PauseReason::Hover, None)));
        pause.set_hover(false);
        assert!(!pause.is_suppressing(0.0));
    }

    #[test]
    fn test_timed_outranks_hover() {
        let mut pause = PauseController::new();
        pause.set_hover(true);
        pause.pause_for(2_000.0, PauseReason::Interaction, 0.0);
        pause.set_hover(false);
        assert_eq!(
            pause.active(10.0),
            Some((PauseReason::Interaction, Some(2_000.0)))
        );
    }

    #[test]
    fn test_external_outranks_hover() {
        let mut pause = PauseController::new();
        pause.set_hover(true);
        pause.set_external(true);
        assert_eq!(pause.active(0.0), Some((PauseReason::External, None)));
        pause.clear();
        assert!(!pause.is_suppressing(0.0));
    }
}
