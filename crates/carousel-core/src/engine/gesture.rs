//! Atomic Layer: unified pointer gestures
//!
//! Mouse and touch handlers both feed `pointer_down` / `pointer_move` /
//! `pointer_up`. The unifier tracks one gesture at a time, turns moves into
//! scroll deltas, measures the release velocity and decides whether the
//! gesture was a drag (which suppresses the click that follows it).

use super::state::PointerKind;
use super::velocity::VelocityTracker;
use crate::config::CarouselConfig;

/// One normalized pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub x: f64,
    pub timestamp_ms: f64,
}

impl GestureSample {
    pub fn new(x: f64, timestamp_ms: f64) -> Self {
        Self { x, timestamp_ms }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveGesture {
    kind: PointerKind,
    start_x: f64,
    last: GestureSample,
    dragged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Active {
        kind: PointerKind,
    },
}

/// What a pointer move means for the scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureMove {
    /// Add to the scroll offset (opposite of the pointer travel)
    pub scroll_delta: f64,
    /// Touch hosts should `preventDefault` the native move event
    pub prevent_default: bool,
}

/// Summary of a finished gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureRelease {
    pub kind: PointerKind,
    /// Pixels per frame-equivalent, in pointer space
    pub velocity: f64,
    /// Net pointer travel since pointer-down
    pub displacement: f64,
    pub was_drag: bool,
}

#[derive(Debug, Clone)]
pub struct GestureUnifier {
    active: Option<ActiveGesture>,
    velocity: VelocityTracker,
    suppress_until_ms: Option<f64>,
    drag_threshold_px: f64,
    click_suppress_ms: f64,
    touch_velocity_damping: f64,
    velocity_stale_ms: f64,
}

impl GestureUnifier {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            active: None,
            velocity: VelocityTracker::new(config.velocity_smoothing, config.max_velocity),
            suppress_until_ms: None,
            drag_threshold_px: config.drag_threshold_px,
            click_suppress_ms: config.click_suppress_ms,
            touch_velocity_damping: config.touch_velocity_damping,
            velocity_stale_ms: config.velocity_stale_ms,
        }
    }

    pub fn state(&self) -> GestureState {
        match self.active {
            Some(gesture) => GestureState::Active { kind: gesture.kind },
            None => GestureState::Idle,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Begin a gesture. Returns false if one is already active.
    pub fn pointer_down(&mut self, kind: PointerKind, sample: GestureSample) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.velocity.reset();
        self.suppress_until_ms = None;
        self.active = Some(ActiveGesture {
            kind,
            start_x: sample.x,
            last: sample,
            dragged: false,
        });
        true
    }

    /// Track a move. `None` when no gesture is active.
    pub fn pointer_move(&mut self, sample: GestureSample) -> Option<GestureMove> {
        let gesture = self.active.as_mut()?;

        let delta = sample.x - gesture.last.x;
        let dt = sample.timestamp_ms - gesture.last.timestamp_ms;
        self.velocity.update(delta, dt);
        gesture.last = sample;

        if (sample.x - gesture.start_x).abs() >= self.drag_threshold_px {
            gesture.dragged = true;
        }

        Some(GestureMove {
            scroll_delta: -delta,
            prevent_default: gesture.kind == PointerKind::Touch && gesture.dragged,
        })
    }

    /// Finish the gesture at `now_ms`. `None` when no gesture is active.
    pub fn pointer_up(&mut self, now_ms: f64) -> Option<GestureRelease> {
        let gesture = self.active.take()?;

        // The pointer rested before lifting: nothing to fling
        if now_ms - gesture.last.timestamp_ms > self.velocity_stale_ms {
            self.velocity.reset();
        }
        if gesture.kind == PointerKind::Touch {
            self.velocity.dampen(self.touch_velocity_damping);
        }
        if gesture.dragged {
            self.suppress_until_ms = Some(now_ms + self.click_suppress_ms);
        }

        Some(GestureRelease {
            kind: gesture.kind,
            velocity: self.velocity.get(),
            displacement: gesture.last.x - gesture.start_x,
            was_drag: gesture.dragged,
        })
    }

    /// Cancelled gestures end like releases; hosts get the same cleanup.
    pub fn pointer_cancel(&mut self, now_ms: f64) -> Option<GestureRelease> {
        self.pointer_up(now_ms)
    }

    /// Whether a click landing now belongs to a drag
    pub fn is_click_suppressed(&self, now_ms: f64) -> bool {
        if self.active.is_some_and(|g| g.dragged) {
            return true;
        }
        self.suppress_until_ms.is_some_and(|until| now_ms < until)
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.velocity.get()
    }

    pub fn reset(&mut self) {
        self.active = None;
        self.velocity.reset();
        self.suppress_until_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::velocity::FRAME_MS;

    fn unifier() -> GestureUnifier {
        GestureUnifier::new(&CarouselConfig::default())
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut gestures = unifier();
        assert!(gestures.pointer_down(PointerKind::Mouse, GestureSample::new(10.0, 0.0)));
        assert!(!gestures.pointer_down(PointerKind::Touch, GestureSample::new(90.0, 1.0)));
        assert_eq!(
            gestures.state(),
            GestureState::Active {
                kind: PointerKind::Mouse
            }
        );
    }

    #[test]
    fn test_move_scrolls_opposite_to_pointer() {
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Mouse, GestureSample::new(100.0, 0.0));
        let step = gestures
            .pointer_move(GestureSample::new(70.0, FRAME_MS))
            .unwrap();
        assert_eq!(step.scroll_delta, 30.0);
        assert!(!step.prevent_default);
        assert!((gestures.velocity() + 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_move_without_gesture() {
        let mut gestures = unifier();
        assert!(gestures.pointer_move(GestureSample::new(5.0, 0.0)).is_none());
        assert!(gestures.pointer_up(0.0).is_none());
    }

    #[test]
    fn test_drag_threshold() {
        // 4 px of travel stays a tap
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Mouse, GestureSample::new(100.0, 0.0));
        gestures.pointer_move(GestureSample::new(104.0, 10.0));
        let release = gestures.pointer_up(20.0).unwrap();
        assert!(!release.was_drag);
        assert!(!gestures.is_click_suppressed(20.0));

        // 5 px makes it a drag
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Mouse, GestureSample::new(100.0, 0.0));
        gestures.pointer_move(GestureSample::new(95.0, 10.0));
        assert!(gestures.is_click_suppressed(10.0));
        let release = gestures.pointer_up(20.0).unwrap();
        assert!(release.was_drag);
        assert_eq!(release.displacement, -5.0);
        assert!(gestures.is_click_suppressed(20.0));
    }

    #[test]
    fn test_suppression_window_expires() {
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Mouse, GestureSample::new(0.0, 0.0));
        gestures.pointer_move(GestureSample::new(50.0, 10.0));
        gestures.pointer_up(20.0);
        assert!(gestures.is_click_suppressed(119.0));
        assert!(!gestures.is_click_suppressed(120.0));
    }

    #[test]
    fn test_touch_prevents_default_only_after_threshold() {
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Touch, GestureSample::new(100.0, 0.0));
        let step = gestures.pointer_move(GestureSample::new(102.0, 10.0)).unwrap();
        assert!(!step.prevent_default);
        let step = gestures.pointer_move(GestureSample::new(110.0, 20.0)).unwrap();
        assert!(step.prevent_default);
    }

    #[test]
    fn test_touch_release_is_damped() {
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Touch, GestureSample::new(100.0, 0.0));
        gestures.pointer_move(GestureSample::new(80.0, FRAME_MS));
        let release = gestures.pointer_up(FRAME_MS).unwrap();
        assert!((release.velocity + 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_stale_release_has_no_velocity() {
        let mut gestures = unifier();
        gestures.pointer_down(PointerKind::Mouse, GestureSample::new(100.0, 0.0));
        gestures.pointer_move(GestureSample::new(40.0, 50.0));
        let release = gestures.pointer_up(400.0).unwrap();
        assert_eq!(release.velocity, 0.0);
        assert!(release.was_drag);
    }
}
