//! Molecular Layer: the carousel state machine
//!
//! Owns the scroll offset and decides, per state, which actor may write it:
//! autoplay while `Autoplaying`, the pointer while `Dragging`, momentum while
//! `Decelerating`, a wheel nudge on entry to `Paused`. Every transition away
//! from a state stops that state's loop before anything else runs.

use std::fmt;

use tracing::{debug, trace, warn};

use super::autoplay::AutoplayScheduler;
use super::gesture::{GestureMove, GestureSample, GestureUnifier};
use super::momentum::MomentumSimulator;
use super::pause::PauseController;
use super::state::{EngineState, OffsetChange, OffsetSource, PauseReason, PointerKind};
use super::wrap::{Layout, LoopWrapper, WrapBounds};
use crate::config::{CarouselConfig, Direction};
use crate::error::Error;

/// Receives every accepted offset write
pub type OffsetListener = Box<dyn FnMut(OffsetChange)>;

/// Auto-scrolling, user-interruptible carousel over items of type `T`.
///
/// The engine never reads a clock: every entry point takes the host's
/// current time in milliseconds, and `frame` is called once per display
/// frame while `needs_frame` is true.
pub struct CarouselEngine<T> {
    config: CarouselConfig,
    items: Vec<T>,
    state: EngineState,
    offset: f64,
    layout: Option<Layout>,
    /// Initial offset for the direction has been applied
    positioned: bool,
    wrapper: LoopWrapper,
    gesture: GestureUnifier,
    momentum: MomentumSimulator,
    autoplay: AutoplayScheduler,
    pause: PauseController,
    listener: Option<OffsetListener>,
    mounted: bool,
}

impl<T> fmt::Debug for CarouselEngine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselEngine")
            .field("state", &self.state)
            .field("offset", &self.offset)
            .field("items", &self.items.len())
            .field("bounds", &self.wrapper.bounds())
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<T> CarouselEngine<T> {
    pub fn new(config: CarouselConfig, items: Vec<T>) -> crate::Result<Self> {
        config.validate()?;
        let mut engine = Self {
            wrapper: LoopWrapper::new(config.min_copies),
            gesture: GestureUnifier::new(&config),
            momentum: MomentumSimulator::new(config.friction, config.stop_threshold),
            autoplay: AutoplayScheduler::new(),
            pause: PauseController::new(),
            config,
            items,
            state: EngineState::Idle,
            offset: 0.0,
            layout: None,
            positioned: false,
            listener: None,
            mounted: true,
        };
        if engine.items.len() > 1 {
            engine.transition(EngineState::Autoplaying);
        }
        Ok(engine)
    }

    /// Register the offset listener, replacing any previous one.
    pub fn on_offset_change<F>(&mut self, listener: F)
    where
        F: FnMut(OffsetChange) + 'static,
    {
        if self.mounted {
            self.listener = Some(Box::new(listener));
        }
    }

    // ---- accessors ----

    #[inline]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    #[inline]
    pub fn bounds(&self) -> WrapBounds {
        self.wrapper.bounds()
    }

    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    #[inline]
    pub fn layout(&self) -> Option<Layout> {
        self.layout
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of times the host should render the item list back to back
    pub fn copies(&self) -> usize {
        if self.items.len() > 1 {
            self.wrapper.copies()
        } else {
            1
        }
    }

    /// The item list repeated `copies()` times, in render order
    pub fn rendered_items(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().cycle().take(self.items.len() * self.copies())
    }

    /// Current velocity in pixels per frame-equivalent (pointer space)
    pub fn velocity(&self) -> f64 {
        match self.state {
            EngineState::Decelerating => self.momentum.velocity(),
            _ => self.gesture.velocity(),
        }
    }

    /// Whether the host must keep calling `frame`
    pub fn needs_frame(&self) -> bool {
        self.mounted
            && matches!(
                self.state,
                EngineState::Autoplaying
                    | EngineState::Decelerating
                    | EngineState::Paused {
                        until_ms: Some(_),
                        ..
                    }
            )
    }

    /// The rendering layer checks this before firing an item's click.
    pub fn is_click_suppressed(&self, now_ms: f64) -> bool {
        self.mounted && self.gesture.is_click_suppressed(now_ms)
    }

    /// Index into `items()` of the item under viewport position `viewport_x`
    pub fn item_at(&self, viewport_x: f64) -> Option<usize> {
        let layout = self.layout?;
        if self.items.is_empty() || layout.item_extent <= 0.0 {
            return None;
        }
        let x = self.offset + viewport_x;
        if !x.is_finite() {
            return None;
        }
        let slot = (x / layout.item_extent).floor() as i64;
        Some(slot.rem_euclid(self.items.len() as i64) as usize)
    }

    // ---- content and layout ----

    pub fn set_items(&mut self, items: Vec<T>, now_ms: f64) {
        if !self.mounted {
            return;
        }
        debug!(from = self.items.len(), to = items.len(), "carousel items replaced");
        self.items = items;

        if self.items.len() <= 1 {
            self.gesture.reset();
            self.transition(EngineState::Idle);
            self.remeasure();
            if self.offset != 0.0 {
                self.write(0.0, OffsetSource::Layout);
            }
            return;
        }

        self.remeasure();
        if self.state == EngineState::Idle {
            self.settle(now_ms);
        }
    }

    /// Report the item and viewport widths; recomputes wrap bounds on change.
    pub fn set_layout(&mut self, layout: Layout) {
        if !self.mounted || self.layout == Some(layout) {
            return;
        }
        self.layout = Some(layout);
        self.remeasure();
    }

    /// Override the wrap bounds with ones the host measured itself.
    pub fn set_bounds(&mut self, bounds: WrapBounds) {
        if !self.mounted {
            return;
        }
        if !bounds.is_valid() {
            warn!(min = bounds.min, max = bounds.max, "invalid wrap bounds, clamping offset");
        }
        self.wrapper.set_bounds(bounds);
        self.reposition();
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.config.direction = direction;
        if self.autoplay.is_running() {
            self.autoplay
                .start(self.config.speed_px_per_ms, self.config.direction);
        }
    }

    pub fn set_speed(&mut self, speed_px_per_ms: f64) -> crate::Result<()> {
        if !speed_px_per_ms.is_finite() || speed_px_per_ms < 0.0 {
            return Err(Error::invalid(
                "speed_px_per_ms",
                format!("must be finite and >= 0, got {speed_px_per_ms}"),
            ));
        }
        self.config.speed_px_per_ms = speed_px_per_ms;
        if self.autoplay.is_running() {
            self.autoplay
                .start(self.config.speed_px_per_ms, self.config.direction);
        }
        Ok(())
    }

    // ---- pointer input ----

    /// Start a drag. Returns false when the press is ignored (idle engine
    /// or a gesture already in progress).
    pub fn on_pointer_down(&mut self, kind: PointerKind, x: f64, now_ms: f64) -> bool {
        if !self.mounted || self.state == EngineState::Idle {
            trace!("pointer down ignored: engine idle");
            return false;
        }
        if !self.gesture.pointer_down(kind, GestureSample::new(x, now_ms)) {
            trace!("pointer down ignored: gesture already active");
            return false;
        }
        // Competing writers stop before the first drag write
        self.momentum.cancel();
        self.autoplay.stop();
        self.transition(EngineState::Dragging);
        true
    }

    pub fn on_pointer_move(&mut self, x: f64, now_ms: f64) -> Option<GestureMove> {
        if !self.mounted || self.state != EngineState::Dragging {
            return None;
        }
        let step = self.gesture.pointer_move(GestureSample::new(x, now_ms))?;
        if step.scroll_delta != 0.0 {
            let next = self.wrapper.wrap(self.offset + step.scroll_delta);
            self.write(next, OffsetSource::Drag);
        }
        Some(step)
    }

    pub fn on_pointer_up(&mut self, now_ms: f64) {
        self.finish_gesture(now_ms, false);
    }

    pub fn on_pointer_cancel(&mut self, now_ms: f64) {
        self.finish_gesture(now_ms, true);
    }

    fn finish_gesture(&mut self, now_ms: f64, cancelled: bool) {
        if !self.mounted {
            return;
        }
        let release = if cancelled {
            self.gesture.pointer_cancel(now_ms)
        } else {
            self.gesture.pointer_up(now_ms)
        };
        let Some(release) = release else {
            return;
        };

        let pause_ms = match release.kind {
            PointerKind::Mouse => self.config.drag_pause_ms,
            PointerKind::Touch => self.config.touch_drag_pause_ms,
        };
        self.pause
            .pause_for(pause_ms, PauseReason::Interaction, now_ms);
        debug!(
            velocity = release.velocity,
            displacement = release.displacement,
            was_drag = release.was_drag,
            cancelled,
            "gesture released"
        );

        if self.items.len() > 1 && self.momentum.start(release.velocity, now_ms) {
            self.transition(EngineState::Decelerating);
        } else {
            self.settle(now_ms);
        }
    }

    /// One-shot nudge from a wheel or trackpad, followed by a timed pause.
    pub fn on_wheel(&mut self, delta: f64, now_ms: f64) {
        if !self.mounted || matches!(self.state, EngineState::Idle | EngineState::Dragging) {
            return;
        }
        let until_ms = self
            .pause
            .pause_for(self.config.wheel_pause_ms, PauseReason::Wheel, now_ms);
        self.transition(EngineState::Paused {
            reason: PauseReason::Wheel,
            until_ms: Some(until_ms),
        });
        let next = self.wrapper.wrap(self.offset + delta);
        self.write(next, OffsetSource::Wheel);
    }

    // ---- pauses ----

    pub fn set_hover(&mut self, hover: bool, now_ms: f64) {
        if !self.mounted || self.pause.is_hovered() == hover {
            return;
        }
        self.pause.set_hover(hover);
        if self.is_resting() {
            self.settle(now_ms);
        }
    }

    /// Host-requested pause; holds until `resume`.
    pub fn pause(&mut self, now_ms: f64) {
        if !self.mounted {
            return;
        }
        self.pause.set_external(true);
        if self.is_resting() {
            self.settle(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if !self.mounted {
            return;
        }
        self.pause.set_external(false);
        if self.is_resting() {
            self.settle(now_ms);
        }
    }

    #[inline]
    pub fn is_externally_paused(&self) -> bool {
        self.pause.is_external()
    }

    // ---- frames ----

    /// Advance whichever loop owns the offset and return the offset.
    pub fn frame(&mut self, now_ms: f64) -> f64 {
        if !self.mounted {
            return self.offset;
        }
        if self.pause.poll(now_ms) {
            trace!(now_ms, "timed pause expired");
        }

        match self.state {
            EngineState::Autoplaying => {
                if self.pause.is_suppressing(now_ms) {
                    self.settle(now_ms);
                } else if !self.wrapper.is_measured() {
                    self.autoplay.hold(now_ms);
                } else if let Some(advance) = self.autoplay.on_frame(now_ms) {
                    if advance != 0.0 {
                        let next = self.wrapper.wrap(self.offset + advance);
                        self.write(next, OffsetSource::Autoplay);
                    }
                }
            }
            EngineState::Decelerating => {
                if !self.wrapper.is_measured() {
                    self.momentum.hold(now_ms);
                } else {
                    match self.momentum.on_frame(now_ms) {
                        Some(step) => {
                            if step.displacement != 0.0 {
                                let next = self.wrapper.wrap(self.offset - step.displacement);
                                self.write(next, OffsetSource::Momentum);
                            }
                            if step.settled {
                                self.settle(now_ms);
                            }
                        }
                        None => self.settle(now_ms),
                    }
                }
            }
            EngineState::Paused { .. } => self.settle(now_ms),
            EngineState::Idle | EngineState::Dragging => {}
        }

        self.offset
    }

    // ---- lifecycle ----

    /// Stop every loop and timer and drop the listener. Later calls are
    /// no-ops and no callback fires again.
    pub fn dispose(&mut self) {
        if !self.mounted {
            return;
        }
        self.autoplay.stop();
        self.momentum.cancel();
        self.pause.clear();
        self.gesture.reset();
        self.listener = None;
        self.state = EngineState::Idle;
        self.mounted = false;
        debug!("carousel engine disposed");
    }

    // ---- internals ----

    fn is_resting(&self) -> bool {
        matches!(
            self.state,
            EngineState::Autoplaying | EngineState::Paused { .. }
        )
    }

    /// Pick the state for when no gesture or momentum owns the offset.
    fn settle(&mut self, now_ms: f64) {
        let next = if self.items.len() <= 1 {
            EngineState::Idle
        } else if let Some((reason, until_ms)) = self.pause.active(now_ms) {
            EngineState::Paused { reason, until_ms }
        } else {
            EngineState::Autoplaying
        };
        self.transition(next);
    }

    fn transition(&mut self, next: EngineState) {
        if self.state == next {
            return;
        }
        match self.state {
            EngineState::Autoplaying if next != EngineState::Autoplaying => self.autoplay.stop(),
            EngineState::Decelerating if next != EngineState::Decelerating => {
                self.momentum.cancel()
            }
            _ => {}
        }
        if next == EngineState::Autoplaying {
            self.autoplay
                .start(self.config.speed_px_per_ms, self.config.direction);
        }
        debug!(from = self.state.label(), to = next.label(), "carousel state change");
        self.state = next;
    }

    fn remeasure(&mut self) {
        let Some(layout) = self.layout else {
            return;
        };
        let bounds = self.wrapper.measure(self.items.len(), layout);
        debug!(
            min = bounds.min,
            max = bounds.max,
            copies = self.wrapper.copies(),
            "carousel wrap bounds measured"
        );
        self.reposition();
    }

    /// Bring the offset back inside the current bounds.
    fn reposition(&mut self) {
        let target = if !self.wrapper.is_measured() {
            self.wrapper.bounds().clamp(self.offset)
        } else if self.items.len() <= 1 {
            // Nothing loops; the lone item rests at the start
            0.0
        } else if !self.positioned {
            self.positioned = true;
            self.wrapper.initial_offset(self.config.direction)
        } else {
            self.wrapper.normalize(self.offset)
        };
        if target != self.offset {
            self.write(target, OffsetSource::Layout);
        }
    }

    fn write(&mut self, offset: f64, source: OffsetSource) -> bool {
        if !self.mounted {
            return false;
        }
        if !self.state.permits(source) {
            warn!(?source, state = self.state.label(), "refused offset write");
            return false;
        }
        self.offset = offset;
        if let Some(listener) = self.listener.as_mut() {
            listener(OffsetChange { offset, source });
        }
        true
    }
}

impl<T> Drop for CarouselEngine<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
