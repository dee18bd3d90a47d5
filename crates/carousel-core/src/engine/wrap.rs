//! Atomic Layer: infinite-loop wrap-around
//!
//! The host renders the item list `copies` times in a row. Once the offset
//! crosses a wrap bound it jumps to the opposite bound, which shows the
//! same pixels because the bounds are a whole number of periods apart.

use crate::config::Direction;

/// Offset range inside which no wrapping happens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapBounds {
    pub min: f64,
    pub max: f64,
}

impl WrapBounds {
    pub const EMPTY: WrapBounds = WrapBounds { min: 0.0, max: 0.0 };

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.max >= self.min
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Fallback for broken bounds: keep the offset in `[0, max(0, max)]`.
    pub fn clamp(&self, offset: f64) -> f64 {
        let upper = if self.max.is_finite() { self.max.max(0.0) } else { 0.0 };
        if offset.is_finite() {
            offset.clamp(0.0, upper)
        } else {
            0.0
        }
    }
}

/// Uniform item width and visible viewport width, in host pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub item_extent: f64,
    pub viewport_extent: f64,
}

impl Layout {
    pub fn new(item_extent: f64, viewport_extent: f64) -> Self {
        Self {
            item_extent,
            viewport_extent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoopWrapper {
    bounds: WrapBounds,
    copies: usize,
    /// Width of one copy of the item list
    period: f64,
    min_copies: usize,
}

impl LoopWrapper {
    pub fn new(min_copies: usize) -> Self {
        let min_copies = min_copies.max(2);
        Self {
            bounds: WrapBounds::EMPTY,
            copies: min_copies,
            period: 0.0,
            min_copies,
        }
    }

    /// Recompute copies and bounds for `item_count` items laid out with
    /// `layout`. Zero-sized content leaves the wrapper unmeasured.
    pub fn measure(&mut self, item_count: usize, layout: Layout) -> WrapBounds {
        let period = item_count as f64 * layout.item_extent;
        let viewport = layout.viewport_extent;
        if !(period > 0.0 && viewport > 0.0 && period.is_finite() && viewport.is_finite()) {
            self.period = 0.0;
            self.copies = self.min_copies;
            self.bounds = WrapBounds::EMPTY;
            return self.bounds;
        }

        let copies = Self::copies_for(period, viewport, self.min_copies);
        let rendered = copies as f64 * period;
        let overflow = rendered - viewport;
        let whole_periods = (overflow / period).floor();
        let max = if whole_periods >= 1.0 {
            whole_periods * period
        } else {
            overflow.max(0.0)
        };

        self.period = period;
        self.copies = copies;
        self.bounds = WrapBounds::new(0.0, max);
        self.bounds
    }

    /// Copies needed so the duplicated strip is at least twice the viewport.
    pub fn copies_for(period: f64, viewport: f64, min_copies: usize) -> usize {
        let needed = (2.0 * viewport / period).ceil();
        if needed.is_finite() && needed > min_copies as f64 {
            needed as usize
        } else {
            min_copies
        }
    }

    /// Use bounds measured by the host instead of the computed ones.
    pub fn set_bounds(&mut self, bounds: WrapBounds) {
        self.bounds = bounds;
        if bounds.is_valid() && self.period <= 0.0 {
            self.period = bounds.span();
        }
    }

    /// Remap an offset that crossed a bound to the opposite bound.
    pub fn wrap(&self, offset: f64) -> f64 {
        let WrapBounds { min, max } = self.bounds;
        if !self.bounds.is_valid() {
            return self.bounds.clamp(offset);
        }
        if offset <= min {
            max
        } else if offset >= max {
            min
        } else {
            offset
        }
    }

    /// Fold an offset back into range after a re-measure, keeping the same
    /// content in view when the bounds are whole periods apart.
    pub fn normalize(&self, offset: f64) -> f64 {
        if !self.bounds.is_valid() {
            return self.bounds.clamp(offset);
        }
        let WrapBounds { min, max } = self.bounds;
        if (min..=max).contains(&offset) {
            return offset;
        }
        let span = self.bounds.span();
        if span <= 0.0 || !offset.is_finite() {
            return min;
        }
        min + (offset - min).rem_euclid(span)
    }

    /// Starting offset: reverse autoplay starts from the far end so it has
    /// room to run before wrapping.
    pub fn initial_offset(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Forward => self.bounds.min,
            Direction::Reverse => self.bounds.max.max(self.bounds.min),
        }
    }

    /// Whether there is anything to scroll across
    #[inline]
    pub fn is_measured(&self) -> bool {
        self.bounds.is_valid() && self.bounds.span() > 0.0
    }

    #[inline]
    pub fn bounds(&self) -> WrapBounds {
        self.bounds
    }

    #[inline]
    pub fn copies(&self) -> usize {
        self.copies
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }
}
