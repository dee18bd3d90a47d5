//! Engine states and the vocabulary shared between the engine parts.

use serde::{Deserialize, Serialize};

/// Device that produced a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Why autoplay is currently suppressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    /// Pointer is over the carousel
    Hover,
    /// A drag or flick just ended
    Interaction,
    /// A wheel nudge just happened
    Wheel,
    /// The host asked for a pause
    External,
}

/// Who owns the scroll offset right now
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineState {
    /// One item or none: nothing moves
    Idle,
    Autoplaying,
    Paused {
        reason: PauseReason,
        /// Deadline of a timed pause, in host milliseconds
        until_ms: Option<f64>,
    },
    Dragging,
    Decelerating,
}

impl EngineState {
    pub fn label(&self) -> &'static str {
        match self {
            EngineState::Idle => "idle",
            EngineState::Autoplaying => "autoplaying",
            EngineState::Paused { .. } => "paused",
            EngineState::Dragging => "dragging",
            EngineState::Decelerating => "decelerating",
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self, EngineState::Paused { .. })
    }

    /// Whether `source` may write the offset in this state
    pub fn permits(&self, source: OffsetSource) -> bool {
        matches!(
            (self, source),
            (_, OffsetSource::Layout)
                | (EngineState::Autoplaying, OffsetSource::Autoplay)
                | (EngineState::Dragging, OffsetSource::Drag)
                | (EngineState::Decelerating, OffsetSource::Momentum)
                | (EngineState::Paused { .. }, OffsetSource::Wheel)
        )
    }
}

/// Writer of an offset update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetSource {
    Autoplay,
    Drag,
    Momentum,
    Wheel,
    /// Re-measure, item change or initial positioning
    Layout,
}

/// Payload of the offset listener
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetChange {
    pub offset: f64,
    pub source: OffsetSource,
}
