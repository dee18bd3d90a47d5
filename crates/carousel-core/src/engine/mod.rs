//! Carousel engine
//!
//! Continuous autoplay, pointer dragging, momentum and seamless wrap-around
//! for a horizontally looping strip of items.
//!
//! # Architecture
//!
//! ## Atomic Layer
//! - `velocity` - Release velocity from pointer deltas
//! - `momentum` - Friction decay after a flick
//! - `wrap` - Wrap bounds, content duplication and offset remapping
//! - `autoplay` - Time-normalized constant-speed advance
//! - `pause` - Timed and level-triggered autoplay suppression
//! - `gesture` - Mouse/touch pointer streams folded into one gesture
//! - `state` - Engine states and offset write sources
//!
//! ## Molecular Layer
//! - `carousel` - The state machine that owns the scroll offset
//!
//! # Usage
//!
//! ```ignore
//! use carousel_core::engine::{CarouselEngine, Layout, PointerKind};
//! use carousel_core::CarouselConfig;
//!
//! let mut engine = CarouselEngine::new(CarouselConfig::default(), cards)?;
//! engine.set_layout(Layout::new(240.0, 800.0));
//! engine.on_offset_change(|change| apply_scroll_left(change.offset));
//!
//! // From the pointer handlers
//! engine.on_pointer_down(PointerKind::Mouse, x, now_ms);
//! engine.on_pointer_move(x, now_ms);
//! engine.on_pointer_up(now_ms);
//!
//! // Once per animation frame
//! let offset = engine.frame(now_ms);
//! ```

// Atomic Layer
pub mod autoplay;
pub mod gesture;
pub mod momentum;
pub mod pause;
pub mod state;
pub mod velocity;
pub mod wrap;

// Molecular Layer
pub mod carousel;

pub use autoplay::AutoplayScheduler;
pub use carousel::{CarouselEngine, OffsetListener};
pub use gesture::{GestureMove, GestureRelease, GestureSample, GestureState, GestureUnifier};
pub use momentum::{MomentumFrame, MomentumSimulator};
pub use pause::PauseController;
pub use state::{EngineState, OffsetChange, OffsetSource, PauseReason, PointerKind};
pub use velocity::{VelocityTracker, FRAME_MS};
pub use wrap::{Layout, LoopWrapper, WrapBounds};
