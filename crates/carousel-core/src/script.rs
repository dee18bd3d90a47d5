//! Scripted interaction replay
//!
//! A script describes a carousel, a frame clock and a list of timed input
//! steps. `run_script` drives a real engine through them and records the
//! offset after every frame, which makes engine behaviour reproducible
//! without a terminal.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CarouselConfig;
use crate::engine::{
    CarouselEngine, EngineState, Layout, OffsetSource, PauseReason, PointerKind, FRAME_MS,
};
use crate::error::{Error, Result};

/// Longest replay accepted, in frames
pub const MAX_FRAMES: usize = 1_000_000;

fn default_frame_ms() -> f64 {
    FRAME_MS
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Number of items in the carousel
    pub items: usize,
    pub item_extent: f64,
    pub viewport_extent: f64,
    pub duration_ms: f64,
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f64,
    /// Replaces the caller's carousel settings when present
    #[serde(default)]
    pub carousel: Option<CarouselConfig>,
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptStep {
    pub at_ms: f64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    PointerDown { kind: PointerKind, x: f64 },
    PointerMove { x: f64 },
    PointerUp,
    PointerCancel,
    Wheel { delta: f64 },
    HoverEnter,
    HoverLeave,
    Pause,
    Resume,
    Resize { item_extent: f64, viewport_extent: f64 },
    SetItems { count: usize },
}

/// Engine snapshot after one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceRecord {
    pub t_ms: f64,
    pub offset: f64,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<PauseReason>,
    /// Last writer of the offset during this frame, if anything moved it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<OffsetSource>,
}

impl Script {
    pub fn parse(content: &str) -> Result<Self> {
        let script: Script =
            toml::from_str(content).map_err(|e| Error::Script(e.to_string()))?;
        script.validate()?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.frame_ms > 0.0 && self.frame_ms.is_finite()) {
            return Err(Error::Script(format!(
                "frame_ms must be > 0, got {}",
                self.frame_ms
            )));
        }
        if !(self.duration_ms >= 0.0 && self.duration_ms.is_finite()) {
            return Err(Error::Script(format!(
                "duration_ms must be >= 0, got {}",
                self.duration_ms
            )));
        }
        let frames = self.frame_count();
        if frames > MAX_FRAMES as f64 {
            return Err(Error::Script(format!(
                "{} ms at {} ms per frame is {} frames, limit is {}",
                self.duration_ms, self.frame_ms, frames, MAX_FRAMES
            )));
        }
        if let Some(pair) = self
            .steps
            .windows(2)
            .find(|pair| pair[1].at_ms < pair[0].at_ms)
        {
            return Err(Error::Script(format!(
                "steps out of order: {} ms after {} ms",
                pair[1].at_ms, pair[0].at_ms
            )));
        }
        Ok(())
    }

    /// Frames after the first one. Tolerates float noise so 1000 ms at
    /// 1000/60 ms per frame gives 60.
    fn frame_count(&self) -> f64 {
        (self.duration_ms / self.frame_ms + 1e-9).floor()
    }
}

/// Replay `script` and return one record per frame.
///
/// Each step is delivered at its own timestamp, before the first frame at
/// or after that time.
pub fn run_script(base: &CarouselConfig, script: &Script) -> Result<Vec<TraceRecord>> {
    script.validate()?;
    let config = script.carousel.clone().unwrap_or_else(|| base.clone());
    let mut engine = CarouselEngine::new(config, (0..script.items).collect::<Vec<_>>())?;
    engine.set_layout(Layout::new(script.item_extent, script.viewport_extent));

    let last_source = Rc::new(Cell::new(None));
    {
        let last_source = Rc::clone(&last_source);
        engine.on_offset_change(move |change| last_source.set(Some(change.source)));
    }

    let frames = script.frame_count() as usize;
    let mut steps = script.steps.iter().peekable();
    let mut trace = Vec::with_capacity(frames + 1);

    for i in 0..=frames {
        let t_ms = i as f64 * script.frame_ms;
        while let Some(step) = steps.next_if(|step| step.at_ms <= t_ms) {
            apply_step(&mut engine, step);
        }
        engine.frame(t_ms);

        let state = engine.state();
        let reason = match state {
            EngineState::Paused { reason, .. } => Some(reason),
            _ => None,
        };
        trace.push(TraceRecord {
            t_ms,
            offset: engine.offset(),
            state: state.label(),
            reason,
            source: last_source.take(),
        });
    }

    debug!(
        frames = trace.len(),
        unplayed = steps.count(),
        "script replay finished"
    );
    Ok(trace)
}

fn apply_step(engine: &mut CarouselEngine<usize>, step: &ScriptStep) {
    let now = step.at_ms;
    match step.action {
        ScriptAction::PointerDown { kind, x } => {
            engine.on_pointer_down(kind, x, now);
        }
        ScriptAction::PointerMove { x } => {
            engine.on_pointer_move(x, now);
        }
        ScriptAction::PointerUp => engine.on_pointer_up(now),
        ScriptAction::PointerCancel => engine.on_pointer_cancel(now),
        ScriptAction::Wheel { delta } => engine.on_wheel(delta, now),
        ScriptAction::HoverEnter => engine.set_hover(true, now),
        ScriptAction::HoverLeave => engine.set_hover(false, now),
        ScriptAction::Pause => engine.pause(now),
        ScriptAction::Resume => engine.resume(now),
        ScriptAction::Resize {
            item_extent,
            viewport_extent,
        } => engine.set_layout(Layout::new(item_extent, viewport_extent)),
        ScriptAction::SetItems { count } => engine.set_items((0..count).collect(), now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTOPLAY: &str = r#"
items = 10
item_extent = 100.0
viewport_extent = 800.0
duration_ms = 1000.0
"#;

    #[test]
    fn test_autoplay_script() {
        let script = Script::parse(AUTOPLAY).unwrap();
        assert_eq!(script.frame_ms, FRAME_MS);
        let trace = run_script(&CarouselConfig::default(), &script).unwrap();
        assert_eq!(trace.len(), 61);
        let last = trace.last().unwrap();
        assert!((last.offset - 72.0).abs() < 1e-6);
        assert_eq!(last.state, "autoplaying");
        assert_eq!(last.source, Some(OffsetSource::Autoplay));
    }

    #[test]
    fn test_drag_script() {
        let script = Script::parse(
            r#"
items = 10
item_extent = 100.0
viewport_extent = 800.0
duration_ms = 200.0
frame_ms = 10.0

[[steps]]
at_ms = 0.0
action = "pointer_down"
kind = "mouse"
x = 100.0

[[steps]]
at_ms = 50.0
action = "pointer_move"
x = 40.0

[[steps]]
at_ms = 50.0
action = "pointer_up"
"#,
        )
        .unwrap();
        assert_eq!(
            script.steps[0].action,
            ScriptAction::PointerDown {
                kind: PointerKind::Mouse,
                x: 100.0
            }
        );

        let trace = run_script(&CarouselConfig::default(), &script).unwrap();
        assert_eq!(trace[0].state, "dragging");
        assert_eq!(trace[5].source, Some(OffsetSource::Drag));
        assert_eq!(trace[5].offset, 60.0);
        assert_eq!(trace[5].state, "decelerating");
        assert_eq!(trace[6].source, Some(OffsetSource::Momentum));
        assert!(trace[20].offset > trace[6].offset);
    }

    #[test]
    fn test_hover_script_pauses() {
        let script = Script::parse(
            r#"
items = 10
item_extent = 100.0
viewport_extent = 800.0
duration_ms = 500.0
frame_ms = 100.0

[[steps]]
at_ms = 100.0
action = "hover_enter"

[[steps]]
at_ms = 300.0
action = "hover_leave"
"#,
        )
        .unwrap();
        let trace = run_script(&CarouselConfig::default(), &script).unwrap();
        assert_eq!(trace[1].state, "paused");
        assert_eq!(trace[1].reason, Some(PauseReason::Hover));
        assert_eq!(trace[1].offset, trace[2].offset);
        assert_eq!(trace[3].state, "autoplaying");
        assert!(trace[5].offset > trace[3].offset);
    }

    #[test]
    fn test_carousel_overrides() {
        let script = Script::parse(&format!("{AUTOPLAY}\n[carousel]\nspeed_px_per_ms = 0.0\n"))
            .unwrap();
        let trace = run_script(&CarouselConfig::default(), &script).unwrap();
        assert!(trace.iter().all(|record| record.offset == 0.0));
    }

    #[test]
    fn test_rejects_unsorted_steps() {
        let result = Script::parse(
            r#"
items = 3
item_extent = 100.0
viewport_extent = 200.0
duration_ms = 100.0

[[steps]]
at_ms = 50.0
action = "pause"

[[steps]]
at_ms = 10.0
action = "resume"
"#,
        );
        assert!(matches!(result, Err(Error::Script(_))));
    }

    #[test]
    fn test_rejects_zero_frame_interval() {
        let result = Script::parse(&format!("{AUTOPLAY}frame_ms = 0.0\n"));
        assert!(matches!(result, Err(Error::Script(_))));
    }

    #[test]
    fn test_rejects_replay_too_long() {
        let result = Script::parse(&format!("{AUTOPLAY}frame_ms = 1e-300\n"));
        assert!(matches!(result, Err(Error::Script(_))));

        let mut script = Script::parse(AUTOPLAY).unwrap();
        script.frame_ms = 1e-300;
        assert!(matches!(
            run_script(&CarouselConfig::default(), &script),
            Err(Error::Script(_))
        ));

        // Exactly at the limit is fine to validate
        script.frame_ms = 1.0;
        script.duration_ms = MAX_FRAMES as f64;
        assert!(script.validate().is_ok());
    }

    #[test]
    fn test_trace_serializes_without_empty_fields() {
        let record = TraceRecord {
            t_ms: 0.0,
            offset: 1.5,
            state: "autoplaying",
            reason: None,
            source: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"t_ms":0.0,"offset":1.5,"state":"autoplaying"}"#);
    }
}
