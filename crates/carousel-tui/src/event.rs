use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};

use crate::card::Card;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    /// Poll timeout while the carousel is moving
    frame_interval: Duration,
}

/// Result of an async card deck load
pub enum CardLoadResult {
    Success {
        cards: Vec<Card>,
        /// Deck file the cards came from; `None` for the demo deck
        source: Option<PathBuf>,
    },
    Failure {
        error: String,
    },
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        Self::with_frame_rate(tick_rate_ms, 60)
    }

    pub fn with_frame_rate(tick_rate_ms: u64, frame_rate: u32) -> Self {
        let frame_rate = frame_rate.clamp(1, 240);
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            frame_interval: Duration::from_micros(1_000_000 / frame_rate as u64),
        }
    }

    /// Poll for the next event, waiting up to the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll for the next event, waiting at most one animation frame
    pub fn next_frame(&self) -> Result<Option<AppEvent>> {
        self.poll(self.frame_interval)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events, ignore release events
                    // (crossterm 0.27+ sends release events on some systems)
                    if key.kind == KeyEventKind::Press {
                        Ok(Some(AppEvent::Key(key)))
                    } else {
                        Ok(None)
                    }
                }
                Event::Mouse(mouse) => Ok(Some(AppEvent::Mouse(mouse))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// A key was pressed
    Key(KeyEvent),
    /// Mouse button, motion or wheel
    Mouse(MouseEvent),
    /// Terminal was resized
    Resize(u16, u16),
    /// Poll timed out
    Tick,
}
