use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use carousel_core::engine::{CarouselEngine, EngineState, Layout, PointerKind};
use carousel_core::AppConfig;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::card::Card;
use crate::input::Action;
use crate::theme::Theme;

/// Speed multiplier per `+` / `-` press
const SPEED_STEP: f64 = 1.25;
const MIN_SPEED: f64 = 0.005;
const MAX_SPEED: f64 = 2.0;

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// The carousel; the only writer of the scroll offset
    pub engine: CarouselEngine<Card>,
    pub theme: Theme,
    /// Where the carousel was last drawn
    pub carousel_area: Rect,
    /// Card index picked by the last click
    pub selected: Option<usize>,
    /// Card index under the mouse pointer
    pub hovered: Option<usize>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// A card deck load is in flight
    pub cards_loading: bool,
    /// Left button went down inside the carousel
    pressed: bool,
    started: Instant,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Result<Self> {
        let engine = CarouselEngine::new(config.carousel.clone(), Vec::new())?;
        Ok(Self {
            config,
            engine,
            theme,
            carousel_area: Rect::default(),
            selected: None,
            hovered: None,
            should_quit: false,
            status_message: None,
            cards_loading: false,
            pressed: false,
            started: Instant::now(),
        })
    }

    /// Milliseconds since the app started; the engine's clock
    pub fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    #[inline]
    pub fn cell_width_px(&self) -> f64 {
        self.config.ui.cell_width_px
    }

    /// Card width in engine pixels
    pub fn card_width_px(&self) -> f64 {
        self.config.ui.card_width_cells as f64 * self.cell_width_px()
    }

    pub fn set_cards(&mut self, cards: Vec<Card>, now_ms: f64) {
        self.selected = None;
        self.hovered = None;
        self.engine.set_items(cards, now_ms);
    }

    /// Record the carousel's screen area and report its width to the engine.
    pub fn set_carousel_area(&mut self, area: Rect) {
        self.carousel_area = area;
        let layout = Layout::new(
            self.card_width_px(),
            area.width as f64 * self.cell_width_px(),
        );
        self.engine.set_layout(layout);
    }

    pub fn on_frame(&mut self, now_ms: f64) {
        self.engine.frame(now_ms);
    }

    #[inline]
    pub fn needs_frame(&self) -> bool {
        self.engine.needs_frame()
    }

    /// Scroll offset in terminal columns
    pub fn offset_cells(&self) -> f64 {
        self.engine.offset() / self.cell_width_px()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        let area = self.carousel_area;
        column >= area.x
            && column < area.x.saturating_add(area.width)
            && row >= area.y
            && row < area.y.saturating_add(area.height)
    }

    /// Pointer position relative to the carousel's left edge, in engine pixels
    fn viewport_x(&self, column: u16) -> f64 {
        (column as f64 - self.carousel_area.x as f64) * self.cell_width_px()
    }

    /// Map a terminal mouse event onto the engine's pointer, hover and
    /// wheel inputs.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now_ms: f64) {
        let inside = self.contains(mouse.column, mouse.row);
        let x = self.viewport_x(mouse.column);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => {
                self.pressed = self.engine.on_pointer_down(PointerKind::Mouse, x, now_ms);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                self.engine.on_pointer_move(x, now_ms);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.engine.on_pointer_up(now_ms);
                if std::mem::take(&mut self.pressed)
                    && inside
                    && !self.engine.is_click_suppressed(now_ms)
                {
                    self.click(x);
                }
                // A drag may have carried the pointer out of the carousel
                self.update_hover(inside, x, now_ms);
            }
            MouseEventKind::Moved => self.update_hover(inside, x, now_ms),
            MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if inside => {
                self.engine.on_wheel(self.config.ui.wheel_step_px, now_ms);
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if inside => {
                self.engine.on_wheel(-self.config.ui.wheel_step_px, now_ms);
            }
            _ => {}
        }
    }

    fn update_hover(&mut self, inside: bool, x: f64, now_ms: f64) {
        self.engine.set_hover(inside, now_ms);
        self.hovered = if inside { self.engine.item_at(x) } else { None };
    }

    fn click(&mut self, x: f64) {
        let Some(index) = self.engine.item_at(x) else {
            return;
        };
        self.selected = Some(index);
        if let Some(card) = self.engine.items().get(index) {
            let message = format!("Selected: {}", card.title);
            self.set_status(message);
        }
    }

    /// Apply a key action. `ReloadCards` is left to the caller, which owns
    /// the loader task.
    pub fn handle_action(&mut self, action: Action, now_ms: f64) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePause => {
                if self.engine.is_externally_paused() {
                    self.engine.resume(now_ms);
                    self.set_status("Resumed");
                } else {
                    self.engine.pause(now_ms);
                    self.set_status("Paused");
                }
            }
            Action::Reverse => {
                let direction = self.engine.config().direction.reversed();
                self.engine.set_direction(direction);
                self.set_status(format!("Direction: {direction:?}"));
            }
            Action::SpeedUp | Action::SpeedDown => {
                let current = self.engine.config().speed_px_per_ms;
                let scaled = if action == Action::SpeedUp {
                    current * SPEED_STEP
                } else {
                    current / SPEED_STEP
                };
                let next = scaled.clamp(MIN_SPEED, MAX_SPEED);
                match self.engine.set_speed(next) {
                    Ok(()) => self.set_status(format!("Speed: {next:.3} px/ms")),
                    Err(e) => self.set_status(format!("Speed unchanged: {e}")),
                }
            }
            Action::ReloadCards | Action::None => {}
        }
    }

    /// Short label for the status bar
    pub fn state_label(&self) -> String {
        match self.engine.state() {
            EngineState::Paused { reason, .. } => format!("PAUSED ({reason:?})").to_uppercase(),
            state => state.label().to_uppercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardDeck;
    use carousel_core::engine::PauseReason;
    use carousel_core::Direction;
    use crossterm::event::KeyModifiers;

    fn app() -> App {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default()).unwrap();
        app.set_cards(CardDeck::demo().cards, 0.0);
        // 100 columns x 8 px = 800 px viewport, 24 x 8 = 192 px cards
        app.set_carousel_area(Rect::new(0, 0, 100, 10));
        app
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_layout_reaches_engine() {
        let app = app();
        let bounds = app.engine.bounds();
        assert_eq!(bounds.min, 0.0);
        assert_eq!(bounds.max % (8.0 * 192.0), 0.0);
        assert!(bounds.max > 0.0);
        assert_eq!(app.engine.state(), EngineState::Autoplaying);
    }

    #[test]
    fn test_mouse_drag_moves_carousel() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 2), 0.0);
        assert_eq!(app.engine.state(), EngineState::Dragging);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 2), 16.0);
        assert_eq!(app.engine.offset(), 80.0);
        assert_eq!(app.offset_cells(), 10.0);

        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, 2), 16.0);
        assert_eq!(app.engine.state(), EngineState::Decelerating);
        // A drag is never a click
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_click_selects_card() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30, 2), 0.0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 2), 50.0);
        // 30 columns = 240 px: the second card
        assert_eq!(app.selected, Some(1));
        assert_eq!(app.status_message.as_deref(), Some("Selected: Tokio"));
    }

    #[test]
    fn test_release_outside_without_press_is_not_a_click() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 2), 0.0);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_hover_pauses_and_resumes() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 10, 3), 0.0);
        assert_eq!(
            app.engine.state(),
            EngineState::Paused {
                reason: PauseReason::Hover,
                until_ms: None
            }
        );
        assert_eq!(app.hovered, Some(0));

        app.handle_mouse(mouse(MouseEventKind::Moved, 10, 20), 10.0);
        assert_eq!(app.engine.state(), EngineState::Autoplaying);
        assert_eq!(app.hovered, None);
    }

    #[test]
    fn test_release_outside_clears_hover() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::Moved, 50, 2), 0.0);
        assert!(app.engine.state().is_paused());

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 50, 2), 10.0);
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 40, 20), 26.0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 40, 20), 26.0);
        assert_eq!(app.hovered, None);

        // Past momentum and the interaction pause, nothing holds autoplay
        let mut t = 26.0;
        while t < 3_000.0 {
            t += 1000.0 / 60.0;
            app.on_frame(t);
        }
        assert_eq!(app.engine.state(), EngineState::Autoplaying);
    }

    #[test]
    fn test_wheel_nudges() {
        let mut app = app();
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 3), 0.0);
        assert_eq!(app.engine.offset(), 48.0);
        assert!(app.engine.state().is_paused());

        // Outside the carousel the wheel does nothing
        app.handle_mouse(mouse(MouseEventKind::ScrollDown, 10, 30), 1.0);
        assert_eq!(app.engine.offset(), 48.0);
    }

    #[test]
    fn test_key_actions() {
        let mut app = app();
        app.handle_action(Action::TogglePause, 0.0);
        assert!(app.engine.state().is_paused());
        assert_eq!(app.state_label(), "PAUSED (EXTERNAL)");
        app.handle_action(Action::TogglePause, 1.0);
        assert_eq!(app.engine.state(), EngineState::Autoplaying);

        app.handle_action(Action::Reverse, 2.0);
        assert_eq!(app.engine.config().direction, Direction::Reverse);

        let before = app.engine.config().speed_px_per_ms;
        app.handle_action(Action::SpeedUp, 3.0);
        assert!(app.engine.config().speed_px_per_ms > before);

        app.handle_action(Action::Quit, 4.0);
        assert!(app.should_quit);
    }

    #[test]
    fn test_no_cards_is_idle() {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default()).unwrap();
        app.set_carousel_area(Rect::new(0, 0, 100, 10));
        assert_eq!(app.engine.state(), EngineState::Idle);
        assert!(!app.needs_frame());
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 30, 2), 0.0);
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 2), 10.0);
        assert_eq!(app.selected, None);
    }
}
