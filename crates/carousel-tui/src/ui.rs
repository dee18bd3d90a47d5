use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::app::App;
use crate::widgets::{CarouselWidget, StatusBarWidget};

/// Card height in rows, borders included
const CARD_HEIGHT: u16 = 7;

/// Draw one frame: the carousel centered vertically, status bar at the bottom.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(app.theme.bg)), size);

    // Main layout: content + status bar
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(CARD_HEIGHT),
            Constraint::Fill(1),
        ])
        .split(main_layout[0]);

    // Width changes reach the engine before the cards are placed
    app.set_carousel_area(rows[1]);
    CarouselWidget::render(frame, rows[1], app);
    StatusBarWidget::render(frame, main_layout[1], app);
}
