use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;

/// Horizontal placement of one rendered card, relative to the carousel area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSlot {
    /// Position in the rendered (duplicated) strip
    pub position: usize,
    pub x: u16,
    pub width: u16,
    pub clipped_left: bool,
    pub clipped_right: bool,
}

/// Cards of a strip of `count` cards, each `card_width` columns wide,
/// that intersect a viewport of `area_width` columns scrolled by
/// `offset_cells`.
pub fn visible_slots(offset_cells: f64, card_width: u16, count: usize, area_width: u16) -> Vec<CardSlot> {
    let mut slots = Vec::new();
    if card_width == 0 || area_width == 0 || !offset_cells.is_finite() {
        return slots;
    }
    let offset = offset_cells.round() as i64;
    let card = card_width as i64;
    let view = area_width as i64;

    for position in 0..count {
        let left = position as i64 * card - offset;
        let right = left + card;
        if right <= 0 {
            continue;
        }
        if left >= view {
            break;
        }
        let start = left.max(0);
        let end = right.min(view);
        slots.push(CardSlot {
            position,
            x: start as u16,
            width: (end - start) as u16,
            clipped_left: left < 0,
            clipped_right: right > view,
        });
    }
    slots
}

pub struct CarouselWidget;

impl CarouselWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), area);

        let cards = app.engine.items();
        if cards.is_empty() {
            let message = if app.cards_loading { "Loading cards..." } else { "No cards" };
            let paragraph = Paragraph::new(message).style(Style::default().fg(theme.grey).bg(theme.bg));
            frame.render_widget(paragraph, area);
            return;
        }

        let count = cards.len() * app.engine.copies();
        let slots = visible_slots(
            app.offset_cells(),
            app.config.ui.card_width_cells,
            count,
            area.width,
        );

        for slot in slots {
            let index = slot.position % cards.len();
            let card = &cards[index];

            let mut borders = Borders::TOP | Borders::BOTTOM;
            if !slot.clipped_left {
                borders |= Borders::LEFT;
            }
            if !slot.clipped_right {
                borders |= Borders::RIGHT;
            }

            let border_color = if app.hovered == Some(index) || app.selected == Some(index) {
                theme.highlight
            } else {
                theme.grey
            };
            let mut title_style = Style::default().fg(theme.fg).add_modifier(Modifier::BOLD);
            if app.selected == Some(index) {
                title_style = title_style.fg(theme.highlight);
            }

            let mut block = Block::default()
                .borders(borders)
                .border_style(Style::default().fg(border_color))
                .style(Style::default().bg(theme.bg));
            if !slot.clipped_left {
                block = block.title(Line::styled(format!(" {} ", card.title), title_style));
            }

            let text = card.subtitle.clone().unwrap_or_default();
            let paragraph = Paragraph::new(text)
                .style(Style::default().fg(theme.fg))
                .wrap(Wrap { trim: true })
                .block(block);

            let rect = Rect::new(area.x + slot.x, area.y, slot.width, area.height);
            frame.render_widget(paragraph, rect);
        }
    }
}
