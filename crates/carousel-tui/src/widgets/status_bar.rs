use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let state_str = format!(" {} ", app.state_label());

        let status_text = if let Some(msg) = &app.status_message {
            format!(" {}", msg)
        } else {
            let config = app.engine.config();
            format!(
                " {:?} | {:.3} px/ms | Cards: {} | Offset: {:.0}",
                config.direction,
                config.speed_px_per_ms,
                app.engine.items().len(),
                app.engine.offset(),
            )
        };

        let help_hint = " q:quit space:pause r:reverse +/-:speed R:reload ";
        let used = state_str.len() + status_text.len() + help_hint.len();
        let padding_len = (area.width as usize).saturating_sub(used);

        let line = Line::from(vec![
            Span::styled(
                state_str,
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                status_text,
                Style::default().fg(theme.fg).bg(theme.bg_bar),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(theme.bg_bar)),
            Span::styled(
                help_hint,
                Style::default().fg(theme.grey).bg(theme.bg_bar),
            ),
        ]);

        let paragraph = Paragraph::new(line);
        frame.render_widget(paragraph, area);
    }
}
