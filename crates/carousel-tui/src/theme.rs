use carousel_core::config::ThemeColorOverrides;
use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub bg_bar: Color,
    pub fg: Color,
    pub grey: Color,
    pub accent: Color,
    pub highlight: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg: Color::Rgb(0x28, 0x28, 0x28),
            bg_bar: Color::Rgb(0x45, 0x40, 0x3d),
            fg: Color::Rgb(0xd4, 0xbe, 0x98),
            grey: Color::Rgb(0x92, 0x83, 0x74),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            highlight: Color::Rgb(0xd8, 0xa6, 0x57),
            warning: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}

impl Theme {
    /// Default theme with the configured overrides applied. Colors that
    /// fail to parse keep their default.
    pub fn from_overrides(overrides: &ThemeColorOverrides) -> Self {
        let mut theme = Self::default();
        let slots = [
            (&overrides.bg, &mut theme.bg),
            (&overrides.fg, &mut theme.fg),
            (&overrides.accent, &mut theme.accent),
            (&overrides.highlight, &mut theme.highlight),
        ];
        for (value, slot) in slots {
            if let Some(hex) = value {
                match parse_hex_color(hex) {
                    Some(color) => *slot = color,
                    None => tracing::warn!(color = %hex, "ignoring invalid theme color"),
                }
            }
        }
        theme
    }
}

/// Parse `#rrggbb` or `rrggbb`
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
