use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub carousel: CarouselConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Autoplay direction.
///
/// `Forward` advances the offset (content moves right-to-left on screen),
/// `Reverse` retreats it and starts from the end of the wrap range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

/// Tuning for the carousel engine. Units are the host's pixels and
/// milliseconds; velocities are pixels per 1000/60 ms frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselConfig {
    /// Autoplay direction
    #[serde(default)]
    pub direction: Direction,
    /// Autoplay speed in pixels per millisecond
    #[serde(default = "default_speed")]
    pub speed_px_per_ms: f64,
    /// Autoplay suppression after a mouse drag ends
    #[serde(default = "default_drag_pause")]
    pub drag_pause_ms: f64,
    /// Autoplay suppression after a touch drag ends (longer, flicks are coarse)
    #[serde(default = "default_touch_drag_pause")]
    pub touch_drag_pause_ms: f64,
    /// Autoplay suppression after a wheel nudge
    #[serde(default = "default_wheel_pause")]
    pub wheel_pause_ms: f64,
    /// Momentum velocity multiplier per frame
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Momentum stops below this speed (pixels per frame)
    #[serde(default = "default_stop_threshold")]
    pub stop_threshold: f64,
    /// Release velocity multiplier for touch gestures
    #[serde(default = "default_touch_damping")]
    pub touch_velocity_damping: f64,
    /// Weight of the newest sample in the velocity average (1.0 = last sample only)
    #[serde(default = "default_smoothing")]
    pub velocity_smoothing: f64,
    /// Cap on a single velocity sample (pixels per frame)
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f64,
    /// A release this long after the last move carries no velocity
    #[serde(default = "default_velocity_stale")]
    pub velocity_stale_ms: f64,
    /// Pointer travel that turns a tap into a drag
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold_px: f64,
    /// How long clicks stay suppressed after a drag
    #[serde(default = "default_click_suppress")]
    pub click_suppress_ms: f64,
    /// Minimum number of rendered copies of the item list
    #[serde(default = "default_min_copies")]
    pub min_copies: usize,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            speed_px_per_ms: default_speed(),
            drag_pause_ms: default_drag_pause(),
            touch_drag_pause_ms: default_touch_drag_pause(),
            wheel_pause_ms: default_wheel_pause(),
            friction: default_friction(),
            stop_threshold: default_stop_threshold(),
            touch_velocity_damping: default_touch_damping(),
            velocity_smoothing: default_smoothing(),
            max_velocity: default_max_velocity(),
            velocity_stale_ms: default_velocity_stale(),
            drag_threshold_px: default_drag_threshold(),
            click_suppress_ms: default_click_suppress(),
            min_copies: default_min_copies(),
        }
    }
}

impl CarouselConfig {
    /// Reject values the physics cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.speed_px_per_ms.is_finite() || self.speed_px_per_ms < 0.0 {
            return Err(Error::invalid(
                "speed_px_per_ms",
                format!("must be finite and >= 0, got {}", self.speed_px_per_ms),
            ));
        }
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(Error::invalid(
                "friction",
                format!("must be in (0, 1), got {}", self.friction),
            ));
        }
        if !(self.stop_threshold > 0.0 && self.stop_threshold.is_finite()) {
            return Err(Error::invalid(
                "stop_threshold",
                format!("must be > 0, got {}", self.stop_threshold),
            ));
        }
        if !(self.max_velocity > 0.0) {
            return Err(Error::invalid(
                "max_velocity",
                format!("must be > 0, got {}", self.max_velocity),
            ));
        }
        for (name, value) in [
            ("touch_velocity_damping", self.touch_velocity_damping),
            ("velocity_smoothing", self.velocity_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::invalid(name, format!("must be in (0, 1], got {value}")));
            }
        }
        for (name, value) in [
            ("drag_pause_ms", self.drag_pause_ms),
            ("touch_drag_pause_ms", self.touch_drag_pause_ms),
            ("wheel_pause_ms", self.wheel_pause_ms),
            ("velocity_stale_ms", self.velocity_stale_ms),
            ("drag_threshold_px", self.drag_threshold_px),
            ("click_suppress_ms", self.click_suppress_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(name, format!("must be finite and >= 0, got {value}")));
            }
        }
        if self.min_copies < 2 {
            return Err(Error::invalid(
                "min_copies",
                format!("must be at least 2, got {}", self.min_copies),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Idle tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frames per second while something is moving
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    /// Logical pixels per terminal column
    #[serde(default = "default_cell_width")]
    pub cell_width_px: f64,
    /// Card width in terminal columns
    #[serde(default = "default_card_width")]
    pub card_width_cells: u16,
    /// Offset nudge per mouse wheel notch
    #[serde(default = "default_wheel_step")]
    pub wheel_step_px: f64,
    /// Card deck file (TOML)
    #[serde(default)]
    pub cards_path: Option<PathBuf>,
    /// Color overrides
    #[serde(default)]
    pub theme: ThemeColorOverrides,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            frame_rate: default_frame_rate(),
            cell_width_px: default_cell_width(),
            card_width_cells: default_card_width(),
            wheel_step_px: default_wheel_step(),
            cards_path: None,
            theme: ThemeColorOverrides::default(),
        }
    }
}

/// Optional color overrides for theme customization
/// Each color is a hex string (e.g., "#ff0000" or "ff0000")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThemeColorOverrides {
    /// Background
    pub bg: Option<String>,
    /// Card border and text
    pub fg: Option<String>,
    /// Accent for the status bar state badge
    pub accent: Option<String>,
    /// Border of the card under the pointer
    pub highlight: Option<String>,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("carousel")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_speed() -> f64 {
    0.072 // ~1.2 px per frame at 60fps
}

fn default_drag_pause() -> f64 {
    2000.0
}

fn default_touch_drag_pause() -> f64 {
    4000.0
}

fn default_wheel_pause() -> f64 {
    1500.0
}

fn default_friction() -> f64 {
    0.95
}

fn default_stop_threshold() -> f64 {
    0.5
}

fn default_touch_damping() -> f64 {
    0.8
}

fn default_smoothing() -> f64 {
    1.0
}

fn default_max_velocity() -> f64 {
    60.0
}

fn default_velocity_stale() -> f64 {
    100.0
}

fn default_drag_threshold() -> f64 {
    5.0
}

fn default_click_suppress() -> f64 {
    100.0
}

fn default_min_copies() -> usize {
    2
}

fn default_tick_rate() -> u64 {
    250
}

fn default_frame_rate() -> u32 {
    60
}

fn default_cell_width() -> f64 {
    8.0
}

fn default_card_width() -> u16 {
    24
}

fn default_wheel_step() -> f64 {
    48.0
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.carousel.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/carousel/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("carousel")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("carousel.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Configured card deck file (with tilde expansion)
    pub fn cards_path(&self) -> Option<PathBuf> {
        self.ui.cards_path.as_deref().map(expand_tilde)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CarouselConfig::default();
        assert_eq!(config.direction, Direction::Forward);
        assert!((config.speed_px_per_ms - 0.072).abs() < 1e-12);
        assert!((config.friction - 0.95).abs() < 1e-12);
        assert!((config.stop_threshold - 0.5).abs() < 1e-12);
        assert!((config.touch_velocity_damping - 0.8).abs() < 1e-12);
        assert!(config.touch_drag_pause_ms > config.drag_pause_ms);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [carousel]
            direction = "reverse"
            friction = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(config.carousel.direction, Direction::Reverse);
        assert!((config.carousel.friction - 0.9).abs() < 1e-12);
        assert!((config.carousel.drag_threshold_px - 5.0).abs() < 1e-12);
        assert_eq!(config.ui.card_width_cells, 24);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.carousel.speed_px_per_ms = 0.2;
        config.ui.cards_path = Some(PathBuf::from("/tmp/cards.toml"));
        let text = config.to_toml().unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.carousel, config.carousel);
        assert_eq!(parsed.ui.cards_path, config.ui.cards_path);
    }

    #[test]
    fn test_validate_rejects_bad_friction() {
        for friction in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
            let config = CarouselConfig {
                friction,
                ..Default::default()
            };
            match config.validate() {
                Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, "friction"),
                other => panic!("friction {friction} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_negative_durations_and_copies() {
        let config = CarouselConfig {
            wheel_pause_ms: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CarouselConfig {
            min_copies: 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CarouselConfig {
            touch_velocity_damping: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join("carousel-config-does-not-exist.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.carousel, CarouselConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("carousel-config-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        let mut config = AppConfig::default();
        config.carousel.direction = Direction::Reverse;
        config.carousel.max_velocity = 25.0;
        config.ui.card_width_cells = 30;

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.carousel, config.carousel);
        assert_eq!(loaded.ui.card_width_cells, 30);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_validate_rejects_non_positive_max_velocity() {
        for max_velocity in [0.0, -5.0, f64::NAN] {
            let config = CarouselConfig {
                max_velocity,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Forward.sign(), 1.0);
        assert_eq!(Direction::Reverse.sign(), -1.0);
        assert_eq!(Direction::Forward.reversed(), Direction::Reverse);
    }
}
