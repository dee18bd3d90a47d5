use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One carousel item as drawn in the terminal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl Card {
    pub fn new(title: impl Into<String>, subtitle: Option<&str>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.map(str::to_string),
        }
    }
}

/// Card deck file: a list of `[[cards]]` tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardDeck {
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl CardDeck {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse card deck")
    }

    /// Built-in deck shown when no deck file is configured
    pub fn demo() -> Self {
        let cards = [
            ("Rust", "Fearless concurrency"),
            ("Tokio", "Async runtime"),
            ("Ratatui", "Terminal widgets"),
            ("Crossterm", "Raw mode and mouse"),
            ("Serde", "Zero-copy (de)serialization"),
            ("Clap", "Derive-based CLI parsing"),
            ("Tracing", "Structured diagnostics"),
            ("Thiserror", "Error enums"),
        ]
        .into_iter()
        .map(|(title, subtitle)| Card::new(title, Some(subtitle)))
        .collect();
        Self { cards }
    }

    /// The deck's cards, or the demo deck when it is empty
    pub fn into_cards_or_demo(self) -> Vec<Card> {
        if self.cards.is_empty() {
            Self::demo().cards
        } else {
            self.cards
        }
    }
}
