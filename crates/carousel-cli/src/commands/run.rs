use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{info, warn};

use carousel_core::AppConfig;
use carousel_tui::{
    event::{AppEvent, CardLoadResult, EventHandler},
    input::{handle_key_event, Action},
    ui, App, Card, CardDeck, TerminalGuard, Theme,
};

pub async fn run(config: Arc<AppConfig>, cards: Option<PathBuf>) -> Result<()> {
    let cards_path = cards.or_else(|| config.cards_path());

    // Load theme from config
    let theme = Theme::from_overrides(&config.ui.theme);

    // Create app state
    let mut app = App::new(config.clone(), theme)?;

    // Create channel for async card loading results
    let (card_tx, mut card_rx) = mpsc::unbounded_channel::<CardLoadResult>();
    app.cards_loading = true;
    spawn_card_load(cards_path.clone(), card_tx.clone());

    let event_handler = EventHandler::with_frame_rate(config.ui.tick_rate_ms, config.ui.frame_rate);

    // Setup terminal; restored when the guard drops
    let mut terminal = TerminalGuard::enter("Carousel")?;
    info!(cards = ?cards_path, "carousel started");

    // Main loop
    loop {
        // Swap in any finished card loads (non-blocking)
        while let Ok(result) = card_rx.try_recv() {
            handle_card_result(&mut app, result);
        }

        let now = app.now_ms();
        app.on_frame(now);

        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        // Poll at the frame rate only while something moves
        let event = if app.needs_frame() {
            event_handler.next_frame()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            let now = app.now_ms();
            match event {
                AppEvent::Key(key) => match handle_key_event(key) {
                    Action::ReloadCards => {
                        app.cards_loading = true;
                        app.set_status("Reloading cards...");
                        spawn_card_load(cards_path.clone(), card_tx.clone());
                    }
                    action => app.handle_action(action, now),
                },
                AppEvent::Mouse(mouse) => app.handle_mouse(mouse, now),
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    drop(terminal);
    info!("carousel stopped");
    Ok(())
}

/// Handle a finished card load
fn handle_card_result(app: &mut App, result: CardLoadResult) {
    app.cards_loading = false;
    let now = app.now_ms();

    match result {
        CardLoadResult::Success { cards, source } => {
            let count = cards.len();
            app.set_cards(cards, now);
            match source {
                Some(path) => app.set_status(format!("Loaded {} cards from {}", count, path.display())),
                None => app.set_status(format!("Showing {} demo cards", count)),
            }
        }
        CardLoadResult::Failure { error } => {
            warn!(%error, "card load failed");
            if app.engine.items().is_empty() {
                app.set_cards(CardDeck::demo().cards, now);
            }
            app.set_status(format!("Card load failed: {}", error));
        }
    }
}

/// Read the deck at `path`. No path, a missing file or an empty deck gives
/// the demo deck (with `None` as the source).
async fn load_cards(path: Option<&Path>) -> Result<(Vec<Card>, Option<PathBuf>)> {
    let Some(path) = path else {
        return Ok((CardDeck::demo().cards, None));
    };

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "card deck not found, using demo deck");
            return Ok((CardDeck::demo().cards, None));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };

    let deck = CardDeck::parse(&content)?;
    if deck.cards.is_empty() {
        return Ok((CardDeck::demo().cards, None));
    }
    Ok((deck.cards, Some(path.to_path_buf())))
}

/// Spawn an async task that loads the deck and reports back over `tx`
fn spawn_card_load(path: Option<PathBuf>, tx: mpsc::UnboundedSender<CardLoadResult>) {
    tokio::spawn(async move {
        let result = match load_cards(path.as_deref()).await {
            Ok((cards, source)) => CardLoadResult::Success { cards, source },
            Err(e) => CardLoadResult::Failure {
                error: format!("{:#}", e),
            },
        };
        // Receiver is gone once the app has quit
        let _ = tx.send(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_deck(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "carousel-cards-{}-{}.toml",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_load_cards_from_file() {
        let path = temp_deck(
            "file",
            "[[cards]]\ntitle = \"One\"\n\n[[cards]]\ntitle = \"Two\"\nsubtitle = \"second\"\n",
        );
        let (cards, source) = load_cards(Some(path.as_path())).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[1].subtitle.as_deref(), Some("second"));
        assert_eq!(source.as_deref(), Some(path.as_path()));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_or_empty_deck_uses_demo() {
        let missing = std::env::temp_dir().join("carousel-cards-does-not-exist.toml");
        let (cards, source) = load_cards(Some(missing.as_path())).await.unwrap();
        assert_eq!(cards, CardDeck::demo().cards);
        assert!(source.is_none());

        let (cards, source) = load_cards(None).await.unwrap();
        assert_eq!(cards, CardDeck::demo().cards);
        assert!(source.is_none());

        let empty = temp_deck("empty", "");
        let (cards, _) = load_cards(Some(empty.as_path())).await.unwrap();
        assert_eq!(cards, CardDeck::demo().cards);
        std::fs::remove_file(&empty).unwrap();
    }

    #[tokio::test]
    async fn test_spawned_load_reports_failure() {
        let broken = temp_deck("broken", "[[cards]]\ntitle = 3\n");
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_card_load(Some(broken.clone()), tx);

        match rx.recv().await {
            Some(CardLoadResult::Failure { error }) => assert!(error.contains("card deck")),
            _ => panic!("expected a failure result"),
        }
        std::fs::remove_file(&broken).unwrap();
    }

    #[test]
    fn test_failed_first_load_falls_back_to_demo() {
        let mut app = App::new(Arc::new(AppConfig::default()), Theme::default()).unwrap();
        handle_card_result(
            &mut app,
            CardLoadResult::Failure {
                error: "boom".to_string(),
            },
        );
        assert_eq!(app.engine.items().len(), CardDeck::demo().cards.len());
        assert!(!app.cards_loading);
        assert_eq!(app.status_message.as_deref(), Some("Card load failed: boom"));
    }
}
