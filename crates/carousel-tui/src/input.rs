use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Space: hold or release autoplay
    TogglePause,
    /// Flip the autoplay direction
    Reverse,
    SpeedUp,
    SpeedDown,
    /// Re-read the card deck file
    ReloadCards,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Quit,

        (KeyCode::Char(' '), _) => Action::TogglePause,
        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Reverse,
        (KeyCode::Char('R'), _) => Action::ReloadCards,

        // '+' arrives with SHIFT on most layouts
        (KeyCode::Char('+'), _) | (KeyCode::Char('='), KeyModifiers::NONE) => Action::SpeedUp,
        (KeyCode::Char('-'), _) => Action::SpeedDown,

        _ => Action::None,
    }
}
