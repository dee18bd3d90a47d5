pub mod app;
pub mod card;
pub mod event;
pub mod input;
pub mod terminal;
pub mod theme;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use card::{Card, CardDeck};
pub use terminal::TerminalGuard;
pub use theme::Theme;
