pub mod config;
pub mod engine;
pub mod error;
pub mod script;

pub use config::{AppConfig, CarouselConfig, Direction, UiConfig};
pub use engine::CarouselEngine;
pub use error::{Error, Result};
