mod carousel;
mod status_bar;

pub use carousel::{visible_slots, CardSlot, CarouselWidget};
pub use status_bar::StatusBarWidget;
