mod app;
pub mod creation_dialog;
pub mod drag;
pub mod interaction;
pub mod resize;
pub mod views;

pub use app::{day_label, merge_dates, BoardApp};
