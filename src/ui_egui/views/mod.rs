pub mod board_view;
mod palette;

pub use board_view::{BoardInputState, BoardView};
