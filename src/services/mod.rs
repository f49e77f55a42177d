// Service module exports

pub mod board;
pub mod layout;
pub mod settings;
pub mod sheet;
pub mod sync;
pub mod time_grid;
