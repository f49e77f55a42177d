// Module exports for models

pub mod person;
pub mod schedule;
pub mod settings;
