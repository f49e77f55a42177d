// Schedule data source
// Loads schedule rows from a shared spreadsheet's CSV export

mod fetcher;
mod parser;

pub use fetcher::SheetFetcher;
pub use parser::{parse_csv, parse_rows, read_csv_rows, RawScheduleRow};

use std::sync::Arc;

use anyhow::Result;

use crate::models::schedule::Schedule;
use crate::models::settings::SourceSettings;

/// Authoritative board contents after one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleSnapshot {
    pub schedules: Vec<Schedule>,
    /// Sorted distinct names found anywhere in the source.
    pub people: Vec<String>,
}

/// Supplies raw schedule rows. Implementations may block; callers run
/// them off the UI thread.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleSource: Send + Sync {
    fn fetch_rows(&self) -> Result<Vec<RawScheduleRow>>;

    /// Short, loggable description that does not leak the sheet id.
    fn describe(&self) -> String;
}

/// Built-in rows used when no sheet is configured.
pub struct DemoSource;

impl ScheduleSource for DemoSource {
    fn fetch_rows(&self) -> Result<Vec<RawScheduleRow>> {
        Ok(vec![
            RawScheduleRow::new("Jinyo", "1.14", "10:00", "11:00", "Meeting"),
            RawScheduleRow::new("Jinyo", "1.14", "10:30", "11:45", "Brunch"),
            RawScheduleRow::new("Friend A", "1.14", "18:15", "22:30", "Gaming"),
            RawScheduleRow::new("Friend B", "1.15", "12:00", "16:00", "Study"),
            RawScheduleRow::new("Friend C", "1.14", "09:00", "11:00", "Gym"),
        ])
    }

    fn describe(&self) -> String {
        "built-in demo rows".to_string()
    }
}

/// Pick the data source described by the settings.
pub fn source_from_settings(settings: &SourceSettings) -> Result<Arc<dyn ScheduleSource>> {
    match settings.resolved_csv_url() {
        Some(url) => Ok(Arc::new(SheetFetcher::new(&url)?)),
        None => {
            log::warn!("No sheet configured, using demo schedule rows");
            Ok(Arc::new(DemoSource))
        }
    }
}
