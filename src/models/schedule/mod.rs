// Schedule module
// A time-blocked entry owned by one person on one day

mod time_of_day;

pub use time_of_day::{TimeOfDay, TimeParseError, MINUTES_PER_DAY};

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Locally unique identity for a schedule block.
///
/// Ids are synthetic: the backing sheet has no id column, so they are
/// assigned when rows are loaded and whenever a block is created locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScheduleId(pub u64);

impl fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("schedule owner name cannot be empty")]
    EmptyName,
    #[error("schedule date cannot be empty")]
    EmptyDate,
    #[error("schedule must end after it starts ({start}-{end})")]
    InvertedRange { start: TimeOfDay, end: TimeOfDay },
}

/// A scheduled block on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub id: ScheduleId,
    /// Owner; identifies the board column.
    pub name: String,
    /// Day key as it appears in the sheet, e.g. `1.14`.
    pub date: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub reason: Option<String>,
}

impl Schedule {
    /// Create a validated schedule block.
    ///
    /// # Examples
    /// ```
    /// use schedule_board::models::schedule::{Schedule, ScheduleId, TimeOfDay};
    ///
    /// let start = TimeOfDay::from_hm(10, 0).unwrap();
    /// let end = TimeOfDay::from_hm(11, 0).unwrap();
    /// let block = Schedule::new(ScheduleId(1), "Jinyo", "1.14", start, end).unwrap();
    /// assert_eq!(block.duration_minutes(), 60);
    /// ```
    pub fn new(
        id: ScheduleId,
        name: impl Into<String>,
        date: impl Into<String>,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, ScheduleError> {
        let schedule = Self {
            id,
            name: name.into().trim().to_string(),
            date: date.into().trim().to_string(),
            start,
            end,
            reason: None,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let trimmed = reason.trim();
        self.reason = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.name.trim().is_empty() {
            return Err(ScheduleError::EmptyName);
        }
        if self.date.trim().is_empty() {
            return Err(ScheduleError::EmptyDate);
        }
        if self.end <= self.start {
            return Err(ScheduleError::InvertedRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn start_minutes(&self) -> u16 {
        self.start.minutes()
    }

    pub fn end_minutes(&self) -> u16 {
        self.end.minutes()
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.minutes().saturating_sub(self.start.minutes())
    }

    /// Copy of this block with a new owner and time range, same identity.
    pub fn moved_to(&self, name: &str, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            name: name.to_string(),
            start,
            end,
            ..self.clone()
        }
    }

    /// Label shown inside the block, e.g. `10:00-11:00`.
    pub fn time_label(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}
