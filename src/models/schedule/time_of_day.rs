// Wall-clock time of day
// Minutes since midnight, rendered as `HH:MM`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Minutes in a full day. `24:00` is a valid end-of-day time.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("time '{0}' is not in HH:MM format")]
    Format(String),
    #[error("time '{0}' is outside 00:00-24:00")]
    OutOfRange(String),
}

/// A time of day between `00:00` and `24:00` inclusive.
///
/// The minute count is the only stored representation, so the `HH:MM`
/// string produced by `Display` can never drift from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);
    pub const END_OF_DAY: TimeOfDay = TimeOfDay(MINUTES_PER_DAY);

    /// Build from minutes since midnight. Returns `None` past `24:00`.
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes <= MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Build from minutes, clamping into `00:00..=24:00`.
    pub fn clamped(minutes: i64) -> Self {
        Self(minutes.clamp(0, MINUTES_PER_DAY as i64) as u16)
    }

    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if minute >= 60 {
            return None;
        }
        Self::from_minutes(hour.checked_mul(60)?.checked_add(minute)?)
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Shift by a signed number of minutes, `None` if the result leaves the day.
    pub fn checked_add_minutes(self, delta: i64) -> Option<Self> {
        let shifted = self.0 as i64 + delta;
        if (0..=MINUTES_PER_DAY as i64).contains(&shifted) {
            Some(Self(shifted as u16))
        } else {
            None
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| TimeParseError::Format(trimmed.to_string()))?;

        // Sheets sometimes export seconds ("09:30:00"); only hours and minutes matter.
        let m = m.split(':').next().unwrap_or(m);

        let hour: u16 = h
            .trim()
            .parse()
            .map_err(|_| TimeParseError::Format(trimmed.to_string()))?;
        let minute: u16 = m
            .trim()
            .parse()
            .map_err(|_| TimeParseError::Format(trimmed.to_string()))?;

        Self::from_hm(hour, minute).ok_or_else(|| TimeParseError::OutOfRange(trimmed.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
