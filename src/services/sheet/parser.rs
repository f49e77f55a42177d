use std::collections::BTreeSet;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::schedule::{Schedule, ScheduleId, TimeOfDay};

use super::ScheduleSnapshot;

/// One sheet row as exported. Every column is optional because the sheet is
/// edited by hand; incomplete rows are dropped, not treated as errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScheduleRow {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl RawScheduleRow {
    pub fn new(name: &str, date: &str, start: &str, end: &str, reason: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            date: Some(date.to_string()),
            start: Some(start.to_string()),
            end: Some(end.to_string()),
            reason: Some(reason.to_string()),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Convert one row, or `None` when a required field is missing or unusable.
fn row_to_schedule(row: &RawScheduleRow, id: ScheduleId) -> Option<Schedule> {
    let name = non_empty(&row.name)?;
    let date = non_empty(&row.date)?;
    let start: TimeOfDay = non_empty(&row.start)?.parse().ok()?;
    let end: TimeOfDay = non_empty(&row.end)?.parse().ok()?;

    let schedule = Schedule::new(id, name, date, start, end).ok()?;
    Some(match non_empty(&row.reason) {
        Some(reason) => schedule.with_reason(reason),
        None => schedule,
    })
}

/// Build a snapshot from raw rows, assigning ids from `next_id` upward.
///
/// Known people are collected from every row with a name, including rows
/// dropped for other missing fields.
pub fn parse_rows(rows: &[RawScheduleRow], next_id: &mut u64) -> ScheduleSnapshot {
    let mut schedules = Vec::with_capacity(rows.len());
    let mut people = BTreeSet::new();
    let mut dropped = 0usize;

    for row in rows {
        if let Some(name) = non_empty(&row.name) {
            people.insert(name.to_string());
        }

        match row_to_schedule(row, ScheduleId(*next_id)) {
            Some(schedule) => {
                *next_id += 1;
                schedules.push(schedule);
            }
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        log::debug!("Dropped {} incomplete schedule rows", dropped);
    }

    ScheduleSnapshot {
        schedules,
        people: people.into_iter().collect(),
    }
}

/// Read the rows of a CSV export with a header row (`name,date,start,end,reason`).
/// Header names are matched case-insensitively.
pub fn read_csv_rows(content: &str) -> Result<Vec<RawScheduleRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .context("Schedule CSV has no header row")?
        .clone();
    let lowered = csv::StringRecord::from(
        headers
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect::<Vec<_>>(),
    );
    reader.set_headers(lowered);

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<RawScheduleRow>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => log::warn!("Skipping unreadable CSV row {}: {}", index + 2, err),
        }
    }

    Ok(rows)
}

pub fn parse_csv(content: &str, next_id: &mut u64) -> Result<ScheduleSnapshot> {
    let rows = read_csv_rows(content)?;
    Ok(parse_rows(&rows, next_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_csv_builds_schedules() {
        let csv = "name,date,start,end,reason\n\
                   Jinyo,1.14,10:00,11:00,Meeting\n\
                   Friend A,1.14,18:15,22:30,\n";
        let mut next_id = 1;
        let snapshot = parse_csv(csv, &mut next_id).unwrap();

        assert_eq!(snapshot.schedules.len(), 2);
        assert_eq!(next_id, 3);
        let first = &snapshot.schedules[0];
        assert_eq!(first.id, ScheduleId(1));
        assert_eq!(first.start_minutes(), 600);
        assert_eq!(first.end_minutes(), 660);
        assert_eq!(first.reason.as_deref(), Some("Meeting"));
        assert_eq!(snapshot.schedules[1].reason, None);
        assert_eq!(snapshot.people, vec!["Friend A", "Jinyo"]);
    }

    #[test]
    fn test_rows_missing_required_fields_are_dropped() {
        let csv = "name,date,start,end,reason\n\
                   Jinyo,1.14,10:00,11:00,ok\n\
                   Mia,,10:00,11:00,no date\n\
                   ,1.14,10:00,11:00,no name\n\
                   Bob,1.14,10:00,,no end\n";
        let mut next_id = 1;
        let snapshot = parse_csv(csv, &mut next_id).unwrap();

        assert_eq!(snapshot.schedules.len(), 1);
        assert_eq!(snapshot.schedules[0].name, "Jinyo");
        // Names still count as known people even when their row is dropped.
        assert_eq!(snapshot.people, vec!["Bob", "Jinyo", "Mia"]);
    }

    #[test]
    fn test_header_case_and_padding_ignored() {
        let csv = " Name , Date ,Start,END,Reason\n  Jinyo , 1.15 , 9:00 , 12:00 , Gym \n";
        let mut next_id = 10;
        let snapshot = parse_csv(csv, &mut next_id).unwrap();
        let row = &snapshot.schedules[0];
        assert_eq!(row.id, ScheduleId(10));
        assert_eq!(row.name, "Jinyo");
        assert_eq!(row.date, "1.15");
        assert_eq!(row.start.to_string(), "09:00");
        assert_eq!(row.reason.as_deref(), Some("Gym"));
    }

    #[test]
    fn test_inverted_or_garbled_times_dropped() {
        let rows = vec![
            RawScheduleRow::new("Jinyo", "1.14", "12:00", "11:00", ""),
            RawScheduleRow::new("Jinyo", "1.14", "noon", "13:00", ""),
        ];
        let mut next_id = 1;
        let snapshot = parse_rows(&rows, &mut next_id);
        assert!(snapshot.schedules.is_empty());
        assert_eq!(next_id, 1);
    }

    #[test]
    fn test_missing_reason_column_is_fine() {
        let csv = "name,date,start,end\nJinyo,1.14,10:00,11:00\n";
        let mut next_id = 1;
        let snapshot = parse_csv(csv, &mut next_id).unwrap();
        assert_eq!(snapshot.schedules.len(), 1);
        assert_eq!(snapshot.schedules[0].reason, None);
    }
}
