// Test fixtures - reusable test data
// An in-memory sheet that serves rows and applies sync requests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use schedule_board::models::schedule::{Schedule, ScheduleId, TimeOfDay};
use schedule_board::services::board::BoardController;
use schedule_board::services::sheet::{RawScheduleRow, ScheduleSource};
use schedule_board::services::sync::{MutationSink, SchedulePayload, SyncRequest};

pub const WAIT: Duration = Duration::from_secs(5);

pub fn t(value: &str) -> TimeOfDay {
    value.parse().expect("valid time")
}

pub fn schedule(id: u64, name: &str, start: &str, end: &str) -> Schedule {
    Schedule::new(ScheduleId(id), name, "1.14", t(start), t(end)).expect("valid schedule")
}

pub fn seed_rows() -> Vec<RawScheduleRow> {
    vec![
        RawScheduleRow::new("Jinyo", "1.14", "10:00", "11:00", "Meeting"),
        RawScheduleRow::new("Jinyo", "1.14", "10:30", "11:45", "Brunch"),
        RawScheduleRow::new("Friend A", "1.14", "18:15", "22:30", "Gaming"),
        RawScheduleRow::new("Friend B", "1.15", "12:00", "16:00", "Study"),
    ]
}

fn payload_row(payload: &SchedulePayload) -> RawScheduleRow {
    RawScheduleRow::new(
        &payload.name,
        &payload.date,
        &payload.start.to_string(),
        &payload.end.to_string(),
        &payload.reason,
    )
}

fn matches(row: &RawScheduleRow, payload: &SchedulePayload) -> bool {
    row.name.as_deref() == Some(payload.name.as_str())
        && row.date.as_deref() == Some(payload.date.as_str())
        && row.start.as_deref() == Some(payload.start.to_string().as_str())
        && row.end.as_deref() == Some(payload.end.to_string().as_str())
}

/// Serves rows like the published export and applies writes like the web
/// app, locating edited rows by their original values.
#[derive(Default)]
pub struct FakeSheet {
    rows: Mutex<Vec<RawScheduleRow>>,
    requests: Mutex<Vec<SyncRequest>>,
    reject_writes: AtomicBool,
}

impl FakeSheet {
    pub fn with_rows(rows: Vec<RawScheduleRow>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            ..Self::default()
        })
    }

    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<SyncRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().expect("rows lock").len()
    }

    /// `name date start-end` for every stored row, sorted.
    pub fn summary(&self) -> Vec<String> {
        let mut summary: Vec<String> = self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .map(|row| {
                format!(
                    "{} {} {}-{}",
                    row.name.as_deref().unwrap_or_default(),
                    row.date.as_deref().unwrap_or_default(),
                    row.start.as_deref().unwrap_or_default(),
                    row.end.as_deref().unwrap_or_default()
                )
            })
            .collect();
        summary.sort();
        summary
    }
}

impl ScheduleSource for FakeSheet {
    fn fetch_rows(&self) -> Result<Vec<RawScheduleRow>> {
        Ok(self.rows.lock().map_err(|_| anyhow!("poisoned"))?.clone())
    }

    fn describe(&self) -> String {
        "in-memory sheet".to_string()
    }
}

impl MutationSink for FakeSheet {
    fn submit(&self, request: &SyncRequest) -> Result<()> {
        self.requests
            .lock()
            .map_err(|_| anyhow!("poisoned"))?
            .push(request.clone());
        if self.reject_writes.load(Ordering::SeqCst) {
            bail!("sheet is read-only");
        }

        let mut rows = self.rows.lock().map_err(|_| anyhow!("poisoned"))?;
        match request {
            SyncRequest::Create { data } => rows.push(payload_row(data)),
            SyncRequest::Edit { original, updated } => {
                let row = rows
                    .iter_mut()
                    .find(|row| matches(row, original))
                    .ok_or_else(|| anyhow!("row not found"))?;
                *row = payload_row(updated);
            }
            SyncRequest::Delete { original } => {
                let index = rows
                    .iter()
                    .position(|row| matches(row, original))
                    .ok_or_else(|| anyhow!("row not found"))?;
                rows.remove(index);
            }
        }
        Ok(())
    }
}

/// Controller over `sheet`, showing `1.14`, with the first load applied.
pub fn loaded_board(sheet: &Arc<FakeSheet>) -> BoardController {
    let mut board = BoardController::new(sheet.clone(), sheet.clone(), "1.14");
    board.reload();
    let outcome = board.settle(WAIT);
    assert!(outcome.reloaded, "initial load should apply");
    board
}

pub fn find<'a>(board: &'a BoardController, name: &str, start: &str) -> &'a Schedule {
    board
        .schedules()
        .iter()
        .find(|s| s.name == name && s.start == t(start))
        .unwrap_or_else(|| panic!("no {} block at {}", name, start))
}
