//! The board's authoritative schedule list.
//!
//! Changes are applied locally first and then pushed to the sync endpoint on
//! a background thread. A failed push undoes the local change and reloads
//! the list from the data source. Results are picked up by [`BoardController::poll`],
//! which the UI calls every frame.

mod jobs;

pub use jobs::{JobId, JobOutput, JobRunner};

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::models::person::derive_columns;
use crate::models::schedule::{Schedule, ScheduleError, ScheduleId, TimeOfDay};
use crate::models::settings::SourceSettings;
use crate::services::sheet::{parse_rows, source_from_settings, RawScheduleRow, ScheduleSource};
use crate::services::sync::{sink_from_settings, MutationSink, SyncKind, SyncRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardNotice {
    pub level: NoticeLevel,
    pub message: String,
}

impl BoardNotice {
    fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Values collected by the details form before a block is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationDraft {
    pub person: String,
    pub date: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub reason: String,
}

impl CreationDraft {
    pub fn new(person: impl Into<String>, date: impl Into<String>, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            person: person.into(),
            date: date.into(),
            start,
            end,
            reason: String::new(),
        }
    }

    pub fn to_schedule(&self, id: ScheduleId) -> Result<Schedule, ScheduleError> {
        Ok(Schedule::new(id, &self.person, &self.date, self.start, self.end)?.with_reason(&self.reason))
    }
}

/// What happened during one drain of finished jobs.
#[derive(Debug, Default)]
pub struct PollOutcome {
    pub notices: Vec<BoardNotice>,
    /// The list was replaced by a fresh load. Blocks whose row is unchanged
    /// keep their id; blocks that vanished from the sheet are gone.
    pub reloaded: bool,
}

impl PollOutcome {
    fn merge(&mut self, other: PollOutcome) {
        self.notices.extend(other.notices);
        self.reloaded |= other.reloaded;
    }
}

/// How to undo an optimistic change.
#[derive(Debug, Clone)]
enum Rollback {
    Restore(Schedule),
    Reinsert(Schedule),
    Remove(ScheduleId),
}

#[derive(Debug)]
struct PendingSync {
    kind: SyncKind,
    rollback: Rollback,
}

pub struct BoardController {
    source: Arc<dyn ScheduleSource>,
    sink: Arc<dyn MutationSink>,
    schedules: Vec<Schedule>,
    people: Vec<String>,
    date: String,
    next_id: u64,
    jobs: JobRunner,
    pending_loads: HashSet<JobId>,
    applied_load: JobId,
    pending_syncs: HashMap<JobId, PendingSync>,
    /// A load finished while changes were still in flight.
    reload_deferred: bool,
    queued_notices: Vec<BoardNotice>,
}

type RowKey = (String, String, TimeOfDay, TimeOfDay, Option<String>);

fn row_key(schedule: &Schedule) -> RowKey {
    (
        schedule.name.clone(),
        schedule.date.clone(),
        schedule.start,
        schedule.end,
        schedule.reason.clone(),
    )
}

impl BoardController {
    pub fn new(
        source: Arc<dyn ScheduleSource>,
        sink: Arc<dyn MutationSink>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            source,
            sink,
            schedules: Vec::new(),
            people: Vec::new(),
            date: date.into(),
            next_id: 1,
            jobs: JobRunner::new(),
            pending_loads: HashSet::new(),
            applied_load: 0,
            pending_syncs: HashMap::new(),
            reload_deferred: false,
            queued_notices: Vec::new(),
        }
    }

    pub fn from_settings(settings: &SourceSettings) -> Result<Self> {
        Ok(Self::new(
            source_from_settings(settings)?,
            sink_from_settings(settings)?,
            settings.initial_date(),
        ))
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.date = date.into();
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn visible_schedules(&self) -> impl Iterator<Item = &Schedule> {
        self.schedules.iter().filter(move |s| s.date == self.date)
    }

    pub fn people(&self) -> &[String] {
        &self.people
    }

    /// Columns for the visible date, official schedule first.
    pub fn columns(&self) -> Vec<String> {
        derive_columns(&self.people, self.visible_schedules())
    }

    /// Distinct day keys present in the data.
    pub fn known_dates(&self) -> Vec<String> {
        self.schedules
            .iter()
            .map(|s| s.date.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find(&self, id: ScheduleId) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    pub fn is_loading(&self) -> bool {
        !self.pending_loads.is_empty()
    }

    pub fn is_syncing(&self) -> bool {
        !self.pending_syncs.is_empty()
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch the authoritative list in the background.
    pub fn reload(&mut self) {
        log::info!("Loading schedules from {}", self.source.describe());
        let source = Arc::clone(&self.source);
        let id = self.jobs.spawn(move || JobOutput::Loaded(source.fetch_rows()));
        self.pending_loads.insert(id);
    }

    /// Add a block from a completed details form.
    pub fn create(&mut self, draft: &CreationDraft) -> Result<ScheduleId, ScheduleError> {
        let id = ScheduleId(self.next_id);
        let schedule = draft.to_schedule(id)?;
        self.next_id += 1;

        let request = SyncRequest::create(&schedule);
        self.schedules.push(schedule);
        self.submit(request, Rollback::Remove(id));
        Ok(id)
    }

    /// Replace a block after a move, resize or edit. Returns false when the
    /// block is gone or nothing changed.
    pub fn update(&mut self, original: &Schedule, updated: Schedule) -> bool {
        let Some(index) = self.index_of(original.id) else {
            log::warn!("Ignoring update of unknown schedule {}", original.id);
            self.report_vanished();
            return false;
        };
        if let Err(err) = updated.validate() {
            log::warn!("Ignoring invalid update of {}: {}", original.id, err);
            return false;
        }

        let previous = self.schedules[index].clone();
        let updated = Schedule {
            id: previous.id,
            ..updated
        };
        if updated == previous {
            return false;
        }

        let request = SyncRequest::edit(&previous, &updated);
        self.schedules[index] = updated;
        self.submit(request, Rollback::Restore(previous));
        true
    }

    pub fn delete(&mut self, original: &Schedule) -> bool {
        let Some(index) = self.index_of(original.id) else {
            log::warn!("Ignoring delete of unknown schedule {}", original.id);
            self.report_vanished();
            return false;
        };

        let removed = self.schedules.remove(index);
        let request = SyncRequest::delete(&removed);
        self.submit(request, Rollback::Reinsert(removed));
        true
    }

    /// Apply every finished background job.
    pub fn poll(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome {
            notices: std::mem::take(&mut self.queued_notices),
            reloaded: false,
        };
        while let Some((id, output)) = self.jobs.try_next() {
            outcome.merge(self.finish_job(id, output));
        }
        outcome
    }

    /// Block until all background work, including reloads it triggers, has
    /// finished or the timeout passes.
    pub fn settle(&mut self, timeout: Duration) -> PollOutcome {
        let deadline = Instant::now() + timeout;
        let mut outcome = self.poll();

        while self.jobs.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                log::warn!("{} board jobs still running", self.jobs.in_flight());
                break;
            }
            match self.jobs.wait_next(remaining) {
                Some((id, output)) => outcome.merge(self.finish_job(id, output)),
                None => break,
            }
        }
        outcome
    }

    /// The block a change targeted was replaced or removed by a reload.
    fn report_vanished(&mut self) {
        self.queued_notices.push(BoardNotice::error(
            "That schedule changed on the sheet; showing the latest version",
        ));
        self.reload();
    }

    fn index_of(&self, id: ScheduleId) -> Option<usize> {
        self.schedules.iter().position(|s| s.id == id)
    }

    fn submit(&mut self, request: SyncRequest, rollback: Rollback) {
        let kind = request.kind();
        let sink = Arc::clone(&self.sink);
        let id = self
            .jobs
            .spawn(move || JobOutput::Synced(sink.submit(&request)));
        self.pending_syncs.insert(id, PendingSync { kind, rollback });
    }

    fn finish_job(&mut self, id: JobId, output: JobOutput) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        match output {
            JobOutput::Loaded(result) => {
                self.pending_loads.remove(&id);
                match result {
                    Ok(_) if id > self.applied_load && self.is_syncing() => {
                        log::debug!("Deferring load {} until pending changes finish", id);
                        self.reload_deferred = true;
                    }
                    Ok(rows) if id > self.applied_load => {
                        self.applied_load = id;
                        self.replace_with(&rows);
                        outcome.reloaded = true;
                    }
                    Ok(_) => log::debug!("Discarding stale load {}", id),
                    Err(err) => {
                        log::warn!("Schedule load failed: {:#}", err);
                        outcome
                            .notices
                            .push(BoardNotice::error(format!("Could not load schedules: {}", err)));
                    }
                }
            }
            JobOutput::Synced(result) => {
                let Some(pending) = self.pending_syncs.remove(&id) else {
                    return outcome;
                };
                let mut needs_reload = false;
                match result {
                    Ok(()) => {
                        log::info!("Schedule {} synced", pending.kind);
                        match pending.kind {
                            SyncKind::Create => {
                                outcome.notices.push(BoardNotice::success("Schedule added"));
                                needs_reload = true;
                            }
                            SyncKind::Delete => {
                                outcome.notices.push(BoardNotice::info("Schedule deleted"));
                            }
                            SyncKind::Edit => {}
                        }
                    }
                    Err(err) => {
                        log::warn!("Schedule {} failed, rolling back: {:#}", pending.kind, err);
                        self.undo(pending.rollback);
                        outcome.notices.push(BoardNotice::error(format!(
                            "Could not {} schedule: {}",
                            pending.kind, err
                        )));
                        needs_reload = true;
                    }
                }
                if !self.is_syncing() && self.reload_deferred {
                    self.reload_deferred = false;
                    needs_reload = true;
                }
                if needs_reload {
                    self.reload();
                }
            }
        }
        outcome
    }

    fn replace_with(&mut self, rows: &[RawScheduleRow]) {
        let mut snapshot = parse_rows(rows, &mut self.next_id);
        self.adopt_ids(&mut snapshot.schedules);
        log::info!(
            "Loaded {} schedules for {} people",
            snapshot.schedules.len(),
            snapshot.people.len()
        );
        self.schedules = snapshot.schedules;
        self.people = snapshot.people;
    }

    /// Give reloaded rows that match a current block that block's id, so
    /// gestures and dialogs opened before the load still find their target.
    fn adopt_ids(&self, fresh: &mut [Schedule]) {
        let mut current: HashMap<RowKey, Vec<ScheduleId>> = HashMap::new();
        for schedule in self.schedules.iter().rev() {
            current.entry(row_key(schedule)).or_default().push(schedule.id);
        }
        for schedule in fresh.iter_mut() {
            if let Some(id) = current.get_mut(&row_key(schedule)).and_then(Vec::pop) {
                schedule.id = id;
            }
        }
    }

    fn undo(&mut self, rollback: Rollback) {
        match rollback {
            Rollback::Restore(previous) => {
                if let Some(index) = self.index_of(previous.id) {
                    self.schedules[index] = previous;
                }
            }
            Rollback::Reinsert(removed) => {
                if self.index_of(removed.id).is_none() {
                    self.schedules.push(removed);
                }
            }
            Rollback::Remove(id) => self.schedules.retain(|s| s.id != id),
        }
    }
}
