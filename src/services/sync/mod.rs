// Mutation sync
// Pushes create/edit/delete requests to the sheet's web app endpoint

mod client;

pub use client::AppsScriptClient;

use std::fmt;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::models::schedule::{Schedule, TimeOfDay};
use crate::models::settings::SourceSettings;

/// Row values sent to the remote store. The store has no ids, so edits and
/// deletes locate their row by the original values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    pub name: String,
    pub date: String,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub reason: String,
}

impl From<&Schedule> for SchedulePayload {
    fn from(schedule: &Schedule) -> Self {
        Self {
            name: schedule.name.clone(),
            date: schedule.date.clone(),
            start: schedule.start,
            end: schedule.end,
            start_time: schedule.start,
            end_time: schedule.end,
            reason: schedule.reason.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    Create,
    Edit,
    Delete,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncKind::Create => "create",
            SyncKind::Edit => "edit",
            SyncKind::Delete => "delete",
        })
    }
}

/// Request body understood by the sheet's web app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum SyncRequest {
    Create {
        data: SchedulePayload,
    },
    Edit {
        original: SchedulePayload,
        #[serde(rename = "new")]
        updated: SchedulePayload,
    },
    Delete {
        original: SchedulePayload,
    },
}

impl SyncRequest {
    pub fn create(schedule: &Schedule) -> Self {
        Self::Create {
            data: schedule.into(),
        }
    }

    pub fn edit(original: &Schedule, updated: &Schedule) -> Self {
        Self::Edit {
            original: original.into(),
            updated: updated.into(),
        }
    }

    pub fn delete(original: &Schedule) -> Self {
        Self::Delete {
            original: original.into(),
        }
    }

    pub fn kind(&self) -> SyncKind {
        match self {
            SyncRequest::Create { .. } => SyncKind::Create,
            SyncRequest::Edit { .. } => SyncKind::Edit,
            SyncRequest::Delete { .. } => SyncKind::Delete,
        }
    }
}

/// Persists mutations remotely. Best effort: `Ok` only means nothing failed
/// visibly. Implementations may block; callers run them off the UI thread.
#[cfg_attr(test, mockall::automock)]
pub trait MutationSink: Send + Sync {
    fn submit(&self, request: &SyncRequest) -> Result<()>;
}

/// Sink used when no endpoint is configured. Every mutation fails, so the
/// board rolls back to the authoritative data.
pub struct DisabledSink;

impl MutationSink for DisabledSink {
    fn submit(&self, request: &SyncRequest) -> Result<()> {
        Err(anyhow!(
            "Cannot {} schedule: no sync endpoint is configured",
            request.kind()
        ))
    }
}

pub fn sink_from_settings(settings: &SourceSettings) -> Result<Arc<dyn MutationSink>> {
    match settings
        .sync_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
    {
        Some(url) => Ok(Arc::new(AppsScriptClient::new(url)?)),
        None => {
            log::warn!("No sync endpoint configured, edits will not be saved");
            Ok(Arc::new(DisabledSink))
        }
    }
}
