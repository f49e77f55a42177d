//! Background work for the board.
//!
//! Each job runs on its own thread and reports back through one shared
//! channel, which the UI thread drains once per frame.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::Result;

use crate::services::sheet::RawScheduleRow;

pub type JobId = u64;

pub enum JobOutput {
    Loaded(Result<Vec<RawScheduleRow>>),
    Synced(Result<()>),
}

pub struct JobRunner {
    tx: Sender<(JobId, JobOutput)>,
    rx: Receiver<(JobId, JobOutput)>,
    next_id: JobId,
    in_flight: usize,
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRunner {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            next_id: 1,
            in_flight: 0,
        }
    }

    pub fn spawn<F>(&mut self, job: F) -> JobId
    where
        F: FnOnce() -> JobOutput + Send + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight += 1;

        let tx = self.tx.clone();
        thread::spawn(move || {
            // The receiver only goes away with the board itself.
            let _ = tx.send((id, job()));
        });
        id
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn try_next(&mut self) -> Option<(JobId, JobOutput)> {
        match self.rx.try_recv() {
            Ok(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Board job channel disconnected");
                None
            }
        }
    }

    /// Block until the next job finishes or the timeout passes.
    pub fn wait_next(&mut self, timeout: Duration) -> Option<(JobId, JobOutput)> {
        if self.in_flight == 0 {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(result) => {
                self.in_flight = self.in_flight.saturating_sub(1);
                Some(result)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
