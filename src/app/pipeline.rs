//! Shared fetch pipeline used by both the CLI and TUI front-ends.
//!
//! Workflow: resolve inputs (read CSV file) -> fetch/parse -> fallback ->
//! replace the session state.
//!
//! `DashboardState` is the one place the current dataset lives. It is owned by
//! whichever front-end is running and only ever replaced wholesale.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::data::ingest::read_csv_file;
use crate::data::{FetchOutcome, FetchParams, default_dataset, fetch_with_fallback};
use crate::domain::{DashboardData, Source};
use crate::io::export::Snapshot;

/// One fetch as requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub source: Source,
    pub params: FetchParams,
    /// Uploaded file; read on the fetch thread and takes precedence over
    /// `params.csv_text` for the CSV source.
    pub csv_path: Option<PathBuf>,
}

/// Completed background fetch, tagged with the order it was issued in.
#[derive(Debug, Clone)]
pub struct FetchDone {
    pub ticket: u64,
    pub outcome: FetchOutcome,
}

/// Session state: the current dataset plus fetch bookkeeping.
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub data: DashboardData,
    pub source: Source,
    pub last_fetched: DateTime<Utc>,
    pub last_error: Option<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            data: default_dataset(),
            source: Source::Mock,
            last_fetched: Utc::now(),
            last_error: None,
        }
    }

    /// Replace the dataset with a fetch result.
    ///
    /// The error (if any) is kept alongside the fallback data so it stays
    /// visible until the next fetch.
    pub fn apply(&mut self, outcome: FetchOutcome) {
        self.data = outcome.data;
        self.source = outcome.source;
        self.last_error = outcome.error;
        self.last_fetched = Utc::now();
    }

    /// Export payload for the current dataset.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            generated_at: Utc::now(),
            last_fetched: self.last_fetched,
            data: &self.data,
        }
    }
}

/// Run a fetch to completion on the current thread.
pub fn run_fetch(request: &FetchRequest) -> FetchOutcome {
    let mut params = request.params.clone();

    if request.source == Source::Csv {
        if let Some(path) = &request.csv_path {
            match read_csv_file(path) {
                Ok(text) => params.csv_text = text,
                Err(err) => {
                    return FetchOutcome {
                        source: request.source,
                        data: default_dataset(),
                        error: Some(err.to_string()),
                    };
                }
            }
        }
    }

    fetch_with_fallback(request.source, &params)
}

/// Run a fetch on a worker thread and send the outcome to `tx`.
///
/// Nothing is cancelled: every spawned fetch reports back, and the receiver
/// applies results in arrival order, so the last one to finish wins.
pub fn spawn_fetch(ticket: u64, request: FetchRequest, tx: Sender<FetchDone>) {
    thread::spawn(move || {
        debug!(ticket, source = ?request.source, "fetch started");
        let outcome = run_fetch(&request);
        // Receiver gone means the UI has exited; nothing left to update.
        let _ = tx.send(FetchDone { ticket, outcome });
    });
}
