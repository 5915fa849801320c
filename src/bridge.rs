//! Thread boundary between the store worker and the UI.
//!
//! The UI never touches the [`SeriesStore`](crate::store::SeriesStore)
//! directly. It sends [`StoreCommand`]s through a [`StoreBridge`] and drains
//! [`StoreMessage`]s once per frame. After every mutation the worker publishes
//! a [`SeriesSnapshot`] whose version only ever grows, so the UI can tell a
//! fresh series from one it already has.

use crate::config::FetchPolicy;
use crate::error::ImportError;
use crate::ingest::{ImportOrigin, ImportSummary};
use crate::types::Sample;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;

/// Identifies one remote fetch, in the order fetches were started
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(pub u64);

/// Immutable view of the series at a given version
#[derive(Debug, Clone)]
pub struct SeriesSnapshot {
    pub version: u64,
    pub samples: Arc<[Sample]>,
}

impl Default for SeriesSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            samples: Arc::from(Vec::new()),
        }
    }
}

/// Commands sent to the store worker.
#[derive(Debug, Clone)]
pub enum StoreCommand {
    /// Append one sample; `None` stamps it with the current time.
    Append {
        value: f64,
        timestamp: Option<DateTime<Utc>>,
    },
    /// Replace the whole series.
    Replace(Vec<Sample>),
    /// Import a local file; the extension declares its kind.
    ImportFile(PathBuf),
    /// Fetch a URL and import its structured body.
    ImportUrl(String),
    /// A fetch finished on the async runtime. Sent by the worker's own
    /// fetch tasks, never by the UI.
    FetchCompleted {
        ticket: FetchTicket,
        url: String,
        result: Result<Vec<Sample>, ImportError>,
    },
    /// Write the current series to a file in the structured format.
    Export(PathBuf),
    /// Change how overlapping fetches are resolved.
    SetFetchPolicy(FetchPolicy),
    /// Publish a snapshot even though nothing changed.
    RequestSnapshot,
    /// Shut down the worker thread.
    Shutdown,
}

/// Messages sent from the store worker to the UI thread.
#[derive(Debug, Clone)]
pub enum StoreMessage {
    /// The series changed (or a snapshot was requested).
    Snapshot(SeriesSnapshot),

    /// A fetch was started.
    FetchStarted { ticket: FetchTicket, url: String },

    /// An import committed and replaced the series.
    ImportSucceeded {
        origin: ImportOrigin,
        summary: ImportSummary,
    },

    /// An import failed; the series is unchanged.
    ImportFailed {
        origin: ImportOrigin,
        error: ImportError,
    },

    /// A fetch completed after a newer one was started and was discarded.
    FetchSuperseded { ticket: FetchTicket, url: String },

    /// Export finished.
    Exported { path: PathBuf, count: usize },

    /// Export failed.
    ExportFailed { path: PathBuf, error: String },

    /// Worker is shutting down.
    Shutdown,
}

/// Channel capacity for commands (UI → worker, fetch tasks → worker).
pub const CMD_CHANNEL_CAPACITY: usize = 256;
/// Channel capacity for messages (worker → UI).
pub const MSG_CHANNEL_CAPACITY: usize = 1024;

/// UI-side handle for communicating with the store worker.
pub struct StoreBridge {
    pub cmd_tx: Sender<StoreCommand>,
    pub msg_rx: Receiver<StoreMessage>,
}

impl StoreBridge {
    /// Create a new bridge: `(bridge_for_ui, cmd_tx, cmd_rx, msg_tx)`.
    ///
    /// The worker owns `cmd_rx` and `msg_tx` and keeps the extra `cmd_tx`
    /// to route fetch completions back to itself.
    #[allow(clippy::type_complexity)]
    pub fn new() -> (
        Self,
        Sender<StoreCommand>,
        Receiver<StoreCommand>,
        Sender<StoreMessage>,
    ) {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = bounded(MSG_CHANNEL_CAPACITY);
        (
            Self {
                cmd_tx: cmd_tx.clone(),
                msg_rx,
            },
            cmd_tx,
            cmd_rx,
            msg_tx,
        )
    }

    /// Drain all pending messages.
    pub fn drain(&self) -> Vec<StoreMessage> {
        let mut msgs = Vec::new();
        while let Ok(msg) = self.msg_rx.try_recv() {
            msgs.push(msg);
        }
        msgs
    }

    /// Try to receive a single message without blocking.
    pub fn try_recv(&self) -> Option<StoreMessage> {
        self.msg_rx.try_recv().ok()
    }

    /// Wait up to `timeout` for the next message.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<StoreMessage> {
        self.msg_rx.recv_timeout(timeout).ok()
    }

    pub fn send_command(&self, cmd: StoreCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    pub fn append(&self, value: f64, timestamp: Option<DateTime<Utc>>) {
        let _ = self.cmd_tx.send(StoreCommand::Append { value, timestamp });
    }

    pub fn replace(&self, samples: Vec<Sample>) {
        let _ = self.cmd_tx.send(StoreCommand::Replace(samples));
    }

    pub fn import_file(&self, path: PathBuf) {
        let _ = self.cmd_tx.send(StoreCommand::ImportFile(path));
    }

    pub fn import_url(&self, url: impl Into<String>) {
        let _ = self.cmd_tx.send(StoreCommand::ImportUrl(url.into()));
    }

    pub fn export(&self, path: PathBuf) {
        let _ = self.cmd_tx.send(StoreCommand::Export(path));
    }

    pub fn set_fetch_policy(&self, policy: FetchPolicy) {
        let _ = self.cmd_tx.send(StoreCommand::SetFetchPolicy(policy));
    }

    pub fn request_snapshot(&self) {
        let _ = self.cmd_tx.send(StoreCommand::RequestSnapshot);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(StoreCommand::Shutdown);
    }
}
