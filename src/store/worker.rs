//! Store Worker Thread Implementation
//!
//! This module contains the worker loop that owns the [`SeriesStore`] and
//! applies every mutation to it. It communicates with the UI thread through
//! crossbeam channels (see [`crate::bridge`]).
//!
//! # Responsibilities
//!
//! - **Serialized mutation**: append, replace and import results are applied
//!   one at a time, in the order their commands reach the channel
//! - **Local imports**: files are read and decoded on the worker thread
//! - **Remote imports**: fetches run on a tokio runtime owned by the worker
//! - **Change notification**: a versioned snapshot is published after every
//!   mutation
//!
//! # Remote fetch hand-off
//!
//! A fetch task never touches the store. When it finishes it sends
//! [`StoreCommand::FetchCompleted`] into the worker's own command channel, so
//! the replace runs on the worker thread like every other mutation. Under
//! [`FetchPolicy::CompletionOrder`] the last fetch to finish wins; under
//! [`FetchPolicy::LatestRequest`] results from superseded tickets are dropped.

use crate::bridge::{FetchTicket, SeriesSnapshot, StoreBridge, StoreCommand, StoreMessage};
use crate::config::{AppConfig, FetchPolicy};
use crate::error::{DashError, ImportError, Result};
use crate::ingest::{self, HttpSource, ImportOrigin, RemoteSource};
use crate::store::SeriesStore;
use crate::types::{seed_samples, Sample};
use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// How long the loop waits for a command before re-checking `running`
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Threads in the fetch runtime
const FETCH_WORKER_THREADS: usize = 2;

/// The worker that owns the series
pub struct StoreWorker {
    store: SeriesStore,
    cmd_rx: Receiver<StoreCommand>,
    /// Loopback sender handed to fetch tasks
    cmd_tx: Sender<StoreCommand>,
    msg_tx: Sender<StoreMessage>,
    runtime: tokio::runtime::Runtime,
    source: Arc<dyn RemoteSource>,
    policy: FetchPolicy,
    next_ticket: u64,
    latest_ticket: Option<FetchTicket>,
    in_flight: usize,
    running: Arc<AtomicBool>,
}

impl StoreWorker {
    /// Build a worker around existing channel ends
    pub fn new(
        config: &AppConfig,
        source: Arc<dyn RemoteSource>,
        cmd_tx: Sender<StoreCommand>,
        cmd_rx: Receiver<StoreCommand>,
        msg_tx: Sender<StoreMessage>,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(FETCH_WORKER_THREADS)
            .thread_name("seriesdash-fetch")
            .enable_all()
            .build()
            .map_err(|e| DashError::from(e).with_context("Failed to start fetch runtime"))?;

        let store = if config.seed_on_startup {
            SeriesStore::with_samples(seed_samples(Utc::now()))
        } else {
            SeriesStore::new()
        };

        Ok(Self {
            store,
            cmd_rx,
            cmd_tx,
            msg_tx,
            runtime,
            source,
            policy: config.fetch_policy,
            next_ticket: 1,
            latest_ticket: None,
            in_flight: 0,
            running,
        })
    }

    /// Spawn a worker thread with the HTTP source and return the UI handle
    pub fn spawn(config: &AppConfig) -> Result<(StoreBridge, JoinHandle<()>)> {
        let source: Arc<dyn RemoteSource> = match config.request_timeout() {
            Some(timeout) => Arc::new(HttpSource::with_timeout(timeout)?),
            None => Arc::new(HttpSource::new()),
        };
        Self::spawn_with_source(config, source)
    }

    /// Spawn a worker thread with a custom remote source
    pub fn spawn_with_source(
        config: &AppConfig,
        source: Arc<dyn RemoteSource>,
    ) -> Result<(StoreBridge, JoinHandle<()>)> {
        let (bridge, cmd_tx, cmd_rx, msg_tx) = StoreBridge::new();
        let running = Arc::new(AtomicBool::new(true));
        let worker = Self::new(config, source, cmd_tx, cmd_rx, msg_tx, running)?;

        let handle = std::thread::Builder::new()
            .name("seriesdash-store".to_string())
            .spawn(move || worker.run())
            .map_err(|e| DashError::from(e).with_context("Failed to spawn store worker"))?;

        Ok((bridge, handle))
    }

    /// Run the command loop until shutdown
    pub fn run(mut self) {
        tracing::info!("Store worker started with {} samples", self.store.len());
        self.publish_snapshot();

        while self.running.load(Ordering::Relaxed) {
            match self.cmd_rx.recv_timeout(POLL_INTERVAL) {
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if self.in_flight > 0 {
            tracing::info!("Abandoning {} in-flight fetches", self.in_flight);
        }
        let _ = self.msg_tx.send(StoreMessage::Shutdown);
        self.runtime.shutdown_background();
        tracing::info!("Store worker exiting");
    }

    fn handle_command(&mut self, cmd: StoreCommand) {
        match cmd {
            StoreCommand::Append { value, timestamp } => self.handle_append(value, timestamp),
            StoreCommand::Replace(samples) => {
                self.store.replace(samples);
                self.publish_snapshot();
            }
            StoreCommand::ImportFile(path) => self.handle_import_file(path),
            StoreCommand::ImportUrl(url) => self.handle_import_url(url),
            StoreCommand::FetchCompleted {
                ticket,
                url,
                result,
            } => self.handle_fetch_completed(ticket, url, result),
            StoreCommand::Export(path) => self.handle_export(path),
            StoreCommand::SetFetchPolicy(policy) => {
                tracing::info!("Fetch policy set to {:?}", policy);
                self.policy = policy;
            }
            StoreCommand::RequestSnapshot => self.publish_snapshot(),
            StoreCommand::Shutdown => {
                tracing::info!("Store worker received shutdown");
                self.running.store(false, Ordering::Relaxed);
            }
        }
    }

    fn handle_append(&mut self, value: f64, timestamp: Option<DateTime<Utc>>) {
        let before = self.store.version();
        if self.store.append_value(value, timestamp) != before {
            self.publish_snapshot();
        }
    }

    fn handle_import_file(&mut self, path: PathBuf) {
        tracing::info!("Importing {}", path.display());
        let origin = ImportOrigin::File(path.clone());
        let result = ingest::load_file(&path);
        self.commit_or_report(origin, result);
    }

    fn handle_import_url(&mut self, url: String) {
        let origin = ImportOrigin::Remote(url.clone());
        let parsed = match ingest::parse_url(&url) {
            Ok(parsed) => parsed,
            Err(error) => {
                self.report_failure(origin, error);
                return;
            }
        };

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.latest_ticket = Some(ticket);
        self.in_flight += 1;

        tracing::info!("Fetch {:?} started for {}", ticket, parsed);
        let _ = self.msg_tx.send(StoreMessage::FetchStarted {
            ticket,
            url: url.clone(),
        });

        let source = Arc::clone(&self.source);
        let loopback = self.cmd_tx.clone();
        self.runtime.spawn(async move {
            let result = ingest::fetch_remote(source.as_ref(), parsed.as_str()).await;
            // Hop back onto the worker thread; the store is only touched there.
            // A full command queue blocks the sender, so keep it off the async workers
            let delivered = tokio::task::spawn_blocking(move || {
                loopback
                    .send(StoreCommand::FetchCompleted {
                        ticket,
                        url,
                        result,
                    })
                    .is_ok()
            })
            .await
            .unwrap_or(false);
            if !delivered {
                tracing::debug!("Worker gone before fetch {:?} completed", ticket);
            }
        });
    }

    fn handle_fetch_completed(
        &mut self,
        ticket: FetchTicket,
        url: String,
        result: std::result::Result<Vec<Sample>, ImportError>,
    ) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let stale = self.latest_ticket.is_some_and(|latest| latest != ticket);
        if stale && self.policy == FetchPolicy::LatestRequest && result.is_ok() {
            tracing::info!("Discarding fetch {:?} for {}: superseded", ticket, url);
            let _ = self
                .msg_tx
                .send(StoreMessage::FetchSuperseded { ticket, url });
            return;
        }

        self.commit_or_report(ImportOrigin::Remote(url), result);
    }

    fn handle_export(&mut self, path: PathBuf) {
        let result = ingest::json::encode(self.store.samples())
            .map_err(|e| e.to_string())
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(|e| e.to_string()));

        match result {
            Ok(()) => {
                tracing::info!("Exported {} samples to {}", self.store.len(), path.display());
                let _ = self.msg_tx.send(StoreMessage::Exported {
                    path,
                    count: self.store.len(),
                });
            }
            Err(error) => {
                tracing::error!("Export to {} failed: {}", path.display(), error);
                let _ = self.msg_tx.send(StoreMessage::ExportFailed { path, error });
            }
        }
    }

    fn commit_or_report(
        &mut self,
        origin: ImportOrigin,
        result: std::result::Result<Vec<Sample>, ImportError>,
    ) {
        match result {
            Ok(samples) => {
                let summary = ingest::commit(&mut self.store, samples);
                tracing::info!(
                    "Imported {} samples from {} (version {})",
                    summary.count,
                    origin,
                    summary.version
                );
                self.publish_snapshot();
                let _ = self
                    .msg_tx
                    .send(StoreMessage::ImportSucceeded { origin, summary });
            }
            Err(error) => self.report_failure(origin, error),
        }
    }

    fn report_failure(&self, origin: ImportOrigin, error: ImportError) {
        tracing::warn!("Import from {} failed: {}", origin, error);
        let _ = self
            .msg_tx
            .send(StoreMessage::ImportFailed { origin, error });
    }

    fn publish_snapshot(&self) {
        let snapshot = SeriesSnapshot {
            version: self.store.version(),
            samples: self.store.snapshot(),
        };
        let _ = self.msg_tx.send(StoreMessage::Snapshot(snapshot));
    }
}
