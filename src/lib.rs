//! # SeriesDash-RS: Time-Series Dashboard
//!
//! A desktop dashboard for a single series of timestamped numeric samples.
//! Samples come from manual entry, local JSON/CSV files, or a remote JSON
//! endpoint; the series can be narrowed to a date range, summarized, and
//! drawn as a line, bar, or pie chart.
//!
//! ## Architecture
//!
//! - **Store worker**: owns the [`store::SeriesStore`] on a dedicated thread and
//!   applies every mutation; remote fetches run on a tokio runtime it owns
//! - **Frontend**: renders the UI using eframe/egui with egui_plot for charts
//! - **Communication**: crossbeam channels carry [`bridge::StoreCommand`]s in and
//!   [`bridge::StoreMessage`]s (including versioned snapshots) out
//! - **Pure core**: decoding ([`ingest`]), filtering and statistics
//!   ([`analysis`]) and chart geometry ([`chart`]) have no UI or thread state
//!
//! ## Configuration
//!
//! Application state (preferences, recent sources, [`config::AppConfig`]) is
//! stored in the platform-appropriate data directory under
//! `dev.seriesdash.seriesdash-rs`:
//!
//! - **Linux**: `~/.local/share/dev.seriesdash.seriesdash-rs/`
//! - **macOS**: `~/Library/Application Support/dev.seriesdash.seriesdash-rs/`
//! - **Windows**: `%APPDATA%\dev.seriesdash.seriesdash-rs\`
//!
//! ## Example
//!
//! ```ignore
//! use seriesdash_rs::{config::AppState, frontend::DashApp, store::StoreWorker};
//!
//! fn main() -> eframe::Result<()> {
//!     let app_state = AppState::load_or_default();
//!     let (bridge, handle) = StoreWorker::spawn(&app_state.config)
//!         .expect("store worker");
//!
//!     eframe::run_native(
//!         "SeriesDash",
//!         eframe::NativeOptions::default(),
//!         Box::new(|_cc| Ok(Box::new(DashApp::new(bridge, Some(handle), app_state)))),
//!     )
//! }
//! ```

pub mod analysis;
pub mod app;
pub mod bridge;
pub mod chart;
pub mod config;
pub mod error;
pub mod frontend;
pub mod ingest;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use app::DashApp;
pub use bridge::{SeriesSnapshot, StoreBridge, StoreCommand, StoreMessage};
pub use config::{AppConfig, AppState, FetchPolicy};
pub use error::{DashError, ImportError, Result};
pub use store::{SeriesStore, StoreWorker};
pub use types::{ChartKind, DateRange, DerivedStats, Sample};
