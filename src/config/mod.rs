//! Configuration module for SeriesDash
//!
//! This module handles application configuration including:
//! - Application state persistence (preferences, recent import sources)
//! - Store and fetch behaviour ([`AppConfig`])
//! - Runtime view settings during execution
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.seriesdash.seriesdash-rs/`
//! - **macOS**: `~/Library/Application Support/dev.seriesdash.seriesdash-rs/`
//! - **Windows**: `%APPDATA%\dev.seriesdash.seriesdash-rs\`
//!
//! # Files
//!
//! - `app_state.json` - Preferences, recent sources and the [`AppConfig`]
//! - `logs/` - Daily rolling log files when [`AppConfig::log_to_file`] is set

pub mod settings;

pub use settings::*;

use crate::error::{DashError, Result};
use crate::types::ChartKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.seriesdash.seriesdash-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Log directory name inside the app data directory
pub const LOG_DIR: &str = "logs";

/// Maximum number of recent import sources to remember
pub const MAX_RECENT_SOURCES: usize = 10;

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        DashError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            DashError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Get the log directory path
pub fn log_dir() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(LOG_DIR))
}

// ==================== App Config ====================

/// Which completed remote fetch is allowed to replace the series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FetchPolicy {
    /// Every successful completion replaces the series; the last one to
    /// finish wins regardless of when it was started
    #[default]
    CompletionOrder,
    /// Only the most recently started fetch may replace the series;
    /// older completions are discarded
    LatestRequest,
}

impl FetchPolicy {
    pub fn all() -> &'static [FetchPolicy] {
        &[FetchPolicy::CompletionOrder, FetchPolicy::LatestRequest]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FetchPolicy::CompletionOrder => "Last to finish wins",
            FetchPolicy::LatestRequest => "Latest request wins",
        }
    }
}

/// Store and ingestion behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Install the three seed samples at startup
    #[serde(default = "default_true")]
    pub seed_on_startup: bool,

    /// How overlapping remote fetches are resolved
    #[serde(default)]
    pub fetch_policy: FetchPolicy,

    /// Request timeout for remote fetches; `None` keeps transport defaults
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Also write logs to a daily rolling file in the app data directory
    #[serde(default)]
    pub log_to_file: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed_on_startup: true,
            fetch_policy: FetchPolicy::default(),
            request_timeout_secs: None,
            log_to_file: false,
        }
    }
}

impl AppConfig {
    /// Request timeout as a duration, if one is configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

// ==================== Recent Source Entry ====================

/// Kind of a remembered import source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    File,
    Url,
}

/// Information about a recently used import source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSource {
    /// File path or URL
    pub location: String,

    pub kind: SourceKind,

    /// Last used timestamp (Unix seconds)
    pub last_used: u64,
}

impl RecentSource {
    /// Create a new recent source entry
    pub fn new(location: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            location: location.into(),
            kind,
            last_used: unix_now(),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ==================== App State ====================

/// Persistent application state
///
/// This stores user preferences and history that persists across sessions.
/// The series itself is never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Last URL typed into the remote import field
    #[serde(default)]
    pub last_remote_url: Option<String>,

    /// Chart kind shown at startup
    #[serde(default)]
    pub chart_kind: ChartKind,

    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// Recently imported files and URLs, most recent first
    #[serde(default)]
    pub recent_sources: Vec<RecentSource>,

    /// Store and ingestion configuration
    #[serde(default)]
    pub config: AppConfig,
}

fn default_app_state_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            last_remote_url: None,
            chart_kind: ChartKind::default(),
            dark_mode: true,
            recent_sources: Vec::new(),
            config: AppConfig::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            DashError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load app state from an explicit path; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DashError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| DashError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(APP_STATE_FILE))
    }

    /// Save app state to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| DashError::Serialization(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| DashError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Add or refresh a recent source, keeping the list bounded
    pub fn add_recent_source(&mut self, location: impl Into<String>, kind: SourceKind) {
        let location = location.into();

        // Remove existing entry for this location
        self.recent_sources.retain(|s| s.location != location);

        if kind == SourceKind::Url {
            self.last_remote_url = Some(location.clone());
        }

        self.recent_sources.insert(0, RecentSource::new(location, kind));
        self.recent_sources.truncate(MAX_RECENT_SOURCES);
    }

    /// Drop file sources whose file no longer exists
    pub fn cleanup_missing_sources(&mut self) {
        self.recent_sources
            .retain(|s| s.kind == SourceKind::Url || Path::new(&s.location).exists());
    }
}
