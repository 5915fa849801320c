//! Shared state types for the frontend
//!
//! Panels edit the form buffers in place and return [`AppAction`]s instead
//! of talking to the store worker directly. The form types own the text the
//! user is typing and know how to turn it into typed values.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::FetchPolicy;
use crate::types::{format_timestamp, parse_timestamp, ChartKind, DateRange};

/// Actions that any panel can emit
///
/// Panels return `Vec<AppAction>` instead of mutating state directly, so all
/// store traffic goes through one place in the app.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Store commands
    /// Append a sample; `None` means "now"
    AppendSample {
        value: f64,
        timestamp: Option<DateTime<Utc>>,
    },
    /// Import a local file
    ImportFile(PathBuf),
    /// Import from a URL
    ImportUrl(String),
    /// Export the series as JSON
    Export(PathBuf),
    /// Change how overlapping fetches are resolved
    SetFetchPolicy(FetchPolicy),

    // View settings
    /// Apply a range filter
    ApplyRange(DateRange),
    /// Remove the range filter
    ClearRange,
    /// Enable or disable the range filter without forgetting it
    ToggleFilter,
    /// Fill the range form with the series bounds
    FitRangeToData,
    /// Switch chart kind
    SetChartKind(ChartKind),
    /// Switch light/dark theme
    SetDarkMode(bool),
}

/// Text buffers for the manual entry form
#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    pub value_text: String,
    /// Empty means "now"
    pub timestamp_text: String,
    /// Last parse error, shown under the form
    pub error: Option<String>,
}

impl EntryForm {
    /// Parse the form into a value and optional timestamp
    pub fn parse(&self) -> Result<(f64, Option<DateTime<Utc>>), String> {
        let value: f64 = self
            .value_text
            .trim()
            .parse()
            .map_err(|_| format!("'{}' is not a number", self.value_text.trim()))?;
        if !value.is_finite() {
            return Err("Value must be finite".to_string());
        }

        let timestamp_text = self.timestamp_text.trim();
        let timestamp = if timestamp_text.is_empty() {
            None
        } else {
            Some(parse_timestamp(timestamp_text).ok_or_else(|| {
                format!("'{}' is not an ISO-8601 timestamp", timestamp_text)
            })?)
        };

        Ok((value, timestamp))
    }

    /// Clear after a successful submit
    pub fn reset(&mut self) {
        self.value_text.clear();
        self.timestamp_text.clear();
        self.error = None;
    }
}

/// Text buffers for the range filter form
#[derive(Debug, Clone, Default)]
pub struct RangeForm {
    pub start_text: String,
    pub end_text: String,
    pub error: Option<String>,
}

impl RangeForm {
    /// Parse both ends; the range itself may be inverted
    pub fn parse(&self) -> Result<DateRange, String> {
        let parse = |label: &str, text: &str| {
            parse_timestamp(text)
                .ok_or_else(|| format!("{} '{}' is not an ISO-8601 timestamp", label, text.trim()))
        };
        Ok(DateRange::new(
            parse("Start", &self.start_text)?,
            parse("End", &self.end_text)?,
        ))
    }

    /// Overwrite both fields with `range`
    pub fn fill_from(&mut self, range: &DateRange) {
        self.start_text = format_timestamp(range.start);
        self.end_text = format_timestamp(range.end);
        self.error = None;
    }
}

/// Last notable event shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}
