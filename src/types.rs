//! Core data types for SeriesDash
//!
//! This module contains the fundamental data structures used throughout
//! the application for representing samples, ranges and derived values.
//!
//! # Main Types
//!
//! - [`Sample`] - A single timestamped value with a process-unique id
//! - [`SampleId`] - Opaque identity used for UI list diffing, never serialized
//! - [`DateRange`] - Inclusive time interval used to derive a filtered view
//! - [`DerivedStats`] - count/total/average/min/max over a run of samples
//! - [`ChartKind`] - Line, bar or pie presentation
//!
//! # Timestamps
//!
//! Timestamps are always held in UTC. Text is accepted in strict
//! ISO-8601 / RFC 3339 form with an explicit offset and is normalized to UTC
//! on decode. Encoding writes a `Z` suffix and keeps any sub-second part.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for generating unique sample IDs
static NEXT_SAMPLE_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a sample, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleId(u64);

impl SampleId {
    /// Allocate a fresh identifier
    pub fn next() -> Self {
        SampleId(NEXT_SAMPLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, usable as a widget id
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A single observation: one value at one instant
///
/// Samples are immutable once built. The id is excluded from every external
/// representation; decoding a sample assigns a fresh one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    #[serde(skip, default = "SampleId::next")]
    id: SampleId,
    /// When the value was observed (UTC)
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
    /// The observed value; always finite for samples held by the store
    pub value: f64,
}

impl Sample {
    /// Create a new sample with a fresh id
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self {
            id: SampleId::next(),
            timestamp,
            value,
        }
    }

    /// Create a sample stamped with the current time
    pub fn now(value: f64) -> Self {
        Self::new(Utc::now(), value)
    }

    pub fn id(&self) -> SampleId {
        self.id
    }

    /// Whether the value can be stored (not NaN or infinite)
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }

    /// Timestamp as fractional Unix seconds, the x coordinate used by charts
    pub fn unix_seconds(&self) -> f64 {
        timestamp_to_seconds(self.timestamp)
    }

    /// Compare timestamp and value, ignoring identity
    pub fn same_observation(&self, other: &Sample) -> bool {
        self.timestamp == other.timestamp && self.value == other.value
    }
}

/// Inclusive time interval `[start, end]`
///
/// `start <= end` is not enforced; an inverted range simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(with = "iso8601")]
    pub start: DateTime<Utc>,
    #[serde(with = "iso8601")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether `timestamp` falls within the range, both ends included
    #[inline]
    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Statistics derived from a run of samples
///
/// Every field is zero for an empty run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedStats {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// How the series is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChartKind {
    /// Connected line over time (default)
    #[default]
    Line,
    /// One bar per sample
    Bar,
    /// One slice per sample, proportional to its share of the total
    Pie,
}

impl ChartKind {
    /// Get all available chart kinds
    pub fn all() -> &'static [ChartKind] {
        &[ChartKind::Line, ChartKind::Bar, ChartKind::Pie]
    }

    /// Get display name for this chart kind
    pub fn display_name(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Pie => "Pie",
        }
    }

    /// Get icon character for this chart kind
    pub fn icon(&self) -> &'static str {
        match self {
            ChartKind::Line => "─",
            ChartKind::Bar => "▮",
            ChartKind::Pie => "◔",
        }
    }

    /// Get the next chart kind (for cycling)
    pub fn next(&self) -> ChartKind {
        match self {
            ChartKind::Line => ChartKind::Bar,
            ChartKind::Bar => ChartKind::Pie,
            ChartKind::Pie => ChartKind::Line,
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Values of the series installed at startup
pub const SEED_VALUES: [f64; 3] = [12.0, 18.5, 9.75];

/// Three samples one day apart, the last one at `now`
pub fn seed_samples(now: DateTime<Utc>) -> Vec<Sample> {
    let count = SEED_VALUES.len() as i64;
    SEED_VALUES
        .iter()
        .enumerate()
        .map(|(i, &value)| Sample::new(now - Duration::days(count - 1 - i as i64), value))
        .collect()
}

/// Parse a strict ISO-8601 date-time with offset, normalized to UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a timestamp the way the structured format writes it
///
/// Sub-second parts are kept (as milli, micro or nanoseconds) so the text
/// parses back to the same instant.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Fractional Unix seconds of a timestamp
pub fn timestamp_to_seconds(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 + f64::from(timestamp.timestamp_subsec_nanos()) * 1e-9
}

/// Inverse of [`timestamp_to_seconds`], `None` when out of chrono's range
pub fn seconds_to_timestamp(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let secs = seconds.floor();
    let nanos = ((seconds - secs) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

/// Serde adapter for ISO-8601 timestamps
pub mod iso8601 {
    use super::{format_timestamp, parse_timestamp};
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(*ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 timestamp '{}'", text)))
    }
}
