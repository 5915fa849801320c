//! Delimited-text decoder
//!
//! Two comma-separated columns per line: an ISO-8601 timestamp and a decimal
//! value. A first line containing `timestamp` (any case) is treated as a
//! header and skipped once.
//!
//! This decoder is best-effort: malformed rows are dropped, never reported.
//! Only input that is not valid UTF-8 fails the whole decode.

use crate::error::ImportError;
use crate::types::{parse_timestamp, Sample};

/// Marker that identifies a header line
const HEADER_MARKER: &str = "timestamp";

/// Leading byte order mark written by some spreadsheet exports
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Number of columns in a data row
const COLUMNS: usize = 2;

/// Decode delimited text into samples, preserving row order
pub fn decode(bytes: &[u8]) -> Result<Vec<Sample>, ImportError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut lines = text.lines().peekable();
    if lines
        .peek()
        .is_some_and(|first| first.to_lowercase().contains(HEADER_MARKER))
    {
        lines.next();
    }

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_row(line) {
            Some(sample) => samples.push(sample),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} malformed delimited rows", skipped);
    }

    Ok(samples)
}

/// Parse one trimmed, non-blank row
fn parse_row(line: &str) -> Option<Sample> {
    let columns: Vec<&str> = line.split(',').map(str::trim).collect();
    if columns.len() != COLUMNS {
        return None;
    }

    let timestamp = parse_timestamp(columns[0])?;
    let value: f64 = columns[1].parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(Sample::new(timestamp, value))
}
