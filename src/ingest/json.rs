//! Structured-format decoder and encoder
//!
//! The structured format is a JSON array of `{ "timestamp": "<ISO-8601>", "value": <number> }`
//! objects. Decoding is all-or-nothing: the whole buffer must be a well-formed
//! array of such objects or the call fails with [`ImportError::Decode`].
//!
//! Records whose value is not finite cannot be stored and are dropped after a
//! successful decode.

use crate::error::ImportError;
use crate::types::Sample;

/// UTF-8 byte order mark, rejected by serde_json
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a structured payload into samples, preserving input order
pub fn decode(bytes: &[u8]) -> Result<Vec<Sample>, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let decoded: Vec<Sample> = serde_json::from_slice(bytes)?;
    let total = decoded.len();

    let samples: Vec<Sample> = decoded.into_iter().filter(Sample::is_finite).collect();
    if samples.len() != total {
        tracing::debug!(
            "Dropped {} non-finite records from structured payload",
            total - samples.len()
        );
    }

    Ok(samples)
}

/// Encode samples in the structured format (ids are not written)
pub fn encode(samples: &[Sample]) -> Result<Vec<u8>, ImportError> {
    serde_json::to_vec_pretty(samples).map_err(|e| ImportError::Decode(e.to_string()))
}
