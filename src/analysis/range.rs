//! Date-range filtering

use crate::types::{DateRange, Sample};

/// Samples whose timestamp lies in `[range.start, range.end]`
///
/// Relative order of the input is preserved. An inverted range yields an
/// empty result.
pub fn filter(samples: &[Sample], range: &DateRange) -> Vec<Sample> {
    samples
        .iter()
        .filter(|s| range.contains(s.timestamp))
        .cloned()
        .collect()
}
