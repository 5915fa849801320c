//! Series store
//!
//! [`SeriesStore`] holds the authoritative sequence of samples. It exposes
//! exactly two mutations: [`append`](SeriesStore::append) for manual entry
//! and [`replace`](SeriesStore::replace) for imports. There is no removal or
//! in-place edit.
//!
//! Samples are kept in arrival order. The store does not sort; consumers that
//! need chronological order (line and bar geometry) sort their own copy.
//!
//! Every mutation bumps a version counter, which is how observers learn that
//! the series changed.
//!
//! The store itself is a plain value with no interior locking. Sharing it
//! across threads goes through [`worker::StoreWorker`], which owns it.

pub mod worker;

pub use worker::StoreWorker;

use crate::analysis;
use crate::types::{DateRange, DerivedStats, Sample};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Authoritative, versioned sample sequence
#[derive(Debug, Default)]
pub struct SeriesStore {
    samples: Vec<Sample>,
    version: u64,
}

impl SeriesStore {
    /// Create an empty store at version 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `samples`
    pub fn with_samples(samples: Vec<Sample>) -> Self {
        let mut store = Self::new();
        store.replace(samples);
        store
    }

    /// Add one sample at the end of the series
    ///
    /// A non-finite value is never stored; the call is then a no-op and the
    /// version is unchanged.
    pub fn append(&mut self, sample: Sample) -> u64 {
        if !sample.is_finite() {
            tracing::warn!("Ignoring non-finite sample value {}", sample.value);
            return self.version;
        }
        self.samples.push(sample);
        self.bump()
    }

    /// Add `value` stamped with `timestamp`, or the current time when `None`
    pub fn append_value(&mut self, value: f64, timestamp: Option<DateTime<Utc>>) -> u64 {
        let sample = match timestamp {
            Some(ts) => Sample::new(ts, value),
            None => Sample::now(value),
        };
        self.append(sample)
    }

    /// Swap the entire series, even for an empty sequence
    pub fn replace(&mut self, samples: Vec<Sample>) -> u64 {
        let mut samples = samples;
        samples.retain(Sample::is_finite);
        self.samples = samples;
        self.bump()
    }

    /// Earliest and latest timestamp, `None` for an empty series
    pub fn min_max_timestamp(&self) -> Option<DateRange> {
        min_max_timestamp(&self.samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Immutable copy of the current series for other threads
    pub fn snapshot(&self) -> Arc<[Sample]> {
        Arc::from(self.samples.as_slice())
    }

    /// Number of mutations applied so far
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples within `range`, both ends included
    pub fn filtered(&self, range: &DateRange) -> Vec<Sample> {
        analysis::filter(&self.samples, range)
    }

    /// Statistics over the whole series
    pub fn stats(&self) -> DerivedStats {
        analysis::aggregate(&self.samples)
    }

    fn bump(&mut self) -> u64 {
        self.version += 1;
        tracing::debug!(
            "Series now at version {} with {} samples",
            self.version,
            self.samples.len()
        );
        self.version
    }
}

/// Earliest and latest timestamp of any sample run
pub fn min_max_timestamp(samples: &[Sample]) -> Option<DateRange> {
    let first = samples.first()?.timestamp;
    let (min, max) = samples
        .iter()
        .fold((first, first), |(min, max), s| (min.min(s.timestamp), max.max(s.timestamp)));
    Some(DateRange::new(min, max))
}
