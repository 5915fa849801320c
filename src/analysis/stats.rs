//! Statistics aggregation
//!
//! [`StatsAccumulator`] folds values one at a time; [`aggregate`] runs it
//! over a sample slice. The empty case is defined as all zeros rather than
//! a division by zero.

use crate::types::{DerivedStats, Sample};

/// Running count/sum/min/max
#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for StatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsAccumulator {
    /// Create a new empty accumulator
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    /// Add a new value to the statistics
    #[inline]
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Get the current average
    #[inline]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// Snapshot as [`DerivedStats`]
    pub fn finish(&self) -> DerivedStats {
        if self.count == 0 {
            return DerivedStats::default();
        }
        DerivedStats {
            count: self.count,
            total: self.sum,
            average: self.average(),
            min: self.min,
            max: self.max,
        }
    }
}

/// count/total/average/min/max over `samples`
pub fn aggregate(samples: &[Sample]) -> DerivedStats {
    let mut acc = StatsAccumulator::new();
    for sample in samples {
        acc.push(sample.value);
    }
    acc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn samples(values: &[f64]) -> Vec<Sample> {
        let now = Utc::now();
        values.iter().map(|&v| Sample::new(now, v)).collect()
    }

    #[test]
    fn test_empty_is_all_zero() {
        let stats = aggregate(&[]);
        assert_eq!(
            stats,
            DerivedStats {
                count: 0,
                total: 0.0,
                average: 0.0,
                min: 0.0,
                max: 0.0
            }
        );
    }

    #[test]
    fn test_basic_aggregate() {
        let stats = aggregate(&samples(&[4.0, -2.0, 10.0, 0.0]));
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, 12.0);
        assert_eq!(stats.average, 3.0);
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 10.0);
    }

    #[test]
    fn test_single_value() {
        let stats = aggregate(&samples(&[7.5]));
        assert_eq!(stats.min, 7.5);
        assert_eq!(stats.max, 7.5);
        assert_eq!(stats.average, 7.5);
    }

    #[test]
    fn test_all_negative_max() {
        let stats = aggregate(&samples(&[-5.0, -1.0, -3.0]));
        assert_eq!(stats.max, -1.0);
        assert_eq!(stats.min, -5.0);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_average_is_total_over_count(
            values in prop::collection::vec(-1e9f64..1e9, 1..200)
        ) {
            let stats = aggregate(&samples(&values));
            let expected = stats.total / stats.count as f64;
            prop_assert!((stats.average - expected).abs() <= f64::EPSILON * expected.abs().max(1.0));
            let slack = 1e-9 * stats.min.abs().max(stats.max.abs()).max(1.0);
            prop_assert!(stats.min - slack <= stats.average && stats.average <= stats.max + slack);
        }
    }
}
