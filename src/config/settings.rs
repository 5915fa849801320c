//! Runtime settings that can be modified during application execution
//!
//! This module contains view settings that change while the dashboard runs,
//! separate from the persistent configuration. They never affect the stored
//! series, only what is derived from it for display.
//!
//! # Range Filter
//!
//! The filter is a [`DateRange`] plus an enable flag. Keeping the range while
//! the filter is switched off lets the user toggle it without retyping dates.

use crate::types::{ChartKind, DateRange, Sample};
use serde::{Deserialize, Serialize};

/// Runtime settings for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeSettings {
    /// Current chart presentation
    pub chart_kind: ChartKind,

    /// Whether the range filter is applied
    pub filter_enabled: bool,

    /// Range used when the filter is enabled
    pub range: Option<DateRange>,

    /// Whether to show the chart legend
    pub show_legend: bool,

    /// Whether to draw a marker at every line point
    pub show_markers: bool,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            chart_kind: ChartKind::default(),
            filter_enabled: false,
            range: None,
            show_legend: true,
            show_markers: true,
        }
    }
}

impl RuntimeSettings {
    /// Create new runtime settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a persisted chart kind
    pub fn with_chart_kind(chart_kind: ChartKind) -> Self {
        Self {
            chart_kind,
            ..Self::default()
        }
    }

    /// Set the filter range and enable it
    pub fn set_range(&mut self, range: DateRange) {
        self.range = Some(range);
        self.filter_enabled = true;
    }

    /// Forget the range and disable filtering
    pub fn clear_range(&mut self) {
        self.range = None;
        self.filter_enabled = false;
    }

    /// Toggle the filter (no effect on the range itself)
    pub fn toggle_filter(&mut self) {
        self.filter_enabled = !self.filter_enabled;
    }

    /// The range currently in force, if any
    pub fn active_range(&self) -> Option<&DateRange> {
        self.range.as_ref().filter(|_| self.filter_enabled)
    }

    /// Apply the active range to `samples`; all samples when no range is active
    pub fn visible_samples(&self, samples: &[Sample]) -> Vec<Sample> {
        match self.active_range() {
            Some(range) => crate::analysis::filter(samples, range),
            None => samples.to_vec(),
        }
    }

    /// Cycle to the next chart kind
    pub fn cycle_chart_kind(&mut self) {
        self.chart_kind = self.chart_kind.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn range() -> DateRange {
        DateRange::new(
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_active_range_requires_enable() {
        let mut settings = RuntimeSettings::new();
        assert!(settings.active_range().is_none());

        settings.set_range(range());
        assert_eq!(settings.active_range(), Some(&range()));

        settings.toggle_filter();
        assert!(settings.active_range().is_none());
        assert!(settings.range.is_some());

        settings.clear_range();
        assert!(settings.range.is_none());
        assert!(!settings.filter_enabled);
    }

    #[test]
    fn test_visible_samples() {
        let samples: Vec<Sample> = (1..=4)
            .map(|d| Sample::new(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap(), d as f64))
            .collect();

        let mut settings = RuntimeSettings::new();
        assert_eq!(settings.visible_samples(&samples).len(), 4);

        settings.set_range(range());
        let values: Vec<f64> = settings
            .visible_samples(&samples)
            .iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec![2.0, 3.0]);
    }

    #[test]
    fn test_cycle_chart_kind() {
        let mut settings = RuntimeSettings::with_chart_kind(ChartKind::Pie);
        settings.cycle_chart_kind();
        assert_eq!(settings.chart_kind, ChartKind::Line);
    }
}
