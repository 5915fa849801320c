//! Test data builders for creating test objects

use chrono::{DateTime, Duration, Utc};
use seriesdash_rs::types::{format_timestamp, Sample};

/// Builder for a run of samples spaced evenly in time
pub struct SeriesBuilder {
    start: DateTime<Utc>,
    step: Duration,
    values: Vec<f64>,
}

impl SeriesBuilder {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            start,
            step: Duration::days(1),
            values: Vec::new(),
        }
    }

    pub fn step(mut self, step: Duration) -> Self {
        self.step = step;
        self
    }

    pub fn values(mut self, values: &[f64]) -> Self {
        self.values.extend_from_slice(values);
        self
    }

    pub fn build(&self) -> Vec<Sample> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| Sample::new(self.start + self.step * i as i32, *value))
            .collect()
    }

    /// The same run in the structured (JSON) format
    pub fn to_json(&self) -> String {
        let rows: Vec<String> = self
            .build()
            .iter()
            .map(|s| {
                format!(
                    r#"{{"timestamp":"{}","value":{}}}"#,
                    format_timestamp(s.timestamp),
                    s.value
                )
            })
            .collect();
        format!("[{}]", rows.join(","))
    }

    /// The same run in the delimited (CSV) format, with a header row
    pub fn to_csv(&self) -> String {
        let mut out = String::from("timestamp,value\n");
        for s in self.build() {
            out.push_str(&format!("{},{}\n", format_timestamp(s.timestamp), s.value));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_series_builder() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let builder = SeriesBuilder::new(start)
            .step(Duration::hours(1))
            .values(&[1.0, 2.0]);

        let samples = builder.build();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].timestamp, start + Duration::hours(1));
        assert!(builder.to_csv().starts_with("timestamp,value\n2024-01-01T00:00:00Z,1\n"));
    }
}
