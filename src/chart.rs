//! Chart geometry builders
//!
//! Pure functions that turn samples into renderable primitives. They know
//! nothing about egui; the frontend maps their output onto `egui_plot` items.
//!
//! - [`line_points`] / [`bar_points`]: one `[x, y]` pair per sample where x is
//!   the timestamp in fractional Unix seconds. Both return chronological order;
//!   the input slice may be in any order.
//! - [`pie_slices`]: cumulative start/end angles in degrees, in input order.
//!
//! Pie angles are measured clockwise from 12 o'clock. The rotation that puts
//! 0° at the top is applied by [`slice_point`], not stored in the angles.

use crate::types::{Sample, SampleId};

/// Slice colours, cycled by sample index
pub const PALETTE: [[u8; 4]; 6] = [
    [66, 133, 244, 255],
    [234, 67, 53, 255],
    [251, 188, 5, 255],
    [52, 168, 83, 255],
    [171, 71, 188, 255],
    [255, 112, 67, 255],
];

/// Offset that moves angle 0 from 3 o'clock to 12 o'clock
pub const PIE_ROTATION_DEG: f64 = -90.0;

/// Widest arc emitted as one polygon; anything wider is not convex
const MAX_WEDGE_DEG: f64 = 90.0;

/// Fallback bar width (seconds) when there is no spacing to measure
const DEFAULT_BAR_WIDTH_SECS: f64 = 3600.0;

/// Fraction of the tightest spacing a bar occupies
const BAR_FILL_RATIO: f64 = 0.8;

/// Palette colour for the `index`-th item
pub fn palette_color(index: usize) -> [u8; 4] {
    PALETTE[index % PALETTE.len()]
}

/// `[seconds, value]` pairs in chronological order
pub fn line_points(samples: &[Sample]) -> Vec<[f64; 2]> {
    let mut points: Vec<[f64; 2]> = samples.iter().map(|s| [s.unix_seconds(), s.value]).collect();
    // Stable, so equal timestamps keep their arrival order
    points.sort_by(|a, b| a[0].total_cmp(&b[0]));
    points
}

/// Same coordinates as [`line_points`]; bars are centred on x
pub fn bar_points(samples: &[Sample]) -> Vec<[f64; 2]> {
    line_points(samples)
}

/// Bar width in seconds: a fraction of the smallest positive gap between bars
pub fn bar_width(points: &[[f64; 2]]) -> f64 {
    points
        .windows(2)
        .map(|w| w[1][0] - w[0][0])
        .filter(|gap| *gap > 0.0)
        .min_by(f64::total_cmp)
        .map_or(DEFAULT_BAR_WIDTH_SECS, |gap| gap * BAR_FILL_RATIO)
}

/// One pie slice
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub index: usize,
    pub sample_id: SampleId,
    pub value: f64,
    /// Start angle in degrees, clockwise from 12 o'clock
    pub start_deg: f64,
    /// End angle in degrees, clockwise from 12 o'clock
    pub end_deg: f64,
    pub color: [u8; 4],
}

impl PieSlice {
    pub fn sweep_deg(&self) -> f64 {
        self.end_deg - self.start_deg
    }

    /// Share of the full circle, 0..=1 for non-negative inputs
    pub fn fraction(&self) -> f64 {
        self.sweep_deg() / 360.0
    }

    /// Closed convex polygons covering the slice
    ///
    /// Each wedge starts at the centre and spans at most 90°. `steps` is the
    /// number of arc segments per wedge. A zero-sweep slice yields nothing.
    pub fn wedges(&self, radius: f64, steps: usize) -> Vec<Vec<[f64; 2]>> {
        let sweep = self.sweep_deg();
        if sweep <= 0.0 || !sweep.is_finite() {
            return Vec::new();
        }

        let steps = steps.max(1);
        let count = (sweep / MAX_WEDGE_DEG).ceil().max(1.0) as usize;
        let span = sweep / count as f64;

        (0..count)
            .map(|w| {
                let from = self.start_deg + span * w as f64;
                let mut polygon = Vec::with_capacity(steps + 2);
                polygon.push([0.0, 0.0]);
                for step in 0..=steps {
                    let angle = from + span * step as f64 / steps as f64;
                    polygon.push(slice_point(angle, radius));
                }
                polygon
            })
            .collect()
    }
}

/// Point on a circle for a pie angle, with 0° at 12 o'clock and y up
pub fn slice_point(angle_deg: f64, radius: f64) -> [f64; 2] {
    let theta = (angle_deg + PIE_ROTATION_DEG).to_radians();
    [radius * theta.cos(), -radius * theta.sin()]
}

/// Slices with cumulative angles `360 * prefix_sum / max(total, 1)`
///
/// The `max(total, 1)` guard means an all-zero or empty series collapses to
/// zero-sweep slices instead of dividing by zero.
pub fn pie_slices(samples: &[Sample]) -> Vec<PieSlice> {
    let total: f64 = samples.iter().map(|s| s.value).sum();
    let denominator = total.max(1.0);

    let mut cumulative = 0.0;
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let start_deg = 360.0 * cumulative / denominator;
            cumulative += sample.value;
            let end_deg = 360.0 * cumulative / denominator;
            PieSlice {
                index,
                sample_id: sample.id(),
                value: sample.value,
                start_deg,
                end_deg,
                color: palette_color(index),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
    }

    fn series(values: &[f64]) -> Vec<Sample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Sample::new(ts(i as u32 + 1), v))
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_pie_angles() {
        let slices = pie_slices(&series(&[10.0, 20.0, 30.0]));
        let angles: Vec<(f64, f64)> = slices.iter().map(|s| (s.start_deg, s.end_deg)).collect();
        assert_eq!(angles, vec![(0.0, 60.0), (60.0, 180.0), (180.0, 360.0)]);
    }

    #[test]
    fn test_pie_all_zero_collapses() {
        let slices = pie_slices(&series(&[0.0, 0.0, 0.0]));
        assert_eq!(slices.len(), 3);
        assert!(slices.iter().all(|s| s.sweep_deg() == 0.0));
        assert!(pie_slices(&[]).is_empty());
    }

    #[test]
    fn test_pie_small_total_uses_guard() {
        // total 0.5 is divided by 1, so the pie is only half filled
        let slices = pie_slices(&series(&[0.25, 0.25]));
        assert_close(slices[1].end_deg, 180.0);
    }

    #[test]
    fn test_palette_cycles() {
        let slices = pie_slices(&series(&[1.0; 8]));
        assert_eq!(slices[0].color, slices[6].color);
        assert_eq!(slices[1].color, slices[7].color);
        assert_ne!(slices[0].color, slices[1].color);
    }

    #[test]
    fn test_slice_point_orientation() {
        let top = slice_point(0.0, 1.0);
        assert_close(top[0], 0.0);
        assert_close(top[1], 1.0);

        let right = slice_point(90.0, 1.0);
        assert_close(right[0], 1.0);
        assert_close(right[1], 0.0);

        let bottom = slice_point(180.0, 2.0);
        assert_close(bottom[0], 0.0);
        assert_close(bottom[1], -2.0);
    }

    #[test]
    fn test_wedges_split_wide_slices() {
        let slice = &pie_slices(&series(&[10.0, 20.0, 30.0]))[2];
        let wedges = slice.wedges(1.0, 8);
        assert_eq!(wedges.len(), 2);
        for wedge in &wedges {
            assert_eq!(wedge[0], [0.0, 0.0]);
            assert_eq!(wedge.len(), 10);
        }
        // First arc point starts at 180 degrees (6 o'clock)
        assert_close(wedges[0][1][1], -1.0);
    }

    #[test]
    fn test_zero_sweep_has_no_wedges() {
        let slice = &pie_slices(&series(&[0.0, 5.0]))[0];
        assert!(slice.wedges(1.0, 8).is_empty());
    }

    #[test]
    fn test_line_points_sorted() {
        let samples = vec![
            Sample::new(ts(3), 3.0),
            Sample::new(ts(1), 1.0),
            Sample::new(ts(2), 2.0),
        ];
        let points = line_points(&samples);
        let values: Vec<f64> = points.iter().map(|p| p[1]).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        assert_eq!(points[0][0], ts(1).timestamp() as f64);
        assert_eq!(bar_points(&samples), points);
    }

    #[test]
    fn test_bar_width() {
        let points = line_points(&series(&[1.0, 2.0, 3.0]));
        assert_close(bar_width(&points), 86_400.0 * 0.8);
        assert_close(bar_width(&points[..1]), 3600.0);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_pie_angles_monotone_for_non_negative(
            values in prop::collection::vec(0.0f64..1e6, 1..30)
        ) {
            let slices = pie_slices(&series(&values));
            prop_assert_eq!(slices[0].start_deg, 0.0);
            for pair in slices.windows(2) {
                prop_assert_eq!(pair[0].end_deg, pair[1].start_deg);
                prop_assert!(pair[0].sweep_deg() >= 0.0);
            }
            prop_assert!(slices.last().unwrap().end_deg <= 360.0 + 1e-9);
        }
    }
}
