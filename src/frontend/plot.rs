//! Chart rendering with egui_plot
//!
//! [`ChartView`] maps the geometry from [`crate::chart`] onto plot items:
//!
//! - **Line**: one `Line` plus optional markers, x = time
//! - **Bar**: one `Bar` per sample, width from the tightest spacing
//! - **Pie**: convex `Polygon` wedges on an equal-aspect plot with no axes
//!
//! Time axes show UTC dates; the precision follows the visible span.

use crate::chart::{self, PieSlice};
use crate::config::settings::RuntimeSettings;
use crate::types::{seconds_to_timestamp, ChartKind, Sample};
use egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Corner, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon};
use std::ops::RangeInclusive;

const SERIES_NAME: &str = "Series";
const PIE_RADIUS: f64 = 1.0;
const PIE_ARC_STEPS: usize = 24;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Chart configuration and rendering
#[derive(Debug, Clone)]
pub struct ChartView {
    pub line_width: f32,
    pub marker_radius: f32,
    pub show_grid: bool,
}

impl Default for ChartView {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            marker_radius: 3.5,
            show_grid: true,
        }
    }
}

impl ChartView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render `samples` in the chart kind selected in `settings`
    pub fn render(&self, ui: &mut Ui, samples: &[Sample], settings: &RuntimeSettings) {
        if samples.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.weak("No samples to display");
            });
            return;
        }

        match settings.chart_kind {
            ChartKind::Line => self.render_line(ui, samples, settings),
            ChartKind::Bar => self.render_bar(ui, samples, settings),
            ChartKind::Pie => self.render_pie(ui, samples, settings),
        }
    }

    fn render_line(&self, ui: &mut Ui, samples: &[Sample], settings: &RuntimeSettings) {
        let points = chart::line_points(samples);
        let color = to_color32(chart::palette_color(0));
        let show_markers = settings.show_markers;

        time_plot("series_line_plot", self.show_grid, settings.show_legend)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(SERIES_NAME, PlotPoints::from(points.clone()))
                        .color(color)
                        .width(self.line_width),
                );
                if show_markers {
                    plot_ui.points(
                        Points::new(SERIES_NAME, PlotPoints::from(points))
                            .color(color)
                            .radius(self.marker_radius),
                    );
                }
            });
    }

    fn render_bar(&self, ui: &mut Ui, samples: &[Sample], settings: &RuntimeSettings) {
        let points = chart::bar_points(samples);
        let width = chart::bar_width(&points);
        let color = to_color32(chart::palette_color(0));

        let bars: Vec<Bar> = points
            .iter()
            .map(|[x, y]| Bar::new(*x, *y).width(width).fill(color))
            .collect();

        time_plot("series_bar_plot", self.show_grid, settings.show_legend)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(SERIES_NAME, bars).color(color));
            });
    }

    fn render_pie(&self, ui: &mut Ui, samples: &[Sample], settings: &RuntimeSettings) {
        let slices = chart::pie_slices(samples);

        let mut plot = Plot::new("series_pie_plot")
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show_x(false)
            .show_y(false);

        if settings.show_legend {
            plot = plot.legend(Legend::default().position(Corner::RightTop));
        }

        plot.show(ui, |plot_ui| {
            for slice in &slices {
                let name = slice_label(slice);
                let color = to_color32(slice.color);
                for wedge in slice.wedges(PIE_RADIUS, PIE_ARC_STEPS) {
                    plot_ui.polygon(
                        Polygon::new(name.clone(), PlotPoints::from(wedge))
                            .fill_color(color)
                            .stroke(egui::Stroke::new(1.0, Color32::from_gray(30))),
                    );
                }
            }
        });
    }
}

/// Plot with a UTC date x axis
fn time_plot(id: &'static str, show_grid: bool, show_legend: bool) -> Plot {
    let mut plot = Plot::new(id)
        .show_axes(true)
        .show_grid(show_grid)
        .x_axis_label("Time (UTC)")
        .y_axis_label("Value")
        .x_axis_formatter(|mark: GridMark, range: &RangeInclusive<f64>| {
            axis_label(mark.value, range.end() - range.start())
        });

    if show_legend {
        plot = plot.legend(
            Legend::default()
                .position(Corner::RightTop)
                .background_alpha(0.8),
        );
    }
    plot
}

fn to_color32(rgba: [u8; 4]) -> Color32 {
    Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3])
}

/// Legend entry for a pie slice; wedges of one slice share it
fn slice_label(slice: &PieSlice) -> String {
    format!(
        "#{} {} ({:.1}%)",
        slice.index + 1,
        format_value(slice.value),
        slice.fraction() * 100.0
    )
}

/// Compact numeric label
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a Unix-seconds axis value; finer spans show the time of day
pub fn axis_label(seconds: f64, span: f64) -> String {
    let Some(ts) = seconds_to_timestamp(seconds) else {
        return String::new();
    };
    if span > 3.0 * SECONDS_PER_DAY {
        ts.format("%Y-%m-%d").to_string()
    } else if span > 60.0 {
        ts.format("%m-%d %H:%M").to_string()
    } else {
        ts.format("%H:%M:%S").to_string()
    }
}
