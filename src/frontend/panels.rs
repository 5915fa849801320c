//! Panel components for the frontend UI
//!
//! Each panel renders one piece of the dashboard and reports what the user
//! asked for as [`AppAction`]s. Panels never talk to the store worker.
//!
//! # Panels
//!
//! - [`EntryPanel`] - Append a single sample by hand
//! - [`RangePanel`] - Edit and apply the date range filter
//! - [`StatsPanel`] - Count, total, average, min and max of the visible samples
//! - [`ImportPanel`] - Local file and URL imports, recent sources, export
//! - [`SampleTable`] - Scrollable list of the visible samples
//! - [`ViewSettingsPanel`] - Chart kind, legend, markers, fetch policy, theme

use super::plot::format_value;
use super::state::{AppAction, EntryForm, RangeForm};
use crate::config::settings::RuntimeSettings;
use crate::config::{FetchPolicy, RecentSource, SourceKind};
use crate::types::{format_timestamp, ChartKind, DerivedStats, Sample};
use egui::{Color32, RichText, Ui};
use std::path::PathBuf;

const FILE_FILTER_NAME: &str = "Series data";
const FILE_EXTENSIONS: &[&str] = &["json", "csv"];
const EXPORT_FILE_NAME: &str = "series.json";

/// Manual sample entry
pub struct EntryPanel;

impl EntryPanel {
    pub fn render(ui: &mut Ui, form: &mut EntryForm) -> Option<AppAction> {
        let mut action = None;

        egui::Grid::new("entry_form")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label("Value:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.value_text)
                        .desired_width(160.0)
                        .hint_text("e.g. 42.5"),
                );
                ui.end_row();

                ui.label("Timestamp:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.timestamp_text)
                        .desired_width(160.0)
                        .hint_text("empty = now"),
                );
                ui.end_row();
            });

        if ui.button("➕ Add sample").clicked() {
            match form.parse() {
                Ok((value, timestamp)) => {
                    action = Some(AppAction::AppendSample { value, timestamp });
                    form.reset();
                }
                Err(e) => form.error = Some(e),
            }
        }

        if let Some(error) = &form.error {
            ui.colored_label(Color32::LIGHT_RED, format!("⚠ {}", error));
        }

        action
    }
}

/// Date range filter
pub struct RangePanel;

impl RangePanel {
    pub fn render(
        ui: &mut Ui,
        form: &mut RangeForm,
        settings: &RuntimeSettings,
        has_samples: bool,
    ) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::Grid::new("range_form")
            .num_columns(2)
            .spacing([10.0, 6.0])
            .show(ui, |ui| {
                ui.label("Start:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.start_text)
                        .desired_width(190.0)
                        .hint_text("2024-01-01T00:00:00Z"),
                );
                ui.end_row();

                ui.label("End:");
                ui.add(
                    egui::TextEdit::singleline(&mut form.end_text)
                        .desired_width(190.0)
                        .hint_text("2024-12-31T23:59:59Z"),
                );
                ui.end_row();
            });

        ui.horizontal(|ui| {
            if ui.button("Apply").clicked() {
                match form.parse() {
                    Ok(range) => {
                        form.error = None;
                        actions.push(AppAction::ApplyRange(range));
                    }
                    Err(e) => form.error = Some(e),
                }
            }
            if ui
                .add_enabled(has_samples, egui::Button::new("Fit to data"))
                .clicked()
            {
                actions.push(AppAction::FitRangeToData);
            }
            if ui
                .add_enabled(settings.range.is_some(), egui::Button::new("Clear"))
                .clicked()
            {
                actions.push(AppAction::ClearRange);
            }
        });

        if settings.range.is_some() {
            let mut enabled = settings.filter_enabled;
            if ui.checkbox(&mut enabled, "Filter enabled").changed() {
                actions.push(AppAction::ToggleFilter);
            }
        }

        if let Some(error) = &form.error {
            ui.colored_label(Color32::LIGHT_RED, format!("⚠ {}", error));
        }
        if settings.active_range().is_some_and(|r| r.is_inverted()) {
            ui.colored_label(Color32::YELLOW, "Start is after end; nothing matches");
        }

        actions
    }
}

/// Derived statistics
pub struct StatsPanel;

impl StatsPanel {
    pub fn render(ui: &mut Ui, stats: &DerivedStats, filtered: bool) {
        let scope = if filtered { "in range" } else { "all samples" };
        ui.label(RichText::new(format!("Statistics ({})", scope)).strong());

        egui::Grid::new("stats_grid")
            .num_columns(2)
            .spacing([16.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                let rows = [
                    ("Count", stats.count.to_string()),
                    ("Total", format!("{:.2}", stats.total)),
                    ("Average", format!("{:.2}", stats.average)),
                    ("Min", format!("{:.2}", stats.min)),
                    ("Max", format!("{:.2}", stats.max)),
                ];
                for (label, value) in rows {
                    ui.label(label);
                    ui.label(RichText::new(value).monospace());
                    ui.end_row();
                }
            });
    }
}

/// File and URL imports
pub struct ImportPanel;

impl ImportPanel {
    pub fn render(
        ui: &mut Ui,
        url_text: &mut String,
        recent: &[RecentSource],
        pending_fetches: usize,
    ) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            if ui.button("📂 Open file...").clicked() {
                if let Some(path) = pick_import_file() {
                    actions.push(AppAction::ImportFile(path));
                }
            }
            if ui.button("💾 Export JSON...").clicked() {
                if let Some(path) = pick_export_file() {
                    actions.push(AppAction::Export(path));
                }
            }
        });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(url_text)
                    .desired_width(220.0)
                    .hint_text("https://example.com/series.json"),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            let can_fetch = !url_text.trim().is_empty();
            if (ui.add_enabled(can_fetch, egui::Button::new("Fetch")).clicked() || submitted)
                && can_fetch
            {
                actions.push(AppAction::ImportUrl(url_text.trim().to_string()));
            }
        });

        if pending_fetches > 0 {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(format!("{} fetch(es) in flight", pending_fetches));
            });
        }

        if !recent.is_empty() {
            ui.add_space(4.0);
            ui.collapsing("Recent sources", |ui| {
                for source in recent {
                    let icon = match source.kind {
                        SourceKind::File => "📄",
                        SourceKind::Url => "🌐",
                    };
                    let button = ui
                        .button(format!("{} {}", icon, source.location))
                        .on_hover_text("Import again");
                    if button.clicked() {
                        actions.push(match source.kind {
                            SourceKind::File => AppAction::ImportFile(PathBuf::from(&source.location)),
                            SourceKind::Url => AppAction::ImportUrl(source.location.clone()),
                        });
                    }
                }
            });
        }

        actions
    }
}

pub(super) fn pick_import_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(FILE_FILTER_NAME, FILE_EXTENSIONS)
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file()
}

/// Export always writes the structured format
pub(super) fn pick_export_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("JSON", &["json"])
        .set_file_name(EXPORT_FILE_NAME)
        .save_file()
}

/// Scrollable sample list, in store order
pub struct SampleTable;

impl SampleTable {
    pub fn render(ui: &mut Ui, samples: &[Sample]) {
        let row_height = ui.text_style_height(&egui::TextStyle::Monospace) + 4.0;

        egui::ScrollArea::vertical()
            .id_salt("sample_table")
            .auto_shrink([false, true])
            .max_height(220.0)
            .show_rows(ui, row_height, samples.len(), |ui, rows| {
                egui::Grid::new("sample_table_grid")
                    .num_columns(3)
                    .striped(true)
                    .spacing([16.0, 2.0])
                    .show(ui, |ui| {
                        for index in rows {
                            let sample = &samples[index];
                            ui.label(RichText::new(format!("#{}", sample.id().get())).weak());
                            ui.label(RichText::new(format_timestamp(sample.timestamp)).monospace());
                            ui.label(RichText::new(format_value(sample.value)).monospace());
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Chart and behaviour settings
pub struct ViewSettingsPanel;

impl ViewSettingsPanel {
    pub fn render(
        ui: &mut Ui,
        settings: &mut RuntimeSettings,
        fetch_policy: FetchPolicy,
        dark_mode: bool,
    ) -> Vec<AppAction> {
        let mut actions = Vec::new();

        ui.horizontal(|ui| {
            for kind in ChartKind::all() {
                let selected = settings.chart_kind == *kind;
                if ui
                    .selectable_label(selected, format!("{} {}", kind.icon(), kind.display_name()))
                    .clicked()
                    && !selected
                {
                    actions.push(AppAction::SetChartKind(*kind));
                }
            }
        });

        ui.horizontal(|ui| {
            ui.checkbox(&mut settings.show_legend, "Legend");
            ui.add_enabled(
                settings.chart_kind == ChartKind::Line,
                egui::Checkbox::new(&mut settings.show_markers, "Markers"),
            );
        });

        ui.horizontal(|ui| {
            ui.label("Overlapping fetches:");
            let mut policy = fetch_policy;
            egui::ComboBox::from_id_salt("fetch_policy")
                .selected_text(policy.display_name())
                .show_ui(ui, |ui| {
                    for option in FetchPolicy::all() {
                        ui.selectable_value(&mut policy, *option, option.display_name());
                    }
                });
            if policy != fetch_policy {
                actions.push(AppAction::SetFetchPolicy(policy));
            }
        });

        let mut dark = dark_mode;
        if ui.checkbox(&mut dark, "Dark mode").changed() {
            actions.push(AppAction::SetDarkMode(dark));
        }

        actions
    }
}
