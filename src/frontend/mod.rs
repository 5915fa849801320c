//! Frontend module for egui UI
//!
//! This module provides the dashboard UI using eframe/egui. It never owns
//! the series: every change goes to the store worker as a command, and the
//! UI redraws from the latest [`SeriesSnapshot`] it has drained.
//!
//! # Layout
//!
//! - Menu bar: file import/export, chart kind
//! - Left side panel: entry form, imports, range filter, view settings
//! - Central panel: chart, derived statistics and the sample table
//! - Status bar: last event and in-flight fetches
//!
//! # Main Types
//!
//! - [`DashApp`] - Main application state implementing [`eframe::App`]
//! - [`ChartView`] - Chart rendering with egui_plot
//! - [`AppAction`] - What a panel asked for

mod panels;
mod plot;
pub mod state;

pub use panels::*;
pub use plot::{axis_label, format_value, ChartView};
pub use state::{AppAction, EntryForm, RangeForm, StatusLine};

use crate::analysis;
use crate::bridge::{FetchTicket, SeriesSnapshot, StoreBridge, StoreMessage};
use crate::config::settings::RuntimeSettings;
use crate::config::{AppState, SourceKind};
use crate::ingest::ImportOrigin;
use crate::store::min_max_timestamp;
use crate::types::{DateRange, DerivedStats, Sample};
use egui::Color32;
use std::collections::BTreeMap;
use std::thread::JoinHandle;
use std::time::Duration;

/// Poll interval while nothing arrives from the worker
const IDLE_REPAINT: Duration = Duration::from_millis(250);
/// Poll interval while fetches are in flight
const BUSY_REPAINT: Duration = Duration::from_millis(50);

/// Samples and statistics derived from one snapshot and one range
#[derive(Debug, Clone)]
struct VisibleSeries {
    version: u64,
    range: Option<DateRange>,
    samples: Vec<Sample>,
    stats: DerivedStats,
}

/// Main application state for the dashboard
pub struct DashApp {
    // === Communication ===
    bridge: StoreBridge,
    worker: Option<JoinHandle<()>>,

    // === Shared State ===
    app_state: AppState,
    settings: RuntimeSettings,
    snapshot: SeriesSnapshot,
    visible: Option<VisibleSeries>,
    pending_fetches: BTreeMap<FetchTicket, String>,
    status: Option<StatusLine>,
    theme_dirty: bool,

    // === Forms ===
    entry_form: EntryForm,
    range_form: RangeForm,
    url_text: String,

    chart_view: ChartView,
}

impl DashApp {
    /// Create the app around a running store worker
    pub fn new(bridge: StoreBridge, worker: Option<JoinHandle<()>>, app_state: AppState) -> Self {
        let settings = RuntimeSettings::with_chart_kind(app_state.chart_kind);
        let url_text = app_state.last_remote_url.clone().unwrap_or_default();

        Self {
            bridge,
            worker,
            app_state,
            settings,
            snapshot: SeriesSnapshot::default(),
            visible: None,
            pending_fetches: BTreeMap::new(),
            status: None,
            theme_dirty: false,
            entry_form: EntryForm::default(),
            range_form: RangeForm::default(),
            url_text,
            chart_view: ChartView::new(),
        }
    }

    pub fn snapshot(&self) -> &SeriesSnapshot {
        &self.snapshot
    }

    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    pub fn status(&self) -> Option<&StatusLine> {
        self.status.as_ref()
    }

    pub fn range_form(&self) -> &RangeForm {
        &self.range_form
    }

    /// URLs of fetches started but not yet reported back
    pub fn pending_fetches(&self) -> impl Iterator<Item = &str> {
        self.pending_fetches.values().map(String::as_str)
    }

    /// Drain the worker's messages; returns whether anything arrived
    pub fn process_store_messages(&mut self) -> bool {
        let messages = self.bridge.drain();
        let had_messages = !messages.is_empty();

        for msg in messages {
            match msg {
                StoreMessage::Snapshot(snapshot) => {
                    // Versions only grow; an older one can only be a late duplicate
                    if snapshot.version >= self.snapshot.version {
                        self.snapshot = snapshot;
                    }
                }
                StoreMessage::FetchStarted { ticket, url } => {
                    tracing::debug!("Fetch {:?} started: {}", ticket, url);
                    self.pending_fetches.insert(ticket, url);
                }
                StoreMessage::ImportSucceeded { origin, summary } => {
                    self.finish_fetch(&origin);
                    let (location, kind) = match &origin {
                        ImportOrigin::File(path) => (path.display().to_string(), SourceKind::File),
                        ImportOrigin::Remote(url) => (url.clone(), SourceKind::Url),
                    };
                    self.app_state.add_recent_source(location, kind);
                    self.status = Some(StatusLine::info(format!(
                        "Imported {} sample(s) from {}",
                        summary.count, origin
                    )));
                }
                StoreMessage::ImportFailed { origin, error } => {
                    self.finish_fetch(&origin);
                    self.status = Some(StatusLine::error(format!(
                        "Import from {} failed: {}",
                        origin, error
                    )));
                }
                StoreMessage::FetchSuperseded { ticket, url } => {
                    self.pending_fetches.remove(&ticket);
                    self.status = Some(StatusLine::info(format!(
                        "Discarded result from {} (a newer fetch was started)",
                        url
                    )));
                }
                StoreMessage::Exported { path, count } => {
                    self.status = Some(StatusLine::info(format!(
                        "Exported {} sample(s) to {}",
                        count,
                        path.display()
                    )));
                }
                StoreMessage::ExportFailed { path, error } => {
                    self.status = Some(StatusLine::error(format!(
                        "Export to {} failed: {}",
                        path.display(),
                        error
                    )));
                }
                StoreMessage::Shutdown => {
                    tracing::info!("Store worker shutdown received");
                }
            }
        }

        had_messages
    }

    /// Forget the oldest pending fetch for a finished remote import
    fn finish_fetch(&mut self, origin: &ImportOrigin) {
        if let ImportOrigin::Remote(url) = origin {
            let ticket = self
                .pending_fetches
                .iter()
                .find(|(_, pending)| *pending == url)
                .map(|(ticket, _)| *ticket);
            if let Some(ticket) = ticket {
                self.pending_fetches.remove(&ticket);
            }
        }
    }

    pub fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::AppendSample { value, timestamp } => {
                self.bridge.append(value, timestamp);
            }
            AppAction::ImportFile(path) => {
                tracing::info!("Importing {}", path.display());
                self.bridge.import_file(path);
            }
            AppAction::ImportUrl(url) => {
                self.url_text = url.clone();
                self.bridge.import_url(url);
            }
            AppAction::Export(path) => {
                self.bridge.export(path);
            }
            AppAction::SetFetchPolicy(policy) => {
                self.app_state.config.fetch_policy = policy;
                self.bridge.set_fetch_policy(policy);
            }
            AppAction::ApplyRange(range) => {
                self.settings.set_range(range);
            }
            AppAction::ClearRange => {
                self.settings.clear_range();
            }
            AppAction::ToggleFilter => {
                self.settings.toggle_filter();
            }
            AppAction::FitRangeToData => match min_max_timestamp(&self.snapshot.samples) {
                Some(bounds) => self.range_form.fill_from(&bounds),
                None => self.range_form.error = Some("The series is empty".to_string()),
            },
            AppAction::SetChartKind(kind) => {
                self.settings.chart_kind = kind;
                self.app_state.chart_kind = kind;
            }
            AppAction::SetDarkMode(dark) => {
                self.app_state.dark_mode = dark;
                self.theme_dirty = true;
            }
        }
    }

    /// Visible samples and their statistics, recomputed only when the
    /// snapshot or the active range changed
    pub fn visible_series(&mut self) -> (&[Sample], DerivedStats) {
        let range = self.settings.active_range().copied();
        let stale = self
            .visible
            .as_ref()
            .map_or(true, |v| v.version != self.snapshot.version || v.range != range);

        if stale {
            let samples = self.settings.visible_samples(&self.snapshot.samples);
            let stats = analysis::aggregate(&samples);
            self.visible = Some(VisibleSeries {
                version: self.snapshot.version,
                range,
                samples,
                stats,
            });
        }

        match &self.visible {
            Some(v) => (&v.samples, v.stats),
            None => (&[], DerivedStats::default()),
        }
    }

    fn render_side_panel(&mut self, ui: &mut egui::Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.heading("Add sample");
            ui.separator();
            actions.extend(EntryPanel::render(ui, &mut self.entry_form));

            ui.add_space(12.0);
            ui.heading("Import");
            ui.separator();
            actions.extend(ImportPanel::render(
                ui,
                &mut self.url_text,
                &self.app_state.recent_sources,
                self.pending_fetches.len(),
            ));

            ui.add_space(12.0);
            ui.heading("Date range");
            ui.separator();
            actions.extend(RangePanel::render(
                ui,
                &mut self.range_form,
                &self.settings,
                !self.snapshot.samples.is_empty(),
            ));

            ui.add_space(12.0);
            ui.heading("View");
            ui.separator();
            actions.extend(ViewSettingsPanel::render(
                ui,
                &mut self.settings,
                self.app_state.config.fetch_policy,
                self.app_state.dark_mode,
            ));
        });

        actions
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();

        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("Import File...").clicked() {
                    if let Some(path) = panels::pick_import_file() {
                        actions.push(AppAction::ImportFile(path));
                    }
                    ui.close();
                }
                if ui.button("Export JSON...").clicked() {
                    if let Some(path) = panels::pick_export_file() {
                        actions.push(AppAction::Export(path));
                    }
                    ui.close();
                }
                ui.separator();
                if ui.button("Quit").clicked() {
                    ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                    ui.close();
                }
            });

            ui.menu_button("Chart", |ui| {
                for kind in crate::types::ChartKind::all() {
                    if ui
                        .radio(self.settings.chart_kind == *kind, kind.display_name())
                        .clicked()
                    {
                        actions.push(AppAction::SetChartKind(*kind));
                        ui.close();
                    }
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "{} samples · v{}",
                    self.snapshot.samples.len(),
                    self.snapshot.version
                ));
            });
        });

        actions
    }

    fn render_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            match &self.status {
                Some(status) if status.is_error => {
                    ui.colored_label(Color32::LIGHT_RED, format!("⚠ {}", status.text));
                }
                Some(status) => {
                    ui.label(&status.text);
                }
                None => {
                    ui.weak("Ready");
                }
            }

            if !self.pending_fetches.is_empty() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("Fetching {}", self.pending_fetches.len()));
                    ui.spinner();
                });
            }
        });
    }
}

impl eframe::App for DashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_messages = self.process_store_messages();

        if self.theme_dirty {
            ctx.set_visuals(if self.app_state.dark_mode {
                egui::Visuals::dark()
            } else {
                egui::Visuals::light()
            });
            self.theme_dirty = false;
        }

        if had_messages {
            ctx.request_repaint();
        } else if self.pending_fetches.is_empty() {
            ctx.request_repaint_after(IDLE_REPAINT);
        } else {
            ctx.request_repaint_after(BUSY_REPAINT);
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            actions.extend(self.render_menu_bar(ui));
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.render_status_bar(ui);
        });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                actions.extend(self.render_side_panel(ui));
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let filtered = self.settings.active_range().is_some();
            let chart_view = self.chart_view.clone();
            let settings = self.settings.clone();
            let (samples, stats) = self.visible_series();

            egui::TopBottomPanel::bottom("details")
                .resizable(true)
                .default_height(260.0)
                .show_inside(ui, |ui| {
                    ui.columns(2, |columns| {
                        StatsPanel::render(&mut columns[0], &stats, filtered);
                        columns[1].label(
                            egui::RichText::new(format!("Samples ({})", samples.len())).strong(),
                        );
                        SampleTable::render(&mut columns[1], samples);
                    });
                });

            chart_view.render(ui, samples, &settings);
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.bridge.shutdown();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                tracing::warn!("Store worker panicked during shutdown");
            }
        }

        self.app_state.chart_kind = self.settings.chart_kind;
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }
}
