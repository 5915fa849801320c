//! SeriesDash - Main Entry Point
//!
//! Desktop dashboard for a single time series of numeric samples.

use anyhow::Context;
use seriesdash_rs::{
    config::{self, AppState},
    frontend::DashApp,
    store::StoreWorker,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE_PREFIX: &str = "seriesdash.log";

/// Install the subscriber; the guard must live until exit to flush the file
fn init_logging(log_to_file: bool) -> Option<WorkerGuard> {
    let (file_layer, guard) = match config::log_dir().filter(|_| log_to_file) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (
                Some(fmt::layer().with_writer(writer).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,seriesdash_rs=debug")),
        )
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    // Load application state (preferences, recent sources, config)
    let mut app_state = AppState::load_or_default();
    let _log_guard = init_logging(app_state.config.log_to_file);

    tracing::info!("Starting SeriesDash");

    // Clean up any missing recent files
    app_state.cleanup_missing_sources();

    let (bridge, worker_handle) =
        StoreWorker::spawn(&app_state.config).context("Failed to start store worker")?;

    // Configure eframe options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("SeriesDash"),
        ..Default::default()
    };

    let dark_mode = app_state.dark_mode;
    let result = eframe::run_native(
        "SeriesDash",
        native_options,
        Box::new(move |cc| {
            if dark_mode {
                cc.egui_ctx.set_visuals(egui::Visuals::dark());
            } else {
                cc.egui_ctx.set_visuals(egui::Visuals::light());
            }

            // The app joins the worker in on_exit
            Ok(Box::new(DashApp::new(bridge, Some(worker_handle), app_state)))
        }),
    );

    tracing::info!("Shutting down...");
    result.map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
