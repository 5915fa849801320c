//! Integration tests for local imports
//!
//! These tests validate the file import workflow:
//! - Declared-kind detection and decoding through the gateway
//! - File imports through the store worker
//! - Export followed by re-import

mod common;

use common::builders::SeriesBuilder;
use common::mock_helpers::ScriptedSource;
use common::{collect_until, jan, last_snapshot_values};
use seriesdash_rs::bridge::StoreMessage;
use seriesdash_rs::config::AppConfig;
use seriesdash_rs::error::ImportError;
use seriesdash_rs::ingest::{self, ImportKind, RemoteSource};
use seriesdash_rs::store::{SeriesStore, StoreWorker};
use seriesdash_rs::types::{Sample, SEED_VALUES};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

fn seeded_store() -> SeriesStore {
    SeriesStore::with_samples(SeriesBuilder::new(jan(1)).values(&SEED_VALUES).build())
}

fn values(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.value).collect()
}

#[test]
fn test_import_local_json() {
    let mut store = seeded_store();
    let body = SeriesBuilder::new(jan(10)).values(&[1.5, 2.5]).to_json();

    let summary = ingest::import_local(&mut store, Cursor::new(body), "application/json").unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(summary.version, store.version());
    assert_eq!(values(store.samples()), vec![1.5, 2.5]);
    assert_eq!(store.samples()[0].timestamp, jan(10));
}

#[test]
fn test_import_local_csv_skips_bad_rows() {
    let mut store = seeded_store();
    let body = "timestamp,value\n\
                2024-01-01T00:00:00Z,1\n\
                not-a-date,2\n\
                2024-01-03T00:00:00Z,abc\n\
                2024-01-04T00:00:00Z,4,extra\n\
                \n\
                2024-01-05T00:00:00+02:00,5\n";

    let summary = ingest::import_local(&mut store, Cursor::new(body), ".csv").unwrap();

    assert_eq!(summary.count, 2);
    assert_eq!(values(store.samples()), vec![1.0, 5.0]);
    // Offsets are normalized to UTC
    assert_eq!(
        store.samples()[1].timestamp,
        jan(4) + chrono::Duration::hours(22)
    );
}

#[test]
fn test_import_local_unsupported_kind_keeps_series() {
    let mut store = seeded_store();
    let before = store.version();

    let err = ingest::import_local(&mut store, Cursor::new("a,b"), "text/plain").unwrap_err();

    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    assert_eq!(store.version(), before);
    assert_eq!(values(store.samples()), SEED_VALUES.to_vec());
}

#[test]
fn test_import_local_malformed_json_keeps_series() {
    let mut store = seeded_store();
    let before = store.version();

    let err = ingest::import_local(&mut store, Cursor::new("[{\"value\": 1}]"), "json").unwrap_err();

    assert_eq!(err.kind(), "decode");
    assert_eq!(store.version(), before);
}

#[test]
fn test_import_empty_json_array_clears_series() {
    let mut store = seeded_store();
    let summary = ingest::import_local(&mut store, Cursor::new("[]"), "json").unwrap();
    assert_eq!(summary.count, 0);
    assert!(store.is_empty());
    assert!(store.min_max_timestamp().is_none());
}

#[test]
fn test_kind_from_path() {
    assert_eq!(
        ImportKind::from_path(Path::new("data/series.JSON")).unwrap(),
        ImportKind::Structured
    );
    assert_eq!(
        ImportKind::from_path(Path::new("series.csv")).unwrap(),
        ImportKind::Delimited
    );
    assert!(ImportKind::from_path(Path::new("series.xlsx")).is_err());
    assert!(ImportKind::from_path(Path::new("series")).is_err());
}

#[test]
fn test_load_file_missing_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ingest::load_file(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ImportError::Read(_)));
}

#[test]
fn test_worker_imports_files() {
    let dir = tempfile::tempdir().unwrap();
    let builder = SeriesBuilder::new(jan(1)).values(&[7.0, 8.0, 9.0]);
    let json_path = dir.path().join("series.json");
    let csv_path = dir.path().join("series.csv");
    std::fs::write(&json_path, builder.to_json()).unwrap();
    std::fs::write(&csv_path, builder.to_csv()).unwrap();

    let source: Arc<dyn RemoteSource> = Arc::new(ScriptedSource::new());
    let (bridge, handle) = StoreWorker::spawn_with_source(&AppConfig::default(), source).unwrap();

    for path in [json_path, csv_path] {
        bridge.import_file(path.clone());
        let messages = collect_until(&bridge, |m| {
            matches!(
                m,
                StoreMessage::ImportSucceeded { .. } | StoreMessage::ImportFailed { .. }
            )
        });
        assert!(
            matches!(messages.last(), Some(StoreMessage::ImportSucceeded { .. })),
            "import of {} failed: {:?}",
            path.display(),
            messages.last()
        );
        assert_eq!(last_snapshot_values(&messages), Some(vec![7.0, 8.0, 9.0]));
    }

    bridge.shutdown();
    handle.join().unwrap();
}

#[test]
fn test_export_then_import_keeps_observations() {
    let original = SeriesBuilder::new(jan(3))
        .step(chrono::Duration::minutes(90))
        .values(&[0.25, -4.0, 1e6])
        .build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");
    std::fs::write(&path, ingest::json::encode(&original).unwrap()).unwrap();

    let reloaded = ingest::load_file(&path).unwrap();
    assert_eq!(reloaded.len(), original.len());
    for (a, b) in original.iter().zip(&reloaded) {
        assert!(a.same_observation(b));
    }
}

#[test]
fn test_export_keeps_subsecond_timestamps() {
    let original = SeriesBuilder::new(jan(5) + chrono::Duration::milliseconds(750))
        .step(chrono::Duration::microseconds(1_500_250))
        .values(&[1.0, 2.0, 3.0])
        .build();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("live.json");
    std::fs::write(&path, ingest::json::encode(&original).unwrap()).unwrap();

    let reloaded = ingest::load_file(&path).unwrap();
    let timestamps = |samples: &[Sample]| samples.iter().map(|s| s.timestamp).collect::<Vec<_>>();
    assert_eq!(timestamps(&reloaded), timestamps(&original));
}

#[test]
fn test_import_file_with_byte_order_mark() {
    let dir = tempfile::tempdir().unwrap();
    let body = SeriesBuilder::new(jan(1)).values(&[3.0, 4.0]).to_csv();
    let body = body.lines().skip(1).collect::<Vec<_>>().join("\n");

    let csv_path = dir.path().join("excel.csv");
    std::fs::write(&csv_path, format!("\u{feff}{}", body)).unwrap();
    assert_eq!(values(&ingest::load_file(&csv_path).unwrap()), vec![3.0, 4.0]);

    let json_path = dir.path().join("excel.json");
    let json = SeriesBuilder::new(jan(1)).values(&[3.0, 4.0]).to_json();
    std::fs::write(&json_path, format!("\u{feff}{}", json)).unwrap();
    assert_eq!(values(&ingest::load_file(&json_path).unwrap()), vec![3.0, 4.0]);
}
