//! Ingestion gateway
//!
//! Turns external bytes into validated samples and commits them to a
//! [`SeriesStore`]. Two sources are supported:
//!
//! - **Local**: any reader plus a declared content kind (file extension or
//!   MIME type). The kind selects the structured ([`json`]) or delimited
//!   ([`csv`]) decoder.
//! - **Remote**: a URL fetched once through a [`RemoteSource`]. Remote bodies
//!   are always decoded as the structured format.
//!
//! A successful decode replaces the whole series, even when it yields no
//! samples. Any failure leaves the store untouched and is returned to the
//! caller as an [`ImportError`].
//!
//! The asynchronous half ([`fetch_remote`]) never touches a store. Callers
//! hand its result to whichever context owns the store; see
//! [`crate::store::worker`].

pub mod csv;
pub mod json;
pub mod remote;

pub use remote::{parse_url, HttpSource, RemoteSource};

use crate::error::ImportError;
use crate::store::SeriesStore;
use crate::types::Sample;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Which decoder a payload is meant for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// JSON array of `{timestamp, value}` objects
    Structured,
    /// Two-column comma separated text
    Delimited,
}

impl ImportKind {
    /// Resolve a declared kind: a file extension (`json`, `.csv`) or a MIME type
    pub fn from_declared(declared: &str) -> Result<Self, ImportError> {
        let normalized = declared.trim().trim_start_matches('.').to_ascii_lowercase();
        // Drop MIME parameters such as "; charset=utf-8"
        let essence = normalized.split(';').next().unwrap_or_default().trim();

        match essence {
            "json" | "application/json" | "text/json" | "public.json" => Ok(ImportKind::Structured),
            "csv" | "text/csv" | "text/comma-separated-values" | "public.comma-separated-values-text" => {
                Ok(ImportKind::Delimited)
            }
            _ => Err(ImportError::UnsupportedFormat(declared.trim().to_string())),
        }
    }

    /// Resolve the kind from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ImportError::UnsupportedFormat(format!("{} has no extension", path.display()))
            })?;
        Self::from_declared(extension)
    }

    /// Run the matching decoder
    pub fn decode(self, bytes: &[u8]) -> Result<Vec<Sample>, ImportError> {
        match self {
            ImportKind::Structured => json::decode(bytes),
            ImportKind::Delimited => csv::decode(bytes),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ImportKind::Structured => "JSON",
            ImportKind::Delimited => "CSV",
        }
    }
}

/// Where an import came from, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOrigin {
    File(PathBuf),
    Remote(String),
}

impl std::fmt::Display for ImportOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportOrigin::File(path) => write!(f, "{}", path.display()),
            ImportOrigin::Remote(url) => f.write_str(url),
        }
    }
}

/// Outcome of a committed import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Samples now in the series
    pub count: usize,
    /// Store version after the replace
    pub version: u64,
}

/// Read a source to the end and decode it as `kind`
pub fn read_local<R: Read>(mut reader: R, kind: ImportKind) -> Result<Vec<Sample>, ImportError> {
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| ImportError::Read(e.to_string()))?;
    kind.decode(&bytes)
}

/// Read and decode a file, choosing the decoder from its extension
pub fn load_file(path: &Path) -> Result<Vec<Sample>, ImportError> {
    let kind = ImportKind::from_path(path)?;
    let file = std::fs::File::open(path)
        .map_err(|e| ImportError::Read(format!("{}: {}", path.display(), e)))?;
    read_local(file, kind)
}

/// Import from a local reader with a declared kind and replace the series
pub fn import_local<R: Read>(
    store: &mut SeriesStore,
    reader: R,
    declared: &str,
) -> Result<ImportSummary, ImportError> {
    let kind = ImportKind::from_declared(declared)?;
    let samples = read_local(reader, kind)?;
    Ok(commit(store, samples))
}

/// Decode a fetched body as the structured format
pub fn decode_remote_body(url: &str, body: &[u8]) -> Result<Vec<Sample>, ImportError> {
    if body.is_empty() {
        return Err(ImportError::EmptyResponse(url.to_string()));
    }
    json::decode(body)
}

/// Validate, fetch and decode a remote URL
///
/// Does not touch any store: the caller commits the result on the context
/// that owns the series.
pub async fn fetch_remote(source: &dyn RemoteSource, url: &str) -> Result<Vec<Sample>, ImportError> {
    let url = parse_url(url)?;
    let body = source.fetch(&url).await?;
    decode_remote_body(url.as_str(), &body)
}

/// Replace the series with freshly imported samples
pub fn commit(store: &mut SeriesStore, samples: Vec<Sample>) -> ImportSummary {
    let count = samples.len();
    let version = store.replace(samples);
    ImportSummary { count, version }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;
    use remote::MockRemoteSource;

    fn seeded_store() -> SeriesStore {
        let mut store = SeriesStore::new();
        store.append(Sample::now(1.0));
        store.append(Sample::now(2.0));
        store
    }

    #[test]
    fn test_declared_kinds() {
        assert_eq!(ImportKind::from_declared("json").unwrap(), ImportKind::Structured);
        assert_eq!(ImportKind::from_declared(".JSON").unwrap(), ImportKind::Structured);
        assert_eq!(
            ImportKind::from_declared("application/json; charset=utf-8").unwrap(),
            ImportKind::Structured
        );
        assert_eq!(ImportKind::from_declared("csv").unwrap(), ImportKind::Delimited);
        assert_eq!(ImportKind::from_declared("text/csv").unwrap(), ImportKind::Delimited);
        assert!(matches!(
            ImportKind::from_declared("xlsx"),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ImportKind::from_path(Path::new("README")),
            Err(ImportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_import_local_replaces_series() {
        let mut store = seeded_store();
        let csv = "timestamp,value\n2024-01-01T00:00:00Z,10\n2024-01-02T00:00:00Z,20\n";

        let summary = import_local(&mut store, csv.as_bytes(), "csv").unwrap();

        assert_eq!(summary.count, 2);
        assert_eq!(summary.version, store.version());
        let values: Vec<f64> = store.samples().iter().map(|s| s.value).collect();
        assert_eq!(values, vec![10.0, 20.0]);
    }

    #[test]
    fn test_import_local_empty_result_still_replaces() {
        let mut store = seeded_store();
        let summary = import_local(&mut store, "garbage\nrows".as_bytes(), "csv").unwrap();
        assert_eq!(summary.count, 0);
        assert!(store.is_empty());
        assert_eq!(store.min_max_timestamp(), None);
    }

    #[test]
    fn test_import_local_failure_leaves_store() {
        let mut store = seeded_store();
        let version = store.version();

        let err = import_local(&mut store, "{ nope".as_bytes(), "json").unwrap_err();
        assert!(matches!(err, ImportError::Decode(_)));

        let err = import_local(&mut store, "x".as_bytes(), "txt").unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));

        assert_eq!(store.len(), 2);
        assert_eq!(store.version(), version);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("device unplugged"))
        }
    }

    #[test]
    fn test_read_failure_is_reported() {
        let mut store = seeded_store();
        let err = import_local(&mut store, FailingReader, "json").unwrap_err();
        assert!(matches!(err, ImportError::Read(_)));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_remote_decodes_structured_body() {
        let mut source = MockRemoteSource::new();
        source.expect_fetch().times(1).returning(|_| {
            Ok(br#"[{"timestamp": "2024-01-01T00:00:00Z", "value": 42}]"#.to_vec())
        });

        let samples = fetch_remote(&source, "https://example.com/data").await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 42.0);
    }

    #[tokio::test]
    async fn test_fetch_remote_rejects_invalid_url_without_fetching() {
        let mut source = MockRemoteSource::new();
        source.expect_fetch().never();

        let err = fetch_remote(&source, "definitely not a url").await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_fetch_remote_empty_body() {
        let mut source = MockRemoteSource::new();
        source.expect_fetch().returning(|_| Ok(Vec::new()));

        let err = fetch_remote(&source, "https://example.com/data").await.unwrap_err();
        assert!(matches!(err, ImportError::EmptyResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_remote_never_uses_delimited_decoder() {
        let mut source = MockRemoteSource::new();
        source
            .expect_fetch()
            .returning(|_| Ok(b"2024-01-01T00:00:00Z,5\n".to_vec()));

        let err = fetch_remote(&source, "https://example.com/data.csv").await.unwrap_err();
        assert!(matches!(err, ImportError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_remote_network_error_passthrough() {
        let mut source = MockRemoteSource::new();
        source
            .expect_fetch()
            .returning(|_| Err(ImportError::Network("connection refused".to_string())));

        let err = fetch_remote(&source, "http://127.0.0.1:9/").await.unwrap_err();
        assert_eq!(err, ImportError::Network("connection refused".to_string()));
    }
}
