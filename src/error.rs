//! Error handling for the SeriesDash application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.
//!
//! [`ImportError`] is the taxonomy reported for failed imports. It is `Clone`
//! so it can travel from the store worker to the UI inside a message. Every
//! variant is non-fatal: the series is left untouched when one is returned.

use thiserror::Error;

/// Reasons an import (local file or remote endpoint) can fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// Malformed structured payload, or text that is not valid UTF-8
    #[error("Decode error: {0}")]
    Decode(String),

    /// The declared local content kind is neither the structured nor the delimited format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The remote URL could not be parsed or uses a scheme we cannot fetch
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure or a non-success HTTP status
    #[error("Network error: {0}")]
    Network(String),

    /// The transport succeeded but the body was empty
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    /// The local source could not be read
    #[error("Read error: {0}")]
    Read(String),
}

impl ImportError {
    /// Short machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::Decode(_) => "decode",
            ImportError::UnsupportedFormat(_) => "unsupported_format",
            ImportError::InvalidUrl { .. } => "invalid_url",
            ImportError::Network(_) => "network",
            ImportError::EmptyResponse(_) => "empty_response",
            ImportError::Read(_) => "read",
        }
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Decode(err.to_string())
    }
}

impl From<std::str::Utf8Error> for ImportError {
    fn from(err: std::str::Utf8Error) -> Self {
        ImportError::Decode(format!("input is not valid UTF-8: {}", err))
    }
}

/// Main error type for SeriesDash operations
#[derive(Error, Debug)]
pub enum DashError {
    /// Errors raised while importing samples
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to channel communication
    #[error("Channel error: {0}")]
    Channel(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<DashError>,
    },
}

impl DashError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        DashError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The import error at the root of this error, if any
    pub fn as_import(&self) -> Option<&ImportError> {
        match self {
            DashError::Import(err) => Some(err),
            DashError::WithContext { source, .. } => source.as_import(),
            _ => None,
        }
    }
}

/// Result type alias for SeriesDash operations
pub type Result<T> = std::result::Result<T, DashError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ImportError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| DashError::from(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| DashError::from(e).with_context(f()))
    }
}
