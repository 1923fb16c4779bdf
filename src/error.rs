//! Typed errors for the scraper core.
//!
//! One enum per concern. Fetch and registry errors are fatal to a run;
//! transform errors never leave the engine.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while obtaining a document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The configured URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure (DNS, timeout, connection refused)
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Body could not be turned into an HTML document
    #[error("failed to parse document: {0}")]
    ParseFailure(String),

    /// Caller cancelled the fetch before it completed
    #[error("fetch cancelled")]
    Cancelled,
}

/// Errors raised while building a field registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate field label: {0}")]
    DuplicateLabel(String),

    #[error("field label must not be empty")]
    EmptyLabel,

    #[error("field label {0:?} contains a line break")]
    MultilineLabel(String),

    #[error("empty selector for field {0}")]
    EmptySelector(String),

    #[error("invalid selector {selector:?} for field {label}: {reason}")]
    InvalidSelector {
        label: String,
        selector: String,
        reason: String,
    },

    #[error("unknown transform {name:?} for field {label}")]
    UnknownTransform { label: String, name: String },
}

/// Failure of a single value transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("not a number: {0:?}")]
    NotNumeric(String),

    #[error("empty value")]
    Empty,

    #[error("{0}")]
    Custom(String),
}

/// Errors raised while rendering a snapshot.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Env { key: String, reason: String },

    #[error("failed to read field file {path}: {source}")]
    FieldsFile {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}
