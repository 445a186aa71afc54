//! Error types for the loadtree crate.
//!
//! Each layer owns a `thiserror` enum; [`ApiError`] is what the library surface
//! returns to callers.

use thiserror::Error;

/// Errors raised while moving artifact bytes from a remote repository.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("artifact not found at {0}")]
    NotFound(String),

    #[error("unexpected HTTP status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("no transport supports repository URL {0}")]
    UnsupportedScheme(String),

    #[error("invalid repository URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the local artifact store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid store path: {0}")]
    InvalidPath(String),

    #[error("metadata descriptor error: {0}")]
    Metadata(String),
}

/// Library-level error surfaced to callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid context name '{0}': names must be non-empty and must not contain '/'")]
    InvalidName(String),

    #[error("unknown parent context: {0}")]
    UnknownParent(String),

    #[error("failed to resolve {coordinate} from repository '{repository}': {cause}")]
    ResolutionFailure {
        coordinate: String,
        repository: String,
        cause: String,
    },

    #[error("metadata not found for {group_id}:{artifact_id}")]
    MetadataNotFound {
        group_id: String,
        artifact_id: String,
    },

    #[error("failed to install {coordinate}: {cause}")]
    InstallFailure { coordinate: String, cause: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    RequestError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
