//! Error types shared by sources, sinks, the store and pipeline runs.

use thiserror::Error;

/// Failure while polling a source directory.
///
/// Decode failures never surface here: the offending artifact is logged and
/// skipped inside the source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Source state lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for SinkError {
    fn from(err: rusqlite::Error) -> Self {
        SinkError::Database(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Connection lock poisoned")]
    Poisoned,
}

/// Terminal error of one pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("sink failed: {0}")]
    Sink(#[from] SinkError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
