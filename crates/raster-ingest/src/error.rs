//! Error types for raster ingestion.

use thiserror::Error;

/// Result type for raster ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error types for raster loading.
#[derive(Error, Debug)]
pub enum IngestError {
    /// File I/O error (missing or unreadable source).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The container could not be decoded.
    #[error("Failed to decode raster: {0}")]
    Decode(String),

    /// Missing required variable, tag, or dimension.
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Structurally valid container with unusable contents.
    #[error("Invalid raster contents: {0}")]
    InvalidContents(String),

    /// File extension or layout we do not handle.
    #[error("Unsupported raster format: {0}")]
    UnsupportedFormat(String),
}
