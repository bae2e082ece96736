//! Error types for bloomwatch processing.

use thiserror::Error;

/// Result type alias using BloomError.
pub type BloomResult<T> = Result<T, BloomError>;

/// Primary error type for bloom detection runs.
#[derive(Debug, Error)]
pub enum BloomError {
    // === Source Errors ===
    #[error("Source raster not found or unreadable: {0}")]
    SourceUnreadable(String),

    #[error("Invalid raster data: {0}")]
    InvalidRaster(String),

    #[error("Network fetch failed: {0}")]
    NetworkFailure(String),

    // === Configuration Errors ===
    #[error("Invalid configuration value for '{param}': {message}")]
    InvalidConfig { param: String, message: String },

    // === Output Errors ===
    #[error("Failed to serialize feature collection: {0}")]
    SerializationFailure(String),

    #[error("Failed to write output file: {0}")]
    WriteFailure(String),
}

impl BloomError {
    /// True when the run should be skipped rather than reported as broken
    /// configuration (missing files and network failures are expected in
    /// day-to-day operation; bad config is not).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BloomError::SourceUnreadable(_) | BloomError::NetworkFailure(_)
        )
    }
}

impl From<std::io::Error> for BloomError {
    fn from(err: std::io::Error) -> Self {
        BloomError::WriteFailure(err.to_string())
    }
}

impl From<serde_json::Error> for BloomError {
    fn from(err: serde_json::Error) -> Self {
        BloomError::SerializationFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(BloomError::SourceUnreadable("x".into()).is_recoverable());
        assert!(BloomError::NetworkFailure("x".into()).is_recoverable());
        assert!(!BloomError::InvalidConfig {
            param: "threshold".into(),
            message: "out of range".into()
        }
        .is_recoverable());
    }
}
