//! Single-attempt source raster download.
//!
//! One GET per run: a timeout or non-success status fails the site run
//! outright, and bodies under a minimum-size heuristic are rejected as
//! disguised error pages (data providers like to return HTML with a 200).

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{info, instrument};

use bloom_common::{BloomError, BloomResult};

/// Bodies smaller than this are treated as error pages, not rasters.
pub const MIN_PAYLOAD_BYTES: usize = 50 * 1024;

/// Configuration for the source fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Whole-request timeout.
    pub request_timeout: Duration,
    /// Minimum acceptable body size.
    pub min_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(120),
            min_bytes: MIN_PAYLOAD_BYTES,
        }
    }
}

/// Downloads source rasters ahead of a pipeline run.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    /// Create a fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> BloomResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BloomError::NetworkFailure(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Fetch `url` into `dest`, overwriting any previous file.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str, dest: &Path) -> BloomResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BloomError::NetworkFailure(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| BloomError::NetworkFailure(e.to_string()))?;

        validate_payload(status, body.len(), self.config.min_bytes)?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(dest, &body).await?;

        info!(
            dest = %dest.display(),
            bytes = body.len(),
            "Downloaded source raster"
        );
        Ok(())
    }
}

/// Gate a response on status and body size.
fn validate_payload(status: StatusCode, len: usize, min_bytes: usize) -> BloomResult<()> {
    if status != StatusCode::OK {
        return Err(BloomError::NetworkFailure(format!(
            "unexpected HTTP status {}",
            status
        )));
    }
    if len < min_bytes {
        return Err(BloomError::NetworkFailure(format!(
            "body of {} bytes is below the {} byte minimum, likely an error page",
            len, min_bytes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_ok_status() {
        let err = validate_payload(StatusCode::NOT_FOUND, 1_000_000, MIN_PAYLOAD_BYTES)
            .unwrap_err();
        assert!(matches!(err, BloomError::NetworkFailure(_)));
    }

    #[test]
    fn test_rejects_undersized_body() {
        // A 200 with a tiny HTML body is a disguised error page
        let err = validate_payload(StatusCode::OK, 4_096, MIN_PAYLOAD_BYTES).unwrap_err();
        assert!(matches!(err, BloomError::NetworkFailure(_)));
    }

    #[test]
    fn test_accepts_real_payload() {
        assert!(validate_payload(StatusCode::OK, 10_000_000, MIN_PAYLOAD_BYTES).is_ok());
    }
}
