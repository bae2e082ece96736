//! Client for the third-party point time-series task API.
//!
//! The provider is task-based: submit a point-sample task, poll its
//! status until the provider finishes, list the result bundle, download
//! the CSV file inside it, and reduce the index column to one scalar.
//! Credentials come from the environment; nothing secret lives in code.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

/// Errors from the time-series provider round trip.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(String),

    #[error("provider task failed: {0}")]
    TaskFailed(String),

    #[error("provider task still not done after {0} polls")]
    Timeout(u32),

    #[error("provider bundle missing expected data: {0}")]
    MissingData(String),

    #[error("could not parse provider CSV: {0}")]
    Parse(String),
}

/// Provider endpoint and credentials.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub token: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl ProviderConfig {
    /// Read provider settings from the environment.
    ///
    /// Returns `None` (proxy disabled) unless both `BLOOM_PROVIDER_URL`
    /// and `BLOOM_PROVIDER_TOKEN` are set.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("BLOOM_PROVIDER_URL").ok()?;
        let token = std::env::var("BLOOM_PROVIDER_TOKEN").ok()?;
        Some(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: 30,
        })
    }
}

/// One scalar index value for a queried coordinate.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PointSample {
    pub lon: f64,
    pub lat: f64,
    pub mean_index: f64,
    pub samples: usize,
}

#[derive(Debug, Deserialize)]
struct TaskCreated {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct TaskStatus {
    status: String,
}

#[derive(Debug, Deserialize)]
struct Bundle {
    files: Vec<BundleFile>,
}

#[derive(Debug, Deserialize)]
struct BundleFile {
    file_id: String,
    file_name: String,
}

/// Fetch the mean index value for a coordinate from the provider.
pub async fn point_time_series(
    client: &Client,
    config: &ProviderConfig,
    lon: f64,
    lat: f64,
) -> Result<PointSample, ProviderError> {
    let task_id = submit_task(client, config, lon, lat).await?;
    debug!(task_id = %task_id, "Submitted provider task");

    wait_for_task(client, config, &task_id).await?;

    let csv = fetch_bundle_csv(client, config, &task_id).await?;
    let (mean_index, samples) = parse_csv_mean(&csv, "NDVI")?;

    info!(
        task_id = %task_id,
        samples = samples,
        mean_index = mean_index,
        "Provider time series resolved"
    );

    Ok(PointSample {
        lon,
        lat,
        mean_index,
        samples,
    })
}

async fn submit_task(
    client: &Client,
    config: &ProviderConfig,
    lon: f64,
    lat: f64,
) -> Result<String, ProviderError> {
    let body = json!({
        "task_type": "point",
        "params": {
            "layers": ["NDVI"],
            "coordinates": [{"longitude": lon, "latitude": lat}]
        }
    });

    let created: TaskCreated = request_json(
        client
            .post(format!("{}/task", config.base_url))
            .bearer_auth(&config.token)
            .json(&body),
    )
    .await?;

    Ok(created.task_id)
}

async fn wait_for_task(
    client: &Client,
    config: &ProviderConfig,
    task_id: &str,
) -> Result<(), ProviderError> {
    for _ in 0..config.max_poll_attempts {
        let status: TaskStatus = request_json(
            client
                .get(format!("{}/task/{}", config.base_url, task_id))
                .bearer_auth(&config.token),
        )
        .await?;

        match status.status.as_str() {
            "done" => return Ok(()),
            "pending" | "queued" | "processing" => {
                tokio::time::sleep(config.poll_interval).await;
            }
            other => return Err(ProviderError::TaskFailed(other.to_string())),
        }
    }

    Err(ProviderError::Timeout(config.max_poll_attempts))
}

async fn fetch_bundle_csv(
    client: &Client,
    config: &ProviderConfig,
    task_id: &str,
) -> Result<String, ProviderError> {
    let bundle: Bundle = request_json(
        client
            .get(format!("{}/bundle/{}", config.base_url, task_id))
            .bearer_auth(&config.token),
    )
    .await?;

    let file = bundle
        .files
        .iter()
        .find(|f| f.file_name.to_ascii_lowercase().ends_with(".csv"))
        .ok_or_else(|| ProviderError::MissingData("no CSV file in bundle".to_string()))?;

    let response = client
        .get(format!(
            "{}/bundle/{}/{}",
            config.base_url, task_id, file.file_id
        ))
        .bearer_auth(&config.token)
        .send()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ProviderError::Http(format!(
            "bundle file returned {}",
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))
}

async fn request_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ProviderError::Http(format!(
            "provider returned {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::Http(e.to_string()))
}

/// Average a named column of the provider CSV.
///
/// The column is matched case-insensitively by substring, since the
/// provider prefixes product identifiers onto its headers. The
/// provider's -9999 fill value and unparseable cells are skipped.
fn parse_csv_mean(csv: &str, column: &str) -> Result<(f64, usize), ProviderError> {
    let mut lines = csv.lines();
    let header = lines
        .next()
        .ok_or_else(|| ProviderError::Parse("empty CSV".to_string()))?;

    let wanted = column.to_ascii_lowercase();
    let index = header
        .split(',')
        .position(|name| name.trim().to_ascii_lowercase().contains(&wanted))
        .ok_or_else(|| ProviderError::Parse(format!("no column matching '{}'", column)))?;

    let mut sum = 0.0;
    let mut count = 0usize;

    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let value = line
            .split(',')
            .nth(index)
            .and_then(|cell| cell.trim().parse::<f64>().ok());
        match value {
            Some(v) if v != -9999.0 => {
                sum += v;
                count += 1;
            }
            _ => {}
        }
    }

    if count == 0 {
        return Err(ProviderError::Parse(format!(
            "no usable values in column '{}'",
            column
        )));
    }

    Ok((sum / count as f64, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_mean() {
        let csv = "Date,MOD13Q1_061__250m_16_days_NDVI\n\
                   2024-01-01,0.30\n\
                   2024-01-17,0.40\n\
                   2024-02-02,-9999\n\
                   2024-02-18,0.50\n";

        let (mean, samples) = parse_csv_mean(csv, "NDVI").unwrap();
        assert_eq!(samples, 3);
        assert!((mean - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "Date,EVI\n2024-01-01,0.3\n";
        assert!(matches!(
            parse_csv_mean(csv, "NDVI"),
            Err(ProviderError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_csv_all_fill() {
        let csv = "Date,NDVI\n2024-01-01,-9999\n";
        assert!(parse_csv_mean(csv, "NDVI").is_err());
    }

    #[test]
    fn test_config_requires_both_env_vars() {
        // Only run when the variables are genuinely absent
        std::env::remove_var("BLOOM_PROVIDER_URL");
        std::env::remove_var("BLOOM_PROVIDER_TOKEN");
        assert!(ProviderConfig::from_env().is_none());
    }
}
