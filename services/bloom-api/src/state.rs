//! Shared application state.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;

use bloom_common::BoundingBox;

use crate::provider::ProviderConfig;

/// State shared by all handlers.
pub struct AppState {
    /// Where the processor writes its feature collection.
    pub geojson_path: PathBuf,
    /// Extent for synthetic fallback points.
    pub mock_extent: BoundingBox,
    /// Point time-series provider, when credentials are configured.
    pub provider: Option<ProviderConfig>,
    /// Shared HTTP client for proxy calls.
    pub http: Client,
}

impl AppState {
    /// Build state from resolved configuration.
    pub fn new(
        geojson_path: PathBuf,
        mock_extent: BoundingBox,
        provider: Option<ProviderConfig>,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            geojson_path,
            mock_extent,
            provider,
            http,
        })
    }
}
