//! Bloom demo API server.
//!
//! Serves the generated bloom GeoJSON to map frontends (with a
//! synthetic fallback while no file exists) and proxies a third-party
//! point time-series task API.

mod handlers;
mod mock;
mod provider;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Extension, Router};
use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use bloom_common::BoundingBox;
use provider::ProviderConfig;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "bloom-api")]
#[command(about = "Demo API serving bloom GeoJSON for map display")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080", env = "BLOOM_LISTEN_ADDR")]
    listen: String,

    /// Path of the generated feature collection
    #[arg(
        long,
        default_value = "data/bloom_phenology.json",
        env = "BLOOM_GEOJSON_PATH"
    )]
    geojson_path: PathBuf,

    /// Extent for synthetic fallback points: "minlon,minlat,maxlon,maxlat"
    #[arg(long, default_value = "75.0,9.9,75.1,10.0", env = "BLOOM_MOCK_BBOX")]
    mock_bbox: String,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt().with_env_filter(filter).with_target(true).json().init();

    info!("Starting bloom demo API");

    let mock_extent = parse_bbox(&args.mock_bbox)
        .with_context(|| format!("Invalid mock bbox: {}", args.mock_bbox))?;

    // Provider proxy stays disabled unless credentials are present
    let provider = ProviderConfig::from_env();
    if provider.is_none() {
        info!("No provider credentials in environment, /timeseries disabled");
    }

    let state = Arc::new(AppState::new(args.geojson_path, mock_extent, provider)?);

    let app = Router::new()
        .route("/geojson", get(handlers::geojson::geojson_handler))
        .route("/timeseries", get(handlers::timeseries::timeseries_handler))
        .route("/health", get(handlers::health::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        // The demo frontend is served from anywhere
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!("Bloom API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind")?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}

/// Parse "minlon,minlat,maxlon,maxlat".
fn parse_bbox(s: &str) -> Result<BoundingBox> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .context("bbox values must be numbers")?;

    if parts.len() != 4 || parts[0] >= parts[2] || parts[1] >= parts[3] {
        anyhow::bail!("expected minlon,minlat,maxlon,maxlat with min < max");
    }

    Ok(BoundingBox::new(parts[0], parts[1], parts[2], parts[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        let bbox = parse_bbox("75.0,9.9,75.1,10.0").unwrap();
        assert_eq!(bbox.min_x, 75.0);
        assert_eq!(bbox.max_y, 10.0);

        assert!(parse_bbox("75.0,9.9,75.1").is_err());
        assert!(parse_bbox("75.1,9.9,75.0,10.0").is_err());
        assert!(parse_bbox("a,b,c,d").is_err());
    }
}
