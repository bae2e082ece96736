//! Bloom detection batch service.
//!
//! Processes configured sites one at a time:
//! - optionally downloads the source raster (single attempt, gated on
//!   status and payload size)
//! - runs the detection pipeline
//! - logs the per-site outcome
//!
//! A failed site is a logged outcome, not a crash: the loop continues
//! and prior output files stay untouched.

mod config;
mod fetch;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use config::{load_site_configs, SiteConfig};
use fetch::{FetchConfig, Fetcher};

#[derive(Parser, Debug)]
#[command(name = "bloom-processor")]
#[command(about = "Satellite bloom detection: raster time series to GeoJSON points")]
struct Args {
    /// Specific site to process (default: all configured)
    #[arg(short, long)]
    site: Option<String>,

    /// Configuration directory (contains sites/*.yaml)
    #[arg(long, env = "CONFIG_DIR", default_value = "config")]
    config_dir: PathBuf,

    /// Skip downloads and use already-present local source files
    #[arg(long)]
    no_fetch: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting bloom processor");

    let mut sites = load_site_configs(&args.config_dir)?;
    if let Some(wanted) = &args.site {
        sites.retain(|s| &s.site.id == wanted);
        if sites.is_empty() {
            warn!(site = %wanted, "No enabled site with that id");
            return Ok(());
        }
    }

    let fetcher = Fetcher::new(FetchConfig::default())?;

    let mut written = 0usize;
    let mut empty = 0usize;
    let mut failed = 0usize;

    for site in &sites {
        match process_site(site, &fetcher, args.no_fetch).await {
            Ok(Some(report)) => {
                written += 1;
                info!(
                    site = %site.site.id,
                    features = report.feature_count,
                    peak_max = report.peak_max,
                    output = %report.output_path.display(),
                    "Site processed"
                );
            }
            Ok(None) => {
                empty += 1;
                info!(site = %site.site.id, "Site processed, zero bloom zones found");
            }
            Err(e) => {
                failed += 1;
                error!(site = %site.site.id, error = %e, "Site run failed");
            }
        }
    }

    info!(
        sites = sites.len(),
        written = written,
        empty = empty,
        failed = failed,
        "Processing run complete"
    );

    Ok(())
}

/// Run one site end to end.
async fn process_site(
    site: &SiteConfig,
    fetcher: &Fetcher,
    no_fetch: bool,
) -> Result<Option<bloom_pipeline::PipelineReport>> {
    if let Some(url) = &site.source.url {
        if no_fetch {
            info!(site = %site.site.id, "Fetch disabled, using local source file");
        } else {
            fetcher.fetch(url, &site.source.path).await?;
        }
    }

    let pipeline_config = site.to_pipeline_config();
    let report = bloom_pipeline::run_pipeline(&pipeline_config)?;
    Ok(report)
}
