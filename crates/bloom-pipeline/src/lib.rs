//! Bloom detection pipeline.
//!
//! One run: load the raster stack, reduce the time axis to a peak
//! composite, threshold it, vectorize the surviving pixels into
//! connected regions, and write one GeoJSON Point feature per region.
//! Runs are synchronous and hold no state between invocations.

pub mod classify;
pub mod features;
pub mod reduce;
pub mod vectorize;
pub mod writer;

use std::path::PathBuf;

use tracing::info;

use bloom_common::{BloomError, BloomResult, PipelineConfig};
use raster_ingest::IngestError;

pub use vectorize::Region;

/// Summary of a completed run that produced output.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Number of features written.
    pub feature_count: usize,
    /// Highest peak value across all detected regions.
    pub peak_max: f32,
    /// Where the collection was written.
    pub output_path: PathBuf,
}

/// Execute one bloom-detection run.
///
/// Returns `Ok(None)` when no pixel passes the threshold: the
/// short-circuit is an explicit outcome, not an empty collection, and
/// no file is written. Prior output stays untouched on every failure
/// path.
pub fn run_pipeline(config: &PipelineConfig) -> BloomResult<Option<PipelineReport>> {
    config.validate()?;

    let stack = raster_ingest::load_stack(&config.source_path, config.unit_mode)
        .map_err(ingest_error)?;

    let peak = reduce::peak_composite(&stack);
    let mask = classify::classify(&peak, config.threshold);

    if !classify::any_detection(&mask) {
        info!(
            source = %config.source_path.display(),
            threshold = config.threshold,
            "No pixels above threshold, nothing to vectorize"
        );
        return Ok(None);
    }

    let regions = vectorize::vectorize(&mask, &peak, stack.transform());
    let collection = features::build_features(&regions, &config.labels);
    writer::write_collection(&collection, &config.output_path)?;

    let peak_max = regions
        .iter()
        .map(|r| r.peak)
        .fold(f32::NEG_INFINITY, f32::max);

    info!(
        features = collection.features.len(),
        peak_max = peak_max,
        output = %config.output_path.display(),
        "Bloom detection run complete"
    );

    Ok(Some(PipelineReport {
        feature_count: collection.features.len(),
        peak_max,
        output_path: config.output_path.clone(),
    }))
}

/// Map ingestion failures onto run-level error kinds.
fn ingest_error(err: IngestError) -> BloomError {
    match err {
        IngestError::Io(e) => BloomError::SourceUnreadable(e.to_string()),
        other => BloomError::InvalidRaster(other.to_string()),
    }
}
