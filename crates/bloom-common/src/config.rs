//! Pipeline configuration.
//!
//! One explicit configuration structure per run, passed into the
//! pipeline at invocation time. The threshold is always expressed in
//! normalized index units regardless of how the source file encodes
//! its values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{BloomError, BloomResult};

/// Divisor applied to raw integer sensor counts to reach the
/// normalized index scale (MODIS/VIIRS NDVI convention).
pub const RAW_COUNT_SCALE: f32 = 10_000.0;

/// How the source raster encodes its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitMode {
    /// Scaled integer counts (index * 10 000); divided down at ingestion.
    #[default]
    RawCounts,
    /// Already on the normalized index scale; passed through.
    Normalized,
}

impl UnitMode {
    /// Convert a source value to the normalized index scale.
    pub fn normalize(&self, value: f32) -> f32 {
        match self {
            UnitMode::RawCounts => value / RAW_COUNT_SCALE,
            UnitMode::Normalized => value,
        }
    }
}

/// Descriptive properties stamped onto every output feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureLabels {
    /// Feature display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Date or period the detection represents.
    #[serde(default = "default_date")]
    pub date: String,
    /// Species stand-in until ground-truth classification exists.
    #[serde(default = "default_species")]
    pub species_proxy: String,
}

fn default_name() -> String {
    "High Vegetation Zone".to_string()
}

fn default_date() -> String {
    "2024 Bloom Period Proxy".to_string()
}

fn default_species() -> String {
    "Generic Vegetation".to_string()
}

impl Default for FeatureLabels {
    fn default() -> Self {
        Self {
            name: default_name(),
            date: default_date(),
            species_proxy: default_species(),
        }
    }
}

/// Configuration for one bloom-detection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Path to the source raster file.
    pub source_path: PathBuf,
    /// Path of the GeoJSON file to write.
    pub output_path: PathBuf,
    /// Detection threshold in normalized index units.
    pub threshold: f32,
    /// Source value encoding.
    #[serde(default)]
    pub unit_mode: UnitMode,
    /// Feature property labels.
    #[serde(default)]
    pub labels: FeatureLabels,
}

impl PipelineConfig {
    /// Validate threshold range and paths.
    ///
    /// NDVI is bounded to [-1, 1]; a threshold outside that range means
    /// the caller is still thinking in raw counts.
    pub fn validate(&self) -> BloomResult<()> {
        if !self.threshold.is_finite() || !(-1.0..=1.0).contains(&self.threshold) {
            return Err(BloomError::InvalidConfig {
                param: "threshold".to_string(),
                message: format!(
                    "{} is outside the normalized index range [-1, 1]",
                    self.threshold
                ),
            });
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(BloomError::InvalidConfig {
                param: "output_path".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
