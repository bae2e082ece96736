//! Configuration loading for site detection runs.
//!
//! Loads site configurations from YAML files in config/sites/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use bloom_common::{FeatureLabels, PipelineConfig, UnitMode};

/// Root configuration loaded from a site YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub detection: DetectionConfig,
    #[serde(default)]
    pub properties: FeatureLabels,
}

/// Basic site identification.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteInfo {
    pub id: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Where the source raster comes from.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Local path of the raster (download target when `url` is set).
    pub path: PathBuf,
    /// Optional remote location to fetch before processing.
    #[serde(default)]
    pub url: Option<String>,
    /// Source value encoding.
    #[serde(default)]
    pub unit_mode: UnitMode,
}

/// Output file location.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub path: PathBuf,
}

/// Detection parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionConfig {
    /// Threshold in normalized index units.
    pub threshold: f32,
}

impl SiteConfig {
    /// Load a site configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(site = %config.site.id, path = %path.display(), "Loaded site config");
        Ok(config)
    }

    /// Build the pipeline invocation for this site.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source_path: self.source.path.clone(),
            output_path: self.output.path.clone(),
            threshold: self.detection.threshold,
            unit_mode: self.source.unit_mode,
            labels: self.properties.clone(),
        }
    }
}

/// Load all enabled site configurations from a directory.
pub fn load_site_configs(config_dir: &Path) -> Result<Vec<SiteConfig>> {
    let sites_dir = config_dir.join("sites");

    if !sites_dir.exists() {
        warn!(path = %sites_dir.display(), "Sites config directory not found");
        return Ok(Vec::new());
    }

    let mut configs = Vec::new();

    for entry in std::fs::read_dir(&sites_dir)? {
        let entry = entry?;
        let path = entry.path();

        if path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
        {
            match SiteConfig::load(&path) {
                Ok(config) => {
                    if config.site.enabled {
                        info!(
                            site = %config.site.id,
                            name = %config.site.name,
                            "Loaded site configuration"
                        );
                        configs.push(config);
                    } else {
                        debug!(site = %config.site.id, "Skipping disabled site");
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to load site config");
                }
            }
        }
    }

    info!(count = configs.len(), "Loaded site configurations");
    Ok(configs)
}
