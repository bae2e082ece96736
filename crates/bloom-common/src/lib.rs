//! Common types shared across the bloomwatch crates and services.

pub mod bbox;
pub mod config;
pub mod error;
pub mod stack;
pub mod transform;

pub use bbox::BoundingBox;
pub use config::{FeatureLabels, PipelineConfig, UnitMode};
pub use error::{BloomError, BloomResult};
pub use stack::{BloomMask, PeakGrid, RasterStack};
pub use transform::GeoTransform;
