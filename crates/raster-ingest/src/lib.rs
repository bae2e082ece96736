//! Raster loaders for bloomwatch.
//!
//! Opens a multi-band source file and produces a `RasterStack` on the
//! normalized index scale plus its geo-transform. GeoTIFF is the
//! default container; gridded NetCDF is available behind the `netcdf`
//! feature (the backing C library is a system dependency).
//!
//! Unit conversion happens here, at ingestion, so everything downstream
//! works in exactly one value scale.

pub mod error;
pub mod geotiff;
#[cfg(feature = "netcdf")]
pub mod netcdf;

use std::path::Path;

use tracing::info;

use bloom_common::{RasterStack, UnitMode};

pub use error::{IngestError, IngestResult};

/// Supported source containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    GeoTiff,
    NetCdf,
}

impl RasterFormat {
    /// Infer the container from the file extension.
    pub fn from_path(path: &Path) -> IngestResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("tif") | Some("tiff") => Ok(RasterFormat::GeoTiff),
            Some("nc") | Some("nc4") => Ok(RasterFormat::NetCdf),
            other => Err(IngestError::UnsupportedFormat(format!(
                "unrecognized extension {:?} for {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Load a source raster into a normalized stack.
///
/// A missing or unreadable file surfaces as `IngestError::Io`; callers
/// treat that as a recoverable per-site condition.
pub fn load_stack(path: &Path, unit_mode: UnitMode) -> IngestResult<RasterStack> {
    let format = RasterFormat::from_path(path)?;

    let stack = match format {
        RasterFormat::GeoTiff => geotiff::load_geotiff_stack(path, unit_mode)?,
        #[cfg(feature = "netcdf")]
        RasterFormat::NetCdf => netcdf::load_netcdf_stack(path, unit_mode)?,
        #[cfg(not(feature = "netcdf"))]
        RasterFormat::NetCdf => {
            return Err(IngestError::UnsupportedFormat(
                "NetCDF support not compiled in (enable the `netcdf` feature)".to_string(),
            ))
        }
    };

    let (height, width) = stack.shape();
    info!(
        path = %path.display(),
        bands = stack.bands(),
        width = width,
        height = height,
        "Loaded raster stack"
    );

    Ok(stack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            RasterFormat::from_path(&PathBuf::from("data/ndvi_series.tif")).unwrap(),
            RasterFormat::GeoTiff
        );
        assert_eq!(
            RasterFormat::from_path(&PathBuf::from("data/chlor_a.nc")).unwrap(),
            RasterFormat::NetCdf
        );
        assert!(RasterFormat::from_path(&PathBuf::from("data/notes.txt")).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_stack(
            &PathBuf::from("/nonexistent/ndvi_series.tif"),
            UnitMode::RawCounts,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
