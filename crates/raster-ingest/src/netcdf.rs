//! Gridded NetCDF loading (feature `netcdf`).
//!
//! Handles datasets laid out as `intensity(time, lat, lon)` or
//! `intensity(lat, lon)` with one-dimensional coordinate variables.
//! scale_factor / add_offset / _FillValue attributes are honored before
//! unit normalization. The geo-transform is derived from the coordinate
//! spacing, which must be regular.

use std::path::Path;

use ndarray::Array3;
use tracing::debug;

use bloom_common::{GeoTransform, RasterStack, UnitMode};

use crate::error::{IngestError, IngestResult};

/// Candidate names for the intensity variable, checked in order.
const INTENSITY_VARS: &[&str] = &["NDVI", "ndvi", "chlor_a", "intensity"];

/// Load a gridded NetCDF dataset into a raster stack.
pub fn load_netcdf_stack(path: &Path, unit_mode: UnitMode) -> IngestResult<RasterStack> {
    let nc_file = netcdf::open(path).map_err(|e| IngestError::Decode(e.to_string()))?;

    let var = INTENSITY_VARS
        .iter()
        .find_map(|name| nc_file.variable(name))
        .ok_or_else(|| {
            IngestError::MissingData(format!(
                "intensity variable (looked for {})",
                INTENSITY_VARS.join(", ")
            ))
        })?;

    let lats = read_coordinate(&nc_file, &["latitude", "lat", "y"])?;
    let lons = read_coordinate(&nc_file, &["longitude", "lon", "x"])?;

    let (height, width) = (lats.len(), lons.len());
    if height < 2 || width < 2 {
        return Err(IngestError::InvalidContents(format!(
            "grid too small: {}x{}",
            height, width
        )));
    }

    let dims = var.dimensions().len();
    let bands = match dims {
        2 => 1,
        3 => var.dimensions()[0].len(),
        n => {
            return Err(IngestError::UnsupportedFormat(format!(
                "intensity variable has {} dimensions, expected 2 or 3",
                n
            )))
        }
    };

    let raw: Vec<f32> = var
        .get_values(..)
        .map_err(|e| IngestError::Decode(e.to_string()))?;
    if raw.len() != bands * height * width {
        return Err(IngestError::InvalidContents(format!(
            "variable holds {} values, expected {}",
            raw.len(),
            bands * height * width
        )));
    }

    let scale_factor = attr_f32(&var, "scale_factor").unwrap_or(1.0);
    let add_offset = attr_f32(&var, "add_offset").unwrap_or(0.0);
    let fill_value = attr_f32(&var, "_FillValue");

    let values: Vec<f32> = raw
        .into_iter()
        .map(|v| {
            if fill_value.map_or(false, |fv| v == fv) {
                f32::NAN
            } else {
                unit_mode.normalize(v * scale_factor + add_offset)
            }
        })
        .collect();

    let transform = transform_from_coords(&lons, &lats)?;

    debug!(
        bands = bands,
        width = width,
        height = height,
        "Decoded NetCDF grid"
    );

    let data = Array3::from_shape_vec((bands, height, width), values)
        .map_err(|e| IngestError::InvalidContents(e.to_string()))?;

    RasterStack::new(data, transform).map_err(|e| IngestError::InvalidContents(e.to_string()))
}

/// Read a 1-D coordinate variable by candidate names.
fn read_coordinate(file: &netcdf::File, names: &[&str]) -> IngestResult<Vec<f64>> {
    let var = names
        .iter()
        .find_map(|name| file.variable(name))
        .ok_or_else(|| {
            IngestError::MissingData(format!("coordinate variable ({})", names.join(", ")))
        })?;
    var.get_values(..)
        .map_err(|e| IngestError::Decode(e.to_string()))
}

/// Derive the affine transform from regular coordinate spacing.
///
/// Coordinate values are cell centers, so the origin is shifted back by
/// half a pixel to the outer corner.
fn transform_from_coords(lons: &[f64], lats: &[f64]) -> IngestResult<GeoTransform> {
    let dx = lons[1] - lons[0];
    let dy = lats[1] - lats[0];
    if dx == 0.0 || dy == 0.0 {
        return Err(IngestError::InvalidContents(
            "degenerate coordinate spacing".to_string(),
        ));
    }

    Ok(GeoTransform::north_up(
        lons[0] - dx / 2.0,
        lats[0] - dy / 2.0,
        dx,
        dy,
    ))
}

/// Check if a variable has an attribute with the given name.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f32 attribute.
fn attr_f32(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_from_descending_lats() {
        // Cell centers: lons east-positive, lats north-to-south
        let lons = vec![75.05, 75.15, 75.25];
        let lats = vec![9.95, 9.85];

        let gt = transform_from_coords(&lons, &lats).unwrap();
        assert!((gt.origin_x - 75.0).abs() < 1e-9);
        assert!((gt.origin_y - 10.0).abs() < 1e-9);
        assert!((gt.pixel_width - 0.1).abs() < 1e-9);
        assert!((gt.pixel_height + 0.1).abs() < 1e-9);

        let (x, y) = gt.pixel_center(0, 0);
        assert!((x - 75.05).abs() < 1e-9);
        assert!((y - 9.95).abs() < 1e-9);
    }
}
