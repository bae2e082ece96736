//! Multi-band GeoTIFF loading.
//!
//! Each image directory (page) in the file is treated as one time slice,
//! the convention used by stacked NDVI composites. Georeferencing comes
//! from the ModelPixelScale and ModelTiepoint tags; an optional GDAL
//! nodata tag maps fill pixels to NaN.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array3;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::{debug, warn};

use bloom_common::{GeoTransform, RasterStack, UnitMode};

use crate::error::{IngestError, IngestResult};

/// Load a multi-band GeoTIFF time series into a raster stack.
///
/// Values are converted to the normalized index scale according to
/// `unit_mode`; nodata pixels become NaN.
pub fn load_geotiff_stack(path: &Path, unit_mode: UnitMode) -> IngestResult<RasterStack> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| IngestError::Decode(e.to_string()))?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IngestError::Decode(e.to_string()))?;
    let (width, height) = (width as usize, height as usize);

    let transform = read_geo_transform(&mut decoder)?;
    let nodata = read_nodata(&mut decoder);

    let mut bands: Vec<Vec<f32>> = Vec::new();

    loop {
        match decoder.colortype() {
            Ok(ColorType::Gray(_)) => {}
            Ok(other) => {
                return Err(IngestError::UnsupportedFormat(format!(
                    "expected single-sample gray bands, found {:?}",
                    other
                )))
            }
            Err(e) => return Err(IngestError::Decode(e.to_string())),
        }

        let (band_width, band_height) = decoder
            .dimensions()
            .map_err(|e| IngestError::Decode(e.to_string()))?;
        if (band_width as usize, band_height as usize) != (width, height) {
            return Err(IngestError::InvalidContents(format!(
                "band {} is {}x{}, expected {}x{}",
                bands.len(),
                band_width,
                band_height,
                width,
                height
            )));
        }

        let raw = decoder
            .read_image()
            .map_err(|e| IngestError::Decode(e.to_string()))?;
        bands.push(decode_band(raw, nodata, unit_mode));

        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| IngestError::Decode(e.to_string()))?;
    }

    debug!(
        bands = bands.len(),
        width = width,
        height = height,
        "Decoded GeoTIFF stack"
    );

    let band_count = bands.len();
    let flat: Vec<f32> = bands.into_iter().flatten().collect();
    let data = Array3::from_shape_vec((band_count, height, width), flat)
        .map_err(|e| IngestError::InvalidContents(e.to_string()))?;

    RasterStack::new(data, transform).map_err(|e| IngestError::InvalidContents(e.to_string()))
}

/// Build the affine transform from the GeoTIFF tags.
///
/// ModelPixelScale is `[sx, sy, sz]`; ModelTiepoint ties raster point
/// `(i, j, k)` to world point `(x, y, z)`. North-up rasters store a
/// positive sy with y decreasing down the image.
fn read_geo_transform<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> IngestResult<GeoTransform> {
    let scale = decoder
        .find_tag(Tag::ModelPixelScaleTag)
        .map_err(|e| IngestError::Decode(e.to_string()))?
        .ok_or_else(|| IngestError::MissingData("ModelPixelScale tag".to_string()))?
        .into_f64_vec()
        .map_err(|e| IngestError::Decode(e.to_string()))?;

    let tiepoint = decoder
        .find_tag(Tag::ModelTiepointTag)
        .map_err(|e| IngestError::Decode(e.to_string()))?
        .ok_or_else(|| IngestError::MissingData("ModelTiepoint tag".to_string()))?
        .into_f64_vec()
        .map_err(|e| IngestError::Decode(e.to_string()))?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return Err(IngestError::InvalidContents(format!(
            "georeferencing tags too short: scale has {} values, tiepoint has {}",
            scale.len(),
            tiepoint.len()
        )));
    }

    let (sx, sy) = (scale[0], scale[1]);
    let (i, j, x, y) = (tiepoint[0], tiepoint[1], tiepoint[3], tiepoint[4]);

    Ok(GeoTransform::north_up(x - i * sx, y + j * sy, sx, -sy))
}

/// Parse the GDAL nodata tag when present.
fn read_nodata<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
    let value = decoder.find_tag(Tag::GdalNodata).ok().flatten()?;
    match value.into_string() {
        Ok(s) => match s.trim().trim_end_matches('\0').parse::<f32>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(raw = %s, "Unparseable GDAL nodata tag, ignoring");
                None
            }
        },
        Err(_) => None,
    }
}

/// Convert a decoded band to normalized f32 values with NaN fill.
fn decode_band(raw: DecodingResult, nodata: Option<f32>, unit_mode: UnitMode) -> Vec<f32> {
    let to_f32: Vec<f32> = match raw {
        DecodingResult::U8(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U16(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I8(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I16(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
    };

    to_f32
        .into_iter()
        .map(|v| {
            if nodata.map_or(false, |nd| v == nd) {
                f32::NAN
            } else {
                unit_mode.normalize(v)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_band_nodata_and_scaling() {
        let raw = DecodingResult::I16(vec![2500, -3000, 1000]);
        let out = decode_band(raw, Some(-3000.0), UnitMode::RawCounts);
        assert_eq!(out[0], 0.25);
        assert!(out[1].is_nan());
        assert_eq!(out[2], 0.1);
    }

    #[test]
    fn test_decode_band_normalized_passthrough() {
        let raw = DecodingResult::F32(vec![0.42, 0.81]);
        let out = decode_band(raw, None, UnitMode::Normalized);
        assert_eq!(out, vec![0.42, 0.81]);
    }
}
