//! In-memory raster containers.

use ndarray::{Array2, Array3};

use crate::{BloomError, BloomResult, GeoTransform};

/// A time series of co-registered raster bands.
///
/// Shape is `(time, height, width)`; every band shares the same spatial
/// dimensions and geo-transform. Values are on the normalized index
/// scale (see `UnitMode`), with missing pixels stored as NaN.
#[derive(Debug, Clone)]
pub struct RasterStack {
    data: Array3<f32>,
    transform: GeoTransform,
}

impl RasterStack {
    /// Create a stack from band data and its geo-transform.
    ///
    /// Fails if the stack has no bands or zero-sized spatial dimensions.
    pub fn new(data: Array3<f32>, transform: GeoTransform) -> BloomResult<Self> {
        let (bands, height, width) = data.dim();
        if bands == 0 || height == 0 || width == 0 {
            return Err(BloomError::InvalidRaster(format!(
                "empty raster stack: {} bands, {}x{} pixels",
                bands, height, width
            )));
        }
        Ok(Self { data, transform })
    }

    /// Number of time slices.
    pub fn bands(&self) -> usize {
        self.data.dim().0
    }

    /// Spatial dimensions as (height, width).
    pub fn shape(&self) -> (usize, usize) {
        let (_, height, width) = self.data.dim();
        (height, width)
    }

    /// The band data, shape (time, height, width).
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    /// The pixel-to-world affine transform.
    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }
}

/// Per-pixel maximum over the time axis of a raster stack.
pub type PeakGrid = Array2<f32>;

/// Boolean grid marking pixels whose peak value passed the threshold.
pub type BloomMask = Array2<bool>;

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_new_rejects_empty() {
        let gt = GeoTransform::north_up(0.0, 0.0, 1.0, -1.0);
        let empty = Array3::<f32>::zeros((0, 2, 2));
        assert!(RasterStack::new(empty, gt).is_err());
    }

    #[test]
    fn test_dimensions() {
        let gt = GeoTransform::north_up(0.0, 0.0, 1.0, -1.0);
        let stack = RasterStack::new(Array3::zeros((3, 4, 5)), gt).unwrap();
        assert_eq!(stack.bands(), 3);
        assert_eq!(stack.shape(), (4, 5));
    }
}
