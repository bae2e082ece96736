//! Test data generators for creating synthetic NDVI-like data.
//!
//! These generators create predictable, verifiable patterns that can be
//! used across the test suite.

use ndarray::{Array2, Array3};

use bloom_common::{GeoTransform, RasterStack};

/// Creates a raster stack from per-band row-major values.
///
/// All values are on the normalized index scale; the transform places
/// the grid at (75.0, 10.0) with 0.1-degree pixels, matching the
/// coastal test extent used throughout the suite.
pub fn stack_from_bands(bands: Vec<Vec<f32>>, height: usize, width: usize) -> RasterStack {
    let count = bands.len();
    let flat: Vec<f32> = bands.into_iter().flatten().collect();
    let data = Array3::from_shape_vec((count, height, width), flat)
        .expect("band data does not match dimensions");
    RasterStack::new(data, coastal_transform()).expect("invalid test stack")
}

/// The transform shared by generated stacks: 0.1-degree pixels,
/// top-left corner at (75.0, 10.0), north-up.
pub fn coastal_transform() -> GeoTransform {
    GeoTransform::north_up(75.0, 10.0, 0.1, -0.1)
}

/// Creates a peak grid with a gradient of index values.
///
/// Each cell value is `(row + col) / (width + height)`, so thresholds
/// between 0 and 1 select a predictable lower-right triangle.
pub fn gradient_peak_grid(width: usize, height: usize) -> Array2<f32> {
    Array2::from_shape_fn((height, width), |(row, col)| {
        (row + col) as f32 / (width + height) as f32
    })
}

/// The reference two-region scenario: raw counts `[[3000, 1000], [2600, 0]]`
/// normalized, which at threshold 0.25 yields two non-adjacent
/// single-pixel regions.
pub fn two_region_stack() -> RasterStack {
    stack_from_bands(vec![vec![0.3000, 0.1000, 0.2600, 0.0]], 2, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_grid_values() {
        let grid = gradient_peak_grid(4, 2);
        assert_eq!(grid[[0, 0]], 0.0);
        assert_eq!(grid[[1, 3]], 4.0 / 6.0);
    }

    #[test]
    fn test_two_region_stack_shape() {
        let stack = two_region_stack();
        assert_eq!(stack.bands(), 1);
        assert_eq!(stack.shape(), (2, 2));
    }
}
