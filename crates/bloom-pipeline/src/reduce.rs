//! Temporal reduction of a raster stack.

use ndarray::Array2;

use bloom_common::{PeakGrid, RasterStack};

/// Collapse the time axis by taking the per-pixel maximum.
///
/// NaN slices are skipped per pixel; a pixel that is NaN in every band
/// stays NaN and can never pass the classifier.
pub fn peak_composite(stack: &RasterStack) -> PeakGrid {
    let (height, width) = stack.shape();
    let data = stack.data();

    let mut peak = Array2::from_elem((height, width), f32::NAN);
    for band in data.outer_iter() {
        for ((row, col), &value) in band.indexed_iter() {
            if value.is_nan() {
                continue;
            }
            let current = peak[[row, col]];
            if current.is_nan() || value > current {
                peak[[row, col]] = value;
            }
        }
    }
    peak
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_common::GeoTransform;
    use ndarray::Array3;

    fn stack_from(bands: Vec<Vec<f32>>, height: usize, width: usize) -> RasterStack {
        let count = bands.len();
        let flat: Vec<f32> = bands.into_iter().flatten().collect();
        let data = Array3::from_shape_vec((count, height, width), flat).unwrap();
        RasterStack::new(data, GeoTransform::north_up(0.0, 0.0, 1.0, -1.0)).unwrap()
    }

    #[test]
    fn test_maximum_over_time() {
        let stack = stack_from(
            vec![vec![0.1, 0.5, 0.3, 0.2], vec![0.4, 0.2, 0.3, 0.6]],
            2,
            2,
        );
        let peak = peak_composite(&stack);
        assert_eq!(peak[[0, 0]], 0.4);
        assert_eq!(peak[[0, 1]], 0.5);
        assert_eq!(peak[[1, 0]], 0.3);
        assert_eq!(peak[[1, 1]], 0.6);
    }

    #[test]
    fn test_nan_handling() {
        let stack = stack_from(
            vec![vec![f32::NAN, f32::NAN], vec![0.2, f32::NAN]],
            1,
            2,
        );
        let peak = peak_composite(&stack);
        assert_eq!(peak[[0, 0]], 0.2);
        assert!(peak[[0, 1]].is_nan());
    }
}
