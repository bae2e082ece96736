//! Stage-level properties over synthetic grids.

use bloom_common::FeatureLabels;
use bloom_pipeline::{classify, features, reduce, vectorize, writer};
use test_utils::{gradient_peak_grid, scratch_geojson, two_region_stack};

#[test]
fn feature_count_tracks_regions_not_pixels() {
    let stack = two_region_stack();
    let peak = reduce::peak_composite(&stack);
    let mask = classify::classify(&peak, 0.25);

    let regions = vectorize::vectorize(&mask, &peak, stack.transform());
    let collection = features::build_features(&regions, &FeatureLabels::default());

    // Two true pixels, two regions, two features
    assert_eq!(regions.len(), 2);
    assert_eq!(collection.features.len(), regions.len());
}

#[test]
fn mask_matches_threshold_everywhere() {
    let peak = gradient_peak_grid(16, 8);
    let threshold = 0.5;
    let mask = classify::classify(&peak, threshold);

    for ((row, col), &hit) in mask.indexed_iter() {
        assert_eq!(
            hit,
            peak[[row, col]] >= threshold,
            "mismatch at ({}, {})",
            row,
            col
        );
    }
}

#[test]
fn centroids_stay_inside_the_stack_extent() {
    let stack = two_region_stack();
    let peak = reduce::peak_composite(&stack);
    let mask = classify::classify(&peak, 0.25);
    let extent = stack.transform().extent(2, 2);

    for region in vectorize::vectorize(&mask, &peak, stack.transform()) {
        let (x, y) = region.centroid;
        assert!(extent.contains_point(x, y), "({}, {}) outside extent", x, y);
    }
}

#[test]
fn writer_skip_leaves_no_file_behind() {
    let scratch = scratch_geojson();
    let collection = features::build_features(&[], &FeatureLabels::default());

    assert!(!writer::write_collection(&collection, &scratch.path).unwrap());
    assert!(!scratch.path.exists());
}
