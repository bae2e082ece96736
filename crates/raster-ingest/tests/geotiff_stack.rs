//! Round-trip test: encode a small multi-band GeoTIFF, load it back.

use std::fs::File;

use tiff::encoder::{colortype, TiffEncoder};
use tiff::tags::Tag;

use bloom_common::UnitMode;
use raster_ingest::{load_stack, IngestError};

/// Write a two-band 2x2 GeoTIFF with georeferencing tags on the first
/// directory, the layout stacked NDVI composites use.
fn write_test_geotiff(path: &std::path::Path, bands: &[Vec<f32>]) {
    let mut file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(&mut file).unwrap();

    for (idx, band) in bands.iter().enumerate() {
        let mut image = encoder
            .new_image::<colortype::Gray32Float>(2, 2)
            .unwrap();
        if idx == 0 {
            image
                .encoder()
                .write_tag(Tag::ModelPixelScaleTag, &[0.1f64, 0.1, 0.0][..])
                .unwrap();
            image
                .encoder()
                .write_tag(
                    Tag::ModelTiepointTag,
                    &[0.0f64, 0.0, 0.0, 75.0, 10.0, 0.0][..],
                )
                .unwrap();
        }
        image.write_data(band).unwrap();
    }
}

#[test]
fn loads_multiband_stack_with_transform() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ndvi_series.tif");

    write_test_geotiff(
        &path,
        &[
            vec![0.30, 0.10, 0.26, 0.00],
            vec![0.20, 0.05, 0.10, 0.00],
        ],
    );

    let stack = load_stack(&path, UnitMode::Normalized).unwrap();

    assert_eq!(stack.bands(), 2);
    assert_eq!(stack.shape(), (2, 2));

    // Row-major within each band
    assert_eq!(stack.data()[[0, 0, 0]], 0.30);
    assert_eq!(stack.data()[[0, 0, 1]], 0.10);
    assert_eq!(stack.data()[[1, 1, 0]], 0.10);

    let gt = stack.transform();
    assert!((gt.origin_x - 75.0).abs() < 1e-9);
    assert!((gt.origin_y - 10.0).abs() < 1e-9);
    assert!((gt.pixel_width - 0.1).abs() < 1e-9);
    assert!((gt.pixel_height + 0.1).abs() < 1e-9);
}

#[test]
fn rejects_tiff_without_georeferencing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.tif");

    {
        let mut file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(&mut file).unwrap();
        encoder
            .write_image::<colortype::Gray32Float>(2, 2, &[0.1, 0.2, 0.3, 0.4])
            .unwrap();
    }

    let err = load_stack(&path, UnitMode::Normalized).unwrap_err();
    assert!(matches!(err, IngestError::MissingData(_)));
}
