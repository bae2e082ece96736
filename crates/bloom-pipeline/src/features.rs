//! GeoJSON feature construction for detected regions.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{json, Map};

use bloom_common::FeatureLabels;

use crate::vectorize::Region;

/// Label the greenness intensity of a peak value.
///
/// Bands follow the usual NDVI interpretation: dense canopy sits above
/// ~0.6, healthy vegetation above ~0.4.
pub fn intensity_label(peak: f32) -> &'static str {
    if peak >= 0.6 {
        "Dense Greenness"
    } else if peak >= 0.4 {
        "High Greenness"
    } else {
        "Moderate Greenness"
    }
}

/// Round a peak value to the two decimals the output schema carries.
fn round_peak(peak: f32) -> f64 {
    (peak as f64 * 100.0).round() / 100.0
}

/// Build one Point feature per region, at its centroid.
pub fn build_features(regions: &[Region], labels: &FeatureLabels) -> FeatureCollection {
    let features = regions
        .iter()
        .map(|region| {
            let (lon, lat) = region.centroid;

            let mut properties = Map::new();
            properties.insert("name".to_string(), json!(labels.name));
            properties.insert(
                "intensity".to_string(),
                json!(intensity_label(region.peak)),
            );
            properties.insert("date".to_string(), json!(labels.date));
            properties.insert("species_proxy".to_string(), json!(labels.species_proxy));
            properties.insert("ndvi_peak".to_string(), json!(round_peak(region.peak)));

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::Point(vec![lon, lat]))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(centroid: (f64, f64), peak: f32) -> Region {
        Region {
            pixel_count: 1,
            rings: vec![vec![]],
            centroid,
            peak,
        }
    }

    #[test]
    fn test_intensity_bands() {
        assert_eq!(intensity_label(0.26), "Moderate Greenness");
        assert_eq!(intensity_label(0.4), "High Greenness");
        assert_eq!(intensity_label(0.81), "Dense Greenness");
    }

    #[test]
    fn test_feature_properties() {
        let collection = build_features(
            &[region((75.05, 9.95), 0.267)],
            &FeatureLabels::default(),
        );

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];

        match &feature.geometry.as_ref().unwrap().value {
            Value::Point(coords) => {
                assert_eq!(coords[0], 75.05);
                assert_eq!(coords[1], 9.95);
            }
            other => panic!("expected Point geometry, got {:?}", other),
        }

        let props = feature.properties.as_ref().unwrap();
        assert_eq!(props["name"], json!("High Vegetation Zone"));
        assert_eq!(props["intensity"], json!("Moderate Greenness"));
        assert_eq!(props["species_proxy"], json!("Generic Vegetation"));
        // Actual per-region peak, rounded, not the threshold constant
        assert_eq!(props["ndvi_peak"], json!(0.27));
    }

    #[test]
    fn test_one_feature_per_region() {
        let collection = build_features(
            &[region((0.5, -0.5), 0.3), region((1.5, -1.5), 0.5)],
            &FeatureLabels::default(),
        );
        assert_eq!(collection.features.len(), 2);
    }
}
