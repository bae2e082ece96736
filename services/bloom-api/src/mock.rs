//! Synthetic fallback points for the map demo.
//!
//! Served when the processor has not produced a real collection yet, so
//! the frontend always has something to render.

use rand::Rng;
use serde_json::{json, Value};

use bloom_common::BoundingBox;

/// Number of synthetic points in a fallback collection.
pub const MOCK_FEATURE_COUNT: usize = 10;

/// Generate a FeatureCollection of random points inside `extent`.
pub fn random_collection(extent: &BoundingBox, count: usize) -> Value {
    let mut rng = rand::thread_rng();

    let features: Vec<Value> = (0..count)
        .map(|_| {
            let lon = rng.gen_range(extent.min_x..=extent.max_x);
            let lat = rng.gen_range(extent.min_y..=extent.max_y);
            let peak: f64 = rng.gen_range(0.2..0.4);

            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [round6(lon), round6(lat)]
                },
                "properties": {
                    "name": "High Vegetation Zone",
                    "intensity": "Moderate Greenness",
                    "date": "2024 Bloom Period Proxy",
                    "species_proxy": "Generic Vegetation",
                    "ndvi_peak": round2(peak)
                }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features
    })
}

fn round6(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_shape_and_extent() {
        let extent = BoundingBox::new(75.0, 9.9, 75.1, 10.0);
        let collection = random_collection(&extent, MOCK_FEATURE_COUNT);

        assert_eq!(collection["type"], "FeatureCollection");
        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), MOCK_FEATURE_COUNT);

        for feature in features {
            let coords = feature["geometry"]["coordinates"].as_array().unwrap();
            let lon = coords[0].as_f64().unwrap();
            let lat = coords[1].as_f64().unwrap();
            assert!(extent.contains_point(lon, lat));

            let peak = feature["properties"]["ndvi_peak"].as_f64().unwrap();
            assert!((0.2..=0.4).contains(&peak));
        }
    }
}
