//! GeoJSON output writing.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use geojson::FeatureCollection;
use tracing::{info, warn};

use bloom_common::{BloomError, BloomResult};

/// Serialize the collection to `path`, overwriting prior content.
///
/// An empty collection is skipped (and reported) rather than written,
/// so a map frontend never sees a silently empty layer. Returns whether
/// a file was written. The file handle lives only inside this function,
/// so it closes whether or not serialization succeeds.
pub fn write_collection(collection: &FeatureCollection, path: &Path) -> BloomResult<bool> {
    if collection.features.is_empty() {
        warn!(path = %path.display(), "Empty feature collection, skipping write");
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)
        .map_err(|e| BloomError::WriteFailure(format!("{}: {}", path.display(), e)))?;
    serde_json::to_writer_pretty(BufWriter::new(file), collection)?;

    info!(
        path = %path.display(),
        features = collection.features.len(),
        "Wrote bloom feature collection"
    );
    Ok(true)
}
