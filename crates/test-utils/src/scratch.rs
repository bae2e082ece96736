//! Scratch directory helpers for tests that write output files.

use std::path::PathBuf;

use tempfile::TempDir;

/// A scratch output location that is cleaned up on drop.
///
/// Keep the `TempDir` alive for as long as the path is used.
pub struct ScratchOutput {
    pub dir: TempDir,
    pub path: PathBuf,
}

/// Create a scratch path for a GeoJSON output file.
///
/// The parent directory chain below the temp root does not exist yet,
/// so writers exercise their directory-creation path.
pub fn scratch_geojson() -> ScratchOutput {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("data").join("bloom_phenology.json");
    ScratchOutput { dir, path }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scratch_path_is_fresh() {
        let scratch = scratch_geojson();
        assert!(!scratch.path.exists());
        assert!(scratch.dir.path().exists());
    }
}
