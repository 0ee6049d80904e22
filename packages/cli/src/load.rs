//! Reads province and mountain collections from data directories.
//!
//! Every matching file in a directory contributes its features, in file
//! name order, to one merged collection.

use std::path::{Path, PathBuf};

use geojson::FeatureCollection;
use summit_map_geography::progress::ProgressCallback;
use summit_map_geography::{GeographyError, ingest};

/// Extension of province boundary files.
pub const PROVINCE_EXTENSION: &str = "json";

/// Extension of mountain point files.
pub const MOUNTAIN_EXTENSION: &str = "geojson";

/// Lists files in `dir` with the given extension, sorted by name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, GeographyError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();

    log::debug!(
        "Found {} .{extension} files in {}",
        files.len(),
        dir.display()
    );

    Ok(files)
}

/// Reads and merges every collection in `files`.
///
/// # Errors
///
/// Returns an error if any file cannot be read or is not a `GeoJSON`
/// `FeatureCollection`.
pub fn merge_files(
    files: &[PathBuf],
    progress: &dyn ProgressCallback,
) -> Result<FeatureCollection, GeographyError> {
    let mut features = Vec::new();

    for path in files {
        log::debug!("Reading {}", path.display());
        if let Some(name) = path.file_name() {
            progress.set_message(name.to_string_lossy().into_owned());
        }
        let text = std::fs::read_to_string(path)?;
        let collection = ingest::parse_collection(&text).map_err(|e| {
            log::error!("Failed to parse {}: {e}", path.display());
            e
        })?;
        features.extend(collection.features);
        progress.inc(1);
    }

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    })
}
