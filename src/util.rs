//! Corpus discovery helpers.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::MirdocError;

/// Recursively collects every file under `dir` with the given extension
/// (matched case-insensitively, without the dot), sorted by path.
///
/// # Errors
/// Returns an error if a directory cannot be read.
pub fn find_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, MirdocError> {
    let mut found = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| MirdocError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches {
            found.push(entry.into_path());
        }
    }

    found.sort();
    Ok(found)
}

/// The stem of a path, used to pair audio files with their annotation
/// documents: `audio/track01.flac` -> `track01`.
pub fn filebase(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}
