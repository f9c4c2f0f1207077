//! Directory listings filtered to executable regular files.

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::pathindex::errors::PathIndexError;

/// List the names of regular files in `dir` with any execute bit set.
///
/// Entries whose metadata cannot be read (racing deletes) are skipped rather
/// than failing the whole listing.
pub async fn list_executables(dir: &Path) -> Result<Vec<String>, PathIndexError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }
        if metadata.permissions().mode() & 0o111 == 0 {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}

/// Whether `path` points at an executable regular file right now.
pub fn is_executable_file(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}
