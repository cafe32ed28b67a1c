//! Directory scanner for discovering CSV files

use crate::error::{Error, Result};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List the CSV files directly inside `dir`, sorted by file name
///
/// Subdirectories are not searched. The extension check is ASCII
/// case-insensitive. A directory that does not exist yields an empty list,
/// since a phase with nothing staged is not an error.
pub fn list_csv_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 && is_not_found(&e) => {
                tracing::debug!(dir = %dir.display(), "directory does not exist");
                return Ok(Vec::new());
            }
            Err(e) if e.depth() > 0 => {
                // e.g. a dangling symlink; the rest of the listing is still usable
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                continue;
            }
            Err(e) => {
                return Err(Error::DirectoryRead {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
        };

        if entry.file_type().is_file() && is_csv(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Check whether a path has a `.csv` extension
pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn is_not_found(e: &walkdir::Error) -> bool {
    e.io_error()
        .is_some_and(|io| io.kind() == io::ErrorKind::NotFound)
}
