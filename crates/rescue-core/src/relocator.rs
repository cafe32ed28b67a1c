//! Moving staged files into their destination directory

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// What to do when the destination already holds a file with the same name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Leave both files alone and report the collision
    Fail,
    /// Move to the first free `stem_N.ext`
    Rename,
}

/// Result of moving one file
#[derive(Debug)]
pub struct MoveOutcome {
    /// Where the file was
    pub source: PathBuf,
    /// Where it ended up, or why it stayed
    pub result: Result<PathBuf>,
}

impl MoveOutcome {
    /// Whether the file reached the destination
    pub fn is_moved(&self) -> bool {
        self.result.is_ok()
    }
}

/// Move every file in `files` into `dest_dir`
///
/// `dest_dir` is created (with parents) before anything is moved; if that
/// fails no file is touched. After that each file succeeds or fails on its
/// own and every file gets an outcome.
pub fn move_all<P: AsRef<Path>>(
    files: &[PathBuf],
    dest_dir: P,
    policy: CollisionPolicy,
) -> Result<Vec<MoveOutcome>> {
    let dest_dir = dest_dir.as_ref();

    fs::create_dir_all(dest_dir).map_err(|e| Error::CreateDir {
        path: dest_dir.to_path_buf(),
        source: e,
    })?;

    Ok(files
        .iter()
        .map(|file| MoveOutcome {
            source: file.clone(),
            result: move_file(file, dest_dir, policy),
        })
        .collect())
}

/// Move a single file into `dest_dir`, which must already exist
pub fn move_file(file: &Path, dest_dir: &Path, policy: CollisionPolicy) -> Result<PathBuf> {
    let file_name = file.file_name().ok_or_else(|| Error::MoveFailed {
        from: file.to_path_buf(),
        to: dest_dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;

    let mut dest = dest_dir.join(file_name);

    if is_same_file(file, &dest) {
        return Ok(dest);
    }

    if dest.exists() {
        match policy {
            CollisionPolicy::Overwrite => {}
            CollisionPolicy::Fail => {
                return Err(Error::DestinationExists {
                    from: file.to_path_buf(),
                    to: dest,
                });
            }
            CollisionPolicy::Rename => dest = next_free_name(&dest),
        }
    }

    fs::rename(file, &dest).map_err(|e| Error::MoveFailed {
        from: file.to_path_buf(),
        to: dest.clone(),
        source: e,
    })?;

    tracing::debug!(from = %file.display(), to = %dest.display(), "moved file");
    Ok(dest)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// First `stem_N.ext` next to `taken` that does not exist yet
fn next_free_name(taken: &Path) -> PathBuf {
    let stem = taken.file_stem().map(OsString::from).unwrap_or_default();
    let ext = taken.extension().map(OsString::from);

    (1..)
        .map(|n| {
            let mut name = stem.clone();
            name.push(format!("_{}", n));
            if let Some(ext) = &ext {
                name.push(".");
                name.push(ext);
            }
            taken.with_file_name(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| taken.to_path_buf())
}
