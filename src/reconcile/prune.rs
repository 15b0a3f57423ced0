//! Removal of incorrectly generated stub directories.
//!
//! Some stub tools create a package directory and then emit nothing into it. A pending
//! target that turns out to be a directory whose whole subtree holds no file is removed.

use crate::dispatch::PendingTarget;
use crate::error::StubgenError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Prune every pending target in order; returns the removed directories.
pub fn prune_targets(
    targets: impl IntoIterator<Item = PendingTarget>,
) -> Result<Vec<PathBuf>, StubgenError> {
    let mut removed = Vec::new();
    for target in targets {
        prune_target(&target.path, &mut removed)?;
    }
    Ok(removed)
}

fn prune_target(path: &Path, removed: &mut Vec<PathBuf>) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => {
            prune_empty_dirs(path, removed)?;
            Ok(())
        }
        // Absent (a plain module's stub is a file next to this path) or a leaf.
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Depth-first, bottom-up: returns whether `dir`'s subtree holds any file, removing every
/// directory (including `dir`) whose subtree holds none.
///
/// Anything that is not a directory counts as a file; symlinks are not followed.
pub fn prune_empty_dirs(dir: &Path, removed: &mut Vec<PathBuf>) -> io::Result<bool> {
    let mut has_file = false;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            has_file |= prune_empty_dirs(&entry.path(), removed)?;
        } else {
            has_file = true;
        }
    }

    if !has_file {
        info!(path = %dir.display(), "Incorrectly generated stubs found, removing directory");
        fs::remove_dir(dir)?;
        removed.push(dir.to_path_buf());
    }
    Ok(has_file)
}
