//! Relocation of the generated subtree to the requested output directory.
//!
//! All or nothing: an existing target is first moved aside to `<target>.bak`; if moving the
//! new tree in fails, whatever landed at the target is removed and the backup is put back.
//! On success the backup is deleted; failing to delete it is an error of its own. A plan
//! whose origin and target name the same location does nothing.

use crate::error::StubgenError;
use crate::integration::Integration;
use crate::options::same_location;
use crate::resolver::Resolution;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Filesystem moves used by relocation
pub trait FileMover: Send + Sync {
    /// Move a file or directory tree; `to` must not exist
    fn move_path(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Delete a file or directory tree
    fn remove_path(&self, path: &Path) -> io::Result<()> {
        remove_any(path)
    }
}

/// `rename`, falling back to copy-then-delete when the rename is refused
/// (for example across filesystems)
#[derive(Debug, Clone, Copy, Default)]
pub struct FsMover;

impl FileMover for FsMover {
    fn move_path(&self, from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(e),
            Err(rename_error) => {
                warn!(
                    from = %from.display(),
                    to = %to.display(),
                    error = %rename_error,
                    "Rename failed, copying instead"
                );
                copy_tree(from, to)?;
                remove_any(from)
            }
        }
    }
}

fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    if !fs::symlink_metadata(from)?.is_dir() {
        fs::copy(from, to)?;
        return Ok(());
    }

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;
        let destination = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&destination)?;
        } else {
            fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

fn remove_any(path: &Path) -> io::Result<()> {
    if fs::symlink_metadata(path)?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn path_exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Sibling of `target` holding its previous contents during relocation
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".bak");
    target.with_file_name(name)
}

/// Source and destination of one relocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub origin: PathBuf,
    pub target: PathBuf,
}

impl RelocationPlan {
    /// Subtree keyed per the integration under its default root, moved under `out_dir`.
    ///
    /// When no directory was generated but a single `.pyi` stub was (a plain module),
    /// that file is relocated instead.
    pub fn new(integration: &Integration, resolution: &Resolution, out_dir: &Path) -> Self {
        let key = integration.output_key(resolution);
        let origin = integration.default_out_dir().join(&key);
        let target = out_dir.join(&key);

        let origin_stub = origin.with_extension("pyi");
        if !path_exists(&origin) && origin_stub.is_file() {
            return Self {
                origin: origin_stub,
                target: target.with_extension("pyi"),
            };
        }

        Self { origin, target }
    }
}

/// Move `plan.origin` to `plan.target`, restoring the previous target on failure
pub fn relocate(plan: &RelocationPlan, mover: &dyn FileMover) -> Result<(), StubgenError> {
    let RelocationPlan { origin, target } = plan;
    let failed = |source: io::Error| StubgenError::RelocationFailed {
        origin: origin.clone(),
        target: target.clone(),
        source,
    };

    if same_location(origin, target) {
        debug!(target = %target.display(), "Output already in place");
        return Ok(());
    }

    info!(origin = %origin.display(), target = %target.display(), "Relocating generated stubs");

    let backup = backup_path(target);
    if path_exists(&backup) {
        warn!(backup = %backup.display(), "Removing stale backup from an earlier run");
        mover.remove_path(&backup).map_err(failed)?;
    }

    let backup_taken = if path_exists(target) {
        mover.move_path(target, &backup).map_err(failed)?;
        info!(backup = %backup.display(), "Existing output moved aside");
        true
    } else {
        false
    };

    let moved = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| mover.move_path(origin, target));

    if let Err(source) = moved {
        rollback(target, backup_taken.then_some(backup.as_path()), mover);
        return Err(failed(source));
    }

    // The new tree is in place either way; a leftover backup is still reported.
    if backup_taken {
        if let Err(source) = mover.remove_path(&backup) {
            error!(backup = %backup.display(), error = %source, "Failed to remove backup");
            return Err(StubgenError::BackupNotRemoved {
                backup,
                target: target.clone(),
                source,
            });
        }
    }

    info!(target = %target.display(), "Relocation complete");
    Ok(())
}

fn rollback(target: &Path, backup: Option<&Path>, mover: &dyn FileMover) {
    if path_exists(target) {
        if let Err(e) = mover.remove_path(target) {
            error!(target = %target.display(), error = %e, "Failed to remove partial output");
        }
    }
    if let Some(backup) = backup {
        match mover.move_path(backup, target) {
            Ok(()) => info!(target = %target.display(), "Previous output restored"),
            Err(e) => error!(
                backup = %backup.display(),
                error = %e,
                "Failed to restore previous output"
            ),
        }
    }
}
