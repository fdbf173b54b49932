//! Host filesystem helpers for reshaping template trees.
//!
//! Everything here works directly on disk. Copies merge into the
//! destination and overwrite files that already exist there; deletions of
//! missing paths succeed without doing anything.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Directory names never carried over by a copy: version-control metadata
/// and terraform working directories.
const SKIPPED_NAMES: &[&str] = &[".git", ".terraform"];

/// Copy filter used by every copy in the bootstrap flow.
///
/// Returns `true` when any component of `path` is a `.git` or `.terraform`
/// directory name. Files that merely start with those names (for example
/// `.terraform.lock.hcl` or `.gitlab-ci.yml`) are kept.
pub fn should_skip(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => SKIPPED_NAMES.iter().any(|skipped| name == *skipped),
        _ => false,
    })
}

fn fs_error(path: &Path, err: impl std::fmt::Display) -> Error {
    Error::Filesystem {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// Recursively copy `src` into `dst`.
///
/// `skip` is called with each candidate path relative to `src`; returning
/// `true` excludes that entry and, for directories, everything below it.
/// The source root itself is never offered to `skip`. When `src` is a file
/// it is copied to the file path `dst`.
pub fn copy_tree<F>(src: &Path, dst: &Path, skip: F) -> Result<()>
where
    F: Fn(&Path) -> bool,
{
    let metadata = fs::metadata(src).map_err(|e| fs_error(src, e))?;
    debug!("copying {} -> {}", src.display(), dst.display());

    if metadata.is_file() {
        return copy_file(src, dst);
    }

    let walker = WalkDir::new(src).into_iter().filter_entry(|entry| {
        if entry.depth() == 0 {
            return true;
        }
        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        !skip(relative)
    });

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            fs_error(&path, e)
        })?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| fs_error(entry.path(), e))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| fs_error(&target, e))?;
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_error(parent, e))?;
    }
    fs::copy(src, dst).map_err(|e| fs_error(src, e))?;
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let link_target = fs::read_link(src).map_err(|e| fs_error(src, e))?;
    remove_all(dst)?;
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| fs_error(parent, e))?;
    }
    std::os::unix::fs::symlink(&link_target, dst).map_err(|e| fs_error(dst, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    copy_file(src, dst)
}

/// Remove a file or a directory tree. A path that does not exist is
/// already removed and is not an error.
pub fn remove_all(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(fs_error(path, e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match removed {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(fs_error(path, e)),
    }
}

/// Create a directory (and its parents) readable only by the owner.
pub fn create_private_dir(path: &Path) -> Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(path).map_err(|e| fs_error(path, e))
}
