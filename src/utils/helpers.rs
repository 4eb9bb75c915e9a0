//! Helper utility functions

use crate::error::{Result, XpiError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Remove `path` if it exists, recursively when it is a directory.
/// Equivalent to `rm -rf`.
pub fn nuke(path: &Path) -> Result<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(XpiError::io(path, e)),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| XpiError::io(path, e))
}

/// Remove a file if present. Returns whether something was removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(XpiError::io(path, e)),
    }
}

/// `path` resolved against the current directory when it is relative
pub fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|e| XpiError::io(".", e))?;
    Ok(cwd.join(path))
}

/// Archive entry name for a path relative to the archived directory
pub fn entry_name(relative_path: &Path) -> String {
    relative_path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
