//! Error types shared by the merger and the profile installer

use crate::models::Violation;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, XpiError>;

#[derive(Debug, Error)]
pub enum XpiError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid archive {}: {source}", path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Entry '{name}' in {} would be extracted outside the destination", archive.display())]
    UnsafeEntry { archive: PathBuf, name: String },

    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Subprocess failed: {cmdline}")]
    Subprocess { cmdline: String },

    #[error("Invalid manifest {}: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("No archives to combine in {}", root.display())]
    NoArchives { root: PathBuf },

    #[error("{} file(s) are contained in two or more platform-specific XPIs, yet are not identical", .0.len())]
    Inconsistent(Vec<Violation>),
}

impl XpiError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn zip(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::Zip { path: path.into(), source }
    }

    pub(crate) fn manifest(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Manifest { path: path.into(), reason: reason.into() }
    }
}
