//! Results reported by merge and install runs

use serde::Serialize;
use std::path::PathBuf;

/// A name whose bytes in `source` differ from the combined archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub name: String,
    pub source: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub output: PathBuf,
    pub sources: Vec<PathBuf>,
    /// Number of file entries in the combined archive
    pub entries: usize,
}

/// What an install or uninstall did to a profile directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileChange {
    pub extension_id: String,
    pub marker: PathBuf,
    pub removed_caches: Vec<String>,
    pub marker_existed: bool,
}
