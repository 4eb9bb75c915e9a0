//! Combining platform-specific XPIs into one cross-platform XPI
//!
//! Every source archive is extracted into the same scratch directory, which
//! is then zipped up into the combined archive. Files that several platform
//! builds share must be identical; [`check_consistency`] verifies that the
//! combined archive agrees with each of its sources.

pub mod consistency;

pub use consistency::{check_consistency, find_violations, violation_names};

use crate::error::{Result, XpiError};
use crate::models::MergeReport;
use crate::packager::{ArchiveBackend, BackendKind};
use crate::utils::nuke;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct MergeOptions {
    /// Directory holding the platform-specific archives
    pub root: PathBuf,
    /// File name of the combined archive, created inside `root`
    pub output_name: String,
    /// Name of the scratch directory, created inside `root`
    pub scratch_name: String,
    /// Extension (without the dot) identifying source archives
    pub archive_extension: String,
    pub backend: BackendKind,
    /// Delete the combined archive when the consistency check fails
    pub discard_on_violation: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output_name: "sync.xpi".to_string(),
            scratch_name: "build".to_string(),
            archive_extension: "xpi".to_string(),
            backend: BackendKind::Builtin,
            discard_on_violation: false,
        }
    }
}

impl MergeOptions {
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_name)
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.root.join(&self.scratch_name)
    }
}

/// Merge all archives under `options.root` with the configured backend
pub fn merge(options: &MergeOptions) -> Result<MergeReport> {
    let backend = options.backend.backend();
    merge_with(options, backend.as_ref())
}

/// Merge all archives under `options.root` with an explicit backend
pub fn merge_with(options: &MergeOptions, backend: &dyn ArchiveBackend) -> Result<MergeReport> {
    let output = options.output_path();
    let scratch_path = options.scratch_path();

    // 1. Remove leftovers from a previous run
    nuke(&output)?;
    nuke(&scratch_path)?;

    // 2. Find the platform-specific archives
    let sources = discover_archives(&options.root, &options.archive_extension, &output)?;
    if sources.is_empty() {
        return Err(XpiError::NoArchives {
            root: options.root.clone(),
        });
    }
    info!(count = sources.len(), root = %options.root.display(), "combining archives");
    for source in &sources {
        info!(archive = %source.display(), "source archive");
    }

    // 3. Overlay them and zip the result; the scratch dir goes away on every path
    {
        let scratch = ScratchDir::create(scratch_path)?;
        for source in &sources {
            debug!(archive = %source.display(), "extracting");
            backend.extract(source, scratch.path())?;
        }
        info!(output = %output.display(), "creating combined archive");
        backend.compress(scratch.path(), &output)?;
    }

    // 4. Every shared file must match the combined archive
    let (combined, violations) = consistency::check(&output, &sources)?;
    if !violations.is_empty() {
        warn!(count = violations.len(), "combined archive is inconsistent with its sources");
        if options.discard_on_violation {
            nuke(&output)?;
        }
        return Err(XpiError::Inconsistent(violations));
    }

    if combined.is_empty() {
        warn!(output = %output.display(), "combined archive holds no files");
    }

    Ok(MergeReport {
        output,
        sources,
        entries: combined.len(),
    })
}

/// Files directly under `root` with the given extension, sorted by file name.
///
/// Sorting fixes the overlay order: when two archives hold the same name, the
/// one whose file name sorts last is extracted last and wins.
pub fn discover_archives(root: &Path, extension: &str, exclude: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| XpiError::io(root, e.into()))?;
        let path = entry.path();

        let matches = path.extension().and_then(|e| e.to_str()) == Some(extension);
        if matches && path.is_file() && path != exclude {
            archives.push(path.to_path_buf());
        }
    }

    Ok(archives)
}

/// Scratch directory removed when dropped
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn create(path: PathBuf) -> Result<Self> {
        fs::create_dir_all(&path).map_err(|e| XpiError::io(&path, e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(e) = nuke(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove scratch directory");
        }
    }
}
