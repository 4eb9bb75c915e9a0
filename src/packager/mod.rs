//! Archive extraction and building

pub mod builder;
pub mod external;
pub mod extractor;

use crate::error::Result;
use std::path::Path;

pub use builder::{create_zip_from_directory, create_zip_from_entries};
pub use external::ExternalBackend;
pub use extractor::{extract_to_directory, load_archive};

/// The two archive operations a merge needs
pub trait ArchiveBackend {
    /// Extract every entry of `archive` into `dest`, overwriting files that
    /// already exist there.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()>;

    /// Compress the full contents of `source_dir`, recursively and at maximum
    /// compression, into a new archive at `output`.
    fn compress(&self, source_dir: &Path, output: &Path) -> Result<()>;
}

/// In-process backend built on the `zip` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinBackend;

impl ArchiveBackend for BuiltinBackend {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        extract_to_directory(archive, dest)
    }

    fn compress(&self, source_dir: &Path, output: &Path) -> Result<()> {
        create_zip_from_directory(source_dir, output)
    }
}

/// Which backend a merge runs with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Builtin,
    /// `unzip` and `zip` found on `PATH`
    External,
}

impl BackendKind {
    pub fn backend(self) -> Box<dyn ArchiveBackend> {
        match self {
            BackendKind::Builtin => Box::new(BuiltinBackend),
            BackendKind::External => Box::new(ExternalBackend::default()),
        }
    }
}
