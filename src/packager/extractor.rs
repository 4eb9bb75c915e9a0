//! Reading and extracting ZIP archives

use crate::error::{Result, XpiError};
use crate::models::{Archive, ArchiveEntry};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOCATION: u64 = 1 << 20;

fn open(archive_path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(archive_path).map_err(|e| XpiError::io(archive_path, e))?;
    ZipArchive::new(file).map_err(|e| XpiError::zip(archive_path, e))
}

/// Load every file entry of an archive into memory
pub fn load_archive(archive_path: &Path) -> Result<Archive> {
    let mut archive = open(archive_path)?;
    let mut entries = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| XpiError::zip(archive_path, e))?;

        if file.is_file() {
            let name = file.name().to_string();
            // The declared size comes from the archive and is not trusted
            let mut content = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
            io::copy(&mut file, &mut content).map_err(|e| XpiError::io(archive_path, e))?;
            entries.push(ArchiveEntry { name, content });
        }
    }

    Ok(Archive::new(archive_path, entries))
}

/// Extract an archive into `dest`, replacing files that are already there
pub fn extract_to_directory(archive_path: &Path, dest: &Path) -> Result<()> {
    let mut archive = open(archive_path)?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| XpiError::zip(archive_path, e))?;

        let relative = file
            .enclosed_name()
            .map(Path::to_path_buf)
            .ok_or_else(|| XpiError::UnsafeEntry {
                archive: archive_path.to_path_buf(),
                name: file.name().to_string(),
            })?;
        let out_path = dest.join(&relative);

        if file.is_dir() {
            fs::create_dir_all(&out_path).map_err(|e| XpiError::io(&out_path, e))?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|e| XpiError::io(parent, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| XpiError::io(&out_path, e))?;
        io::copy(&mut file, &mut out).map_err(|e| XpiError::io(&out_path, e))?;
    }

    debug!(archive = %archive_path.display(), dest = %dest.display(), "extracted archive");
    Ok(())
}
