//! Building ZIP archives from directories

use crate::error::{Result, XpiError};
use crate::utils::entry_name;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Deflate level used for combined archives (`zip -9`)
const MAX_COMPRESSION: i32 = 9;

/// Zip the full contents of `source_dir` into `zip_path`. Entries are added
/// in sorted order so the same tree always produces the same entry list.
pub fn create_zip_from_directory(source_dir: &Path, zip_path: &Path) -> Result<()> {
    let file = File::create(zip_path).map_err(|e| XpiError::io(zip_path, e))?;
    let mut zip = ZipWriter::new(file);

    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(MAX_COMPRESSION));

    for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| XpiError::io(source_dir, e.into()))?;
        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(source_dir) else {
            continue;
        };
        let name = entry_name(relative_path);

        if entry.file_type().is_dir() {
            zip.add_directory(name, options.unix_permissions(0o755))
                .map_err(|e| XpiError::zip(zip_path, e))?;
        } else if entry.file_type().is_file() {
            zip.start_file(name, options.unix_permissions(0o644))
                .map_err(|e| XpiError::zip(zip_path, e))?;
            let content = fs::read(path).map_err(|e| XpiError::io(path, e))?;
            zip.write_all(&content).map_err(|e| XpiError::io(zip_path, e))?;
        }
    }

    zip.finish().map_err(|e| XpiError::zip(zip_path, e))?;
    Ok(())
}

/// Write an archive holding exactly `entries`, in the given order
pub fn create_zip_from_entries<C: AsRef<[u8]>>(zip_path: &Path, entries: &[(&str, C)]) -> Result<()> {
    let file = File::create(zip_path).map_err(|e| XpiError::io(zip_path, e))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in entries {
        zip.start_file(*name, options)
            .map_err(|e| XpiError::zip(zip_path, e))?;
        zip.write_all(content.as_ref()).map_err(|e| XpiError::io(zip_path, e))?;
    }

    zip.finish().map_err(|e| XpiError::zip(zip_path, e))?;
    Ok(())
}
