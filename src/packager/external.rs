//! Backend that shells out to Info-ZIP's `unzip` and `zip`

use super::ArchiveBackend;
use crate::error::{Result, XpiError};
use crate::utils::{absolute, process::call_in};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ExternalBackend {
    pub unzip: OsString,
    pub zip: OsString,
}

impl Default for ExternalBackend {
    fn default() -> Self {
        Self {
            unzip: OsString::from("unzip"),
            zip: OsString::from("zip"),
        }
    }
}

impl ArchiveBackend for ExternalBackend {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<()> {
        // -u: update existing files and create new ones; -o: never prompt
        let cmdline: [&OsStr; 6] = [
            self.unzip.as_os_str(),
            OsStr::new("-u"),
            OsStr::new("-o"),
            archive.as_os_str(),
            OsStr::new("-d"),
            dest.as_os_str(),
        ];
        call_in(&cmdline, None)
    }

    fn compress(&self, source_dir: &Path, output: &Path) -> Result<()> {
        // zip runs inside source_dir, so the output must not be relative
        let output = absolute(output)?;

        let mut top_level = fs::read_dir(source_dir)
            .map_err(|e| XpiError::io(source_dir, e))?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| XpiError::io(source_dir, e))?;
        top_level.sort();

        let mut cmdline: Vec<OsString> = vec![
            self.zip.clone(),
            OsString::from("-9"),
            OsString::from("-r"),
            output.into_os_string(),
        ];
        cmdline.extend(top_level);

        call_in(&cmdline, Some(source_dir))
    }
}

/// Whether both tools can be started
pub fn tools_available(backend: &ExternalBackend) -> bool {
    [&backend.unzip, &backend.zip].iter().all(|program| {
        std::process::Command::new(program)
            .arg("-v")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .is_ok()
    })
}
