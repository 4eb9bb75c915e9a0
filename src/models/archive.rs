//! In-memory representation of an extension archive

use std::collections::HashMap;
use std::path::PathBuf;

/// A single file stored in an archive. Names always use `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub content: Vec<u8>,
}

/// The file entries of one archive, in the order they appear in it.
///
/// Directory entries are not kept; only files take part in merging and
/// consistency checks.
#[derive(Debug, Clone)]
pub struct Archive {
    pub path: PathBuf,
    entries: Vec<ArchiveEntry>,
    index: HashMap<String, usize>,
}

impl Archive {
    pub fn new(path: impl Into<PathBuf>, entries: Vec<ArchiveEntry>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.name.clone(), i))
            .collect();

        Self {
            path: path.into(),
            entries,
            index,
        }
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Entry names in archive order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Content of the named entry. If an archive stores the same name twice,
    /// the later entry is returned, as it is the one an extraction leaves.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.index
            .get(name)
            .map(|&i| self.entries[i].content.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
