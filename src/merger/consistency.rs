//! Checking a combined archive against its sources

use crate::error::Result;
use crate::models::{Archive, Violation};
use crate::packager::load_archive;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Names shared by `combined` and a source archive whose bytes differ.
/// Every source is checked, so the result covers all offending names.
pub fn check_consistency(combined: &Path, sources: &[PathBuf]) -> Result<Vec<Violation>> {
    check(combined, sources).map(|(_, violations)| violations)
}

pub(crate) fn check(combined: &Path, sources: &[PathBuf]) -> Result<(Archive, Vec<Violation>)> {
    let combined = load_archive(combined)?;
    let mut violations = Vec::new();

    for source in sources {
        let archive = load_archive(source)?;
        violations.extend(find_violations(&combined, &archive));
    }

    Ok((combined, violations))
}

/// Entries of `combined` that `source` also has, with different content
pub fn find_violations(combined: &Archive, source: &Archive) -> Vec<Violation> {
    combined
        .entries()
        .iter()
        .filter(|entry| matches!(source.get(&entry.name), Some(content) if content != entry.content.as_slice()))
        .map(|entry| Violation {
            name: entry.name.clone(),
            source: source.path.clone(),
        })
        .collect()
}

/// Distinct violating names, in the order they were found
pub fn violation_names(violations: &[Violation]) -> Vec<String> {
    let mut seen = HashSet::new();
    violations
        .iter()
        .filter(|v| seen.insert(v.name.as_str()))
        .map(|v| v.name.clone())
        .collect()
}
