//! Built-in checks run by `build-cross-platform-xpi test`

use crate::error::{Result, XpiError};
use crate::merger::{merge, violation_names, MergeOptions};
use crate::packager::{create_zip_from_entries, load_archive};
use crate::utils::call;
use anyhow::{bail, ensure, Context};
use std::path::Path;
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub name: &'static str,
    /// `None` when the check passed
    pub failure: Option<String>,
}

impl CheckOutcome {
    pub fn passed(&self) -> bool {
        self.failure.is_none()
    }
}

type Check = fn(&Path) -> anyhow::Result<()>;

const CHECKS: [(&str, Check); 4] = [
    ("call accepts a succeeding command", call_succeeds),
    ("call rejects a failing command", call_fails),
    ("merge combines shared and disjoint entries", merge_consistent),
    ("merge reports divergent entries", merge_divergent),
];

/// Run every check, each in its own temporary directory
pub fn run() -> Vec<CheckOutcome> {
    CHECKS
        .iter()
        .map(|&(name, check)| {
            let result = TempDir::new()
                .context("could not create temporary directory")
                .and_then(|dir| check(dir.path()));
            CheckOutcome {
                name,
                failure: result.err().map(|e| format!("{:#}", e)),
            }
        })
        .collect()
}

#[cfg(unix)]
fn shell(script: &str) -> [&str; 3] {
    ["sh", "-c", script]
}

#[cfg(windows)]
fn shell(script: &str) -> [&str; 3] {
    ["cmd", "/C", script]
}

fn call_succeeds(_dir: &Path) -> anyhow::Result<()> {
    call(&shell("exit 0"))?;
    Ok(())
}

fn call_fails(_dir: &Path) -> anyhow::Result<()> {
    match call(&shell("exit 1")) {
        Err(XpiError::Subprocess { cmdline }) if cmdline.ends_with("exit 1") => Ok(()),
        Err(e) => bail!("unexpected error: {}", e),
        Ok(()) => bail!("failing command was reported as successful"),
    }
}

fn merge_fixtures(dir: &Path, b_entries: &[(&str, &str)]) -> Result<MergeOptions> {
    create_zip_from_entries(&dir.join("a.xpi"), &[("x.txt", "1")])?;
    create_zip_from_entries(&dir.join("b.xpi"), b_entries)?;

    Ok(MergeOptions {
        root: dir.to_path_buf(),
        ..Default::default()
    })
}

fn merge_consistent(dir: &Path) -> anyhow::Result<()> {
    let options = merge_fixtures(dir, &[("x.txt", "1"), ("y.txt", "2")])?;
    let report = merge(&options)?;
    let combined = load_archive(&report.output)?;

    let mut names: Vec<_> = combined.names().collect();
    names.sort_unstable();
    ensure!(names == ["x.txt", "y.txt"], "unexpected entries {:?}", names);
    ensure!(
        combined.get("x.txt") == Some(&b"1"[..]) && combined.get("y.txt") == Some(&b"2"[..]),
        "combined archive has the wrong content"
    );
    ensure!(!options.scratch_path().exists(), "scratch directory was left behind");
    Ok(())
}

fn merge_divergent(dir: &Path) -> anyhow::Result<()> {
    let options = merge_fixtures(dir, &[("x.txt", "2"), ("y.txt", "2")])?;

    match merge(&options) {
        Err(XpiError::Inconsistent(violations)) => {
            let names = violation_names(&violations);
            ensure!(names == ["x.txt"], "unexpected violations {:?}", names);
            Ok(())
        }
        Err(e) => bail!("unexpected error: {}", e),
        Ok(_) => bail!("divergent archives were merged"),
    }
}
