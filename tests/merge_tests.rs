//! Integration tests for combining platform-specific XPIs

use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;
use test_case::test_case;
use xpi_tools::merger::{check_consistency, merge, merge_with, violation_names, MergeOptions};
use xpi_tools::packager::external::tools_available;
use xpi_tools::packager::{create_zip_from_entries, load_archive, BackendKind, ExternalBackend};
use xpi_tools::XpiError;

fn write_xpi(root: &Path, name: &str, files: &[(&str, &str)]) {
    create_zip_from_entries(&root.join(name), files).unwrap();
}

fn options_for(root: &Path) -> MergeOptions {
    MergeOptions {
        root: root.to_path_buf(),
        ..Default::default()
    }
}

/// Name -> content of every file in an archive
fn contents(path: &Path) -> BTreeMap<String, String> {
    load_archive(path)
        .unwrap()
        .entries()
        .iter()
        .map(|e| (e.name.clone(), String::from_utf8(e.content.clone()).unwrap()))
        .collect()
}

fn expected(files: &[(&str, &str)]) -> BTreeMap<String, String> {
    files.iter().map(|(n, c)| (n.to_string(), c.to_string())).collect()
}

#[test]
fn test_disjoint_archives_union() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "linux.xpi", &[("platform/Linux/lib.so", "elf")]);
    write_xpi(temp_dir.path(), "darwin.xpi", &[("platform/Darwin/lib.dylib", "macho")]);
    write_xpi(temp_dir.path(), "winnt.xpi", &[("platform/WINNT/lib.dll", "pe")]);

    let report = merge(&options_for(temp_dir.path())).unwrap();

    assert_eq!(report.sources.len(), 3);
    assert_eq!(report.entries, 3);
    assert_eq!(
        contents(&report.output),
        expected(&[
            ("platform/Darwin/lib.dylib", "macho"),
            ("platform/Linux/lib.so", "elf"),
            ("platform/WINNT/lib.dll", "pe"),
        ])
    );
}

#[test]
fn test_shared_identical_entry_kept_once() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "1"), ("y.txt", "2")]);

    let report = merge(&options_for(temp_dir.path())).unwrap();

    let archive = load_archive(&report.output).unwrap();
    assert_eq!(archive.names().filter(|n| *n == "x.txt").count(), 1);
    assert_eq!(contents(&report.output), expected(&[("x.txt", "1"), ("y.txt", "2")]));
    assert!(!temp_dir.path().join("build").exists());
}

#[test]
fn test_divergent_entry_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "2"), ("y.txt", "2")]);
    let options = options_for(temp_dir.path());

    let err = merge(&options).unwrap_err();

    let XpiError::Inconsistent(violations) = err else {
        panic!("expected a consistency failure");
    };
    assert_eq!(violation_names(&violations), vec!["x.txt".to_string()]);
    // The combined archive is kept for inspection by default
    assert!(options.output_path().exists());
    assert!(!options.scratch_path().exists());
}

#[test]
fn test_discard_on_violation_removes_output() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "2")]);
    let options = MergeOptions {
        discard_on_violation: true,
        ..options_for(temp_dir.path())
    };

    assert!(matches!(merge(&options), Err(XpiError::Inconsistent(_))));
    assert!(!options.output_path().exists());
}

#[test]
fn test_violations_from_every_source() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1"), ("z.txt", "a")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "2")]);
    write_xpi(temp_dir.path(), "c.xpi", &[("z.txt", "c")]);

    let Err(XpiError::Inconsistent(violations)) = merge(&options_for(temp_dir.path())) else {
        panic!("expected a consistency failure");
    };

    // c.xpi sorts last, so its z.txt wins; a.xpi disagrees on both names
    let mut names = violation_names(&violations);
    names.sort();
    assert_eq!(names, vec!["x.txt", "z.txt"]);
    assert!(violations
        .iter()
        .all(|v| v.source.file_name().unwrap() == "a.xpi"));
}

#[test_case("a.xpi", "b.xpi" ; "created in sorted order")]
#[test_case("b.xpi", "a.xpi" ; "created in reverse order")]
fn test_overlay_order_is_sorted(first: &str, second: &str) {
    let temp_dir = TempDir::new().unwrap();
    let content = |name: &str| if name == "a.xpi" { "1" } else { "2" };
    write_xpi(temp_dir.path(), first, &[("x.txt", content(first))]);
    write_xpi(temp_dir.path(), second, &[("x.txt", content(second))]);
    let options = options_for(temp_dir.path());

    assert!(merge(&options).is_err());
    // b.xpi sorts last and wins
    assert_eq!(contents(&options.output_path())["x.txt"], "2");
}

#[test]
fn test_check_consistency_directly() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "sync.xpi", &[("x.txt", "1"), ("y.txt", "2")]);
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("y.txt", "3")]);

    let violations = check_consistency(
        &temp_dir.path().join("sync.xpi"),
        &[temp_dir.path().join("a.xpi"), temp_dir.path().join("b.xpi")],
    )
    .unwrap();

    assert_eq!(violation_names(&violations), vec!["y.txt"]);
    assert_eq!(violations[0].source, temp_dir.path().join("b.xpi"));
}

#[test]
fn test_nested_directories_survive() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(
        temp_dir.path(),
        "linux.xpi",
        &[("install.rdf", "<RDF/>"), ("chrome/content/sync.js", "// js")],
    );

    let report = merge(&options_for(temp_dir.path())).unwrap();
    assert_eq!(
        contents(&report.output),
        expected(&[("chrome/content/sync.js", "// js"), ("install.rdf", "<RDF/>")])
    );
}

#[test]
fn test_external_tools() {
    let backend = ExternalBackend::default();
    if !tools_available(&backend) {
        println!("⚠️  zip/unzip not installed, skipping");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1"), ("chrome/a.js", "a")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "1"), ("y.txt", "2")]);
    let options = MergeOptions {
        backend: BackendKind::External,
        ..options_for(temp_dir.path())
    };

    let report = merge_with(&options, &backend).unwrap();
    assert_eq!(
        contents(&report.output),
        expected(&[("chrome/a.js", "a"), ("x.txt", "1"), ("y.txt", "2")])
    );
    assert!(!options.scratch_path().exists());
}

#[test]
fn test_external_tool_failure_is_fatal() {
    let backend = ExternalBackend::default();
    if !tools_available(&backend) {
        println!("⚠️  zip/unzip not installed, skipping");
        return;
    }

    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("broken.xpi"), "not a zip").unwrap();
    let options = options_for(temp_dir.path());

    let err = merge_with(&options, &backend).unwrap_err();
    assert!(matches!(err, XpiError::Subprocess { .. }));
    assert!(err.to_string().starts_with("Subprocess failed: unzip -u -o"));
    assert!(!options.scratch_path().exists());
}

#[test]
fn test_cli_exit_codes() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1")]);
    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "1"), ("y.txt", "2")]);

    let status = Command::new(env!("CARGO_BIN_EXE_build-cross-platform-xpi"))
        .arg("--root")
        .arg(temp_dir.path())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(0));

    write_xpi(temp_dir.path(), "b.xpi", &[("x.txt", "2")]);
    let output = Command::new(env!("CARGO_BIN_EXE_build-cross-platform-xpi"))
        .arg("--root")
        .arg(temp_dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("yet are not identical"));
    assert!(stderr.lines().any(|line| line == "x.txt"));

    // The combined sources are listed even though the run failed
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Combining these XPIs"));
    assert!(stdout.contains("a.xpi"));
    assert!(stdout.contains("b.xpi"));
}

#[test]
fn test_cli_json_report() {
    let temp_dir = TempDir::new().unwrap();
    write_xpi(temp_dir.path(), "a.xpi", &[("x.txt", "1")]);

    let output = Command::new(env!("CARGO_BIN_EXE_build-cross-platform-xpi"))
        .arg("--root")
        .arg(temp_dir.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entries"], 1);
    assert_eq!(report["sources"].as_array().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn test_cli_self_test() {
    let output = Command::new(env!("CARGO_BIN_EXE_build-cross-platform-xpi"))
        .arg("test")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stdout));
    assert!(String::from_utf8_lossy(&output.stdout).contains("0 failed"));
}
