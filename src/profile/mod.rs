//! Installing the extension into a browser profile
//!
//! An extension is "installed" from its source tree by dropping a marker
//! file named after the extension id into `<profile>/extensions/`. The file
//! holds the path to the extension root. The registry caches are deleted so
//! the browser rebuilds them on the next start.

use crate::error::{Result, XpiError};
use crate::models::{ProfileChange, INSTALL_MANIFEST};
use crate::parser::install_rdf::parse_install_manifest_from_file;
use crate::utils::{absolute, remove_file_if_exists};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Caches the browser rebuilds when they are missing
pub const REGISTRY_CACHE_FILES: [&str; 2] = ["compreg.dat", "xpti.dat"];

pub const EXTENSIONS_DIR: &str = "extensions";

/// Read the extension id from an `install.rdf`
pub fn resolve_extension_id(manifest_path: &Path) -> Result<String> {
    parse_install_manifest_from_file(manifest_path).map(|manifest| manifest.id)
}

pub fn marker_path(profile_dir: &Path, extension_id: &str) -> PathBuf {
    profile_dir.join(EXTENSIONS_DIR).join(extension_id)
}

/// Point the profile at `extension_root`. Running it again rewrites the same
/// marker content.
pub fn install(profile_dir: &Path, extension_root: &Path) -> Result<ProfileChange> {
    let extension_root = absolute(extension_root)?;
    // The manifest is read first so a bad one leaves the profile untouched
    let extension_id = resolve_extension_id(&extension_root.join(INSTALL_MANIFEST))?;

    if !profile_dir.is_dir() {
        return Err(XpiError::io(
            profile_dir,
            io::Error::new(io::ErrorKind::NotFound, "profile directory does not exist"),
        ));
    }
    let change = reset(profile_dir, extension_id)?;

    let extensions_dir = profile_dir.join(EXTENSIONS_DIR);
    fs::create_dir_all(&extensions_dir).map_err(|e| XpiError::io(&extensions_dir, e))?;
    fs::write(&change.marker, extension_root.to_string_lossy().as_bytes())
        .map_err(|e| XpiError::io(&change.marker, e))?;

    info!(id = %change.extension_id, profile = %profile_dir.display(), "extension installed");
    Ok(change)
}

/// Remove the extension's marker. A missing marker, or a missing profile
/// directory, is not an error.
pub fn uninstall(profile_dir: &Path, extension_root: &Path) -> Result<ProfileChange> {
    let extension_root = absolute(extension_root)?;
    let extension_id = resolve_extension_id(&extension_root.join(INSTALL_MANIFEST))?;
    let change = reset(profile_dir, extension_id)?;

    info!(
        id = %change.extension_id,
        profile = %profile_dir.display(),
        was_installed = change.marker_existed,
        "extension uninstalled"
    );
    Ok(change)
}

/// Steps shared by install and uninstall: drop the caches and any existing
/// marker. Files that are already gone are skipped.
fn reset(profile_dir: &Path, extension_id: String) -> Result<ProfileChange> {
    let mut removed_caches = Vec::new();
    for name in REGISTRY_CACHE_FILES {
        if remove_file_if_exists(&profile_dir.join(name))? {
            debug!(file = name, "removed registry cache");
            removed_caches.push(name.to_string());
        }
    }

    let marker = marker_path(profile_dir, &extension_id);
    let marker_existed = remove_file_if_exists(&marker)?;

    Ok(ProfileChange {
        extension_id,
        marker,
        removed_caches,
        marker_existed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RDF: &str = r#"<?xml version="1.0"?>
<RDF xmlns="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
     xmlns:em="http://www.mozilla.org/2004/em-rdf#">
  <Description about="urn:mozilla:install-manifest">
    <em:id>weave@mozilla.org</em:id>
  </Description>
</RDF>"#;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("weave");
        let profile = temp_dir.path().join("profile");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&profile).unwrap();
        fs::write(root.join(INSTALL_MANIFEST), RDF).unwrap();
        (temp_dir, root, profile)
    }

    #[test]
    fn test_install_writes_marker_and_clears_caches() {
        let (_temp_dir, root, profile) = setup();
        fs::write(profile.join("compreg.dat"), "cache").unwrap();

        let change = install(&profile, &root).unwrap();

        assert_eq!(change.extension_id, "weave@mozilla.org");
        assert_eq!(change.removed_caches, vec!["compreg.dat"]);
        assert!(!change.marker_existed);
        assert_eq!(
            fs::read_to_string(profile.join("extensions/weave@mozilla.org")).unwrap(),
            root.to_string_lossy()
        );
        assert!(!profile.join("compreg.dat").exists());
    }

    #[test]
    fn test_uninstall_without_marker_is_noop() {
        let (_temp_dir, root, profile) = setup();

        let change = uninstall(&profile, &root).unwrap();
        assert!(!change.marker_existed);
        assert!(!change.marker.exists());
    }

    #[test]
    fn test_bad_manifest_leaves_profile_alone() {
        let (_temp_dir, root, profile) = setup();
        fs::write(root.join(INSTALL_MANIFEST), "<RDF/>").unwrap();
        fs::write(profile.join("xpti.dat"), "cache").unwrap();

        assert!(matches!(install(&profile, &root), Err(XpiError::Manifest { .. })));
        assert!(profile.join("xpti.dat").exists());
    }

    #[test]
    fn test_missing_profile_dir() {
        let (temp_dir, root, _profile) = setup();
        let err = install(&temp_dir.path().join("nope"), &root).unwrap_err();
        assert!(matches!(err, XpiError::Io { .. }));
    }

    #[test]
    fn test_uninstall_from_missing_profile_dir_is_noop() {
        let (temp_dir, root, _profile) = setup();
        let profile = temp_dir.path().join("nope");

        let change = uninstall(&profile, &root).unwrap();
        assert!(!change.marker_existed);
        assert!(change.removed_caches.is_empty());
        assert!(!profile.exists());
    }
}
