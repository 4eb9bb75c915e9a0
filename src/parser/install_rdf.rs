//! `install.rdf` parsing

use crate::error::{Result, XpiError};
use crate::models::{InstallManifest, EM_NAMESPACE, RDF_NAMESPACE};
use roxmltree::{Document, Node};
use std::path::Path;

const INSTALL_MANIFEST_ABOUT: &str = "urn:mozilla:install-manifest";

/// Parse an `install.rdf` document. `path` is only used in error messages.
pub fn parse_install_manifest(content: &str, path: &Path) -> Result<InstallManifest> {
    let doc = Document::parse(content)
        .map_err(|e| XpiError::manifest(path, format!("malformed XML: {}", e)))?;

    // Prefer the install-manifest description; older manifests omit `about`
    let scope = doc
        .descendants()
        .find(|n| is_description(n) && about(n) == Some(INSTALL_MANIFEST_ABOUT))
        .unwrap_or_else(|| doc.root_element());

    let id = match em_value(scope, "id") {
        EmValue::Found(id) => id,
        EmValue::Empty => return Err(XpiError::manifest(path, "empty em:id")),
        EmValue::Missing => return Err(XpiError::manifest(path, "missing em:id")),
    };
    validate_id(&id).map_err(|reason| XpiError::manifest(path, reason))?;

    Ok(InstallManifest {
        id,
        name: em_value(scope, "name").found(),
        version: em_value(scope, "version").found(),
    })
}

/// Parse `install.rdf` from file path
pub fn parse_install_manifest_from_file(path: impl AsRef<Path>) -> Result<InstallManifest> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| XpiError::io(path, e))?;
    parse_install_manifest(&content, path)
}

#[derive(Debug, PartialEq, Eq)]
enum EmValue {
    Found(String),
    /// An element exists but holds no text
    Empty,
    Missing,
}

impl EmValue {
    fn found(self) -> Option<String> {
        match self {
            EmValue::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// First `em:<local>` element under `scope`, skipping target application
/// blocks (they carry the host application's id). Only the first element
/// counts; when it is empty, the `em:<local>` attribute of a description is
/// the remaining source.
fn em_value(scope: Node, local: &str) -> EmValue {
    let element = scope
        .descendants()
        .filter(|n| n.has_tag_name((EM_NAMESPACE, local)))
        .find(|n| !n.ancestors().any(|a| a.has_tag_name((EM_NAMESPACE, "targetApplication"))));

    let text = element
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty());
    if let Some(text) = text {
        return EmValue::Found(text.to_string());
    }

    let attribute = scope
        .descendants()
        .filter(is_description)
        .find_map(|n| n.attribute((EM_NAMESPACE, local)))
        .map(str::trim)
        .filter(|text| !text.is_empty());

    match (attribute, element) {
        (Some(value), _) => EmValue::Found(value.to_string()),
        (None, Some(_)) => EmValue::Empty,
        (None, None) => EmValue::Missing,
    }
}

fn is_description(node: &Node) -> bool {
    node.has_tag_name((RDF_NAMESPACE, "Description"))
}

fn about<'a>(node: &Node<'a, '_>) -> Option<&'a str> {
    node.attribute((RDF_NAMESPACE, "about"))
        .or_else(|| node.attribute("about"))
}

/// The id becomes a file name inside the profile's extensions directory
fn validate_id(id: &str) -> std::result::Result<(), String> {
    if id == "." || id == ".." || id.contains(['/', '\\', '\0']) {
        return Err(format!("em:id '{}' is not usable as a file name", id));
    }
    Ok(())
}
