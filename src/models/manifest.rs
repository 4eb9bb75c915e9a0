//! Typed view of an extension's `install.rdf`

use serde::Serialize;

/// Namespace of the `em:` elements in `install.rdf`
pub const EM_NAMESPACE: &str = "http://www.mozilla.org/2004/em-rdf#";

/// Namespace of the RDF envelope
pub const RDF_NAMESPACE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// File name of the manifest inside an extension root
pub const INSTALL_MANIFEST: &str = "install.rdf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallManifest {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
