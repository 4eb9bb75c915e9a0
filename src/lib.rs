//! Build and packaging utilities for an XPI extension
//!
//! Combines platform-specific XPI builds into one cross-platform XPI, and
//! installs an extension source tree into a browser profile for development.

pub mod error;
pub mod models;
pub mod parser;
pub mod packager;
pub mod merger;
pub mod profile;
pub mod selftest;
pub mod utils;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Result, XpiError};
pub use merger::{check_consistency, merge, MergeOptions};
pub use models::{Archive, InstallManifest, MergeReport, ProfileChange, Violation};
pub use profile::{install, resolve_extension_id, uninstall};
