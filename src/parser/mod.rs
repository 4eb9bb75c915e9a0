//! Manifest parsing

pub mod install_rdf;
