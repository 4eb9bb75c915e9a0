//! Core data models for archive merging and profile installation

pub mod archive;
pub mod manifest;
pub mod report;

pub use archive::*;
pub use manifest::*;
pub use report::*;
