//! Filesystem and subprocess helpers

pub mod helpers;
pub mod process;

pub use helpers::*;
pub use process::call;
