//! Running external tools

use crate::error::{Result, XpiError};
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Run a command line and require a successful exit.
///
/// Fails with [`XpiError::Spawn`] when the program cannot be started and
/// with [`XpiError::Subprocess`] when it exits with a non-zero status.
pub fn call<S: AsRef<OsStr>>(cmdline: &[S]) -> Result<()> {
    call_in(cmdline, None)
}

/// Like [`call`], with the child's working directory set to `dir`
pub fn call_in<S: AsRef<OsStr>>(cmdline: &[S], dir: Option<&Path>) -> Result<()> {
    let (program, args) = cmdline.split_first().ok_or_else(|| XpiError::Subprocess {
        cmdline: String::new(),
    })?;

    let rendered = render(cmdline);
    debug!(cmdline = %rendered, cwd = ?dir, "running subprocess");

    let mut command = Command::new(program);
    command.args(args);
    if let Some(dir) = dir {
        command.current_dir(dir);
    }

    let status = command.status().map_err(|source| XpiError::Spawn {
        program: program.as_ref().to_string_lossy().into_owned(),
        source,
    })?;

    if !status.success() {
        debug!(cmdline = %rendered, code = ?status.code(), "subprocess failed");
        return Err(XpiError::Subprocess { cmdline: rendered });
    }
    Ok(())
}

fn render<S: AsRef<OsStr>>(cmdline: &[S]) -> String {
    cmdline
        .iter()
        .map(|part| part.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
