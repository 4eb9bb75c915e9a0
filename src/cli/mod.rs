//! Shared plumbing for the command-line tools

use clap::error::ErrorKind;
use clap::Parser;
use colored::*;
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

/// Send diagnostics to stderr, filtered by `RUST_LOG` (default `warn`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse arguments; a malformed invocation prints usage and exits with 1.
/// `--help` and `--version` still exit with 0.
pub fn parse_or_exit<P: Parser>() -> P {
    match P::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}

/// Print a failure headline and its error, then exit with 1
pub fn fail(headline: &str, err: impl Display) -> ! {
    eprintln!("{}", format!("❌ {}", headline).red().bold());
    eprintln!("{}", format!("Error: {}", err).red());
    std::process::exit(1);
}
