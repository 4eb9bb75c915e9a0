//! Combine the platform-specific XPIs in a directory into one
//! cross-platform XPI.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use xpi_tools::cli::{fail, init_tracing, parse_or_exit};
use xpi_tools::merger::{discover_archives, merge, violation_names, MergeOptions};
use xpi_tools::packager::BackendKind;
use xpi_tools::{selftest, XpiError};

#[derive(Parser)]
#[command(name = "build-cross-platform-xpi")]
#[command(about = "Combine platform-specific XPIs into one cross-platform XPI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory holding the platform-specific XPIs
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// File name of the combined XPI
    #[arg(short, long, default_value = "sync.xpi")]
    output: String,

    /// Use the `unzip` and `zip` programs instead of the built-in ZIP support
    #[arg(long)]
    external: bool,

    /// Delete the combined XPI when it is inconsistent with its sources
    #[arg(long)]
    discard_on_violation: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in self-checks instead of merging
    Test,
}

fn main() {
    let cli: Cli = parse_or_exit();
    init_tracing();

    let code = match cli.command {
        Some(Commands::Test) => run_self_test(),
        None => run_merge(&cli),
    };
    std::process::exit(code);
}

fn run_self_test() -> i32 {
    let outcomes = selftest::run();
    for outcome in &outcomes {
        match &outcome.failure {
            None => println!("{} {}", "ok".green(), outcome.name),
            Some(reason) => println!("{} {}: {}", "FAILED".red().bold(), outcome.name, reason),
        }
    }

    let failed = outcomes.iter().filter(|o| !o.passed()).count();
    println!();
    println!("{} passed, {} failed", outcomes.len() - failed, failed);
    if failed == 0 { 0 } else { 1 }
}

fn run_merge(cli: &Cli) -> i32 {
    let options = MergeOptions {
        root: cli.root.clone(),
        output_name: cli.output.clone(),
        backend: if cli.external { BackendKind::External } else { BackendKind::Builtin },
        discard_on_violation: cli.discard_on_violation,
        ..Default::default()
    };

    // Listed up front so a failed run still shows what went into it
    if !cli.json {
        let output = options.output_path();
        if let Ok(sources) = discover_archives(&options.root, &options.archive_extension, &output) {
            println!("Combining these XPIs into a platform-independent XPI:");
            for source in &sources {
                println!("  {}", source.display());
            }
            println!();
        }
    }

    match merge(&options) {
        Ok(report) => {
            if cli.json {
                print_json(&report);
                return 0;
            }
            println!("Created {} ({} files)", report.output.display(), report.entries);
            println!("{}", "✅ Success!".green().bold());
            0
        }
        Err(XpiError::Inconsistent(violations)) => {
            if cli.json {
                print_json(&serde_json::json!({ "violations": violations }));
                return 1;
            }
            eprintln!(
                "{}",
                "The following files are contained in two or more platform-specific XPIs, yet are not identical:"
                    .red()
                    .bold()
            );
            eprintln!();
            for name in violation_names(&violations) {
                eprintln!("{}", name);
            }
            1
        }
        Err(e) => fail("Failed to build the cross-platform XPI!", e),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail("Failed to serialize the result!", e),
    }
}
