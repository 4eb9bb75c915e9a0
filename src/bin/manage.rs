//! Install or uninstall the extension in a browser profile directory

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use xpi_tools::cli::{fail, init_tracing, parse_or_exit};
use xpi_tools::profile::{install, uninstall};

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Install the extension into a browser profile, or remove it", long_about = None)]
#[command(version, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install to the given profile dir
    Install(ProfileArgs),

    /// Uninstall from the given profile dir
    Uninstall(ProfileArgs),
}

#[derive(Args)]
struct ProfileArgs {
    /// Path to the browser profile directory
    profile_dir: PathBuf,

    /// Extension source tree holding install.rdf
    #[arg(long, default_value = ".")]
    extension_root: PathBuf,
}

fn main() {
    let cli: Cli = parse_or_exit();
    init_tracing();

    match cli.command {
        Commands::Install(args) => match install(&args.profile_dir, &args.extension_root) {
            Ok(change) => {
                println!("{}", format!("Extension '{}' installed.", change.extension_id).green());
            }
            Err(e) => fail("Install failed!", e),
        },
        Commands::Uninstall(args) => match uninstall(&args.profile_dir, &args.extension_root) {
            Ok(change) => {
                println!("Extension '{}' uninstalled.", change.extension_id);
                if !change.marker_existed {
                    println!("{}", "(it was not installed)".dimmed());
                }
            }
            Err(e) => fail("Uninstall failed!", e),
        },
    }
}
