//! depviz CLI - Python package dependency graphs from the command line.
//!
//! Builds the transitive dependency graph of a package from PyPI (or an
//! offline edge list), reports cycles and load order, and writes a text tree
//! plus a D2 diagram.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// depviz: dependency graph builder and analyzer for Python packages.
#[derive(Parser)]
#[command(name = "depviz")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file (created with defaults if missing)
    #[arg(short, long, default_value = depviz::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Maximum expansion depth, overriding the config file
    #[arg(long)]
    max_depth: Option<NonZeroUsize>,

    /// Write the diagram source but do not render an image
    #[arg(long)]
    no_render: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let options = cli::run::Options {
        config: cli.config,
        max_depth: cli.max_depth.map(NonZeroUsize::get),
        render: !cli.no_render,
    };

    match cli::run::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
