//! @dose
//! purpose: This is the CLI entry point for pydocs. It parses command-line arguments using clap,
//!     sets up logging, determines the project root directory, and dispatches to the
//!     appropriate command handler (build or render).
//!
//! when-editing:
//!     - !All command handlers are imported from the pydocs crate
//!     - !The root directory defaults to current working directory if not specified
//!     - Error messages are printed to stderr and exit with code 1
//!
//! invariants:
//!     - One and only one subcommand is always executed per invocation
//!     - The process exits with 0 on success, 1 on any error
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules

use anyhow::Context;
use clap::Parser;
use pydocs::cli::{Cli, Commands};
use pydocs::commands::{run_build, run_render};
use std::env;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    pydocs::logging::init(cli.verbose);

    // Determine root directory
    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Build(args) => run_build(&args, &root),
        Commands::Render(args) => run_render(&args, &root),
    }
}
