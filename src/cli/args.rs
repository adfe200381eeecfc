//! @dose
//! purpose: This module defines the command-line interface for pydocs using the clap derive
//!     macros. It specifies the build and render commands and their arguments.
//!
//! when-editing:
//!     - !Each command struct must derive Args and be added to the Commands enum
//!     - !Global flags (root, verbose) are defined on Cli and propagate to all subcommands
//!     - List flags (--ignore, --exclude) extend the values from pydocs.toml
//!
//! invariants:
//!     - The Cli struct is the root parser that clap uses to parse command-line arguments
//!     - PathBuf is used for all file/directory path arguments
//!
//! do-not:
//!     - Never add positional arguments that could conflict with subcommands
//!
//! gotchas:
//!     - SOURCE is a dotted module name or "." for the root directory, not a path
//!     - --ignore takes a comma separated list and may also be repeated
//!     - The render command accepts "-" as input to read from stdin

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pydocs")]
#[command(author, version, about = "Simple markdown documentation for Python modules")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build markdown documents for a module tree
    Build(BuildArgs),

    /// Render the markdown document of a single Python file
    Render(RenderArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Source module, or . for the root directory
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Where to write the markdown, relative to the root
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Name of the index file generated for __init__.py (default: index)
    #[arg(long, value_name = "NAME")]
    pub index: Option<String>,

    /// Comma separated module names to skip
    #[arg(long, value_name = "MODULES", value_delimiter = ',')]
    pub ignore: Vec<String>,

    /// Exclude files/directories matching glob pattern (can be repeated)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Dump the module list with rendered content as JSON
    #[arg(long)]
    pub json: bool,

    /// Dry run - render everything but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    /// Python file to document (use "-" for stdin)
    pub input: PathBuf,

    /// Module name to document it as (defaults to the file stem)
    #[arg(short, long)]
    pub module: Option<String>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
