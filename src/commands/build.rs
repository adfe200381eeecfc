//! @dose
//! purpose: This module implements the build command that documents a whole module tree:
//!     discover the modules, load and render each one, then write the markdown files
//!     under the output directory.
//!
//! when-editing:
//!     - !Rendering runs in parallel; writing runs afterwards in discovery order
//!     - !A failing module is reported and counted, never fatal to the others
//!     - The summary line and the JSON dump go to stdout, logs go to stderr
//!
//! invariants:
//!     - Output files mirror the package layout: <output_dir>/<entry.output>
//!     - The process exits non-zero when any module failed
//!     - --dry-run never touches the filesystem
//!
//! gotchas:
//!     - OUTPUT_DIR is always resolved under the root; a leading '/' is dropped
//!     - With --json the summary line is omitted so stdout stays valid JSON
//!
//! flows:
//!     - Discover: walk the source directory into ModuleEntry records
//!     - Render: load each file with the static source and assemble its document (rayon)
//!     - Write: create directories and write every rendered document

use crate::assemble::parse_module;
use crate::cli::BuildArgs;
use crate::config::Config;
use crate::discover::{discover_modules, source_dir, DiscoverOptions, ModuleEntry};
use crate::source::load_module;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// A discovered module together with its rendered document
#[derive(Debug, Serialize)]
pub struct BuiltModule {
    #[serde(flatten)]
    pub entry: ModuleEntry,
    pub content: String,
}

pub fn run_build(args: &BuildArgs, root: &Path) -> Result<()> {
    let config = Config::load(root);
    let options = discover_options(args, config);

    let source = source_dir(root, &args.source);
    let entries = discover_modules(&source, &args.source, &options)
        .with_context(|| format!("Failed to discover modules of {}", args.source))?;

    info!("Rendering {} modules from {}", entries.len(), source.display());

    let rendered: Vec<(ModuleEntry, Result<String>)> = entries
        .into_par_iter()
        .map(|entry| {
            let result = render_entry(&source, &entry);
            (entry, result)
        })
        .collect();

    let output_dir = output_dir(root, &args.output_dir);
    if !args.dry_run {
        fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;
    }

    let mut built = Vec::new();
    let mut errors = 0;

    for (entry, result) in rendered {
        let written = result.and_then(|content| {
            if !args.dry_run {
                write_document(&output_dir, &entry, &content)?;
            }
            Ok(content)
        });

        match written {
            Ok(content) => {
                debug!("Generated {} -> {}", entry.module, entry.output);
                built.push(BuiltModule { entry, content });
            }
            Err(e) => {
                error!("Error processing {}: {:#}", entry.module, e);
                errors += 1;
            }
        }
    }

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&built).context("Failed to serialize module list")?
        );
    } else {
        println!("Generated: {}, Errors: {}", built.len(), errors);
    }

    if errors > 0 {
        anyhow::bail!("{} modules failed to build", errors);
    }

    Ok(())
}

/// Merge pydocs.toml with the command line; flags extend lists and override the index
fn discover_options(args: &BuildArgs, config: Config) -> DiscoverOptions {
    let mut ignore = config.ignore;
    ignore.extend(args.ignore.iter().cloned());

    let mut exclude = config.exclude;
    exclude.extend(args.exclude.iter().cloned());

    DiscoverOptions {
        index: args.index.clone().unwrap_or(config.index),
        ignore,
        exclude,
    }
}

fn output_dir(root: &Path, requested: &Path) -> PathBuf {
    root.join(requested.strip_prefix("/").unwrap_or(requested))
}

/// Load one module from source and render its document
pub fn render_entry(source_dir: &Path, entry: &ModuleEntry) -> Result<String> {
    let path = source_dir.join(&entry.source);
    let module = load_module(&entry.module, &path)?;
    let content = parse_module(&module)?;
    Ok(content)
}

fn write_document(output_dir: &Path, entry: &ModuleEntry, content: &str) -> Result<()> {
    let path = output_dir.join(&entry.output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}
