//! @dose
//! purpose: This module finds the Python modules to document under a source directory and
//!     assigns each one its dotted module name and its markdown output path.
//!
//! when-editing:
//!     - !Module names are built from the SOURCE prefix plus the directory path, dot-joined
//!     - !`__init__.py` documents its package and renders to the index file of its directory
//!     - Paths in ModuleEntry are '/'-separated and relative to the source directory
//!
//! invariants:
//!     - Entries are sorted by output path, so repeated runs produce the same order
//!     - Files in a sub-directory without `__init__.py` are never importable, so never listed
//!     - Default-excluded directories and exclude globs are never entered
//!
//! gotchas:
//!     - SOURCE "." uses an empty prefix; a leading '.' is dropped from module names
//!     - A root-level __init__.py under SOURCE "." has no module name and is skipped
//!     - The index name is taken without its `.md` suffix; "README.md" and "README" agree

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Package initializer file stem
const PACKAGE_INIT: &str = "__init__";

/// Directories that are never walked
const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".venv",
    "venv",
    "build",
    "dist",
    "node_modules",
];

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("Source directory not found: {}", .0.display())]
    MissingSource(PathBuf),
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// One module to document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEntry {
    /// Directory of the source file, relative to the source directory ("" at top level)
    pub directory: String,
    /// File stem of the source file
    pub file: String,
    /// Dotted module name
    pub module: String,
    /// Markdown path relative to the output directory
    pub output: String,
    /// Python path relative to the source directory
    pub source: String,
}

/// Discovery settings
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    pub index: String,
    pub ignore: Vec<String>,
    pub exclude: Vec<String>,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            index: crate::config::DEFAULT_INDEX.to_string(),
            ignore: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

/// Directory holding the SOURCE module under `root`
pub fn source_dir(root: &Path, source_module: &str) -> PathBuf {
    if source_module == "." {
        return root.to_path_buf();
    }
    source_module
        .split('.')
        .fold(root.to_path_buf(), |dir, part| dir.join(part))
}

/// Compile exclude patterns into one GlobSet
pub fn build_exclude_globset(patterns: &[String]) -> Result<GlobSet, DiscoverError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| DiscoverError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| DiscoverError::Pattern {
        pattern: patterns.join(","),
        source,
    })
}

pub fn is_default_excluded_dir(name: &str) -> bool {
    DEFAULT_EXCLUDED_DIRS.contains(&name)
}

/// Walk `source_dir` and list the modules of `source_module`
pub fn discover_modules(
    source_dir: &Path,
    source_module: &str,
    options: &DiscoverOptions,
) -> Result<Vec<ModuleEntry>, DiscoverError> {
    if !source_dir.is_dir() {
        return Err(DiscoverError::MissingSource(source_dir.to_path_buf()));
    }

    let excludes = build_exclude_globset(&options.exclude)?;
    let index = options
        .index
        .strip_suffix(".md")
        .unwrap_or(&options.index);
    let prefix = if source_module == "." { "" } else { source_module };

    let mut entries = Vec::new();

    let walker = WalkDir::new(source_dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(e, source_dir, &excludes));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "py") {
            continue;
        }

        let Ok(relative) = path.strip_prefix(source_dir) else {
            continue;
        };
        let Some(file) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        let directory = relative.parent().map(slash_path).unwrap_or_default();
        let source = slash_path(relative);

        let module = module_name(prefix, source_module, &directory, &file);
        if module.is_empty() {
            warn!("No module name for {}, skipping", source);
            continue;
        }

        if options.ignore.iter().any(|ignored| *ignored == module) {
            debug!("Ignored file: {}", source);
            continue;
        }

        if !directory.is_empty() && !source_dir.join(&directory).join("__init__.py").is_file() {
            warn!("No __init__.py, skipping: {}", source);
            continue;
        }

        let output_file = if file == PACKAGE_INIT {
            format!("{}.md", index)
        } else {
            format!("{}.md", file)
        };
        let output = if directory.is_empty() {
            output_file
        } else {
            format!("{}/{}", directory, output_file)
        };

        debug!("Found module {} in {}", module, source);
        entries.push(ModuleEntry {
            directory,
            file,
            module,
            output,
            source,
        });
    }

    entries.sort_by(|a, b| a.output.cmp(&b.output));
    Ok(entries)
}

fn module_name(prefix: &str, source_module: &str, directory: &str, file: &str) -> String {
    let module_root = directory.replace('/', ".");

    let name = if file == PACKAGE_INIT {
        if module_root.is_empty() {
            source_module.to_string()
        } else {
            format!("{}.{}", prefix, module_root)
        }
    } else if module_root.is_empty() {
        format!("{}.{}", prefix, file)
    } else {
        format!("{}.{}.{}", prefix, module_root, file)
    };

    match name.strip_prefix('.') {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

fn is_excluded(entry: &DirEntry, source_dir: &Path, excludes: &GlobSet) -> bool {
    if entry.file_type().is_dir() && is_default_excluded_dir(&entry.file_name().to_string_lossy())
    {
        return true;
    }
    match entry.path().strip_prefix(source_dir) {
        Ok(relative) => excludes.is_match(relative),
        Err(_) => false,
    }
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
