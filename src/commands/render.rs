//! @dose
//! purpose: This module implements the render command that documents one Python file and
//!     prints the markdown to stdout or writes it to a file.
//!
//! when-editing:
//!     - !Input can come from a file or stdin ("-")
//!     - !Output goes to a file or stdout based on -o flag
//!
//! gotchas:
//!     - The module name defaults to the file stem; stdin defaults to __main__
//!     - Relative input paths are resolved against --root

use crate::assemble::parse_module;
use crate::cli::RenderArgs;
use crate::source::{load_module, PythonSource};
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

/// Module name used for stdin input
const STDIN_MODULE: &str = "__main__";

pub fn run_render(args: &RenderArgs, root: &Path) -> Result<()> {
    let module = if args.input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;

        let name = args.module.as_deref().unwrap_or(STDIN_MODULE);
        PythonSource::new().parse_module(name, &buffer)?
    } else {
        let path = if args.input.is_absolute() {
            args.input.clone()
        } else {
            root.join(&args.input)
        };

        let name = match &args.module {
            Some(name) => name.clone(),
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .context("Input path has no file name")?,
        };
        load_module(&name, &path)?
    };

    let content = parse_module(&module)?;

    if let Some(ref output_path) = args.output {
        fs::write(output_path, &content)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}
