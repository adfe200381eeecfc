//! @dose
//! purpose: This is the library crate root for pydocs, exposing the public API for use as both
//!     a CLI tool and a library. It re-exports the documentation model, the reflection
//!     traits and the parse_module entry point.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - parse_module only sees the reflection traits; any ModuleHandle can be documented
//!     - The static source is one implementation of those traits, not a requirement
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main

pub mod assemble;
pub mod cli;
pub mod commands;
pub mod config;
pub mod discover;
pub mod extract;
pub mod formatter;
pub mod logging;
pub mod reflect;
pub mod source;
pub mod types;

// Re-export main types for convenience
pub use assemble::{document_module, parse_module};
pub use cli::{BuildArgs, Cli, Commands, RenderArgs};
pub use discover::{discover_modules, DiscoverError, DiscoverOptions, ModuleEntry};
pub use extract::{extract_function, ExtractError};
pub use formatter::{format_function, format_module};
pub use reflect::{CallableSignature, ClassHandle, Member, MemberKind, ModuleHandle, ParamSpec};
pub use source::{load_module, PythonSource, SourceError, StaticModule};
pub use types::{ClassDoc, FunctionDoc, MemberDoc, ModuleDoc};
