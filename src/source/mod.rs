//! @dose
//! purpose: This module is the static signature source. It turns Python source files into
//!     module handles (StaticModule, StaticClass, StaticFunction) implementing the
//!     reflection traits, so the core can document code without importing it.
//!
//! when-editing:
//!     - !Member order must stay deterministic: StaticModule keeps members in a BTreeMap
//!     - !A malformed parameter list yields an opaque callable, not a guessed signature
//!     - Decorated definitions are wrappers whose wrapped() is the decorated definition
//!
//! invariants:
//!     - Later bindings of a name replace earlier ones, like module execution would
//!     - Imported names carry the imported module as origin so the assembler skips them
//!     - Source with syntax errors fails to load, like an import would
//!
//! do-not:
//!     - Never evaluate code; only literal strings are decoded
//!
//! gotchas:
//!     - Only direct top-level statements bind names; defs inside if/try blocks are ignored
//!     - Inherited methods only come from base classes defined earlier in the same module

mod literal;
mod python;

use crate::reflect::{
    CallableSignature, ClassHandle, Member, MemberKind, ModuleHandle, ParamSpec,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use literal::parse_string_literal;
pub use python::PythonSource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse source: {0}")]
    Parse(String),
    #[error("Syntax error in {module} at line {line}, column {column}")]
    Syntax {
        module: String,
        line: usize,
        column: usize,
    },
}

/// A function or method as seen in source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFunction {
    pub(crate) name: String,
    pub(crate) spec: Option<ParamSpec>,
    pub(crate) docstring: Option<String>,
    pub(crate) wrapped: Option<Box<StaticFunction>>,
}

impl StaticFunction {
    /// Wrap a decorated definition in a generic `(*args, **kwargs)` wrapper
    pub(crate) fn decorated(original: StaticFunction) -> Self {
        Self {
            name: original.name.clone(),
            spec: Some(ParamSpec::generic_wrapper()),
            docstring: None,
            wrapped: Some(Box::new(original)),
        }
    }
}

impl CallableSignature for StaticFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> Option<&ParamSpec> {
        self.spec.as_ref()
    }

    fn docstring(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn wrapped(&self) -> Option<&dyn CallableSignature> {
        self.wrapped
            .as_deref()
            .map(|inner| inner as &dyn CallableSignature)
    }
}

/// A class as seen in source, with inherited methods already merged in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticClass {
    pub(crate) name: String,
    pub(crate) methods: BTreeMap<String, StaticFunction>,
}

impl ClassHandle for StaticClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> Vec<(&str, &dyn CallableSignature)> {
        self.methods
            .iter()
            .map(|(name, method)| (name.as_str(), method as &dyn CallableSignature))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticObject {
    Function(StaticFunction),
    Class(StaticClass),
    Other,
}

/// A module-level binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMember {
    pub(crate) origin: Option<String>,
    pub(crate) object: StaticObject,
}

/// A Python module loaded from source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticModule {
    pub(crate) name: String,
    pub(crate) docstring: Option<String>,
    pub(crate) public_index: Option<Vec<String>>,
    pub(crate) members: BTreeMap<String, StaticMember>,
}

impl StaticModule {
    /// Look up a binding by name
    pub fn member(&self, name: &str) -> Option<&StaticMember> {
        self.members.get(name)
    }
}

impl ModuleHandle for StaticModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn docstring(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    fn public_index(&self) -> Option<&[String]> {
        self.public_index.as_deref()
    }

    fn members(&self) -> Vec<Member<'_>> {
        self.members
            .iter()
            .map(|(name, member)| Member {
                name: name.as_str(),
                origin_module: member.origin.as_deref(),
                kind: match &member.object {
                    StaticObject::Function(function) => MemberKind::Function(function),
                    StaticObject::Class(class) => MemberKind::Class(class),
                    StaticObject::Other => MemberKind::Other,
                },
            })
            .collect()
    }
}

/// Read and parse a Python file as module `name`
pub fn load_module(name: &str, path: &Path) -> Result<StaticModule, SourceError> {
    let source = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    PythonSource::new().parse_module(name, &source)
}
