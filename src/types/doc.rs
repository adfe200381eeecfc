//! @dose
//! purpose: This module defines the documentation model produced by the extractor and
//!     assembler and consumed by the markdown renderer: ModuleDoc, ClassDoc, FunctionDoc
//!     and the MemberDoc enum that orders them inside a module.
//!
//! when-editing:
//!     - !defaults must stay a suffix of args; the extractor is the only producer
//!     - !Ordered pairs (Vec<(String, String)>) keep positional order; do not swap for HashMap
//!     - Annotations use BTreeMap so serialized output is deterministic
//!
//! invariants:
//!     - docstring None means "no docstring"; Some("") means "docstring present but empty"
//!     - ClassDoc has no rendered content of its own beyond its methods
//!     - All records are built fresh per run and never persisted
//!
//! gotchas:
//!     - Annotation keys keep their leading asterisks (*args, **kwargs)
//!     - Annotation keys that name no parameter are kept but never rendered

use serde::Serialize;
use std::collections::BTreeMap;

/// Documentation for one callable (free function or method)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDoc {
    /// Owning module name (e.g., "example.classes")
    pub module: String,
    /// Owning class name for methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Name the callable is documented under
    pub name: String,
    /// Positional parameter names, receiver included for methods
    pub args: Vec<String>,
    /// (name, rendered literal) for the trailing defaulted positional parameters
    pub defaults: Vec<(String, String)>,
    /// Variadic-positional parameter name, without the asterisk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub varargs: Option<String>,
    /// Keyword-only parameter names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyword_only: Vec<String>,
    /// (name, rendered literal) for defaulted keyword-only parameters
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keyword_defaults: Vec<(String, String)>,
    /// Variadic-keyword parameter name, without the asterisks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<String>,
    /// Cleaned docstring with annotation lines removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Inline argument annotations: name -> description
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

impl FunctionDoc {
    /// Rendered default for a positional parameter, if it has one
    pub fn default_for(&self, arg: &str) -> Option<&str> {
        self.defaults
            .iter()
            .find(|(name, _)| name == arg)
            .map(|(_, value)| value.as_str())
    }

    /// Rendered default for a keyword-only parameter, if it has one
    pub fn keyword_default_for(&self, arg: &str) -> Option<&str> {
        self.keyword_defaults
            .iter()
            .find(|(name, _)| name == arg)
            .map(|(_, value)| value.as_str())
    }

    /// Name used in headings and call blocks: `Class.name` or `name`
    pub fn qualified_name(&self) -> String {
        match &self.class {
            Some(class) => format!("{}.{}", class, self.name),
            None => self.name.clone(),
        }
    }
}

/// Documentation for one class: a named group of method docs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDoc {
    pub name: String,
    pub methods: Vec<FunctionDoc>,
}

/// A documented module member, in enumeration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MemberDoc {
    Function(FunctionDoc),
    Class(ClassDoc),
}

/// Documentation for a whole module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDoc {
    /// Dotted module name
    pub name: String,
    /// Cleaned module docstring
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
    /// Declared public symbols (`__all__`), in declaration order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_index: Option<Vec<String>>,
    pub members: Vec<MemberDoc>,
}
