//! @dose
//! purpose: This module defines the narrow reflection capability the extractor and
//!     assembler depend on. Any signature source (the bundled tree-sitter static source,
//!     or a runtime bridge) implements these traits; the core never touches source text.
//!
//! when-editing:
//!     - !CallableSignature::signature returns None only for opaque callables; that is fatal
//!     - !ModuleHandle::members must return a deterministic order for identical input
//!     - Keep these traits object-safe; the core only ever sees &dyn handles
//!
//! invariants:
//!     - ParamSpec.defaults aligns with the trailing entries of ParamSpec.args
//!     - A wrapped() chain is followed at most once by consumers
//!     - Member.origin_module is None when the source cannot tell where a name came from
//!
//! do-not:
//!     - Never add rendering or filtering logic here; it belongs to extract/assemble
//!
//! gotchas:
//!     - Member.name is the binding name; the object's own name comes from the handle
//!     - ClassHandle::methods includes inherited methods, already ordered

#[cfg(test)]
pub(crate) mod fixtures;

/// A default value as reported by the signature source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// String-typed default, holding the decoded string value
    Str(String),
    /// Any other default, holding its natural literal form (e.g., "None", "1.5", "[]")
    Literal(String),
}

impl DefaultValue {
    /// Render for display in a call example: strings are single-quoted
    pub fn render(&self) -> String {
        match self {
            DefaultValue::Str(value) => format!("'{}'", value),
            DefaultValue::Literal(value) => value.clone(),
        }
    }
}

/// Parameter metadata of a callable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSpec {
    /// Positional parameter names, in order
    pub args: Vec<String>,
    /// Defaults for the trailing positional parameters, in order
    pub defaults: Vec<DefaultValue>,
    /// Variadic-positional parameter name (`*args`)
    pub varargs: Option<String>,
    /// Keyword-only parameter names, in order
    pub keyword_only: Vec<String>,
    /// Defaults for keyword-only parameters, by name
    pub keyword_defaults: Vec<(String, DefaultValue)>,
    /// Variadic-keyword parameter name (`**kwargs`)
    pub keywords: Option<String>,
}

impl ParamSpec {
    /// The generic `(*args, **kwargs)` shape of a decorator wrapper
    pub fn generic_wrapper() -> Self {
        Self {
            varargs: Some("args".to_string()),
            keywords: Some("kwargs".to_string()),
            ..Self::default()
        }
    }
}

/// Introspection capability for a single callable
pub trait CallableSignature: Send + Sync {
    /// The callable's own name (`__name__`)
    fn name(&self) -> &str;

    /// Parameter metadata, or None when the callable is opaque
    fn signature(&self) -> Option<&ParamSpec>;

    /// Raw docstring, if any
    fn docstring(&self) -> Option<&str>;

    /// The original callable when this one is a decorator wrapper
    fn wrapped(&self) -> Option<&dyn CallableSignature> {
        None
    }
}

/// Introspection capability for a class
pub trait ClassHandle: Send + Sync {
    /// The class's own name
    fn name(&self) -> &str;

    /// Method-like attributes as (attribute name, callable), ordered by attribute name
    fn methods(&self) -> Vec<(&str, &dyn CallableSignature)>;
}

/// Classification of a module attribute
pub enum MemberKind<'a> {
    Function(&'a dyn CallableSignature),
    Class(&'a dyn ClassHandle),
    /// Anything else (constants, imported modules, unknown objects)
    Other,
}

/// One named attribute of a module
pub struct Member<'a> {
    /// Binding name in the module namespace
    pub name: &'a str,
    /// Module the object was defined in
    pub origin_module: Option<&'a str>,
    pub kind: MemberKind<'a>,
}

impl Member<'_> {
    /// The object's own name, falling back to the binding name
    pub fn object_name(&self) -> &str {
        match &self.kind {
            MemberKind::Function(callable) => callable.name(),
            MemberKind::Class(class) => class.name(),
            MemberKind::Other => self.name,
        }
    }
}

/// Introspection capability for a loaded module
pub trait ModuleHandle: Send + Sync {
    /// Dotted module name
    fn name(&self) -> &str;

    /// Raw module docstring
    fn docstring(&self) -> Option<&str>;

    /// Declared public symbols (`__all__`)
    fn public_index(&self) -> Option<&[String]>;

    /// All attributes, in deterministic enumeration order
    fn members(&self) -> Vec<Member<'_>>;
}
