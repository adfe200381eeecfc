//! @dose
//! purpose: This module is the module doc assembler. It walks a module handle's members,
//!     keeps the documentable functions and classes, drives the extractor over each
//!     callable and produces a ModuleDoc, or the rendered markdown via parse_module.
//!
//! when-editing:
//!     - !A member is documented only if it is a function or class defined in this module
//!     - !Underscore names are dropped for both the binding and the object's own name
//!     - Member order is whatever the handle reports; never re-sort here
//!
//! invariants:
//!     - The first ExtractError aborts the whole module; no partial documents
//!     - Class methods follow is_documentable_method (public names plus __init__)
//!     - parse_module output always ends with exactly one newline
//!
//! gotchas:
//!     - Re-exported names (imports) have a different origin module and are skipped
//!     - A class with no documentable methods produces an empty ClassDoc, rendered as nothing

use crate::extract::{clean_docstring, extract_function, is_documentable_method, ExtractError};
use crate::formatter::format_module;
use crate::reflect::{ClassHandle, Member, MemberKind, ModuleHandle};
use crate::types::{ClassDoc, MemberDoc, ModuleDoc};

/// Whether a module member gets documented.
pub fn is_documentable_member(module: &str, member: &Member<'_>) -> bool {
    if matches!(member.kind, MemberKind::Other) {
        return false;
    }
    if member.origin_module != Some(module) {
        return false;
    }
    !member.name.starts_with('_') && !member.object_name().starts_with('_')
}

/// Build the documentation model for a module.
pub fn document_module(module: &dyn ModuleHandle) -> Result<ModuleDoc, ExtractError> {
    let module_name = module.name();
    let mut members = Vec::new();

    for member in module.members() {
        if !is_documentable_member(module_name, &member) {
            continue;
        }

        match member.kind {
            MemberKind::Function(callable) => {
                members.push(MemberDoc::Function(extract_function(
                    module_name,
                    None,
                    member.name,
                    callable,
                )?));
            }
            MemberKind::Class(class) => {
                members.push(MemberDoc::Class(document_class(module_name, class)?));
            }
            MemberKind::Other => {}
        }
    }

    Ok(ModuleDoc {
        name: module_name.to_string(),
        docstring: clean_docstring(module.docstring()),
        public_index: module.public_index().map(<[String]>::to_vec),
        members,
    })
}

/// Build the documentation model for a class's documentable methods.
pub fn document_class(module: &str, class: &dyn ClassHandle) -> Result<ClassDoc, ExtractError> {
    let class_name = class.name();
    let methods = class
        .methods()
        .into_iter()
        .filter(|(_, method)| is_documentable_method(method.name()))
        .map(|(name, method)| extract_function(module, Some(class_name), name, method))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClassDoc {
        name: class_name.to_string(),
        methods,
    })
}

/// Parse a module's members and render its markdown document.
pub fn parse_module(module: &dyn ModuleHandle) -> Result<String, ExtractError> {
    let doc = document_module(module)?;
    Ok(format_module(&doc))
}
