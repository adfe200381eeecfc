//! @dose
//! purpose: This module renders the documentation model into markdown. It is a set of
//!     stateless functions: a FunctionDoc becomes one fragment, a ModuleDoc becomes one
//!     complete document ending in exactly one newline.
//!
//! when-editing:
//!     - !The heading levels (## module, ##### callable) are the output contract
//!     - !Every parameter line except the last gets a trailing comma
//!     - Annotation comments go after the comma, separated by two spaces
//!
//! invariants:
//!     - format_module output is trimmed and ends with exactly one '\n'
//!     - Empty parts (empty docstring, class without methods) never add blank lines
//!     - Same model in, byte-identical text out
//!
//! gotchas:
//!     - Variadic annotations are keyed with their asterisks (*args) but bare names also match
//!     - Keyword-only parameters need a bare `*` line when there is no *args

use crate::types::{FunctionDoc, MemberDoc, ModuleDoc};

/// Fence tag for signature blocks
const CODE_FENCE: &str = "```py";

const INDENT: &str = "    ";

/// One line of a call signature, before punctuation is applied
struct ParamLine<'a> {
    text: String,
    annotation: Option<&'a str>,
}

/// Format the markdown fragment for a single callable.
pub fn format_function(doc: &FunctionDoc) -> String {
    let qualified = doc.qualified_name();
    let mut lines: Vec<String> = Vec::new();

    lines.push(format!("##### {}.{}", doc.module, qualified));

    if let Some(docstring) = doc.docstring.as_deref().filter(|d| !d.is_empty()) {
        lines.push(String::new());
        lines.push(docstring.to_string());
    }

    lines.push(String::new());
    lines.push(CODE_FENCE.to_string());
    lines.push(format!("{}(", qualified));

    let params = param_lines(doc);
    let count = params.len();
    for (i, param) in params.into_iter().enumerate() {
        let mut line = format!("{}{}", INDENT, param.text);
        if i + 1 < count {
            line.push(',');
        }
        if let Some(annotation) = param.annotation {
            line.push_str("  # ");
            line.push_str(annotation);
        }
        lines.push(line);
    }

    lines.push(")".to_string());
    lines.push("```".to_string());

    lines.join("\n")
}

fn param_lines(doc: &FunctionDoc) -> Vec<ParamLine<'_>> {
    let mut params = Vec::new();

    for arg in &doc.args {
        let text = match doc.default_for(arg) {
            Some(default) => format!("{}={}", arg, default),
            None => arg.clone(),
        };
        params.push(ParamLine {
            text,
            annotation: annotation(doc, "", arg),
        });
    }

    match &doc.varargs {
        Some(varargs) => params.push(ParamLine {
            text: format!("*{}", varargs),
            annotation: annotation(doc, "*", varargs),
        }),
        None if !doc.keyword_only.is_empty() => params.push(ParamLine {
            text: "*".to_string(),
            annotation: None,
        }),
        None => {}
    }

    for arg in &doc.keyword_only {
        let text = match doc.keyword_default_for(arg) {
            Some(default) => format!("{}={}", arg, default),
            None => arg.clone(),
        };
        params.push(ParamLine {
            text,
            annotation: annotation(doc, "", arg),
        });
    }

    if let Some(kwargs) = &doc.kwargs {
        params.push(ParamLine {
            text: format!("**{}", kwargs),
            annotation: annotation(doc, "**", kwargs),
        });
    }

    params
}

/// Look up an annotation under the starred key first, then the bare name.
fn annotation<'a>(doc: &'a FunctionDoc, stars: &str, name: &str) -> Option<&'a str> {
    if !stars.is_empty() {
        if let Some(text) = doc.annotations.get(&format!("{}{}", stars, name)) {
            return Some(text.as_str());
        }
    }
    doc.annotations.get(name).map(String::as_str)
}

/// Format a module's public symbol index as link lines.
pub fn format_index(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|symbol| format!("+ [{0}](./{0}.md)", symbol))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the complete markdown document for a module.
pub fn format_module(doc: &ModuleDoc) -> String {
    let mut parts: Vec<String> = vec![format!("## {}", doc.name)];

    if let Some(docstring) = &doc.docstring {
        parts.push(docstring.clone());
    }

    if let Some(index) = &doc.public_index {
        parts.push(format_index(index));
    }

    for member in &doc.members {
        match member {
            MemberDoc::Function(function) => parts.push(format_function(function)),
            MemberDoc::Class(class) => {
                let methods: Vec<String> = class.methods.iter().map(format_function).collect();
                parts.push(methods.join("\n\n"));
            }
        }
    }

    parts.retain(|part| !part.trim().is_empty());
    format!("{}\n", parts.join("\n\n").trim())
}
