//! Docstring cleanup and inline argument annotation parsing.
//!
//! An annotation is a docstring line of the form `# name: description`, where `name`
//! may carry one or two leading asterisks to refer to `*args` / `**kwargs`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// `# <name>: <description>` with `<name>` optionally prefixed by `*` or `**`.
static ANNOTATION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^# (\*{0,2}[A-Za-z0-9_]+): (.+)$").unwrap());

/// Match one (already trimmed) line against the annotation rule.
/// Returns (name, description) on a match.
pub fn parse_annotation(line: &str) -> Option<(&str, &str)> {
    let caps = ANNOTATION_LINE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let description = caps.get(2)?.as_str();
    Some((name, description))
}

/// Trim every line and the whole block. Absent stays absent.
pub fn clean_docstring(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let lines: Vec<&str> = raw.split('\n').map(str::trim).collect();
    Some(lines.join("\n").trim().to_string())
}

/// Clean a callable docstring and pull annotation lines out of the prose.
pub fn parse_docstring(raw: Option<&str>) -> (Option<String>, BTreeMap<String, String>) {
    let mut annotations = BTreeMap::new();

    let Some(raw) = raw else {
        return (None, annotations);
    };

    let mut prose: Vec<&str> = Vec::new();
    for line in raw.split('\n').map(str::trim) {
        match parse_annotation(line) {
            Some((name, description)) => {
                annotations.insert(name.to_string(), description.to_string());
            }
            None => prose.push(line),
        }
    }

    (Some(prose.join("\n").trim().to_string()), annotations)
}
