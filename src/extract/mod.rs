//! @dose
//! purpose: This module is the signature and docstring extractor. It turns one callable
//!     handle into a FunctionDoc: positional args, positionally paired defaults, variadic
//!     names, keyword-only args, the cleaned docstring and its inline annotations.
//!
//! when-editing:
//!     - !Unwrap decorator wrappers exactly once, before reading parameters or docstring
//!     - !Defaults pair with the LAST K args; more defaults than args is an error
//!     - Method selection rules (is_documentable_method) live here next to extraction
//!
//! invariants:
//!     - An opaque callable (no ParamSpec) is a hard ExtractError, never skipped
//!     - FunctionDoc.defaults keys are always a suffix of FunctionDoc.args
//!     - Extraction is pure: same handle in, same FunctionDoc out
//!
//! gotchas:
//!     - The documented name is the binding name, which may differ from the object's name
//!     - Annotations for names that are not parameters are kept, not rejected

pub mod docstring;

use crate::reflect::CallableSignature;
use crate::types::FunctionDoc;
use thiserror::Error;

pub use docstring::{clean_docstring, parse_annotation, parse_docstring};

/// Name of the constructor method, always documented despite its underscore
pub const CONSTRUCTOR: &str = "__init__";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("cannot introspect signature of {module}.{name}")]
    OpaqueSignature { module: String, name: String },
    #[error("{module}.{name} reports {defaults} defaults for {args} positional parameters")]
    DefaultsMismatch {
        module: String,
        name: String,
        defaults: usize,
        args: usize,
    },
}

/// Whether a class method is documented: public names, plus the constructor.
pub fn is_documentable_method(name: &str) -> bool {
    !name.starts_with('_') || name == CONSTRUCTOR
}

/// Extract the documentation model of one callable.
///
/// `name` is the name the callable is bound to in its module or class.
pub fn extract_function(
    module: &str,
    class: Option<&str>,
    name: &str,
    callable: &dyn CallableSignature,
) -> Result<FunctionDoc, ExtractError> {
    // Follow a decorator wrapper once
    let callable = callable.wrapped().unwrap_or(callable);

    let spec = callable
        .signature()
        .ok_or_else(|| ExtractError::OpaqueSignature {
            module: module.to_string(),
            name: name.to_string(),
        })?;

    if spec.defaults.len() > spec.args.len() {
        return Err(ExtractError::DefaultsMismatch {
            module: module.to_string(),
            name: name.to_string(),
            defaults: spec.defaults.len(),
            args: spec.args.len(),
        });
    }

    let first_defaulted = spec.args.len() - spec.defaults.len();
    let defaults = spec.args[first_defaulted..]
        .iter()
        .zip(&spec.defaults)
        .map(|(arg, value)| (arg.clone(), value.render()))
        .collect();

    let keyword_defaults = spec
        .keyword_defaults
        .iter()
        .map(|(arg, value)| (arg.clone(), value.render()))
        .collect();

    let (docstring, annotations) = parse_docstring(callable.docstring());

    Ok(FunctionDoc {
        module: module.to_string(),
        class: class.map(str::to_string),
        name: name.to_string(),
        args: spec.args.clone(),
        defaults,
        varargs: spec.varargs.clone(),
        keyword_only: spec.keyword_only.clone(),
        keyword_defaults,
        kwargs: spec.keywords.clone(),
        docstring,
        annotations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::fixtures::FakeCallable;
    use crate::reflect::{DefaultValue, ParamSpec};

    #[test]
    fn test_args_function() {
        let callable = FakeCallable::new("args_function")
            .args(&["arg1", "arg2"])
            .varargs("args")
            .doc("Another example with no-default arguments & some varargs.");

        let doc = extract_function("example", None, "args_function", &callable).unwrap();
        assert_eq!(doc.args, vec!["arg1", "arg2"]);
        assert!(doc.defaults.is_empty());
        assert_eq!(doc.varargs.as_deref(), Some("args"));
        assert_eq!(doc.kwargs, None);
        assert_eq!(
            doc.docstring.as_deref(),
            Some("Another example with no-default arguments & some varargs.")
        );
    }

    #[test]
    fn test_kwargs_function_defaults() {
        let callable = FakeCallable::new("kwargs_function")
            .args(&["key", "something"])
            .defaults(vec![
                DefaultValue::Literal("None".to_string()),
                DefaultValue::Literal("True".to_string()),
            ])
            .keywords("kwargs");

        let doc = extract_function("example", None, "kwargs_function", &callable).unwrap();
        assert_eq!(
            doc.defaults,
            vec![
                ("key".to_string(), "None".to_string()),
                ("something".to_string(), "True".to_string()),
            ]
        );
        assert_eq!(doc.kwargs.as_deref(), Some("kwargs"));
    }

    #[test]
    fn test_defaults_pair_with_trailing_args() {
        for total in 0..5usize {
            for k in 0..=total {
                let names: Vec<String> = (0..total).map(|i| format!("a{}", i)).collect();
                let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let defaults = (0..k)
                    .map(|i| DefaultValue::Literal(i.to_string()))
                    .collect();
                let callable = FakeCallable::new("f").args(&name_refs).defaults(defaults);

                let doc = extract_function("m", None, "f", &callable).unwrap();
                let keys: Vec<&String> = doc.defaults.iter().map(|(name, _)| name).collect();
                let expected: Vec<&String> = names[total - k..].iter().collect();
                assert_eq!(doc.defaults.len(), k);
                assert_eq!(keys, expected);
            }
        }
    }

    #[test]
    fn test_string_defaults_are_quoted() {
        let callable = FakeCallable::new("combined")
            .args(&["arg1", "key", "something"])
            .defaults(vec![
                DefaultValue::Literal("True".to_string()),
                DefaultValue::Str("another".to_string()),
            ]);

        let doc = extract_function("example", None, "combined", &callable).unwrap();
        assert_eq!(doc.default_for("something"), Some("'another'"));
        assert_eq!(doc.default_for("key"), Some("True"));
        assert_eq!(doc.default_for("arg1"), None);
    }

    #[test]
    fn test_more_defaults_than_args_is_error() {
        let callable = FakeCallable::new("broken")
            .args(&["a"])
            .defaults(vec![
                DefaultValue::Literal("1".to_string()),
                DefaultValue::Literal("2".to_string()),
            ]);

        let err = extract_function("m", None, "broken", &callable).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::DefaultsMismatch {
                defaults: 2,
                args: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_opaque_callable_is_error() {
        let callable = FakeCallable::opaque("builtin_thing");
        let err = extract_function("m", Some("C"), "thing", &callable).unwrap_err();
        assert_eq!(
            err,
            ExtractError::OpaqueSignature {
                module: "m".to_string(),
                name: "thing".to_string(),
            }
        );
        assert_eq!(err.to_string(), "cannot introspect signature of m.thing");
    }

    #[test]
    fn test_wrapper_is_unwrapped() {
        let original = FakeCallable::new("decorated")
            .args(&["target", "retries"])
            .defaults(vec![DefaultValue::Literal("3".to_string())])
            .doc("The real docstring.");
        let wrapper = FakeCallable::new("wrapper")
            .spec(ParamSpec::generic_wrapper())
            .doc("Wrapper docstring.")
            .wrapping(original);

        let doc = extract_function("m", None, "decorated", &wrapper).unwrap();
        assert_eq!(doc.args, vec!["target", "retries"]);
        assert_eq!(doc.varargs, None);
        assert_eq!(doc.kwargs, None);
        assert_eq!(doc.docstring.as_deref(), Some("The real docstring."));
    }

    #[test]
    fn test_unwrap_is_single_level() {
        let innermost = FakeCallable::new("inner").args(&["x"]);
        let middle = FakeCallable::opaque("middle").wrapping(innermost);
        let outer = FakeCallable::new("outer")
            .spec(ParamSpec::generic_wrapper())
            .wrapping(middle);

        assert!(extract_function("m", None, "outer", &outer).is_err());
    }

    #[test]
    fn test_annotations_extracted() {
        let callable = FakeCallable::new("wip")
            .args(&["arg1"])
            .varargs("the_rest")
            .doc("# arg1: string argument for something\n# *the_rest: list of targets");

        let doc = extract_function("example", None, "wip", &callable).unwrap();
        assert_eq!(doc.annotations["arg1"], "string argument for something");
        assert_eq!(doc.annotations["*the_rest"], "list of targets");
        assert_eq!(doc.docstring.as_deref(), Some(""));
    }

    #[test]
    fn test_method_keeps_receiver_and_class() {
        let callable = FakeCallable::new("__init__")
            .args(&["self", "test"])
            .varargs("args")
            .keywords("kargs");

        let doc = extract_function("fake", Some("ExampleClass"), "__init__", &callable).unwrap();
        assert_eq!(doc.class.as_deref(), Some("ExampleClass"));
        assert_eq!(doc.args, vec!["self", "test"]);
        assert_eq!(doc.docstring, None);
    }

    #[test]
    fn test_keyword_only_defaults_rendered() {
        let callable = FakeCallable::new("fetch").args(&["url"]).spec_with(|spec| {
            spec.keyword_only = vec!["timeout".to_string(), "mode".to_string()];
            spec.keyword_defaults = vec![("mode".to_string(), DefaultValue::Str("r".to_string()))];
        });

        let doc = extract_function("net", None, "fetch", &callable).unwrap();
        assert_eq!(doc.keyword_only, vec!["timeout", "mode"]);
        assert_eq!(doc.keyword_default_for("mode"), Some("'r'"));
        assert_eq!(doc.keyword_default_for("timeout"), None);
    }

    #[test]
    fn test_documentable_methods() {
        assert!(is_documentable_method("__init__"));
        assert!(is_documentable_method("some_function"));
        assert!(!is_documentable_method("_private"));
        assert!(!is_documentable_method("__repr__"));
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let callable = FakeCallable::new("f")
            .args(&["a", "b"])
            .defaults(vec![DefaultValue::Str("x".to_string())])
            .doc("  Doc.\n  # a: first  ");

        let first = extract_function("m", None, "f", &callable).unwrap();
        let second = extract_function("m", None, "f", &callable).unwrap();
        assert_eq!(first, second);
    }
}
