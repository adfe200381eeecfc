//! @dose
//! purpose: This module parses Python source with tree-sitter and builds a StaticModule:
//!     module docstring, __all__, top-level functions, classes (with their methods),
//!     aliases, lambdas and import bindings.
//!
//! when-editing:
//!     - !Statements are visited in source order so later bindings replace earlier ones
//!     - !Parameter kinds follow the tree-sitter-python grammar node names exactly
//!     - Class bodies are simulated the same way: assignments can shadow methods
//!
//! invariants:
//!     - A non-defaulted positional parameter after a defaulted one makes the signature opaque
//!     - Parameters after `*` or `*args` are keyword-only
//!     - Inside classes, @staticmethod and property-style members are not methods
//!
//! gotchas:
//!     - Bare `*` is a keyword_separator node; `/` is a positional_separator node
//!     - Comments are named nodes and may appear before the docstring statement
//!     - @classmethod alone is not treated as a wrapper; any other decorator is

use super::literal::string_value;
use super::{SourceError, StaticClass, StaticFunction, StaticMember, StaticModule, StaticObject};
use crate::reflect::{DefaultValue, ParamSpec};
use std::collections::BTreeMap;
use tree_sitter::{Node, Parser};

/// Name reported by lambda functions
const LAMBDA_NAME: &str = "<lambda>";

/// Public symbol list variable
const PUBLIC_INDEX: &str = "__all__";

/// Static source for Python files
#[derive(Clone)]
pub struct PythonSource;

impl PythonSource {
    pub fn new() -> Self {
        Self
    }

    fn create_parser(&self) -> Result<Parser, SourceError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(parser)
    }

    /// Parse Python source into a module handle named `name`
    pub fn parse_module(&self, name: &str, source: &str) -> Result<StaticModule, SourceError> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SourceError::Parse("Failed to parse source".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, column) = first_error(root).unwrap_or((1, 1));
            return Err(SourceError::Syntax {
                module: name.to_string(),
                line,
                column,
            });
        }

        let mut module = StaticModule {
            name: name.to_string(),
            ..StaticModule::default()
        };

        let mut first = true;
        let mut cursor = root.walk();
        for statement in root.named_children(&mut cursor) {
            if statement.kind() == "comment" {
                continue;
            }
            if first {
                first = false;
                if let Some(docstring) = self.statement_docstring(statement, source) {
                    module.docstring = Some(docstring);
                    continue;
                }
            }
            self.visit_statement(&mut module, statement, source);
        }

        Ok(module)
    }

    fn visit_statement(&self, module: &mut StaticModule, node: Node, source: &str) {
        let origin = Some(module.name.clone());

        match node.kind() {
            "function_definition" => {
                if let Some(function) = self.function(node, source) {
                    let name = function.name.clone();
                    bind(module, name, origin, StaticObject::Function(function));
                }
            }
            "class_definition" => {
                if let Some(class) = self.class(module, node, source) {
                    let name = class.name.clone();
                    bind(module, name, origin, StaticObject::Class(class));
                }
            }
            "decorated_definition" => {
                let Some(definition) = node.child_by_field_name("definition") else {
                    return;
                };
                match definition.kind() {
                    "function_definition" => {
                        if let Some(function) = self.function(definition, source) {
                            let name = function.name.clone();
                            let wrapper = StaticFunction::decorated(function);
                            bind(module, name, origin, StaticObject::Function(wrapper));
                        }
                    }
                    "class_definition" => {
                        if let Some(class) = self.class(module, definition, source) {
                            let name = class.name.clone();
                            bind(module, name, origin, StaticObject::Class(class));
                        }
                    }
                    _ => {}
                }
            }
            "import_statement" => self.visit_import(module, node, source),
            "import_from_statement" => self.visit_import_from(module, node, source),
            "expression_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "assignment" => self.visit_assignment(module, child, source),
                        "augmented_assignment" => self.visit_augmented(module, child, source),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    fn visit_import(&self, module: &mut StaticModule, node: Node, source: &str) {
        // import a.b        -> binds "a"
        // import a.b as c   -> binds "c"
        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            match child.kind() {
                "dotted_name" => {
                    let target = self.node_text(child, source);
                    let binding = target.split('.').next().unwrap_or_default().to_string();
                    bind(module, binding, Some(target), StaticObject::Other);
                }
                "aliased_import" => {
                    let (Some(name), Some(alias)) = (
                        child.child_by_field_name("name"),
                        child.child_by_field_name("alias"),
                    ) else {
                        continue;
                    };
                    let target = self.node_text(name, source);
                    let binding = self.node_text(alias, source);
                    bind(module, binding, Some(target), StaticObject::Other);
                }
                _ => {}
            }
        }
    }

    fn visit_import_from(&self, module: &mut StaticModule, node: Node, source: &str) {
        // from foo import bar, baz as qux
        let from = node
            .child_by_field_name("module_name")
            .map(|n| self.node_text(n, source))
            .unwrap_or_default();

        let mut cursor = node.walk();
        for child in node.children_by_field_name("name", &mut cursor) {
            let binding = match child.kind() {
                "dotted_name" => self.node_text(child, source),
                "aliased_import" => match child.child_by_field_name("alias") {
                    Some(alias) => self.node_text(alias, source),
                    None => continue,
                },
                _ => continue,
            };
            bind(module, binding, Some(from.clone()), StaticObject::Other);
        }
    }

    fn visit_assignment(&self, module: &mut StaticModule, node: Node, source: &str) {
        let bindings = self.assignment_bindings(node, source);

        // Every right-hand value is resolved before any name is rebound
        let resolved: Vec<(String, Option<Node>, StaticMember)> = bindings
            .into_iter()
            .map(|(name, value)| {
                let member = self.module_value(module, value, source);
                (name, value, member)
            })
            .collect();

        for (name, value, member) in resolved {
            if name == PUBLIC_INDEX {
                module.public_index = value.and_then(|v| self.string_list(v, source));
            }
            module.members.insert(name, member);
        }
    }

    /// What a module-level name is bound to by an assigned value
    fn module_value(&self, module: &StaticModule, value: Option<Node>, source: &str) -> StaticMember {
        let origin = Some(module.name.clone());
        match value {
            Some(value) if value.kind() == "identifier" => {
                let target = self.node_text(value, source);
                module.members.get(&target).cloned().unwrap_or(StaticMember {
                    origin: None,
                    object: StaticObject::Other,
                })
            }
            Some(value) if value.kind() == "lambda" => StaticMember {
                origin,
                object: StaticObject::Function(self.lambda(value, source)),
            },
            _ => StaticMember {
                origin,
                object: StaticObject::Other,
            },
        }
    }

    /// Names bound by an assignment, each with the value node it receives when known.
    /// `a = b = v` binds both names to `v`; `a, b = x, y` pairs element-wise.
    fn assignment_bindings<'t>(&self, node: Node<'t>, source: &str) -> Vec<(String, Option<Node<'t>>)> {
        let mut bindings = Vec::new();
        // Annotation-only statements (`x: int`) bind nothing
        if let Some((targets, value)) = assignment_chain(node) {
            for target in targets {
                self.collect_bindings(target, Some(value), source, &mut bindings);
            }
        }
        bindings
    }

    fn collect_bindings<'t>(
        &self,
        target: Node<'t>,
        value: Option<Node<'t>>,
        source: &str,
        bindings: &mut Vec<(String, Option<Node<'t>>)>,
    ) {
        match target.kind() {
            "identifier" => bindings.push((self.node_text(target, source), value)),
            "pattern_list" | "tuple_pattern" | "list_pattern" => {
                let targets = named_children(target);
                let elements = value
                    .filter(|v| matches!(v.kind(), "expression_list" | "tuple" | "list"))
                    .map(named_children)
                    .filter(|elements| {
                        elements.len() == targets.len()
                            && !targets.iter().any(|t| t.kind() == "list_splat_pattern")
                            && !elements.iter().any(|e| e.kind() == "list_splat")
                    });

                match elements {
                    Some(elements) => {
                        for (target, element) in targets.into_iter().zip(elements) {
                            self.collect_bindings(target, Some(element), source, bindings);
                        }
                    }
                    None => {
                        for target in targets {
                            self.collect_bindings(target, None, source, bindings);
                        }
                    }
                }
            }
            "list_splat_pattern" => {
                if let Some(inner) = target.named_child(0) {
                    self.collect_bindings(inner, None, source, bindings);
                }
            }
            // Attribute and subscript targets bind no module name
            _ => {}
        }
    }

    fn visit_augmented(&self, module: &mut StaticModule, node: Node, source: &str) {
        // __all__ += [...]
        let (Some(left), Some(operator), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        if self.node_text(left, source) != PUBLIC_INDEX || self.node_text(operator, source) != "+=" {
            return;
        }
        if let Some(extra) = self.string_list(right, source) {
            module
                .public_index
                .get_or_insert_with(Vec::new)
                .extend(extra);
        }
    }

    /// Strings of a list or tuple literal, skipping non-string elements
    fn string_list(&self, node: Node, source: &str) -> Option<Vec<String>> {
        if !matches!(node.kind(), "list" | "tuple") {
            return None;
        }
        let mut cursor = node.walk();
        let items = node
            .named_children(&mut cursor)
            .filter_map(|item| string_value(item, source))
            .collect();
        Some(items)
    }

    fn function(&self, node: Node, source: &str) -> Option<StaticFunction> {
        let name = self.node_text(node.child_by_field_name("name")?, source);
        let spec = match node.child_by_field_name("parameters") {
            Some(params) => self.param_spec(params, source),
            None => Some(ParamSpec::default()),
        };
        let docstring = node
            .child_by_field_name("body")
            .and_then(|body| self.block_docstring(body, source));

        Some(StaticFunction {
            name,
            spec,
            docstring,
            wrapped: None,
        })
    }

    fn lambda(&self, node: Node, source: &str) -> StaticFunction {
        let spec = match node.child_by_field_name("parameters") {
            Some(params) => self.param_spec(params, source),
            None => Some(ParamSpec::default()),
        };
        StaticFunction {
            name: LAMBDA_NAME.to_string(),
            spec,
            docstring: None,
            wrapped: None,
        }
    }

    /// Build a ParamSpec from a parameters or lambda_parameters node.
    /// None when the list is malformed.
    fn param_spec(&self, params: Node, source: &str) -> Option<ParamSpec> {
        let mut spec = ParamSpec::default();
        let mut keyword_only = false;

        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            match param.kind() {
                "comment" | "positional_separator" => {}
                "identifier" | "tuple_pattern" => {
                    let name = self.node_text(param, source);
                    push_param(&mut spec, keyword_only, name, None)?;
                }
                "typed_parameter" => {
                    let inner = param.named_child(0)?;
                    match inner.kind() {
                        "list_splat_pattern" => {
                            spec.varargs = Some(self.splat_name(inner, source));
                            keyword_only = true;
                        }
                        "dictionary_splat_pattern" => {
                            spec.keywords = Some(self.splat_name(inner, source));
                        }
                        _ => {
                            let name = self.node_text(inner, source);
                            push_param(&mut spec, keyword_only, name, None)?;
                        }
                    }
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = self.node_text(param.child_by_field_name("name")?, source);
                    let value = self.default_value(param.child_by_field_name("value")?, source);
                    push_param(&mut spec, keyword_only, name, Some(value))?;
                }
                "list_splat_pattern" => {
                    spec.varargs = Some(self.splat_name(param, source));
                    keyword_only = true;
                }
                "dictionary_splat_pattern" => {
                    spec.keywords = Some(self.splat_name(param, source));
                }
                "keyword_separator" => keyword_only = true,
                _ => return None,
            }
        }

        Some(spec)
    }

    fn splat_name(&self, node: Node, source: &str) -> String {
        self.node_text(node, source)
            .trim_start_matches('*')
            .trim()
            .to_string()
    }

    fn default_value(&self, node: Node, source: &str) -> DefaultValue {
        if let Some(value) = string_value(node, source) {
            return DefaultValue::Str(value);
        }
        let text = self.node_text(node, source);
        if text.contains('\n') {
            DefaultValue::Literal(text.split_whitespace().collect::<Vec<_>>().join(" "))
        } else {
            DefaultValue::Literal(text)
        }
    }

    fn class(&self, module: &StaticModule, node: Node, source: &str) -> Option<StaticClass> {
        let name = self.node_text(node.child_by_field_name("name")?, source);

        // Inherited methods: earlier bases win, own definitions override below
        let mut methods: BTreeMap<String, StaticFunction> = BTreeMap::new();
        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            let mut cursor = superclasses.walk();
            for base in superclasses.named_children(&mut cursor) {
                if base.kind() != "identifier" {
                    continue;
                }
                let base_name = self.node_text(base, source);
                if let Some(StaticMember {
                    object: StaticObject::Class(base_class),
                    ..
                }) = module.members.get(&base_name)
                {
                    for (method_name, method) in &base_class.methods {
                        methods
                            .entry(method_name.clone())
                            .or_insert_with(|| method.clone());
                    }
                }
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mut cursor = body.walk();
            for statement in body.named_children(&mut cursor) {
                self.visit_class_statement(&mut methods, statement, source);
            }
        }

        Some(StaticClass { name, methods })
    }

    fn visit_class_statement(
        &self,
        methods: &mut BTreeMap<String, StaticFunction>,
        node: Node,
        source: &str,
    ) {
        match node.kind() {
            "function_definition" => {
                if let Some(function) = self.function(node, source) {
                    methods.insert(function.name.clone(), function);
                }
            }
            "decorated_definition" => {
                let Some(definition) = node.child_by_field_name("definition") else {
                    return;
                };
                let Some(name) = definition
                    .child_by_field_name("name")
                    .map(|n| self.node_text(n, source))
                else {
                    return;
                };

                let decorators = self.decorators(node, source);
                let not_a_method = definition.kind() != "function_definition"
                    || decorators.iter().any(|d| is_non_method_decorator(d));
                if not_a_method {
                    methods.remove(&name);
                    return;
                }

                let Some(function) = self.function(definition, source) else {
                    return;
                };
                let wrapped = decorators.iter().any(|d| d != "classmethod");
                let method = if wrapped {
                    StaticFunction::decorated(function)
                } else {
                    function
                };
                methods.insert(name, method);
            }
            "class_definition" => {
                if let Some(name) = node.child_by_field_name("name") {
                    methods.remove(&self.node_text(name, source));
                }
            }
            "expression_statement" => {
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.kind() != "assignment" {
                        continue;
                    }

                    let resolved: Vec<(String, Option<StaticFunction>)> = self
                        .assignment_bindings(child, source)
                        .into_iter()
                        .map(|(name, value)| {
                            let method = match value {
                                Some(value) if value.kind() == "identifier" => {
                                    methods.get(&self.node_text(value, source)).cloned()
                                }
                                Some(value) if value.kind() == "lambda" => {
                                    Some(self.lambda(value, source))
                                }
                                _ => None,
                            };
                            (name, method)
                        })
                        .collect();

                    for (name, method) in resolved {
                        match method {
                            Some(method) => {
                                methods.insert(name, method);
                            }
                            None => {
                                methods.remove(&name);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Decorator expressions of a decorated_definition, without the `@`
    fn decorators(&self, node: Node, source: &str) -> Vec<String> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() == "decorator")
            .map(|decorator| {
                self.node_text(decorator, source)
                    .trim_start_matches('@')
                    .trim()
                    .to_string()
            })
            .collect()
    }

    fn block_docstring(&self, block: Node, source: &str) -> Option<String> {
        let mut cursor = block.walk();
        let first = block
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment")?;
        self.statement_docstring(first, source)
    }

    fn statement_docstring(&self, statement: Node, source: &str) -> Option<String> {
        if statement.kind() != "expression_statement" || statement.named_child_count() != 1 {
            return None;
        }
        string_value(statement.named_child(0)?, source)
    }

    fn node_text(&self, node: Node, source: &str) -> String {
        source[node.start_byte()..node.end_byte()].to_string()
    }
}

impl Default for PythonSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Targets of a (possibly chained) assignment and the value they all receive
fn assignment_chain(node: Node) -> Option<(Vec<Node>, Node)> {
    let mut targets = vec![node.child_by_field_name("left")?];
    let mut value = node.child_by_field_name("right")?;
    while value.kind() == "assignment" {
        targets.push(value.child_by_field_name("left")?);
        value = value.child_by_field_name("right")?;
    }
    Some((targets, value))
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn bind(module: &mut StaticModule, name: String, origin: Option<String>, object: StaticObject) {
    module.members.insert(name, StaticMember { origin, object });
}

/// Append a parameter, keeping defaults a suffix of the positional parameters
fn push_param(
    spec: &mut ParamSpec,
    keyword_only: bool,
    name: String,
    default: Option<DefaultValue>,
) -> Option<()> {
    if keyword_only {
        if let Some(value) = default {
            spec.keyword_defaults.push((name.clone(), value));
        }
        spec.keyword_only.push(name);
        return Some(());
    }

    match default {
        Some(value) => spec.defaults.push(value),
        None if !spec.defaults.is_empty() => return None,
        None => {}
    }
    spec.args.push(name);
    Some(())
}

/// Decorators that turn a class-body function into something other than a method
fn is_non_method_decorator(decorator: &str) -> bool {
    decorator == "staticmethod"
        || decorator.ends_with("property")
        || decorator.ends_with(".setter")
        || decorator.ends_with(".getter")
        || decorator.ends_with(".deleter")
}

/// 1-based (line, column) of the first syntax error in the tree
fn first_error(node: Node) -> Option<(usize, usize)> {
    if node.is_error() || node.is_missing() {
        let position = node.start_position();
        return Some((position.row + 1, position.column + 1));
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}
