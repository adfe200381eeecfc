//! In-memory reflection handles for unit tests.

use super::{CallableSignature, ClassHandle, Member, MemberKind, ModuleHandle, ParamSpec};
use crate::reflect::DefaultValue;

pub struct FakeCallable {
    name: String,
    spec: Option<ParamSpec>,
    doc: Option<String>,
    inner: Option<Box<FakeCallable>>,
}

impl FakeCallable {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            spec: Some(ParamSpec::default()),
            doc: None,
            inner: None,
        }
    }

    pub fn opaque(name: &str) -> Self {
        Self {
            spec: None,
            ..Self::new(name)
        }
    }

    fn spec_mut(&mut self) -> &mut ParamSpec {
        self.spec.get_or_insert_with(ParamSpec::default)
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.spec_mut().args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn defaults(mut self, defaults: Vec<DefaultValue>) -> Self {
        self.spec_mut().defaults = defaults;
        self
    }

    pub fn varargs(mut self, name: &str) -> Self {
        self.spec_mut().varargs = Some(name.to_string());
        self
    }

    pub fn keywords(mut self, name: &str) -> Self {
        self.spec_mut().keywords = Some(name.to_string());
        self
    }

    pub fn spec(mut self, spec: ParamSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    pub fn spec_with(mut self, edit: impl FnOnce(&mut ParamSpec)) -> Self {
        edit(self.spec_mut());
        self
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn wrapping(mut self, inner: FakeCallable) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }
}

impl CallableSignature for FakeCallable {
    fn name(&self) -> &str {
        &self.name
    }

    fn signature(&self) -> Option<&ParamSpec> {
        self.spec.as_ref()
    }

    fn docstring(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn wrapped(&self) -> Option<&dyn CallableSignature> {
        self.inner.as_deref().map(|inner| inner as &dyn CallableSignature)
    }
}

pub struct FakeClass {
    name: String,
    methods: Vec<(String, FakeCallable)>,
}

impl FakeClass {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, callable: FakeCallable) -> Self {
        self.methods.push((callable.name.clone(), callable));
        self
    }
}

impl ClassHandle for FakeClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn methods(&self) -> Vec<(&str, &dyn CallableSignature)> {
        self.methods
            .iter()
            .map(|(name, callable)| (name.as_str(), callable as &dyn CallableSignature))
            .collect()
    }
}

pub enum FakeObject {
    Function(FakeCallable),
    Class(FakeClass),
    Other,
}

pub struct FakeModule {
    name: String,
    doc: Option<String>,
    index: Option<Vec<String>>,
    members: Vec<(String, Option<String>, FakeObject)>,
}

impl FakeModule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            doc: None,
            index: None,
            members: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    pub fn index(mut self, names: &[&str]) -> Self {
        self.index = Some(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Add a member defined in this module, bound under its own name
    pub fn function(self, callable: FakeCallable) -> Self {
        let name = callable.name.clone();
        let origin = self.name.clone();
        self.member(&name, Some(origin.as_str()), FakeObject::Function(callable))
    }

    pub fn class(self, class: FakeClass) -> Self {
        let name = class.name.clone();
        let origin = self.name.clone();
        self.member(&name, Some(origin.as_str()), FakeObject::Class(class))
    }

    pub fn member(mut self, binding: &str, origin: Option<&str>, object: FakeObject) -> Self {
        self.members
            .push((binding.to_string(), origin.map(str::to_string), object));
        self
    }
}

impl ModuleHandle for FakeModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn docstring(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn public_index(&self) -> Option<&[String]> {
        self.index.as_deref()
    }

    fn members(&self) -> Vec<Member<'_>> {
        self.members
            .iter()
            .map(|(name, origin, object)| Member {
                name: name.as_str(),
                origin_module: origin.as_deref(),
                kind: match object {
                    FakeObject::Function(callable) => MemberKind::Function(callable),
                    FakeObject::Class(class) => MemberKind::Class(class),
                    FakeObject::Other => MemberKind::Other,
                },
            })
            .collect()
    }
}
