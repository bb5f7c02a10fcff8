use serde::Serialize;

use crate::vocab::{TypeVocabulary, element_type};

/// Doc-comment token marking a method as the batched form of another.
pub const BULK_MARKER: &str = "@bulk-for";

/// A named method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// A method result. At most one result of a method is marked as the error
/// and at most one as the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Return {
    pub ty: String,
    pub is_error: bool,
    pub is_value: bool,
}

/// One operation of the distinguished interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Vec<Return>,
    /// Leading `//` lines, verbatim.
    pub docs: Vec<String>,
    /// Name of the singular method this one batches.
    pub bulk_for: Option<String>,
    pub is_create: bool,
    pub is_update: bool,
    pub returns_self: bool,
    pub is_synthetic: bool,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: Vec::new(),
            docs: Vec::new(),
            bulk_for: None,
            is_create: false,
            is_update: false,
            returns_self: false,
            is_synthetic: false,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    pub fn with_return(mut self, ty: impl Into<String>) -> Self {
        let ty = ty.into();
        let is_error = ty == "error" && self.error_return().is_none();
        let is_value = ty != "error" && self.value_return().is_none();
        self.returns.push(Return {
            ty,
            is_error,
            is_value,
        });
        self
    }

    /// Append a doc line, picking up the first bulk marker seen.
    pub fn with_doc(mut self, line: impl Into<String>) -> Self {
        let line = line.into();
        if self.bulk_for.is_none() {
            self.bulk_for = bulk_target(&line).map(str::to_string);
        }
        self.docs.push(line);
        self
    }

    pub fn with_bulk_for(mut self, target: impl Into<String>) -> Self {
        self.bulk_for = Some(target.into());
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.is_synthetic = true;
        self
    }

    /// Compute the flags that depend on the type vocabulary.
    pub fn resolve(mut self, vocab: &TypeVocabulary) -> Self {
        self.returns_self = self.returns.iter().any(|r| r.ty == vocab.self_type());
        let creates_domain = self
            .value_type()
            .is_some_and(|ty| !self.returns_self && vocab.is_domain(ty));
        self.is_create = creates_domain && self.name.starts_with("Create");
        self.is_update = creates_domain && self.name.starts_with("Update");
        self
    }

    pub fn error_return(&self) -> Option<&Return> {
        self.returns.iter().find(|r| r.is_error)
    }

    pub fn value_return(&self) -> Option<&Return> {
        self.returns.iter().find(|r| r.is_value)
    }

    /// Declared type of the value result, e.g. `[]User`.
    pub fn value_type(&self) -> Option<&str> {
        self.value_return().map(|r| r.ty.as_str())
    }

    /// Value result with any collection prefix stripped.
    pub fn value_element(&self) -> Option<&str> {
        self.value_type().map(element_type)
    }

    pub fn returns_error(&self) -> bool {
        self.error_return().is_some()
    }

    /// True when the only result is an error.
    pub fn returns_only_error(&self) -> bool {
        self.returns.len() == 1 && self.returns_error()
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// `name type, name type` as written in a signature.
    pub fn params_signature(&self) -> String {
        self.params
            .iter()
            .map(|p| format!("{} {}", p.name, p.ty))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Result list as written in a signature, parenthesized when needed.
    pub fn returns_signature(&self) -> String {
        let types: Vec<_> = self.returns.iter().map(|r| r.ty.as_str()).collect();
        match types.as_slice() {
            [] => String::new(),
            [single] => single.to_string(),
            many => format!("({})", many.join(", ")),
        }
    }
}

/// The word following the first bulk marker in a doc line.
pub fn bulk_target(line: &str) -> Option<&str> {
    let mut words = line.split_whitespace();
    words.find(|w| *w == BULK_MARKER)?;
    words.next()
}
