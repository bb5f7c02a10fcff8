use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::method::MethodSignature;
use crate::record::RecordType;

/// Methods of the distinguished interface plus every record type declared
/// alongside it.
///
/// Methods are keyed by name and kept in lexicographic order so repeated
/// runs over unchanged input iterate identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Model {
    /// File the interface was declared in, if any.
    pub interface_source: Option<String>,
    methods: IndexMap<String, MethodSignature>,
    types: BTreeMap<String, RecordType>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method, keeping name order. Returns false (and leaves the
    /// model unchanged) when a method of that name already exists.
    pub fn insert_method(&mut self, method: MethodSignature) -> bool {
        if self.methods.contains_key(&method.name) {
            return false;
        }
        self.methods.insert(method.name.clone(), method);
        self.methods.sort_keys();
        true
    }

    /// Insert a record type. Returns false when the name is already taken.
    pub fn insert_type(&mut self, record: RecordType) -> bool {
        if self.types.contains_key(&record.name) {
            return false;
        }
        self.types.insert(record.name.clone(), record);
        true
    }

    pub fn method(&self, name: &str) -> Option<&MethodSignature> {
        self.methods.get(name)
    }

    /// Mutable access to a method. Renaming through this handle is not
    /// supported; the name is the key.
    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodSignature> {
        self.methods.get_mut(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Methods in lexicographic name order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodSignature> {
        self.methods.values()
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn record(&self, name: &str) -> Option<&RecordType> {
        self.types.get(name)
    }

    /// Record types in name order.
    pub fn records(&self) -> impl Iterator<Item = &RecordType> {
        self.types.values()
    }

    pub fn record_count(&self) -> usize {
        self.types.len()
    }
}
