//! Per-engine adapter emission.
//!
//! An [`EngineEmitter`] renders one Go method per canonical method, adapting
//! the call to the engine's own accessor layer. The shape of each method is
//! chosen by [`EngineEmitter::strategy`].

mod bulk;
mod call;
mod result;
mod synthetic;

use multidb_model::{Category, EngineDescriptor, MethodSignature, Model, TypeVocabulary};
use serde::Serialize;
use tracing::debug;

use crate::builder::CodeBuilder;
use crate::error::Result;

/// How a canonical method is rendered for one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Strategy {
    /// Returns the interface itself: wrap the engine's scoped adapter.
    ReturnSelf,
    /// Loop over the bundle's collection, calling the singular method.
    Bulk { singular: String },
    /// Call the engine method of the same name, converting values.
    Delegate,
    /// Synthesized accessor without an engine counterpart: raw row query.
    RawQuery,
    /// The engine has no counterpart: return `ErrNotImplemented`.
    Stub,
}

/// Renders adapter methods for a single engine.
pub struct EngineEmitter<'a> {
    engine: &'a EngineDescriptor,
    canonical: &'a Model,
    target: &'a Model,
    vocab: &'a TypeVocabulary,
}

impl<'a> EngineEmitter<'a> {
    pub fn new(
        engine: &'a EngineDescriptor,
        canonical: &'a Model,
        target: &'a Model,
        vocab: &'a TypeVocabulary,
    ) -> Self {
        Self {
            engine,
            canonical,
            target,
            vocab,
        }
    }

    pub fn engine(&self) -> &EngineDescriptor {
        self.engine
    }

    /// Pick the rendering strategy for a canonical method.
    pub fn strategy(&self, method: &MethodSignature) -> Strategy {
        if method.returns_self {
            return Strategy::ReturnSelf;
        }
        if let Some(plan) = self.bulk_plan(method) {
            return Strategy::Bulk {
                singular: plan.singular.name.clone(),
            };
        }
        if self.target.has_method(&method.name) {
            return Strategy::Delegate;
        }
        if method.is_synthetic {
            return Strategy::RawQuery;
        }
        Strategy::Stub
    }

    /// Canonical methods this engine cannot serve.
    pub fn missing_methods(&self) -> impl Iterator<Item = &'a MethodSignature> + '_ {
        self.canonical
            .methods()
            .filter(|m| self.strategy(m) == Strategy::Stub)
    }

    /// Render every canonical method, in canonical order.
    pub fn emit_all(&self) -> Result<Vec<String>> {
        self.canonical
            .methods()
            .map(|method| self.emit_method(method))
            .collect()
    }

    /// Render one canonical method as a Go method on the wrapper type.
    pub fn emit_method(&self, method: &MethodSignature) -> Result<String> {
        let strategy = self.strategy(method);
        debug!(engine = %self.engine.name, method = %method.name, ?strategy, "emitting");

        let body = match strategy {
            Strategy::ReturnSelf => self.emit_return_self(method)?,
            Strategy::Bulk { .. } => match self.bulk_plan(method) {
                Some(plan) => self.emit_bulk(method, &plan),
                None => self.emit_stub(method),
            },
            Strategy::Delegate => match self.target.method(&method.name) {
                Some(target) => self.emit_delegate(method, target)?,
                None => self.emit_stub(method),
            },
            Strategy::RawQuery => self.emit_raw_query(method)?,
            Strategy::Stub => self.emit_stub(method),
        };

        let returns = method.returns_signature();
        let header = if returns.is_empty() {
            format!(
                "func (w *{}) {}({}) {{",
                self.engine.wrapper_type(),
                method.name,
                method.params_signature()
            )
        } else {
            format!(
                "func (w *{}) {}({}) {} {{",
                self.engine.wrapper_type(),
                method.name,
                method.params_signature(),
                returns
            )
        };

        Ok(CodeBuilder::go()
            .block(&header, "}", |b| b.lines(&body))
            .build())
    }

    fn emit_stub(&self, method: &MethodSignature) -> String {
        CodeBuilder::go()
            .line(&format!(
                "// {}.Adapter has no {}.",
                self.engine.package, method.name
            ))
            .line(&self.zero_returns(method, "ErrNotImplemented"))
            .build()
    }

    /// Reference an engine-side type from the wrapper package, e.g.
    /// `[]User` becomes `[]sqlitedb.User`.
    fn qualify(&self, ty: &str) -> String {
        let inner = ty.trim_start_matches(['[', ']', '*']);
        let prefix = &ty[..ty.len() - inner.len()];
        if self.vocab.classify(inner) == Category::Domain {
            format!("{}{}.{}", prefix, self.engine.package, inner)
        } else {
            ty.to_string()
        }
    }

    /// Name of the context parameter, `ctx` when there is none.
    fn ctx_name<'m>(&self, method: &'m MethodSignature) -> &'m str {
        method
            .params
            .iter()
            .find(|p| p.ty == "context.Context")
            .map_or("ctx", |p| p.name.as_str())
    }

    fn zero_value(&self, ty: &str) -> String {
        self.vocab.zero_value(ty)
    }
}
