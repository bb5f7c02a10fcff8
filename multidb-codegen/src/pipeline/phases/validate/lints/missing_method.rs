//! Lint for canonical methods an engine cannot serve.

use tracing::warn;

use super::super::Lint;
use crate::pipeline::{CompilationContext, Diagnostic};

/// Reports every canonical method an engine has no counterpart for. The
/// adapter still compiles, returning `ErrNotImplemented`; strict mode turns
/// the warning into an error.
pub struct MissingMethodLint;

impl Lint for MissingMethodLint {
    fn name(&self) -> &'static str {
        "missing-method"
    }

    fn description(&self) -> &'static str {
        "Engine accessor layer lacks a canonical method"
    }

    fn check(&self, ctx: &CompilationContext, diagnostics: &mut Vec<Diagnostic>) {
        let strict = ctx.config.output.strict;
        for emitter in super::emitters(ctx) {
            let engine = emitter.engine();
            for method in emitter.missing_methods() {
                warn!(engine = %engine.name, method = %method.name, "no engine counterpart");
                let message = format!(
                    "engine '{}' has no method {}; its adapter returns ErrNotImplemented",
                    engine.name, method.name
                );
                let diagnostic = if strict {
                    Diagnostic::error("validate", message)
                } else {
                    Diagnostic::warning("validate", message)
                };
                diagnostics.push(diagnostic.at(format!("{}.{}", engine.package, method.name)));
            }
        }
    }
}
