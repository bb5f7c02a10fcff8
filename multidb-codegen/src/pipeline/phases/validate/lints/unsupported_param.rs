//! Lint for methods no adapter can be rendered for.

use super::super::Lint;
use crate::pipeline::{CompilationContext, Diagnostic};

/// Renders every method for every engine and reports the modeling errors
/// generation would abort on, such as a positional slice of domain values.
pub struct UnsupportedParamLint;

impl Lint for UnsupportedParamLint {
    fn name(&self) -> &'static str {
        "unsupported-param"
    }

    fn description(&self) -> &'static str {
        "Method signature cannot be adapted to an engine"
    }

    fn check(&self, ctx: &CompilationContext, diagnostics: &mut Vec<Diagnostic>) {
        let Some(canonical) = ctx.canonical.as_ref() else {
            return;
        };
        for emitter in super::emitters(ctx) {
            for method in canonical.methods() {
                if let Err(err) = emitter.emit_method(method) {
                    diagnostics.push(
                        Diagnostic::error("validate", err.to_string())
                            .at(format!("{}.{}", emitter.engine().package, method.name)),
                    );
                }
            }
        }
    }
}
