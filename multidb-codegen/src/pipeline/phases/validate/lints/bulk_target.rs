//! Lint for bulk annotations naming unknown methods.

use super::super::Lint;
use crate::pipeline::{CompilationContext, Diagnostic};

pub struct BulkTargetLint;

impl Lint for BulkTargetLint {
    fn name(&self) -> &'static str {
        "bulk-target"
    }

    fn description(&self) -> &'static str {
        "Bulk annotation names a method missing from the canonical interface"
    }

    fn check(&self, ctx: &CompilationContext, diagnostics: &mut Vec<Diagnostic>) {
        let Some(canonical) = ctx.canonical.as_ref() else {
            return;
        };
        for method in canonical.methods() {
            let Some(target) = method.bulk_for.as_deref() else {
                continue;
            };
            if !canonical.has_method(target) {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!(
                            "{} is annotated as the bulk form of unknown method {}",
                            method.name, target
                        ),
                    )
                    .at(method.name.clone()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use multidb_config::Config;
    use multidb_model::{MethodSignature, Model};

    use super::*;
    use crate::pipeline::phases::validate::tests::{context, model};

    fn bulk(target: &str) -> MethodSignature {
        MethodSignature::new("CreateUsers")
            .with_param("ctx", "context.Context")
            .with_param("arg", "CreateUsersParams")
            .with_return("error")
            .with_bulk_for(target)
    }

    #[test]
    fn test_unknown_bulk_target() {
        let ctx = context(Config::default(), model([bulk("InsertUser")]), Model::new());
        let mut diagnostics = Vec::new();
        BulkTargetLint.check(&ctx, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_warning());
        assert_eq!(
            diagnostics[0].message,
            "CreateUsers is annotated as the bulk form of unknown method InsertUser"
        );
    }

    #[test]
    fn test_known_bulk_target() {
        let create_user = MethodSignature::new("CreateUser")
            .with_param("ctx", "context.Context")
            .with_param("arg", "User")
            .with_return("error");
        let ctx = context(
            Config::default(),
            model([bulk("CreateUser"), create_user]),
            Model::new(),
        );
        let mut diagnostics = Vec::new();
        BulkTargetLint.check(&ctx, &mut diagnostics);

        assert!(diagnostics.is_empty());
    }
}
