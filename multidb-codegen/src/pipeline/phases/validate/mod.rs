//! Validate phase - runs lints over the models.

mod lint;
pub mod lints;

use eyre::{Result, bail};
pub use lint::{Lint, LintInfo};
pub use lints::{BulkTargetLint, MissingMethodLint, UnsupportedParamLint};

use crate::pipeline::{CompilationContext, Phase};

/// Phase that validates the models using configurable lints.
pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
    fail_on_error: bool,
}

impl ValidatePhase {
    /// Create a new validate phase with default lints.
    pub fn new() -> Self {
        Self {
            lints: vec![
                Box::new(MissingMethodLint),
                Box::new(BulkTargetLint),
                Box::new(UnsupportedParamLint),
            ],
            fail_on_error: true,
        }
    }

    /// Create a validate phase with no lints.
    pub fn empty() -> Self {
        Self {
            lints: Vec::new(),
            fail_on_error: true,
        }
    }

    /// Record error diagnostics without failing the phase, for reporting
    /// every problem at once.
    pub fn collect_only(mut self) -> Self {
        self.fail_on_error = false;
        self
    }

    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    pub fn lint_names(&self) -> Vec<&'static str> {
        self.lints.iter().map(|l| l.name()).collect()
    }

    pub fn lint_info(&self) -> Vec<LintInfo> {
        self.lints.iter().map(|l| l.info()).collect()
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Check engine coverage and annotations, collecting diagnostics"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let mut found = Vec::new();
        for lint in &self.lints {
            lint.check(ctx, &mut found);
        }
        ctx.diagnostics.extend(found);

        // Warnings are allowed
        if self.fail_on_error && ctx.has_errors() {
            let messages: Vec<String> = ctx.errors().map(ToString::to_string).collect();
            bail!(
                "Validation failed with {} error(s):\n  {}",
                ctx.error_count(),
                messages.join("\n  ")
            );
        }

        Ok(())
    }
}
