//! Check operation - coverage and annotation validation.

use std::path::PathBuf;

use eyre::{Context, Result};
use multidb_codegen::pipeline::{Pipeline, Severity, phases::ValidatePhase};
use multidb_config::Config;

use crate::{project::Project, reports::CheckReport};

/// Execute the check operation.
///
/// Runs the pipeline with every lint and returns the diagnostics. Lint
/// errors are reported rather than aborting, so all of them show at once.
pub fn check(project: &Project, config: Config, config_path: Option<PathBuf>) -> Result<CheckReport> {
    let pipeline = Pipeline::new().validate_with(ValidatePhase::new().collect_only());
    let ctx = pipeline
        .run(config, super::sources(project))
        .wrap_err("Validation failed")?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in &ctx.diagnostics {
        let msg = if let Some(loc) = &diag.location {
            format!("{}\n  --> {}", diag.message, loc)
        } else {
            diag.message.clone()
        };

        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    Ok(CheckReport {
        querier: project.querier.clone(),
        config_path,
        engines: ctx.engines.iter().map(|e| e.name.clone()).collect(),
        errors,
        warnings,
        infos,
    })
}
