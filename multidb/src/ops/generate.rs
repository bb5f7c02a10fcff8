//! Generate operation - adapter synthesis for every engine.

use eyre::{Context, Result};
use multidb_codegen::{
    Generator,
    pipeline::{Pipeline, Severity, SnapshotPlugin},
};
use multidb_config::Config;

use crate::{
    project::Project,
    reports::{GenerateReport, GenerationResult, PreviewResult, WrittenResult},
};

/// Options for the generate operation.
pub struct GenerateOptions {
    /// Whether to preview without writing files.
    pub dry_run: bool,
    /// Whether to output debug snapshots.
    pub visualize: bool,
}

/// Execute the generate operation.
///
/// Runs the pipeline over the reference and engine packages, then renders
/// every artifact. Nothing is written unless all of them render.
pub fn generate(project: &Project, config: Config, opts: GenerateOptions) -> Result<GenerateReport> {
    let package = project.package_info(&config.output.prefix)?;
    let interface = config.source.interface.clone();

    let debug_dir = project.target_dir.join(".multidb/debug");
    let mut pipeline = Pipeline::new();
    if opts.visualize {
        pipeline = pipeline.plugin(SnapshotPlugin::with_output_dir(&debug_dir));
    }
    let ctx = pipeline
        .run(config, super::sources(project))
        .wrap_err("Pipeline failed")?;

    let warnings: Vec<String> = ctx
        .diagnostics
        .iter()
        .filter(|d| matches!(d.severity, Severity::Warning))
        .map(|d| d.message.clone())
        .collect();
    let engines = ctx
        .engines
        .iter()
        .map(|e| (e.name.clone(), e.package.clone()))
        .collect();
    let method_count = ctx.canonical()?.method_count();
    let package_name = package.name.clone();

    let generator = Generator::from_context(ctx, package);
    let result = if opts.dry_run {
        GenerationResult::Preview(PreviewResult {
            files: generator.preview().wrap_err("Failed to render adapters")?,
        })
    } else {
        let written = generator
            .generate(&project.target_dir)
            .wrap_err("Failed to generate code")?;
        GenerationResult::Written(WrittenResult {
            output_dir: project.target_dir.clone(),
            written: written.written,
            unchanged: written.unchanged,
            debug_dir: opts.visualize.then_some(debug_dir),
        })
    };

    Ok(GenerateReport {
        package: package_name,
        interface,
        method_count,
        engines,
        warnings,
        result,
    })
}
