//! Generate command report data structures.

use std::path::PathBuf;

use multidb_codegen::PreviewFile;

use super::output::{Output, Report};

/// Report data from adapter generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Go package the files belong to.
    pub package: String,

    /// Name of the canonical interface.
    pub interface: String,

    /// Methods in the canonical interface, synthesized ones included.
    pub method_count: usize,

    /// `(engine, package)` pairs in generation order.
    pub engines: Vec<(String, String)>,

    /// Warning messages from pipeline.
    pub warnings: Vec<String>,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    /// Files whose content changed.
    pub written: Vec<String>,
    /// Files already up to date.
    pub unchanged: Vec<String>,
    /// Path to debug snapshots, if visualization was enabled.
    pub debug_dir: Option<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    pub files: Vec<PreviewFile>,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        if let Some(debug_dir) = &written.debug_dir {
            out.key_value(
                "Pipeline snapshots written to",
                &debug_dir.display().to_string(),
            );
            out.newline();
        }

        for warning in &self.warnings {
            out.warning(warning);
        }

        out.preformatted(&format!(
            "package {} ({}, {} methods)",
            self.package, self.interface, self.method_count
        ));
        out.newline();

        out.section(&format!("Engines ({})", self.engines.len()));
        for (name, package) in &self.engines {
            out.list_item(&format!("{} → {}", name, package));
        }
        out.newline();

        out.section(&format!("Generated in {}", written.output_dir.display()));
        for file in &written.written {
            out.added_item(file);
        }
        for file in &written.unchanged {
            out.list_item(&format!("{} (unchanged)", file));
        }
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", preview.files.len()));
    }
}
