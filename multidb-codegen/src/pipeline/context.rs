//! State shared by the pipeline phases.

use std::path::PathBuf;

use indexmap::IndexMap;
use multidb_config::Config;
use multidb_model::{EngineDescriptor, Model, SourceFile, TypeVocabulary};

use super::diagnostic::{Diagnostic, Severity};

/// Where declaration text comes from.
#[derive(Debug, Clone)]
pub enum SourceSet {
    /// Packages on disk. The reference package is `canonical`; each engine's
    /// accessor layer lives in `root/<package>`.
    Dir { canonical: PathBuf, root: PathBuf },
    /// In-memory declaration files, keyed by engine package.
    Memory {
        canonical: Vec<SourceFile>,
        packages: IndexMap<String, Vec<SourceFile>>,
    },
}

impl SourceSet {
    pub fn dir(canonical: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        SourceSet::Dir {
            canonical: canonical.into(),
            root: root.into(),
        }
    }

    pub fn memory(canonical: Vec<SourceFile>) -> Self {
        SourceSet::Memory {
            canonical,
            packages: IndexMap::new(),
        }
    }

    /// Add an engine package to an in-memory source set. No-op for `Dir`.
    pub fn with_package(mut self, package: impl Into<String>, files: Vec<SourceFile>) -> Self {
        if let SourceSet::Memory { packages, .. } = &mut self {
            packages.insert(package.into(), files);
        }
        self
    }
}

/// Context passed through all pipeline phases.
///
/// Phases fill it in order: `lower` sets the engines and vocabulary,
/// `extract` the models, `synthesize` augments the canonical model and
/// `validate` only adds diagnostics.
#[derive(Debug)]
pub struct CompilationContext {
    pub config: Config,
    pub sources: SourceSet,
    /// Engines to generate for, in configured order.
    pub engines: Vec<EngineDescriptor>,
    pub vocab: Option<TypeVocabulary>,
    /// Model of the reference package.
    pub canonical: Option<Model>,
    /// Model of each engine's accessor layer, keyed by engine name.
    pub engine_models: IndexMap<String, Model>,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationContext {
    pub fn new(config: Config, sources: SourceSet) -> Self {
        Self {
            config,
            sources,
            engines: Vec::new(),
            vocab: None,
            canonical: None,
            engine_models: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Check if any error diagnostics have been recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_error())
    }

    /// Check if any warning diagnostics have been recorded.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn add_error(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(phase, message));
    }

    pub fn add_warning(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::warning(phase, message));
    }

    pub fn add_info(&mut self, phase: &str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(phase, message));
    }

    /// Add a diagnostic with a location.
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Error))
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.severity, Severity::Warning))
    }

    /// The vocabulary, once `lower` has run.
    pub fn vocab(&self) -> eyre::Result<&TypeVocabulary> {
        self.vocab
            .as_ref()
            .ok_or_else(|| eyre::eyre!("type vocabulary not set - did the lower phase run?"))
    }

    /// The canonical model, once `extract` has run.
    pub fn canonical(&self) -> eyre::Result<&Model> {
        self.canonical
            .as_ref()
            .ok_or_else(|| eyre::eyre!("canonical model not set - did the extract phase run?"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CompilationContext {
        CompilationContext::new(Config::default(), SourceSet::memory(Vec::new()))
    }

    #[test]
    fn test_context_creation() {
        let ctx = context();

        assert!(ctx.engines.is_empty());
        assert!(ctx.canonical.is_none());
        assert!(ctx.canonical().is_err());
        assert!(ctx.diagnostics.is_empty());
    }

    #[test]
    fn test_context_diagnostics() {
        let mut ctx = context();

        ctx.add_error("validate", "missing method");
        ctx.add_warning("validate", "unknown bulk target");
        ctx.add_info("synthesize", "synthesized GetUserByID");

        assert!(ctx.has_errors());
        assert!(ctx.has_warnings());
        assert_eq!(ctx.error_count(), 1);
        assert_eq!(ctx.warning_count(), 1);
    }

    #[test]
    fn test_memory_sources_keep_package_order() {
        let sources = SourceSet::memory(Vec::new())
            .with_package("sqlitedb", Vec::new())
            .with_package("mysqldb", Vec::new());

        let SourceSet::Memory { packages, .. } = sources else {
            panic!("expected in-memory sources");
        };
        let names: Vec<_> = packages.keys().map(String::as_str).collect();
        assert_eq!(names, ["sqlitedb", "mysqldb"]);
    }
}
