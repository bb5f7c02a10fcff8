//! Pipeline orchestrator.

use eyre::Result;
use multidb_config::Config;
use tracing::debug;

use super::{
    CompilationContext, Phase, Plugin, SourceSet,
    phases::{ExtractPhase, LowerPhase, SynthesizePhase, ValidatePhase},
};

/// Runs the built-in phases (lower, extract, synthesize, validate), then
/// any custom phases, calling plugin hooks around each.
///
/// # Example
///
/// ```ignore
/// let ctx = Pipeline::new()
///     .plugin(SnapshotPlugin::with_output_dir(".multidb/debug"))
///     .run(config, SourceSet::dir(querier_dir, target_dir))?;
/// ```
pub struct Pipeline {
    validate: ValidatePhase,
    phases: Vec<Box<dyn Phase>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            validate: ValidatePhase::new(),
            phases: Vec::new(),
            plugins: Vec::new(),
        }
    }

    /// Replace the built-in validate phase, e.g. to run a custom lint set.
    pub fn validate_with(mut self, validate: ValidatePhase) -> Self {
        self.validate = validate;
        self
    }

    /// Add a phase to run after the built-in phases.
    pub fn phase(mut self, phase: impl Phase + 'static) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    /// Add a plugin to receive phase lifecycle hooks.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Run every phase over a fresh context.
    ///
    /// # Errors
    ///
    /// Returns an error if any phase or plugin hook fails. Extraction
    /// failures abort the run; no partial model is returned.
    pub fn run(&self, config: Config, sources: SourceSet) -> Result<CompilationContext> {
        let mut ctx = CompilationContext::new(config, sources);

        let builtin: [&dyn Phase; 4] = [&LowerPhase, &ExtractPhase, &SynthesizePhase, &self.validate];
        for phase in builtin
            .into_iter()
            .chain(self.phases.iter().map(|p| p.as_ref()))
        {
            self.run_phase(phase, &mut ctx)?;
        }

        Ok(ctx)
    }

    fn run_phase(&self, phase: &dyn Phase, ctx: &mut CompilationContext) -> Result<()> {
        let phase_name = phase.name();
        debug!(phase = phase_name, "running phase");

        for plugin in &self.plugins {
            plugin.on_before_phase(phase_name, ctx)?;
        }

        phase.run(ctx)?;

        for plugin in &self.plugins {
            plugin.on_after_phase(phase_name, ctx)?;
        }

        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use multidb_model::SourceFile;

    use super::*;

    struct CountingPlugin {
        before_count: Arc<AtomicUsize>,
        after_count: Arc<AtomicUsize>,
    }

    impl CountingPlugin {
        fn new() -> (Self, Arc<AtomicUsize>, Arc<AtomicUsize>) {
            let before = Arc::new(AtomicUsize::new(0));
            let after = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    before_count: before.clone(),
                    after_count: after.clone(),
                },
                before,
                after,
            )
        }
    }

    impl Plugin for CountingPlugin {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn on_before_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.before_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_after_phase(&self, _phase: &str, _ctx: &mut CompilationContext) -> Result<()> {
            self.after_count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    const QUERIER: &str = r#"
package sqlitedb

import "context"

type User struct {
	ID   int64
	Name string
}

type Querier interface {
	GetUserByID(ctx context.Context, id int64) (User, error)
}
"#;

    fn config() -> Config {
        Config::from_str_with_filename(
            r#"
            [[engines]]
            name = "sqlite"
            package = "sqlitedb"
            "#,
            "multidb.toml",
        )
        .expect("valid config")
    }

    fn sources() -> SourceSet {
        let files = vec![SourceFile::new("querier.go", QUERIER)];
        SourceSet::memory(files.clone()).with_package("sqlitedb", files)
    }

    #[test]
    fn test_pipeline_runs_phases() {
        let ctx = Pipeline::new()
            .run(config(), sources())
            .expect("pipeline should succeed");

        assert_eq!(ctx.engines.len(), 1);
        assert!(ctx.vocab.is_some());
        assert_eq!(ctx.canonical().unwrap().method_count(), 1);
        assert!(ctx.engine_models.contains_key("sqlite"));
        assert!(!ctx.has_errors());
    }

    #[test]
    fn test_pipeline_plugin_hooks() {
        let (plugin, before_count, after_count) = CountingPlugin::new();

        let _ = Pipeline::new()
            .plugin(plugin)
            .run(config(), sources())
            .expect("pipeline should succeed");

        // 4 built-in phases = 4 before + 4 after hooks
        assert_eq!(before_count.load(Ordering::SeqCst), 4);
        assert_eq!(after_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_pipeline_fails_on_missing_engine_package() {
        let sources = SourceSet::memory(vec![SourceFile::new("querier.go", QUERIER)]);
        let err = Pipeline::new().run(config(), sources).unwrap_err();
        assert!(err.to_string().contains("sqlitedb"));
    }
}
