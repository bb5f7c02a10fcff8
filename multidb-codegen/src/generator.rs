//! Rendering and writing the generated artifact set.

use std::path::Path;

use eyre::{Result, WrapErr, eyre};
use multidb_core::{File, GeneratedFile, WriteResult};
use tracing::{debug, info};

use crate::builder::ImportTable;
use crate::emit::EngineEmitter;
use crate::files::{ErrorsGo, ModelsGo, QuerierGo, WrapperGo, referenced_records};
use crate::pipeline::CompilationContext;

/// The Go package the artifacts are written into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    /// Package clause name, e.g. `database`.
    pub name: String,
    /// Import path of the package directory; engine packages live below it.
    pub import_base: String,
}

impl PackageInfo {
    pub fn new(name: impl Into<String>, import_base: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            import_base: import_base.into(),
        }
    }
}

/// A rendered file, not yet written.
#[derive(Debug, Clone)]
pub struct PreviewFile {
    /// Path relative to the output directory
    pub path: String,
    pub content: String,
}

/// Outcome of [`Generator::generate`], in output order.
#[derive(Debug, Default)]
pub struct GenerateResult {
    pub written: Vec<String>,
    pub unchanged: Vec<String>,
}

/// Renders the models, interface, errors and one wrapper per engine from a
/// completed pipeline context.
pub struct Generator {
    ctx: CompilationContext,
    package: PackageInfo,
}

impl Generator {
    pub fn from_context(ctx: CompilationContext, package: PackageInfo) -> Self {
        Self { ctx, package }
    }

    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }

    /// Qualifiers resolvable in generated code: the standard library,
    /// configured imports and every engine package.
    fn import_table(&self) -> ImportTable {
        let table = self
            .ctx
            .config
            .imports
            .iter()
            .fold(ImportTable::standard(), |table, (qualifier, path)| {
                table.with(qualifier, path)
            });
        self.ctx.engines.iter().fold(table, |table, engine| {
            table.with(
                &engine.package,
                format!("{}/{}", self.package.import_base, engine.package),
            )
        })
    }

    /// Render every artifact. Fails without rendering anything partial when
    /// any engine's adapter cannot be built.
    pub fn render(&self) -> Result<Vec<PreviewFile>> {
        let canonical = self.ctx.canonical()?;
        let vocab = self.ctx.vocab()?;
        let prefix = &self.ctx.config.output.prefix;
        let interface = &self.ctx.config.source.interface;
        let table = self.import_table();
        let package = &self.package.name;

        let mut files: Vec<Box<dyn GeneratedFile>> = vec![
            Box::new(ModelsGo::new(
                prefix,
                package,
                table.clone(),
                referenced_records(canonical).into_iter().cloned().collect(),
            )),
            Box::new(QuerierGo::new(
                prefix,
                package,
                table.clone(),
                interface,
                canonical,
            )),
            Box::new(ErrorsGo::new(prefix, package)),
        ];

        for engine in &self.ctx.engines {
            let model = self
                .ctx
                .engine_models
                .get(&engine.name)
                .ok_or_else(|| eyre!("no model extracted for engine '{}'", engine.name))?;
            let methods = EngineEmitter::new(engine, canonical, model, vocab)
                .emit_all()
                .wrap_err_with(|| format!("generating adapter for engine '{}'", engine.name))?;
            debug!(engine = %engine.name, methods = methods.len(), "rendered adapter");

            files.push(Box::new(WrapperGo::new(
                prefix,
                package,
                table.clone(),
                engine.clone(),
                interface,
                methods,
            )));
        }

        Ok(files
            .iter()
            .map(|file| PreviewFile {
                path: file.file_name(),
                content: file.render(),
            })
            .collect())
    }

    /// Preview generated files without writing to disk
    pub fn preview(&self) -> Result<Vec<PreviewFile>> {
        self.render()
    }

    /// Render everything, then write into `output_dir`. Files whose content
    /// is unchanged are left untouched.
    pub fn generate(&self, output_dir: &Path) -> Result<GenerateResult> {
        let files = self.render()?;

        let mut result = GenerateResult::default();
        for file in files {
            match File::new(output_dir.join(&file.path), file.content).write()? {
                WriteResult::Written => {
                    info!(file = %file.path, "wrote");
                    result.written.push(file.path);
                }
                WriteResult::Unchanged => {
                    debug!(file = %file.path, "unchanged");
                    result.unchanged.push(file.path);
                }
            }
        }
        Ok(result)
    }
}
