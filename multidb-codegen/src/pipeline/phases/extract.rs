//! Extract phase - builds the canonical model and one model per engine.

use eyre::{Result, WrapErr, eyre};
use multidb_model::{extract_dir, extract_sources};
use tracing::debug;

use crate::pipeline::{CompilationContext, Phase, SourceSet};

pub struct ExtractPhase;

impl Phase for ExtractPhase {
    fn name(&self) -> &'static str {
        "extract"
    }

    fn description(&self) -> &'static str {
        "Parse the reference package and every engine's accessor layer"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let vocab = ctx.vocab()?.clone();

        let canonical = match &ctx.sources {
            SourceSet::Dir { canonical, .. } => extract_dir(canonical, &vocab)?,
            SourceSet::Memory { canonical, .. } => extract_sources(canonical, &vocab)?,
        };
        if canonical.interface_source.is_none() {
            return Err(eyre!(
                "no '{}' interface found in the reference package",
                vocab.self_type()
            ));
        }
        debug!(
            methods = canonical.method_count(),
            records = canonical.record_count(),
            "extracted canonical model"
        );

        for engine in &ctx.engines {
            let model = match &ctx.sources {
                SourceSet::Dir { root, .. } => {
                    let dir = root.join(&engine.package);
                    extract_dir(&dir, &vocab).wrap_err_with(|| {
                        format!("extracting engine '{}' from {}", engine.name, dir.display())
                    })?
                }
                SourceSet::Memory { packages, .. } => {
                    let files = packages.get(&engine.package).ok_or_else(|| {
                        eyre!(
                            "no declarations for engine '{}' (package {})",
                            engine.name,
                            engine.package
                        )
                    })?;
                    extract_sources(files, &vocab)
                        .wrap_err_with(|| format!("extracting engine '{}'", engine.name))?
                }
            };
            debug!(
                engine = %engine.name,
                methods = model.method_count(),
                records = model.record_count(),
                "extracted engine model"
            );
            ctx.engine_models.insert(engine.name.clone(), model);
        }

        ctx.canonical = Some(canonical);
        Ok(())
    }
}
