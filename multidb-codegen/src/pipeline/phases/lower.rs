//! Lower phase - resolves the configuration into engines and a vocabulary.

use eyre::{Result, bail};
use tracing::debug;

use crate::pipeline::{CompilationContext, Phase};

pub struct LowerPhase;

impl Phase for LowerPhase {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn description(&self) -> &'static str {
        "Resolve engines and the type vocabulary from configuration"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let engines = ctx.config.engines();
        if engines.is_empty() {
            bail!("no engines configured");
        }
        let vocab = ctx.config.vocabulary();
        debug!(
            engines = engines.len(),
            wrappers = vocab.wrappers().count(),
            interface = vocab.self_type(),
            "lowered configuration"
        );

        ctx.engines = engines;
        ctx.vocab = Some(vocab);
        Ok(())
    }
}
