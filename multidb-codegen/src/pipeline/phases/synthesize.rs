//! Synthesize phase - completes the canonical method set.

use eyre::{Result, eyre};

use crate::pipeline::{CompilationContext, Phase};
use crate::synthesize::{infer_bulk_methods, synthesize_accessors};

pub struct SynthesizePhase;

impl Phase for SynthesizePhase {
    fn name(&self) -> &'static str {
        "synthesize"
    }

    fn description(&self) -> &'static str {
        "Add Get<Type>ByID accessors and infer bulk counterparts"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let vocab = ctx
            .vocab
            .as_ref()
            .ok_or_else(|| eyre!("type vocabulary not set - did the lower phase run?"))?;
        let canonical = ctx
            .canonical
            .as_mut()
            .ok_or_else(|| eyre!("canonical model not set - did the extract phase run?"))?;

        let accessors = synthesize_accessors(canonical, vocab);
        let bulk = infer_bulk_methods(canonical);

        for name in accessors {
            ctx.add_info(self.name(), format!("synthesized {}", name));
        }
        for (method, singular) in bulk {
            ctx.add_info(
                self.name(),
                format!("{} loops over {} (inferred)", method, singular),
            );
        }
        Ok(())
    }
}
