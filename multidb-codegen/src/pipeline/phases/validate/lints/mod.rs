//! Built-in lints.

mod bulk_target;
mod missing_method;
mod unsupported_param;

pub use bulk_target::BulkTargetLint;
pub use missing_method::MissingMethodLint;
pub use unsupported_param::UnsupportedParamLint;

use crate::emit::EngineEmitter;
use crate::pipeline::CompilationContext;

/// One emitter per engine with an extracted model. Empty until the extract
/// phase has run.
fn emitters(ctx: &CompilationContext) -> Vec<EngineEmitter<'_>> {
    let (Some(canonical), Some(vocab)) = (ctx.canonical.as_ref(), ctx.vocab.as_ref()) else {
        return Vec::new();
    };
    ctx.engines
        .iter()
        .filter_map(|engine| {
            let model = ctx.engine_models.get(&engine.name)?;
            Some(EngineEmitter::new(engine, canonical, model, vocab))
        })
        .collect()
}
