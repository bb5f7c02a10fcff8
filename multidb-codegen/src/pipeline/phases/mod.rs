//! Built-in pipeline phases.
//!
//! - [`LowerPhase`] - resolves engines and the type vocabulary from config
//! - [`ExtractPhase`] - builds the canonical and per-engine models
//! - [`SynthesizePhase`] - adds accessors and infers bulk counterparts
//! - [`ValidatePhase`] - runs lints and collects diagnostics

mod extract;
mod lower;
mod synthesize;
mod validate;

pub use extract::ExtractPhase;
pub use lower::LowerPhase;
pub use synthesize::SynthesizePhase;
pub use validate::{
    BulkTargetLint, Lint, LintInfo, MissingMethodLint, UnsupportedParamLint, ValidatePhase,
};
