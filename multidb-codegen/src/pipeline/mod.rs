//! Model-building pipeline.
//!
//! A [`Pipeline`] runs the phases that turn configuration and declaration
//! text into the models the generator renders from:
//!
//! - `lower` - configuration to engines and type vocabulary
//! - `extract` - canonical model plus one model per engine
//! - `synthesize` - `Get<Type>ByID` accessors, inferred bulk methods
//! - `validate` - lints, collected as [`Diagnostic`]s
//!
//! Plugins hook in before and after every phase; [`SnapshotPlugin`] uses
//! this to dump the state for `--visualize`.
//!
//! # Example
//!
//! ```ignore
//! use multidb_codegen::pipeline::{Pipeline, SourceSet};
//!
//! let ctx = Pipeline::new().run(config, SourceSet::dir(querier_dir, target_dir))?;
//! for diag in ctx.warnings() {
//!     eprintln!("{}", diag);
//! }
//! let generator = Generator::from_context(ctx, package)?;
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;
mod snapshot;

pub use context::{CompilationContext, SourceSet};
pub use diagnostic::{Diagnostic, Severity};
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use runner::Pipeline;
pub use snapshot::{PhaseSnapshot, SnapshotPlugin};
