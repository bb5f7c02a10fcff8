//! Core operations.
//!
//! This module contains the business logic for multidb commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;

pub use check::check;
pub use generate::{GenerateOptions, generate};

use multidb_codegen::pipeline::SourceSet;

use crate::project::Project;

/// Reference package plus the directory holding the engine packages.
fn sources(project: &Project) -> SourceSet {
    SourceSet::dir(&project.source_dir, &project.target_dir)
}
