//! Core utilities and types for the multidb adapter generator.
//!
//! This crate provides string helpers, the fixed inflection table used for
//! storage-name resolution, and generated-file writing shared across the
//! multidb crates.

mod file;
mod inflect;
mod utils;

// File operations
pub use file::{File, GeneratedFile, WriteResult};
// Inflection
pub use inflect::{pluralize, singularize};
// String utilities
pub use utils::{capitalize, to_pascal_case, to_snake_case};
