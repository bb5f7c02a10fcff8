//! Operation model for the multidb adapter generator.
//!
//! This crate holds the in-memory inventory the generator works on:
//!
//! - [`Model`] - methods of the distinguished interface plus record types
//! - [`MethodSignature`], [`RecordType`] - the inventory entries
//! - [`EngineDescriptor`] - a target backend and its SQL dialect
//! - [`TypeVocabulary`] - the closed type vocabulary and its classifier
//! - [`extract_dir`], [`extract_sources`] - build a [`Model`] from declaration text

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod engine;
mod error;
mod method;
mod model;
mod parse;
mod record;
mod vocab;

pub use engine::{EngineDescriptor, PlaceholderStyle, QuoteStyle};
pub use error::{ExtractError, Result};
pub use method::{BULK_MARKER, MethodSignature, Param, Return, bulk_target};
pub use model::Model;
pub use parse::{SourceFile, extract_dir, extract_sources};
pub use record::{Field, RecordType};
pub use vocab::{COLLECTION_PREFIX, Category, NullableWrapper, TypeVocabulary, element_type};
