//! Code generation building blocks.

mod code_builder;
mod imports;

pub use code_builder::CodeBuilder;
pub use imports::{ImportCollector, ImportTable};
