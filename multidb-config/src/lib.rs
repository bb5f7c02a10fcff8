//! `multidb.toml` configuration for the multidb adapter generator.
//!
//! Every table is optional; an absent file yields the built-in engine list
//! and the `database/sql` nullable wrappers.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod config;
mod error;
mod file;
mod validate;

pub use config::{
    CONFIG_FILE_NAME, Config, DEFAULT_PREFIX, EngineConfig, NullableConfig, OutputConfig,
    SourceConfig,
};
pub use error::{ConfigError, Result};
pub use file::ConfigFile;
