//! Generated Go artifacts.
//!
//! Each file holds pre-rendered declarations and implements
//! [`GeneratedFile`](multidb_core::GeneratedFile). The header, package
//! clause and import block are assembled by [`go_source`].

mod errors_go;
mod models_go;
mod querier_go;
mod wrapper_go;

pub use errors_go::ErrorsGo;
pub use models_go::{ModelsGo, referenced_records};
pub use querier_go::QuerierGo;
pub use wrapper_go::WrapperGo;

use crate::builder::{ImportCollector, ImportTable};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by multidb. DO NOT EDIT.";

/// Assemble a complete Go source file around `body`, importing every
/// package `body` references through a qualifier known to `table`.
pub fn go_source(package: &str, table: &ImportTable, body: &str) -> String {
    let mut imports = ImportCollector::new();
    imports.scan(body, table);

    let mut out = format!("{}\n\npackage {}\n\n", GENERATED_HEADER, package);
    if !imports.is_empty() {
        out.push_str(&imports.render());
        out.push('\n');
    }
    out.push_str(body);
    out
}
