use multidb_core::GeneratedFile;

use super::go_source;
use crate::builder::{CodeBuilder, ImportTable};

/// Sentinel errors returned by every wrapper.
pub struct ErrorsGo {
    prefix: String,
    package: String,
}

impl ErrorsGo {
    pub fn new(prefix: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            package: package.into(),
        }
    }
}

impl GeneratedFile for ErrorsGo {
    fn file_name(&self) -> String {
        format!("{}errors.go", self.prefix)
    }

    fn render(&self) -> String {
        let body = CodeBuilder::go()
            .block("var (", ")", |b| {
                b.line("// ErrNotFound is returned when a lookup matches no row.")
                    .line("ErrNotFound = errors.New(\"not found\")")
                    .line("// ErrNotImplemented is returned when an engine lacks the operation.")
                    .line("ErrNotImplemented = errors.New(\"not implemented\")")
            })
            .build();
        go_source(&self.package, &ImportTable::standard(), &body)
    }
}
