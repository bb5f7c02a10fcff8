use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for extraction (boxed to keep the happy path small)
pub type Result<T> = std::result::Result<T, Box<ExtractError>>;

/// Source text of one declaration file, used to attach spans to errors.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a syntax error pointing at `span`.
    pub fn syntax_error(
        &self,
        message: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<ExtractError> {
        Box::new(ExtractError::Syntax {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create an error for a type expression outside the supported subset.
    pub fn unsupported_type_error(
        &self,
        kind: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<ExtractError> {
        Box::new(ExtractError::UnsupportedType {
            src: self.named_source(),
            span: span.into(),
            kind: kind.into(),
        })
    }

    /// Create a duplicate declaration error.
    pub fn duplicate_error(
        &self,
        what: &'static str,
        name: impl Into<String>,
        owner: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<ExtractError> {
        Box::new(ExtractError::Duplicate {
            src: self.named_source(),
            span: span.into(),
            what,
            name: name.into(),
            owner: owner.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("failed to read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no declaration files found in '{path}'")]
    #[diagnostic(
        code(multidb::empty_dir),
        help("the directory must contain at least one non-test .go file")
    )]
    EmptyDir { path: PathBuf },

    #[error("{message}")]
    #[diagnostic(code(multidb::syntax_error))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("unsupported type expression: {kind}")]
    #[diagnostic(
        code(multidb::unsupported_type),
        help(
            "only named, qualified, pointer, slice, array, map and interface{{}} types are supported"
        )
    )]
    UnsupportedType {
        #[source_code]
        src: NamedSource<String>,
        #[label("{kind} type here")]
        span: SourceSpan,
        kind: String,
    },

    #[error("duplicate {what} '{name}' in '{owner}'")]
    #[diagnostic(code(multidb::duplicate))]
    Duplicate {
        #[source_code]
        src: NamedSource<String>,
        #[label("declared again here")]
        span: SourceSpan,
        what: &'static str,
        name: String,
        owner: String,
    },

    #[error("duplicate type '{name}' declared in '{first}' and '{second}'")]
    #[diagnostic(code(multidb::duplicate_type))]
    DuplicateType {
        name: String,
        first: String,
        second: String,
    },

    #[error("interface '{name}' is declared in both '{first}' and '{second}'")]
    #[diagnostic(code(multidb::duplicate_interface))]
    DuplicateInterface {
        name: String,
        first: String,
        second: String,
    },
}

impl ExtractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(ExtractError::Io {
            path: path.into(),
            source,
        })
    }
}
