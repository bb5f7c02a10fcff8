use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Box<CodegenError>>;

/// Modeling errors raised while rendering an adapter.
///
/// Any of these aborts generation: an adapter missing a method body would
/// still compile and silently misbehave.
#[derive(Debug, Error, Diagnostic)]
pub enum CodegenError {
    #[error(
        "unsupported parameter type: slice of domain struct {ty} (parameter '{param}' of {method}, engine '{engine}')"
    )]
    #[diagnostic(
        code(multidb::unsupported_slice_of_domain_value),
        help(
            "pass a parameter bundle holding the slice and annotate the method with `// @bulk-for <Method>` to generate a per-element loop"
        )
    )]
    UnsupportedSliceOfDomainValue {
        engine: String,
        method: String,
        param: String,
        ty: String,
    },

    #[error("record type '{name}' referenced by {method} is not declared")]
    #[diagnostic(code(multidb::unknown_record))]
    UnknownRecord { method: String, name: String },
}

impl CodegenError {
    pub fn unsupported_slice(
        engine: impl Into<String>,
        method: impl Into<String>,
        param: impl Into<String>,
        ty: impl Into<String>,
    ) -> Box<Self> {
        Box::new(CodegenError::UnsupportedSliceOfDomainValue {
            engine: engine.into(),
            method: method.into(),
            param: param.into(),
            ty: ty.into(),
        })
    }
}
