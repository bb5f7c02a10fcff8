use serde::{Deserialize, Serialize};

/// How an engine quotes SQL identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    /// `"name"`
    #[default]
    Double,
    /// `` `name` ``
    Backtick,
}

impl QuoteStyle {
    pub fn quote(&self, ident: &str) -> String {
        match self {
            QuoteStyle::Double => format!("\"{}\"", ident),
            QuoteStyle::Backtick => format!("`{}`", ident),
        }
    }
}

/// How an engine spells bind parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderStyle {
    /// `?`
    #[default]
    Question,
    /// `$1`, `$2`, ...
    Dollar,
}

impl PlaceholderStyle {
    /// Placeholder for the 1-based parameter `position`.
    pub fn placeholder(&self, position: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Dollar => format!("${}", position),
        }
    }
}

/// A target backend: its name, the package holding its accessor layer, and
/// the dialect flags used when rendering raw queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineDescriptor {
    pub name: String,
    pub package: String,
    pub quote: QuoteStyle,
    pub placeholder: PlaceholderStyle,
}

impl EngineDescriptor {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            quote: QuoteStyle::default(),
            placeholder: PlaceholderStyle::default(),
        }
    }

    pub fn with_quote(mut self, quote: QuoteStyle) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_placeholder(mut self, placeholder: PlaceholderStyle) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// The built-in engine list, in processing order.
    pub fn defaults() -> Vec<EngineDescriptor> {
        vec![
            EngineDescriptor::new("sqlite", "sqlitedb"),
            EngineDescriptor::new("postgres", "postgresdb")
                .with_placeholder(PlaceholderStyle::Dollar),
            EngineDescriptor::new("mysql", "mysqldb").with_quote(QuoteStyle::Backtick),
        ]
    }

    pub fn quote_ident(&self, ident: &str) -> String {
        self.quote.quote(ident)
    }

    /// Name of the generated wrapper type, e.g. `postgresWrapper`.
    pub fn wrapper_type(&self) -> String {
        format!("{}Wrapper", self.name)
    }
}
