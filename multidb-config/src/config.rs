use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use miette::SourceSpan;
use multidb_model::{
    EngineDescriptor, NullableWrapper, PlaceholderStyle, QuoteStyle, TypeVocabulary,
};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, SourceContext};
use crate::validate::{find_value_span, validate_identifier};

/// Name of the config file looked up next to the target package.
pub const CONFIG_FILE_NAME: &str = "multidb.toml";

/// Default file name prefix of generated artifacts.
pub const DEFAULT_PREFIX: &str = "generated_";

/// Root of `multidb.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// Target engines; the built-in list when omitted.
    #[serde(default)]
    pub engines: Option<Vec<EngineConfig>>,

    /// Nullable wrappers; the `database/sql` family when omitted.
    #[serde(default)]
    pub nullable: Option<Vec<NullableConfig>>,

    /// Extra import paths keyed by package qualifier.
    #[serde(default)]
    pub imports: BTreeMap<String, String>,
}

/// `[source]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Name of the distinguished interface.
    #[serde(default = "default_interface")]
    pub interface: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
        }
    }
}

fn default_interface() -> String {
    "Querier".to_string()
}

/// `[output]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Treat an engine lacking a canonical method as an error.
    #[serde(default)]
    pub strict: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            strict: false,
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// `[[engines]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub name: String,
    pub package: String,
    #[serde(default)]
    pub quote: Option<QuoteStyle>,
    #[serde(default)]
    pub placeholder: Option<PlaceholderStyle>,
}

impl EngineConfig {
    /// Resolve dialect flags, defaulting by well-known engine name.
    pub fn descriptor(&self) -> EngineDescriptor {
        let (quote, placeholder) = match self.name.as_str() {
            "mysql" => (QuoteStyle::Backtick, PlaceholderStyle::Question),
            "postgres" => (QuoteStyle::Double, PlaceholderStyle::Dollar),
            _ => (QuoteStyle::Double, PlaceholderStyle::Question),
        };
        EngineDescriptor::new(&self.name, &self.package)
            .with_quote(self.quote.unwrap_or(quote))
            .with_placeholder(self.placeholder.unwrap_or(placeholder))
    }
}

/// `[[nullable]]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NullableConfig {
    pub name: String,
    pub primitive: String,
    pub field: String,
}

impl FromStr for Config {
    type Err = Box<ConfigError>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, CONFIG_FILE_NAME)
    }
}

impl Config {
    /// Parse from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        let config: Self = toml::from_str(content).map_err(|e| ctx.parse_error(e))?;
        config.validate(&ctx)?;
        Ok(config)
    }

    /// Engines in processing order.
    pub fn engines(&self) -> Vec<EngineDescriptor> {
        match &self.engines {
            Some(engines) => engines.iter().map(EngineConfig::descriptor).collect(),
            None => EngineDescriptor::defaults(),
        }
    }

    /// The type vocabulary the generator classifies with.
    pub fn vocabulary(&self) -> TypeVocabulary {
        let Some(nullable) = &self.nullable else {
            let defaults = TypeVocabulary::database_sql();
            return defaults
                .wrappers()
                .cloned()
                .fold(TypeVocabulary::new(&self.source.interface), |v, w| {
                    v.with_wrapper(w)
                });
        };
        nullable
            .iter()
            .fold(TypeVocabulary::new(&self.source.interface), |v, n| {
                v.with_wrapper(NullableWrapper::new(&n.name, &n.primitive, &n.field))
            })
    }

    fn validate(&self, ctx: &SourceContext) -> Result<()> {
        let src = ctx.src();

        check_identifier(ctx, &self.source.interface, "interface name")?;

        if self.output.prefix.is_empty()
            || self.output.prefix.contains(['/', '\\'])
            || self.output.prefix.contains("..")
        {
            return Err(ctx.validation_error(
                "output prefix must be a plain, non-empty file name prefix",
                find_value_span(src, &self.output.prefix, 0),
            ));
        }

        if let Some(engines) = &self.engines {
            if engines.is_empty() {
                return Err(ctx.validation_error(
                    "at least one engine must be configured",
                    src.find("engines").map(|pos| SourceSpan::from((pos, 7))),
                ));
            }
            let mut names = Occurrences::default();
            let mut packages = Occurrences::default();
            for engine in engines {
                check_identifier(ctx, &engine.name, "engine name")?;
                check_identifier(ctx, &engine.package, "engine package")?;
                names.record(ctx, &engine.name, "engine name")?;
                packages.record(ctx, &engine.package, "engine package")?;
            }
        }

        if let Some(nullable) = &self.nullable {
            let mut names = Occurrences::default();
            for wrapper in nullable {
                if wrapper.name.is_empty() || wrapper.primitive.is_empty() {
                    return Err(ctx.validation_error(
                        "nullable wrapper name and primitive must not be empty",
                        None,
                    ));
                }
                check_identifier(ctx, &wrapper.field, "nullable payload field")?;
                names.record(ctx, &wrapper.name, "nullable wrapper")?;
            }
        }

        for (qualifier, path) in &self.imports {
            check_identifier(ctx, qualifier, "import qualifier")?;
            if path.is_empty() {
                return Err(ctx.validation_error(
                    format!("import path for '{}' must not be empty", qualifier),
                    None,
                ));
            }
        }

        Ok(())
    }
}

fn check_identifier(ctx: &SourceContext, name: &str, context: &str) -> Result<()> {
    match validate_identifier(name) {
        None => Ok(()),
        Some(reason) => Err(ctx.invalid_identifier_error(
            name,
            context,
            reason,
            find_value_span(ctx.src(), name, 0),
        )),
    }
}

/// Tracks seen values to report duplicates with both locations.
#[derive(Default)]
struct Occurrences<'a> {
    seen: HashMap<&'a str, usize>,
}

impl<'a> Occurrences<'a> {
    fn record(&mut self, ctx: &SourceContext, value: &'a str, context: &str) -> Result<()> {
        let count = self.seen.entry(value).or_insert(0);
        *count += 1;
        if *count == 1 {
            return Ok(());
        }
        let first = find_value_span(ctx.src(), value, 0).unwrap_or_else(|| (0, 0).into());
        let second = find_value_span(ctx.src(), value, *count - 1).unwrap_or(first);
        Err(ctx.duplicate_error(value, context, first, second))
    }
}
