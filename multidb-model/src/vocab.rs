//! The closed type vocabulary and the name-pattern classifier.

use indexmap::IndexMap;
use serde::Serialize;

/// Prefix marking a collection type (`[]User`).
pub const COLLECTION_PREFIX: &str = "[]";

const DEFAULT_OPAQUE: &[&str] = &["interface{}", "any"];
const NIL_TYPES: &[&str] = &["error", "sql.Result"];
const NUMERIC: &[&str] = &[
    "int", "int8", "int16", "int32", "int64", "uint", "uint8", "uint16", "uint32", "uint64",
    "float32", "float64", "complex64", "complex128", "byte", "rune",
];

/// What kind of value a declared type name denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// A record type declared alongside the interface (`User`).
    Domain,
    /// A collection of domain values (`[]User`).
    DomainCollection,
    /// A primitive payload paired with a validity flag (`sql.NullString`).
    Nullable,
    /// Anything else: builtins, qualified types, collections of primitives.
    Primitive,
    /// A value with no statically declared shape (`interface{}`).
    Opaque,
    /// The distinguished interface type itself.
    SelfType,
}

/// A nullable wrapper type and the primitive it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullableWrapper {
    /// Wrapper type name, e.g. `sql.NullInt64`.
    pub name: String,
    /// Wrapped primitive, e.g. `int64`.
    pub primitive: String,
    /// Payload field name, e.g. `Int64`.
    pub field: String,
}

impl NullableWrapper {
    pub fn new(
        name: impl Into<String>,
        primitive: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            primitive: primitive.into(),
            field: field.into(),
        }
    }
}

/// Lookup table driving type classification and value conversion.
///
/// All decisions about a declared type go through one explicitly
/// constructed vocabulary, so the classifier and the conversion rules are
/// pure functions of their inputs.
#[derive(Debug, Clone, Serialize)]
pub struct TypeVocabulary {
    self_type: String,
    opaque: Vec<String>,
    wrappers: IndexMap<String, NullableWrapper>,
    validity_field: String,
}

impl TypeVocabulary {
    /// Create a vocabulary with no nullable wrappers.
    pub fn new(self_type: impl Into<String>) -> Self {
        Self {
            self_type: self_type.into(),
            opaque: DEFAULT_OPAQUE.iter().map(|s| s.to_string()).collect(),
            wrappers: IndexMap::new(),
            validity_field: "Valid".to_string(),
        }
    }

    /// The `database/sql` vocabulary: `Querier` plus the `sql.Null*` family.
    pub fn database_sql() -> Self {
        [
            ("sql.NullString", "string", "String"),
            ("sql.NullInt64", "int64", "Int64"),
            ("sql.NullInt32", "int32", "Int32"),
            ("sql.NullInt16", "int16", "Int16"),
            ("sql.NullBool", "bool", "Bool"),
            ("sql.NullFloat64", "float64", "Float64"),
            ("sql.NullTime", "time.Time", "Time"),
            ("sql.NullByte", "byte", "Byte"),
        ]
        .into_iter()
        .fold(Self::new("Querier"), |vocab, (name, primitive, field)| {
            vocab.with_wrapper(NullableWrapper::new(name, primitive, field))
        })
    }

    /// Register a nullable wrapper, replacing any wrapper with the same name.
    pub fn with_wrapper(mut self, wrapper: NullableWrapper) -> Self {
        self.wrappers.insert(wrapper.name.clone(), wrapper);
        self
    }

    /// Name of the distinguished interface type.
    pub fn self_type(&self) -> &str {
        &self.self_type
    }

    /// Name of the validity flag carried by every wrapper.
    pub fn validity_field(&self) -> &str {
        &self.validity_field
    }

    /// Look up a recognized nullable wrapper by type name.
    pub fn wrapper(&self, ty: &str) -> Option<&NullableWrapper> {
        self.wrappers.get(ty)
    }

    /// Iterate over the registered wrappers in registration order.
    pub fn wrappers(&self) -> impl Iterator<Item = &NullableWrapper> {
        self.wrappers.values()
    }

    pub fn is_opaque(&self, ty: &str) -> bool {
        self.opaque.iter().any(|o| o == ty)
    }

    /// Classify a declared type name.
    ///
    /// Rules apply in priority order over the name alone: strip the collection
    /// prefix, then opaque marker, recognized wrapper, the interface's own
    /// name, unqualified capitalized name (domain value), and finally
    /// primitive. Only domain values are lifted to a collection category.
    pub fn classify(&self, ty: &str) -> Category {
        let inner = element_type(ty);
        let category = if self.is_opaque(inner) {
            Category::Opaque
        } else if self.wrappers.contains_key(inner) {
            Category::Nullable
        } else if inner == self.self_type {
            Category::SelfType
        } else if is_domain_name(inner) {
            Category::Domain
        } else {
            Category::Primitive
        };

        match (inner.len() != ty.len(), category) {
            (true, Category::Domain) => Category::DomainCollection,
            (true, _) => Category::Primitive,
            (false, category) => category,
        }
    }

    /// True for domain values and collections of them.
    pub fn is_domain(&self, ty: &str) -> bool {
        matches!(
            self.classify(ty),
            Category::Domain | Category::DomainCollection
        )
    }

    /// Zero-value expression for a declared type.
    pub fn zero_value(&self, ty: &str) -> String {
        if NUMERIC.contains(&ty) {
            return "0".to_string();
        }
        match ty {
            "bool" => return "false".to_string(),
            "string" => return "\"\"".to_string(),
            _ => {}
        }
        if NIL_TYPES.contains(&ty)
            || ty.starts_with('*')
            || ty.starts_with(COLLECTION_PREFIX)
            || ty.starts_with("map[")
            || self.is_opaque(ty)
            || ty == self.self_type
        {
            return "nil".to_string();
        }
        format!("{}{{}}", ty)
    }
}

impl Default for TypeVocabulary {
    fn default() -> Self {
        Self::database_sql()
    }
}

/// Strip one collection prefix, if present.
pub fn element_type(ty: &str) -> &str {
    ty.strip_prefix(COLLECTION_PREFIX).unwrap_or(ty)
}

fn is_domain_name(ty: &str) -> bool {
    ty.starts_with(|c: char| c.is_ascii_uppercase()) && !ty.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_domain() {
        let vocab = TypeVocabulary::database_sql();
        assert_eq!(vocab.classify("User"), Category::Domain);
        assert_eq!(vocab.classify("[]User"), Category::DomainCollection);
        assert_eq!(vocab.classify("CreateUserParams"), Category::Domain);
    }

    #[test]
    fn test_classify_non_domain() {
        let vocab = TypeVocabulary::database_sql();
        assert_eq!(vocab.classify("sql.NullString"), Category::Nullable);
        assert_eq!(vocab.classify("int"), Category::Primitive);
        assert_eq!(vocab.classify("string"), Category::Primitive);
        assert_eq!(vocab.classify("pkg.User"), Category::Primitive);
        assert_eq!(vocab.classify("user"), Category::Primitive);
        assert_eq!(vocab.classify("*User"), Category::Primitive);
        assert_eq!(vocab.classify("[]byte"), Category::Primitive);
        assert_eq!(vocab.classify("Querier"), Category::SelfType);
        assert_eq!(vocab.classify("interface{}"), Category::Opaque);
        assert_eq!(vocab.classify("any"), Category::Opaque);
    }

    #[test]
    fn test_unknown_wrapper_is_primitive() {
        let vocab = TypeVocabulary::database_sql();
        assert_eq!(vocab.classify("sql.NullUUID"), Category::Primitive);
    }

    #[test]
    fn test_custom_vocabulary() {
        let vocab = TypeVocabulary::new("Store")
            .with_wrapper(NullableWrapper::new("pgtype.Text", "string", "String"));

        assert_eq!(vocab.classify("Store"), Category::SelfType);
        assert_eq!(vocab.classify("Querier"), Category::Domain);
        assert_eq!(vocab.classify("pgtype.Text"), Category::Nullable);
        assert_eq!(vocab.classify("sql.NullString"), Category::Primitive);
    }

    #[test]
    fn test_zero_value() {
        let vocab = TypeVocabulary::database_sql();
        assert_eq!(vocab.zero_value("int"), "0");
        assert_eq!(vocab.zero_value("int64"), "0");
        assert_eq!(vocab.zero_value("string"), "\"\"");
        assert_eq!(vocab.zero_value("bool"), "false");
        assert_eq!(vocab.zero_value("error"), "nil");
        assert_eq!(vocab.zero_value("*User"), "nil");
        assert_eq!(vocab.zero_value("[]byte"), "nil");
        assert_eq!(vocab.zero_value("sql.Result"), "nil");
        assert_eq!(vocab.zero_value("Querier"), "nil");
        assert_eq!(vocab.zero_value("MyStruct"), "MyStruct{}");
        assert_eq!(vocab.zero_value("sql.NullString"), "sql.NullString{}");
    }
}
