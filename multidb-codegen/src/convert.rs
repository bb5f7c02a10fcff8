//! The conversion rule engine.
//!
//! [`convert`] decides, for one (target type, source type) pair, the Go
//! expression that moves a value from one backend's representation into the
//! other's. Rules are tried in a fixed priority and exactly one fires.

use std::fmt;

use multidb_model::{Category, TypeVocabulary};
use serde::Serialize;

/// Which conversion rule produced an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rule {
    /// Same declared type on both sides.
    Identical,
    /// Wrapper to a different wrapper, validity copied from the source.
    RewrapNullable,
    /// Primitive into a wrapper, validity forced to true.
    WrapPrimitive,
    /// Wrapper payload into a primitive.
    UnwrapNullable,
    /// Aggregate target (record, collection, interface): assigned as is.
    Aggregate,
    /// Opaque source narrowed into a wrapper at run time.
    NarrowOpaque,
    /// Explicit `T(x)` cast.
    Cast,
}

/// The result of converting one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// Target field (or parameter) name.
    pub field: String,
    /// Go expression producing the target value. May span several lines.
    pub expr: String,
    pub rule: Rule,
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.expr)
    }
}

/// Convert `source_expr` of type `source` into a value of type `target`.
///
/// ```
/// use multidb_codegen::convert::{Rule, convert};
/// use multidb_model::TypeVocabulary;
///
/// let vocab = TypeVocabulary::database_sql();
/// let c = convert(&vocab, "Bio", "sql.NullString", "string", "user.Bio");
/// assert_eq!(c.to_string(), "Bio: sql.NullString{String: user.Bio, Valid: true}");
/// assert_eq!(c.rule, Rule::WrapPrimitive);
/// ```
pub fn convert(
    vocab: &TypeVocabulary,
    field: &str,
    target: &str,
    source: &str,
    source_expr: &str,
) -> Conversion {
    let (expr, rule) = rule_for(vocab, target, source, source_expr);
    Conversion {
        field: field.to_string(),
        expr,
        rule,
    }
}

fn rule_for(
    vocab: &TypeVocabulary,
    target: &str,
    source: &str,
    src: &str,
) -> (String, Rule) {
    if target == source {
        return (src.to_string(), Rule::Identical);
    }

    let valid = vocab.validity_field();
    let target_wrapper = vocab.wrapper(target);
    let source_wrapper = vocab.wrapper(source);
    let target_category = vocab.classify(target);
    let source_category = vocab.classify(source);

    if let (Some(t), Some(s)) = (target_wrapper, source_wrapper) {
        let payload = cast_if(&t.primitive, &s.primitive, &format!("{}.{}", src, s.field));
        let expr = format!(
            "{}{{{}: {}, {}: {}.{}}}",
            target, t.field, payload, valid, src, valid
        );
        return (expr, Rule::RewrapNullable);
    }

    if let (Some(t), Category::Primitive) = (target_wrapper, source_category) {
        let payload = cast_if(&t.primitive, source, src);
        let expr = format!("{}{{{}: {}, {}: true}}", target, t.field, payload, valid);
        return (expr, Rule::WrapPrimitive);
    }

    if let (Some(s), Category::Primitive) = (source_wrapper, target_category) {
        let expr = cast_if(target, &s.primitive, &format!("{}.{}", src, s.field));
        return (expr, Rule::UnwrapNullable);
    }

    if matches!(
        target_category,
        Category::Domain | Category::DomainCollection | Category::SelfType | Category::Opaque
    ) {
        return (src.to_string(), Rule::Aggregate);
    }

    if let (Some(t), Category::Opaque) = (target_wrapper, source_category) {
        let zero = format!("{}{{}}", target);
        let expr = [
            format!("func() {} {{", target),
            format!("\tif {} == nil {{", src),
            format!("\t\treturn {}", zero),
            "\t}".to_string(),
            format!("\tv, ok := {}.({})", src, t.primitive),
            "\tif !ok {".to_string(),
            format!("\t\treturn {}", zero),
            "\t}".to_string(),
            format!("\treturn {}{{{}: v, {}: true}}", target, t.field, valid),
            "}()".to_string(),
        ]
        .join("\n");
        return (expr, Rule::NarrowOpaque);
    }

    (format!("{}({})", target, src), Rule::Cast)
}

/// `ty(expr)` when `ty` differs from `from`, otherwise `expr`.
fn cast_if(ty: &str, from: &str, expr: &str) -> String {
    if ty == from {
        expr.to_string()
    } else {
        format!("{}({})", ty, expr)
    }
}

/// Indent every line after the first by one tab, so a multi-line
/// expression nests under the line it starts on.
pub(crate) fn nest(expr: &str) -> String {
    expr.replace('\n', "\n\t")
}

#[cfg(test)]
mod tests {
    use multidb_model::NullableWrapper;

    use super::*;

    fn vocab() -> TypeVocabulary {
        TypeVocabulary::database_sql()
    }

    fn check(target: &str, source: &str, expr: &str) -> Conversion {
        convert(&vocab(), "F", target, source, expr)
    }

    #[test]
    fn test_identical_types_pass_through() {
        let c = convert(&vocab(), "ID", "int64", "int64", "user.ID");
        assert_eq!(c.to_string(), "ID: user.ID");
        assert_eq!(c.rule, Rule::Identical);

        let c = check("sql.NullString", "sql.NullString", "row.Bio");
        assert_eq!(c.expr, "row.Bio");
        assert_eq!(c.rule, Rule::Identical);
    }

    #[test]
    fn test_rewrap_same_primitive_copies_validity() {
        let vocab = vocab().with_wrapper(NullableWrapper::new("pgtype.Text", "string", "String"));
        let c = convert(&vocab, "Bio", "pgtype.Text", "sql.NullString", "src.Bio");
        assert_eq!(
            c.to_string(),
            "Bio: pgtype.Text{String: src.Bio.String, Valid: src.Bio.Valid}"
        );
        assert_eq!(c.rule, Rule::RewrapNullable);
    }

    #[test]
    fn test_rewrap_different_primitive_casts_payload() {
        let c = convert(&vocab(), "Count", "sql.NullInt64", "sql.NullInt32", "src.Count");
        assert_eq!(
            c.to_string(),
            "Count: sql.NullInt64{Int64: int64(src.Count.Int32), Valid: src.Count.Valid}"
        );
        assert_eq!(c.rule, Rule::RewrapNullable);
    }

    #[test]
    fn test_wrap_primitive_forces_validity() {
        let c = convert(&vocab(), "Bio", "sql.NullString", "string", "user.Bio");
        assert_eq!(c.to_string(), "Bio: sql.NullString{String: user.Bio, Valid: true}");

        let c = convert(&vocab(), "Age", "sql.NullInt64", "int64", "user.Age");
        assert_eq!(c.to_string(), "Age: sql.NullInt64{Int64: user.Age, Valid: true}");
        assert!(!c.expr.contains("user.Age.Valid"));
    }

    #[test]
    fn test_wrap_primitive_casts_mismatched_payload() {
        let c = check("sql.NullInt64", "int32", "arg.Size");
        assert_eq!(c.expr, "sql.NullInt64{Int64: int64(arg.Size), Valid: true}");
        assert_eq!(c.rule, Rule::WrapPrimitive);
    }

    #[test]
    fn test_unwrap_nullable() {
        let c = convert(&vocab(), "Bio", "string", "sql.NullString", "row.Bio");
        assert_eq!(c.to_string(), "Bio: row.Bio.String");
        assert_eq!(c.rule, Rule::UnwrapNullable);

        let c = check("int32", "sql.NullInt64", "row.Count");
        assert_eq!(c.expr, "int32(row.Count.Int64)");
    }

    #[test]
    fn test_aggregate_targets_pass_through() {
        for target in ["User", "[]User", "Querier", "interface{}"] {
            let c = check(target, "int64", "row.X");
            assert_eq!(c.expr, "row.X", "target {}", target);
            assert_eq!(c.rule, Rule::Aggregate);
        }
    }

    #[test]
    fn test_opaque_to_wrapper_narrows() {
        let c = convert(&vocab(), "Bio", "sql.NullString", "interface{}", "row.Bio");
        assert_eq!(c.rule, Rule::NarrowOpaque);
        assert_eq!(
            c.expr,
            "func() sql.NullString {\n\
             \tif row.Bio == nil {\n\
             \t\treturn sql.NullString{}\n\
             \t}\n\
             \tv, ok := row.Bio.(string)\n\
             \tif !ok {\n\
             \t\treturn sql.NullString{}\n\
             \t}\n\
             \treturn sql.NullString{String: v, Valid: true}\n\
             }()"
        );
    }

    #[test]
    fn test_opaque_to_wrapper_never_marks_absent_valid() {
        let c = check("sql.NullTime", "any", "row.At");
        let zero_paths = c.expr.matches("return sql.NullTime{}").count();
        assert_eq!(zero_paths, 2);
        assert_eq!(c.expr.matches("Valid: true").count(), 1);
    }

    #[test]
    fn test_fallback_cast() {
        let c = convert(&vocab(), "Size", "int64", "int32", "arg.Size");
        assert_eq!(c.to_string(), "Size: int64(arg.Size)");
        assert_eq!(c.rule, Rule::Cast);
    }

    #[test]
    fn test_unknown_wrapper_falls_back_to_cast() {
        let c = check("string", "pgtype.Text", "row.N");
        assert_eq!(c.expr, "string(row.N)");
        assert_eq!(c.rule, Rule::Cast);
    }

    #[test]
    fn test_nest_indents_continuation_lines() {
        assert_eq!(nest("a{\n\tb\n}"), "a{\n\t\tb\n\t}");
        assert_eq!(nest("single"), "single");
    }
}
