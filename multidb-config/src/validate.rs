//! Identifier checks and span lookup for config validation.

use miette::SourceSpan;

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Validate that a name can be used as a Go identifier.
/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name cannot be empty"),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        Some(_) => return Some("name must start with a letter or underscore"),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("name contains invalid characters");
    }
    if GO_KEYWORDS.contains(&name) {
        return Some("name is a Go reserved keyword");
    }
    None
}

/// Span of the `nth` (0-based) quoted occurrence of `value`, excluding quotes.
pub(crate) fn find_value_span(src: &str, value: &str, nth: usize) -> Option<SourceSpan> {
    let needle = format!("\"{}\"", value);
    src.match_indices(&needle)
        .nth(nth)
        .map(|(pos, _)| SourceSpan::from((pos + 1, value.len())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert_eq!(validate_identifier("sqlitedb"), None);
        assert_eq!(validate_identifier("_x1"), None);
        assert!(validate_identifier("").is_some());
        assert!(validate_identifier("1db").is_some());
        assert!(validate_identifier("my-db").is_some());
        assert!(validate_identifier("type").is_some());
    }

    #[test]
    fn test_find_value_span() {
        let src = r#"name = "sqlite"
other = "sqlite""#;
        assert_eq!(find_value_span(src, "sqlite", 0), Some((8, 6).into()));
        assert_eq!(find_value_span(src, "sqlite", 1), Some((25, 6).into()));
        assert_eq!(find_value_span(src, "sqlite", 2), None);
    }
}
