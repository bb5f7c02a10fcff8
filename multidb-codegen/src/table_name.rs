//! Storage-name resolution for domain types.

use multidb_core::pluralize;
use multidb_model::MethodSignature;

/// Verbs whose methods are searched first, in priority order.
const VERBS: &[&str] = &["Create", "Update", "Get", "Delete"];

/// SQL clauses that name a table, in priority order.
const CLAUSES: &[&str] = &["INSERT INTO ", "UPDATE ", "DELETE FROM ", "FROM "];

/// Resolve the table a domain type is stored in.
///
/// Methods named `<Verb><Type>...` are searched first (verbs in
/// [`VERBS`] order), then any method mentioning the type. The first
/// documentation line containing a table clause wins. Without a match, the
/// lower-cased plural of the type name is used.
///
/// ```
/// use multidb_codegen::table_name::resolve_table;
/// use multidb_model::MethodSignature;
///
/// let create = MethodSignature::new("CreateWidget")
///     .with_doc("// INSERT INTO widgets (name) VALUES (?)");
/// assert_eq!(resolve_table("Widget", [&create]), "widgets");
/// assert_eq!(resolve_table("Person", &[] as &[MethodSignature]), "people");
/// ```
pub fn resolve_table<'a, I>(record: &str, methods: I) -> String
where
    I: IntoIterator<Item = &'a MethodSignature>,
{
    let methods: Vec<&MethodSignature> = methods.into_iter().collect();

    let prefixed = VERBS.iter().flat_map(|verb| {
        let prefix = format!("{}{}", verb, record);
        methods
            .iter()
            .copied()
            .filter(move |m| m.name.starts_with(&prefix))
    });
    let mentioning = methods.iter().copied().filter(|m| m.name.contains(record));

    prefixed
        .chain(mentioning)
        .find_map(|m| table_from_docs(&m.docs))
        .unwrap_or_else(|| pluralize(record).to_lowercase())
}

/// Find the first table clause in a method's documentation.
fn table_from_docs(docs: &[String]) -> Option<String> {
    docs.iter().find_map(|line| {
        let upper = line.to_uppercase();
        CLAUSES.iter().find_map(|clause| {
            let start = find_clause(&upper, clause)? + clause.len();
            let word = upper[start..].split_whitespace().next()?;
            let name = table_ident(word, *clause == "INSERT INTO ");
            (!name.is_empty()).then_some(name)
        })
    })
}

/// Position of `clause` in `text`, starting on a word boundary.
fn find_clause(text: &str, clause: &str) -> Option<usize> {
    text.match_indices(clause).map(|(i, _)| i).find(|&i| {
        text[..i]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric() && c != '_')
    })
}

fn table_ident(word: &str, is_insert: bool) -> String {
    let word = if is_insert {
        word.split('(').next().unwrap_or(word)
    } else {
        word
    };
    word.trim_matches(|c: char| matches!(c, '(' | ')' | '"' | '`' | ';' | ','))
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, doc: &str) -> MethodSignature {
        MethodSignature::new(name).with_doc(doc)
    }

    #[test]
    fn test_insert_clause() {
        let m = method("CreateWidget", "// INSERT INTO widgets (id, name) VALUES (?, ?)");
        assert_eq!(resolve_table("Widget", [&m]), "widgets");
    }

    #[test]
    fn test_insert_clause_without_space_before_columns() {
        let m = method("CreateWidget", "// insert into Widgets(id) values ($1)");
        assert_eq!(resolve_table("Widget", [&m]), "widgets");
    }

    #[test]
    fn test_quoted_identifiers_are_unquoted() {
        let m = method("UpdateWidget", "// UPDATE \"widget_store\" SET name = ?");
        assert_eq!(resolve_table("Widget", [&m]), "widget_store");
    }

    #[test]
    fn test_verb_priority() {
        let get = method("GetWidget", "// SELECT * FROM widget_view WHERE id = ?");
        let delete = method("DeleteWidget", "// DELETE FROM widget_rows WHERE id = ?");
        let create = method("CreateWidget", "// INSERT INTO widgets (id) VALUES (?)");
        assert_eq!(resolve_table("Widget", [&get, &delete, &create]), "widgets");
        assert_eq!(resolve_table("Widget", [&delete, &get]), "widget_view");
    }

    #[test]
    fn test_mentioning_methods_are_a_second_pass() {
        let list = method("ListWidgets", "// SELECT id FROM gadgets");
        assert_eq!(resolve_table("Widget", [&list]), "gadgets");
    }

    #[test]
    fn test_clause_must_start_a_word() {
        let m = method("GetWidget", "// SELECT last_update FROM widgets");
        assert_eq!(resolve_table("Widget", [&m]), "widgets");
    }

    #[test]
    fn test_fallback_pluralizes() {
        let undocumented = MethodSignature::new("GetCategory");
        assert_eq!(resolve_table("Category", [&undocumented]), "categories");
        let none: &[MethodSignature] = &[];
        assert_eq!(resolve_table("NarFile", none), "narfiles");
        assert_eq!(resolve_table("Person", none), "people");
    }
}
