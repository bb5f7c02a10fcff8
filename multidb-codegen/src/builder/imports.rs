//! Import collection for generated Go files.

use std::collections::BTreeMap;

use indexmap::IndexMap;

/// Package qualifiers the generator knows how to import, e.g. `sql` ->
/// `database/sql`.
#[derive(Debug, Clone)]
pub struct ImportTable {
    known: IndexMap<String, String>,
}

impl ImportTable {
    /// Qualifiers of the standard-library packages generated code touches.
    pub fn standard() -> Self {
        [
            ("context", "context"),
            ("sql", "database/sql"),
            ("errors", "errors"),
            ("fmt", "fmt"),
            ("json", "encoding/json"),
            ("time", "time"),
        ]
        .into_iter()
        .fold(Self::empty(), |table, (qualifier, path)| {
            table.with(qualifier, path)
        })
    }

    pub fn empty() -> Self {
        Self {
            known: IndexMap::new(),
        }
    }

    /// Register (or replace) the import path for a qualifier.
    pub fn with(mut self, qualifier: impl Into<String>, path: impl Into<String>) -> Self {
        self.known.insert(qualifier.into(), path.into());
        self
    }

    pub fn resolve(&self, qualifier: &str) -> Option<&str> {
        self.known.get(qualifier).map(String::as_str)
    }
}

/// Tracks the imports a generated file needs.
///
/// Paths are kept sorted for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    /// Import path -> alias, when the qualifier differs from the last path
    /// segment.
    imports: BTreeMap<String, Option<String>>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an import path under the given qualifier.
    pub fn add(&mut self, qualifier: &str, path: &str) {
        let last_segment = path.rsplit('/').next().unwrap_or(path);
        let alias = (last_segment != qualifier).then(|| qualifier.to_string());
        self.imports.insert(path.to_string(), alias);
    }

    /// Import every known package that `code` refers to by qualifier.
    ///
    /// String literals and comments are ignored, so table names inside
    /// queries never pull in an import.
    pub fn scan(&mut self, code: &str, table: &ImportTable) {
        for qualifier in qualifiers(code) {
            if let Some(path) = table.resolve(qualifier) {
                self.add(qualifier, path);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.imports.len()
    }

    pub fn has_path(&self, path: &str) -> bool {
        self.imports.contains_key(path)
    }

    /// Render a grouped import block: standard library first, then
    /// everything else.
    pub fn render(&self) -> String {
        if self.imports.is_empty() {
            return String::new();
        }

        let (std, external): (Vec<_>, Vec<_>) = self
            .imports
            .iter()
            .partition(|(path, _)| !path.split('/').next().unwrap_or("").contains('.'));

        let spec = |(path, alias): (&String, &Option<String>)| match alias {
            Some(alias) => format!("\t{} \"{}\"\n", alias, path),
            None => format!("\t\"{}\"\n", path),
        };

        let mut out = String::from("import (\n");
        out.extend(std.into_iter().map(spec));
        if !out.ends_with("(\n") && !external.is_empty() {
            out.push('\n');
        }
        out.extend(external.into_iter().map(spec));
        out.push_str(")\n");
        out
    }
}

/// First segments of every `a.b` selector in `code`, outside literals and
/// comments.
fn qualifiers(code: &str) -> Vec<&str> {
    let bytes = code.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'`' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'`' {
                    i += 1;
                }
                i += 1;
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let is_selector_head = (start == 0 || bytes[start - 1] != b'.')
                    && bytes.get(i) == Some(&b'.')
                    && bytes
                        .get(i + 1)
                        .is_some_and(|c| c.is_ascii_alphabetic() || *c == b'_');
                if is_selector_head {
                    found.push(&code[start..i]);
                }
            }
            _ => i += 1,
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_known_qualifiers() {
        let table = ImportTable::standard().with("sqlitedb", "example.com/db/sqlitedb");
        let mut imports = ImportCollector::new();
        imports.scan(
            "func (w *w) Get(ctx context.Context) (sql.NullString, error) {\n\
             \treturn w.adapter.Get(ctx, sqlitedb.Params{})\n}",
            &table,
        );

        assert!(imports.has_path("context"));
        assert!(imports.has_path("database/sql"));
        assert!(imports.has_path("example.com/db/sqlitedb"));
        assert_eq!(imports.len(), 3);
    }

    #[test]
    fn test_scan_ignores_literals_and_comments() {
        let table = ImportTable::standard();
        let mut imports = ImportCollector::new();
        imports.scan(
            "q := \"SELECT time.x FROM t\"\n// fmt.Println\nr := `errors.New`",
            &table,
        );
        assert!(imports.is_empty());
    }

    #[test]
    fn test_nested_selectors_are_not_qualifiers() {
        let table = ImportTable::standard().with("adapter", "x/adapter");
        let mut imports = ImportCollector::new();
        imports.scan("w.adapter.Close()", &table);
        assert!(imports.is_empty());
    }

    #[test]
    fn test_render_groups() {
        let mut imports = ImportCollector::new();
        imports.add("sqlitedb", "github.com/acme/app/db/sqlitedb");
        imports.add("sql", "database/sql");
        imports.add("context", "context");
        imports.add("pgx", "github.com/jackc/pgx/v5");

        assert_eq!(
            imports.render(),
            "import (\n\t\"context\"\n\t\"database/sql\"\n\n\t\"github.com/acme/app/db/sqlitedb\"\n\tpgx \"github.com/jackc/pgx/v5\"\n)\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(ImportCollector::new().render(), "");
    }
}
