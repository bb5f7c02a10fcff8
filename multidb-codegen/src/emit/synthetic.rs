//! Raw row queries for synthesized accessors the engine does not provide.

use multidb_core::to_snake_case;
use multidb_model::{Field, MethodSignature};

use super::EngineEmitter;
use crate::builder::CodeBuilder;
use crate::error::{CodegenError, Result};
use crate::table_name::resolve_table;

/// Column a field is stored in: its `json` or `db` tag name, else the
/// snake_case field name.
pub fn column_name(field: &Field) -> String {
    field
        .tag_value("json")
        .or_else(|| field.tag_value("db"))
        .map(str::to_string)
        .unwrap_or_else(|| to_snake_case(&field.name))
}

/// Escape text for a Go interpreted string literal.
fn go_string(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

impl EngineEmitter<'_> {
    /// `SELECT <columns> FROM <table> WHERE <id> = <placeholder>` against the
    /// adapter's `DB()` handle, scanning into the canonical record.
    pub(super) fn emit_raw_query(&self, method: &MethodSignature) -> Result<String> {
        let record_name = method.value_type().unwrap_or_default();
        let record = self.canonical.record(record_name).ok_or_else(|| {
            Box::new(CodegenError::UnknownRecord {
                method: method.name.clone(),
                name: record_name.to_string(),
            })
        })?;

        let table = resolve_table(record_name, self.canonical.methods());
        let columns: Vec<String> = record
            .fields
            .iter()
            .map(|f| self.engine.quote_ident(&column_name(f)))
            .collect();
        let id_column = record
            .field("ID")
            .map(column_name)
            .unwrap_or_else(|| "id".to_string());
        let query = format!(
            "SELECT {} FROM {} WHERE {} = {}",
            columns.join(", "),
            self.engine.quote_ident(&table),
            self.engine.quote_ident(&id_column),
            self.engine.placeholder.placeholder(1)
        );

        let ctx = self.ctx_name(method);
        let id = method
            .params
            .iter()
            .find(|p| p.ty != "context.Context")
            .map_or("id", |p| p.name.as_str());
        let scan: Vec<String> = record
            .fields
            .iter()
            .map(|f| format!("&res.{}", f.name))
            .collect();
        let zero = self.zero_returns(method, "err");

        Ok(CodeBuilder::go()
            .line(&format!(
                "row := w.adapter.DB().QueryRowContext({}, {}, {})",
                ctx,
                go_string(&query),
                id
            ))
            .line(&format!("var res {}", record_name))
            .block(
                &format!("if err := row.Scan({}); err != nil {{", scan.join(", ")),
                "}",
                |b| {
                    b.block("if errors.Is(err, sql.ErrNoRows) {", "}", |b| {
                        b.line(&self.zero_returns(method, "ErrNotFound"))
                    })
                    .line(&zero)
                },
            )
            .line(&self.returns_with(method, "res", "nil"))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use multidb_model::{
        EngineDescriptor, Field, MethodSignature, PlaceholderStyle, QuoteStyle, RecordType,
    };

    use super::*;
    use crate::emit::tests::Fixture;

    fn fixture(engine: EngineDescriptor) -> Fixture {
        let mut fixture = Fixture::new()
            .canonical(
                MethodSignature::new("GetTagByID")
                    .with_param("ctx", "context.Context")
                    .with_param("id", "int64")
                    .with_return("Tag")
                    .with_return("error")
                    .synthetic(),
            )
            .canonical(
                MethodSignature::new("CreateTag")
                    .with_doc("// INSERT INTO tags (name) VALUES (?)"),
            )
            .canonical_type(
                RecordType::new("Tag")
                    .with_field(Field::new("ID", "int64"))
                    .with_field(Field::new("Name", "string").with_tag("json:\"label\""))
                    .with_field(Field::new("CreatedAt", "time.Time")),
            );
        fixture.engine = engine;
        fixture
    }

    #[test]
    fn test_raw_query_sqlite() {
        let out = fixture(EngineDescriptor::new("sqlite", "sqlitedb")).emit("GetTagByID");

        assert_eq!(
            out,
            "func (w *sqliteWrapper) GetTagByID(ctx context.Context, id int64) (Tag, error) {\n\
             \trow := w.adapter.DB().QueryRowContext(ctx, \"SELECT \\\"id\\\", \\\"label\\\", \\\"created_at\\\" FROM \\\"tags\\\" WHERE \\\"id\\\" = ?\", id)\n\
             \tvar res Tag\n\
             \tif err := row.Scan(&res.ID, &res.Name, &res.CreatedAt); err != nil {\n\
             \t\tif errors.Is(err, sql.ErrNoRows) {\n\
             \t\t\treturn Tag{}, ErrNotFound\n\
             \t\t}\n\
             \t\treturn Tag{}, err\n\
             \t}\n\
             \treturn res, nil\n\
             }\n"
        );
    }

    #[test]
    fn test_raw_query_dialects() {
        let postgres = EngineDescriptor::new("postgres", "postgresdb")
            .with_placeholder(PlaceholderStyle::Dollar);
        let out = fixture(postgres).emit("GetTagByID");
        assert!(out.contains("WHERE \\\"id\\\" = $1\", id)"));

        let mysql = EngineDescriptor::new("mysql", "mysqldb").with_quote(QuoteStyle::Backtick);
        let out = fixture(mysql).emit("GetTagByID");
        assert!(out.contains("\"SELECT `id`, `label`, `created_at` FROM `tags` WHERE `id` = ?\""));
    }

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(&Field::new("CreatedAt", "time.Time")), "created_at");
        assert_eq!(
            column_name(&Field::new("Name", "string").with_tag("db:\"tag_name\"")),
            "tag_name"
        );
        assert_eq!(
            column_name(&Field::new("Name", "string").with_tag("json:\"-\"")),
            "name"
        );
    }

    #[test]
    fn test_go_string_escapes() {
        assert_eq!(go_string("a \"b\" \\c"), "\"a \\\"b\\\" \\\\c\"");
    }
}
