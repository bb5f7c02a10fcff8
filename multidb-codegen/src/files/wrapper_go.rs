use multidb_core::{GeneratedFile, to_pascal_case};
use multidb_model::EngineDescriptor;

use super::go_source;
use crate::builder::{CodeBuilder, ImportTable};

/// One engine's adapter: the wrapper type, its constructor and a method per
/// canonical method.
pub struct WrapperGo {
    prefix: String,
    package: String,
    table: ImportTable,
    engine: EngineDescriptor,
    interface: String,
    methods: Vec<String>,
}

impl WrapperGo {
    pub fn new(
        prefix: impl Into<String>,
        package: impl Into<String>,
        table: ImportTable,
        engine: EngineDescriptor,
        interface: impl Into<String>,
        methods: Vec<String>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            package: package.into(),
            table,
            engine,
            interface: interface.into(),
            methods,
        }
    }

    /// `New<Engine><Interface>`, e.g. `NewSqliteQuerier`.
    pub fn constructor_name(&self) -> String {
        format!("New{}{}", to_pascal_case(&self.engine.name), self.interface)
    }
}

impl GeneratedFile for WrapperGo {
    fn file_name(&self) -> String {
        format!("{}wrapper_{}.go", self.prefix, self.engine.name)
    }

    fn render(&self) -> String {
        let wrapper = self.engine.wrapper_type();
        let adapter = format!("*{}.Adapter", self.engine.package);

        let mut body = CodeBuilder::go()
            .block(&format!("type {} struct {{", wrapper), "}", |b| {
                b.line(&format!("adapter {}", adapter))
            })
            .blank()
            .line(&format!("var _ {} = (*{})(nil)", self.interface, wrapper))
            .blank()
            .line(&format!(
                "// {} wraps a {} adapter as a {}.",
                self.constructor_name(),
                self.engine.name,
                self.interface
            ))
            .block(
                &format!(
                    "func {}(adapter {}) {} {{",
                    self.constructor_name(),
                    adapter,
                    self.interface
                ),
                "}",
                |b| b.line(&format!("return &{}{{adapter: adapter}}", wrapper)),
            )
            .build();

        for method in &self.methods {
            body.push('\n');
            body.push_str(method);
        }
        go_source(&self.package, &self.table, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_file() {
        let table = ImportTable::standard().with("sqlitedb", "example.com/app/database/sqlitedb");
        let file = WrapperGo::new(
            "generated_",
            "database",
            table,
            EngineDescriptor::new("sqlite", "sqlitedb"),
            "Querier",
            vec![
                "func (w *sqliteWrapper) Ping(ctx context.Context) error {\n\treturn w.adapter.Ping(ctx)\n}\n"
                    .to_string(),
            ],
        );

        assert_eq!(file.file_name(), "generated_wrapper_sqlite.go");
        assert_eq!(file.constructor_name(), "NewSqliteQuerier");
        assert_eq!(
            file.render(),
            "// Code generated by multidb. DO NOT EDIT.\n\n\
             package database\n\n\
             import (\n\
             \t\"context\"\n\n\
             \t\"example.com/app/database/sqlitedb\"\n\
             )\n\n\
             type sqliteWrapper struct {\n\
             \tadapter *sqlitedb.Adapter\n\
             }\n\n\
             var _ Querier = (*sqliteWrapper)(nil)\n\n\
             // NewSqliteQuerier wraps a sqlite adapter as a Querier.\n\
             func NewSqliteQuerier(adapter *sqlitedb.Adapter) Querier {\n\
             \treturn &sqliteWrapper{adapter: adapter}\n\
             }\n\n\
             func (w *sqliteWrapper) Ping(ctx context.Context) error {\n\
             \treturn w.adapter.Ping(ctx)\n\
             }\n"
        );
    }
}
