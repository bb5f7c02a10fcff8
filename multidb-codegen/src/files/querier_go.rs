use multidb_core::GeneratedFile;
use multidb_model::Model;

use super::go_source;
use crate::builder::{CodeBuilder, ImportTable};

/// The canonical interface, after synthesis.
pub struct QuerierGo {
    prefix: String,
    package: String,
    table: ImportTable,
    body: String,
}

impl QuerierGo {
    pub fn new(
        prefix: impl Into<String>,
        package: impl Into<String>,
        table: ImportTable,
        interface: &str,
        model: &Model,
    ) -> Self {
        let body = CodeBuilder::go()
            .block(&format!("type {} interface {{", interface), "}", |b| {
                b.each(model.methods(), |b, method| {
                    let signature = method.returns_signature();
                    let line = if signature.is_empty() {
                        format!("{}({})", method.name, method.params_signature())
                    } else {
                        format!("{}({}) {}", method.name, method.params_signature(), signature)
                    };
                    b.each(&method.docs, |b, doc| b.line(doc)).line(&line)
                })
            })
            .build();

        Self {
            prefix: prefix.into(),
            package: package.into(),
            table,
            body,
        }
    }
}

impl GeneratedFile for QuerierGo {
    fn file_name(&self) -> String {
        format!("{}querier.go", self.prefix)
    }

    fn render(&self) -> String {
        go_source(&self.package, &self.table, &self.body)
    }
}

#[cfg(test)]
mod tests {
    use multidb_model::MethodSignature;

    use super::*;

    #[test]
    fn test_interface_keeps_docs_and_order() {
        let mut model = Model::new();
        model.insert_method(
            MethodSignature::new("ListUsers")
                .with_param("ctx", "context.Context")
                .with_return("[]User")
                .with_return("error"),
        );
        model.insert_method(
            MethodSignature::new("CreateUsers")
                .with_param("ctx", "context.Context")
                .with_param("arg", "CreateUsersParams")
                .with_return("error")
                .with_doc("// CreateUsers inserts a batch.")
                .with_doc("// @bulk-for CreateUser"),
        );
        model.insert_method(MethodSignature::new("Ping"));

        let file = QuerierGo::new(
            "generated_",
            "database",
            ImportTable::standard(),
            "Querier",
            &model,
        );
        assert_eq!(file.file_name(), "generated_querier.go");
        assert_eq!(
            file.render(),
            "// Code generated by multidb. DO NOT EDIT.\n\n\
             package database\n\n\
             import (\n\
             \t\"context\"\n\
             )\n\n\
             type Querier interface {\n\
             \t// CreateUsers inserts a batch.\n\
             \t// @bulk-for CreateUser\n\
             \tCreateUsers(ctx context.Context, arg CreateUsersParams) error\n\
             \tListUsers(ctx context.Context) ([]User, error)\n\
             \tPing()\n\
             }\n"
        );
    }
}
