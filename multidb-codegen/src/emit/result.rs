//! Delegating method bodies: result binding, error mapping and value
//! conversion back into canonical types.

use multidb_model::{COLLECTION_PREFIX, Category, MethodSignature, element_type};

use super::EngineEmitter;
use crate::builder::CodeBuilder;
use crate::convert::{convert, nest};
use crate::error::Result;
use crate::synthesize::get_by_id_name;

impl EngineEmitter<'_> {
    /// `return ...` following the canonical result shape, with `value` in the
    /// value slot and `err` in the error slot.
    pub(super) fn returns_with(&self, method: &MethodSignature, value: &str, err: &str) -> String {
        if method.returns.is_empty() {
            return "return".to_string();
        }
        let values: Vec<String> = method
            .returns
            .iter()
            .map(|r| {
                if r.is_error {
                    err.to_string()
                } else if r.is_value {
                    value.to_string()
                } else {
                    self.zero_value(&r.ty)
                }
            })
            .collect();
        format!("return {}", values.join(", "))
    }

    /// `return` of zero values with `err` in the error slot.
    pub(super) fn zero_returns(&self, method: &MethodSignature, err: &str) -> String {
        let zero = method
            .value_type()
            .map(|ty| self.zero_value(ty))
            .unwrap_or_default();
        self.returns_with(method, &zero, err)
    }

    /// Left-hand side binding an engine call's results: `res` for the value,
    /// `err` for the error, `_` for the rest. `None` when nothing is kept.
    fn bind(target: &MethodSignature, keep_value: bool, keep_err: bool) -> Option<String> {
        let names: Vec<&str> = target
            .returns
            .iter()
            .map(|r| match (r.is_value, r.is_error) {
                (true, _) if keep_value => "res",
                (_, true) if keep_err => "err",
                _ => "_",
            })
            .collect();
        names.iter().any(|n| *n != "_").then(|| names.join(", "))
    }

    /// Methods returning the interface itself wrap the engine's scoped
    /// adapter. A nil adapter is a lookup miss, never a generic error.
    pub(super) fn emit_return_self(&self, method: &MethodSignature) -> Result<String> {
        let counterpart = self.target.method(&method.name);
        let call = self.call_expr(method, counterpart.unwrap_or(method))?;
        let with_err = counterpart.is_some_and(|t| t.returns_error()) && method.returns_error();

        let b = if with_err {
            CodeBuilder::go()
                .lines(&format!("res, err := {}", call))
                .block("if err != nil {", "}", |b| {
                    b.line(&self.returns_with(method, "nil", "err"))
                })
        } else {
            CodeBuilder::go().lines(&format!("res := {}", call))
        };

        Ok(b
            .block("if res == nil {", "}", |b| {
                b.line(&self.returns_with(method, "nil", "ErrNotFound"))
            })
            .line(&self.returns_with(
                method,
                &format!("&{}{{adapter: res}}", self.engine.wrapper_type()),
                "nil",
            ))
            .build())
    }

    /// Call the engine method of the same name and convert its results.
    pub(super) fn emit_delegate(
        &self,
        method: &MethodSignature,
        target: &MethodSignature,
    ) -> Result<String> {
        let call = self.call_expr(method, target)?;

        if method.returns.is_empty() {
            return Ok(CodeBuilder::go().lines(&call).build());
        }
        if method.returns_only_error() {
            return Ok(self.emit_error_only(target, &call));
        }
        if let Some(body) = self.emit_create_reread(method, target, &call) {
            return Ok(body);
        }
        if let Some(body) = self.emit_update_reread(method, target, &call) {
            return Ok(body);
        }
        Ok(self.emit_converted(method, target, &call))
    }

    fn emit_error_only(&self, target: &MethodSignature, call: &str) -> String {
        if target.returns_only_error() {
            return CodeBuilder::go().lines(&format!("return {}", call)).build();
        }
        let b = match Self::bind(target, false, true) {
            Some(lhs) => CodeBuilder::go()
                .lines(&format!("{} := {}", lhs, call))
                .line("return err"),
            None => CodeBuilder::go().lines(call).line("return nil"),
        };
        b.build()
    }

    /// Creating methods whose engine counterpart only reports `sql.Result`
    /// (no RETURNING) re-read the row by its last insert id.
    fn emit_create_reread(
        &self,
        method: &MethodSignature,
        target: &MethodSignature,
        call: &str,
    ) -> Option<String> {
        if !method.is_create || target.value_type() != Some("sql.Result") {
            return None;
        }
        let getter = self.reread_accessor(method)?;
        let zero = self.zero_returns(method, "err");
        let lhs = Self::bind(target, true, true)?;

        Some(
            CodeBuilder::go()
                .lines(&format!("{} := {}", lhs, call))
                .block("if err != nil {", "}", |b| b.line(&zero))
                .line("id, err := res.LastInsertId()")
                .block("if err != nil {", "}", |b| b.line(&zero))
                .line(&format!(
                    "return w.{}({}, id)",
                    getter,
                    self.ctx_name(method)
                ))
                .build(),
        )
    }

    /// Updating methods whose engine counterpart returns only an error
    /// re-read the updated row by id.
    fn emit_update_reread(
        &self,
        method: &MethodSignature,
        target: &MethodSignature,
        call: &str,
    ) -> Option<String> {
        if !method.is_update || !target.returns_only_error() || !self.carries_id(target) {
            return None;
        }
        let getter = self.reread_accessor(method)?;
        let id = self.id_expr(method)?;
        let zero = self.zero_returns(method, "err");

        Some(
            CodeBuilder::go()
                .lines(&format!("if err := {}; err != nil {{", call))
                .indent()
                .line(&zero)
                .dedent()
                .line("}")
                .line(&format!(
                    "return w.{}({}, {})",
                    getter,
                    self.ctx_name(method),
                    id
                ))
                .build(),
        )
    }

    /// The canonical by-id accessor returning the same shape as `method`.
    fn reread_accessor(&self, method: &MethodSignature) -> Option<String> {
        let value = method.value_type()?;
        let name = get_by_id_name(value);
        let getter = self.canonical.method(&name)?;
        let same_shape = getter.returns_signature() == method.returns_signature()
            && getter.params.len() == 2;
        same_shape.then_some(name)
    }

    /// True when the engine call's bundle (or parameter list) carries an id.
    fn carries_id(&self, target: &MethodSignature) -> bool {
        target.params.iter().any(|p| {
            p.name.eq_ignore_ascii_case("id")
                || self
                    .target
                    .record(&p.ty)
                    .is_some_and(|bundle| bundle.has_field("ID"))
        })
    }

    /// Expression yielding the `int64` id of the row a method updates.
    fn id_expr(&self, method: &MethodSignature) -> Option<String> {
        method.params.iter().find_map(|p| {
            if p.name.eq_ignore_ascii_case("id") {
                return Some(convert(self.vocab, "id", "int64", &p.ty, &p.name).expr);
            }
            let field = self.canonical.record(&p.ty)?.field("ID")?;
            Some(convert(self.vocab, "id", "int64", &field.ty, &format!("{}.ID", p.name)).expr)
        })
    }

    /// Bind the engine results, map errors, and convert the value into the
    /// canonical type.
    fn emit_converted(
        &self,
        method: &MethodSignature,
        target: &MethodSignature,
        call: &str,
    ) -> String {
        let value_ty = method.value_type().unwrap_or_default();
        let is_collection = value_ty.starts_with(COLLECTION_PREFIX);
        let zero = self.zero_returns(method, "err");
        let keep_err = method.returns_error();

        let Some(engine_value) = target.value_type() else {
            // The engine reports nothing to convert; only its error is kept.
            let b = match Self::bind(target, false, keep_err) {
                Some(_) => CodeBuilder::go()
                    .lines(&format!("if err := {}; err != nil {{", call))
                    .indent()
                    .line(&zero)
                    .dedent()
                    .line("}"),
                None => CodeBuilder::go().lines(call),
            };
            return b
                .line(&self.returns_with(method, &self.zero_value(value_ty), "nil"))
                .build();
        };

        let lhs = Self::bind(target, true, keep_err).unwrap_or_else(|| "res".to_string());
        let b = CodeBuilder::go()
            .lines(&format!("{} := {}", lhs, call))
            .when(target.returns_error() && keep_err, |b| {
                b.block("if err != nil {", "}", |b| {
                    b.when(!is_collection, |b| {
                        b.block("if errors.Is(err, sql.ErrNoRows) {", "}", |b| {
                            b.line(&self.zero_returns(method, "ErrNotFound"))
                        })
                    })
                    .line(&zero)
                })
            });

        if self.vocab.classify(value_ty) == Category::DomainCollection {
            let element = element_type(value_ty);
            let engine_element = element_type(engine_value);
            return b
                .line(&format!("out := make({}, 0, len(res))", value_ty))
                .block("for _, r := range res {", "}", |b| {
                    b.lines(&format!(
                        "out = append(out, {})",
                        self.rebuild(element, engine_element, "r")
                    ))
                })
                .line(&self.returns_with(method, "out", "nil"))
                .build();
        }

        let value = self.rebuild(value_ty, engine_value, "res");
        b.lines(&self.returns_with(method, &value, "nil")).build()
    }

    /// Convert an engine value of type `from` into the canonical `to`,
    /// rebuilding domain records field by field.
    fn rebuild(&self, to: &str, from: &str, expr: &str) -> String {
        if self.vocab.classify(to) != Category::Domain {
            return convert(self.vocab, "", to, from, expr).expr;
        }
        let source = self.target.record(from.trim_start_matches('*'));
        let canonical = self.canonical.record(to);
        let (Some(source), Some(canonical)) = (source, canonical) else {
            return format!("{}({})", to, expr);
        };

        let fields: String = canonical
            .fields
            .iter()
            .filter_map(|field| {
                let engine_field = source.field(&field.name)?;
                let from_expr = format!("{}.{}", expr, engine_field.name);
                let value = match self.vocab.classify(&field.ty) {
                    Category::Domain => self.rebuild(&field.ty, &engine_field.ty, &from_expr),
                    Category::DomainCollection => {
                        self.rebuild_each(&field.ty, &engine_field.ty, &from_expr)
                    }
                    _ => {
                        convert(self.vocab, &field.name, &field.ty, &engine_field.ty, &from_expr)
                            .expr
                    }
                };
                Some(format!("\t{}: {},\n", field.name, nest(&value)))
            })
            .collect();
        if fields.is_empty() {
            return format!("{}{{}}", to);
        }
        format!("{}{{\n{}}}", to, fields)
    }

    /// A nested collection of records, converted element by element inside
    /// a function literal so it stays a single expression.
    fn rebuild_each(&self, to: &str, from: &str, expr: &str) -> String {
        let element = self.rebuild(element_type(to), element_type(from), "e");
        CodeBuilder::go()
            .block(&format!("func() {} {{", to), "}()", |b| {
                b.line(&format!("out := make({}, 0, len({}))", to, expr))
                    .block(&format!("for _, e := range {} {{", expr), "}", |b| {
                        b.lines(&format!("out = append(out, {})", element))
                    })
                    .line("return out")
            })
            .build()
            .trim_end()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use multidb_model::{Field, MethodSignature, RecordType};

    use crate::emit::tests::Fixture;

    fn user() -> RecordType {
        RecordType::new("User")
            .with_field(Field::new("ID", "int64"))
            .with_field(Field::new("Bio", "string"))
    }

    fn engine_user() -> RecordType {
        RecordType::new("User")
            .with_field(Field::new("ID", "int64"))
            .with_field(Field::new("Bio", "sql.NullString"))
    }

    fn get_user() -> MethodSignature {
        MethodSignature::new("GetUserByID")
            .with_param("ctx", "context.Context")
            .with_param("id", "int64")
            .with_return("User")
            .with_return("error")
    }

    fn with_tx() -> MethodSignature {
        MethodSignature::new("WithTx")
            .with_param("tx", "*sql.Tx")
            .with_return("Querier")
            .with_return("error")
    }

    #[test]
    fn test_return_self_failure_paths() {
        let fixture = Fixture::new().canonical(with_tx()).target(
            MethodSignature::new("WithTx")
                .with_param("tx", "*sql.Tx")
                .with_return("*Adapter")
                .with_return("error"),
        );

        let out = fixture.emit("WithTx");

        assert_eq!(
            out,
            "func (w *sqliteWrapper) WithTx(tx *sql.Tx) (Querier, error) {\n\
             \tres, err := w.adapter.WithTx(tx)\n\
             \tif err != nil {\n\
             \t\treturn nil, err\n\
             \t}\n\
             \tif res == nil {\n\
             \t\treturn nil, ErrNotFound\n\
             \t}\n\
             \treturn &sqliteWrapper{adapter: res}, nil\n\
             }\n"
        );
    }

    #[test]
    fn test_return_self_on_adapter_method() {
        let fixture = Fixture::new().canonical(with_tx());

        let out = fixture.emit("WithTx");

        assert!(out.contains("\tres := w.adapter.WithTx(tx)\n"));
        assert!(out.contains("return nil, ErrNotFound"));
        assert!(!out.contains("res, err"));
    }

    #[test]
    fn test_single_value_maps_no_rows() {
        let fixture = Fixture::new()
            .canonical(get_user())
            .canonical_type(user())
            .target(get_user())
            .target_type(engine_user());

        let out = fixture.emit("GetUserByID");

        assert_eq!(
            out,
            "func (w *sqliteWrapper) GetUserByID(ctx context.Context, id int64) (User, error) {\n\
             \tres, err := w.adapter.GetUserByID(ctx, id)\n\
             \tif err != nil {\n\
             \t\tif errors.Is(err, sql.ErrNoRows) {\n\
             \t\t\treturn User{}, ErrNotFound\n\
             \t\t}\n\
             \t\treturn User{}, err\n\
             \t}\n\
             \treturn User{\n\
             \t\tID: res.ID,\n\
             \t\tBio: res.Bio.String,\n\
             \t}, nil\n\
             }\n"
        );
    }

    #[test]
    fn test_collection_is_rebuilt_per_element() {
        let list = MethodSignature::new("ListUsers")
            .with_param("ctx", "context.Context")
            .with_return("[]User")
            .with_return("error");
        let fixture = Fixture::new()
            .canonical(list.clone())
            .canonical_type(user())
            .target(list)
            .target_type(engine_user());

        let out = fixture.emit("ListUsers");

        assert!(!out.contains("sql.ErrNoRows"));
        assert!(out.contains("\tout := make([]User, 0, len(res))\n"));
        assert!(out.contains("\tfor _, r := range res {\n\t\tout = append(out, User{\n"));
        assert!(out.contains("\t\t\tBio: r.Bio.String,\n"));
        assert!(out.contains("\treturn out, nil\n"));
    }

    #[test]
    fn test_error_only_delegation() {
        let delete = MethodSignature::new("DeleteUser")
            .with_param("ctx", "context.Context")
            .with_param("id", "int64")
            .with_return("error");
        let fixture = Fixture::new().canonical(delete.clone()).target(delete);

        assert!(
            fixture
                .emit("DeleteUser")
                .contains("\treturn w.adapter.DeleteUser(ctx, id)\n")
        );
    }

    #[test]
    fn test_error_only_discards_engine_value() {
        let fixture = Fixture::new()
            .canonical(
                MethodSignature::new("TouchUser")
                    .with_param("ctx", "context.Context")
                    .with_return("error"),
            )
            .target(
                MethodSignature::new("TouchUser")
                    .with_param("ctx", "context.Context")
                    .with_return("sql.Result")
                    .with_return("error"),
            );

        let out = fixture.emit("TouchUser");

        assert!(out.contains("\t_, err := w.adapter.TouchUser(ctx)\n\treturn err\n"));
    }

    #[test]
    fn test_create_rereads_by_last_insert_id() {
        let create = MethodSignature::new("CreateUser")
            .with_param("ctx", "context.Context")
            .with_param("bio", "string")
            .with_return("User")
            .with_return("error");
        let fixture = Fixture::new()
            .canonical(create)
            .canonical(get_user())
            .canonical_type(user())
            .target(
                MethodSignature::new("CreateUser")
                    .with_param("ctx", "context.Context")
                    .with_param("bio", "sql.NullString")
                    .with_return("sql.Result")
                    .with_return("error"),
            );

        let out = fixture.emit("CreateUser");

        assert_eq!(
            out,
            "func (w *sqliteWrapper) CreateUser(ctx context.Context, bio string) (User, error) {\n\
             \tres, err := w.adapter.CreateUser(ctx, sql.NullString{String: bio, Valid: true})\n\
             \tif err != nil {\n\
             \t\treturn User{}, err\n\
             \t}\n\
             \tid, err := res.LastInsertId()\n\
             \tif err != nil {\n\
             \t\treturn User{}, err\n\
             \t}\n\
             \treturn w.GetUserByID(ctx, id)\n\
             }\n"
        );
    }

    #[test]
    fn test_update_rereads_by_id() {
        let update = MethodSignature::new("UpdateUser")
            .with_param("ctx", "context.Context")
            .with_param("arg", "UpdateUserParams")
            .with_return("User")
            .with_return("error");
        let fixture = Fixture::new()
            .canonical(update)
            .canonical(get_user())
            .canonical_type(user())
            .canonical_type(
                RecordType::new("UpdateUserParams")
                    .with_field(Field::new("ID", "int32"))
                    .with_field(Field::new("Bio", "string")),
            )
            .target(
                MethodSignature::new("UpdateUser")
                    .with_param("ctx", "context.Context")
                    .with_param("arg", "UpdateUserParams")
                    .with_return("error"),
            )
            .target_type(
                RecordType::new("UpdateUserParams")
                    .with_field(Field::new("ID", "int64"))
                    .with_field(Field::new("Bio", "sql.NullString")),
            );

        let out = fixture.emit("UpdateUser");

        assert!(out.contains("\tif err := w.adapter.UpdateUser(ctx, sqlitedb.UpdateUserParams{\n"));
        assert!(out.contains("\t\tID: int64(arg.ID),\n"));
        assert!(out.contains("\t}); err != nil {\n\t\treturn User{}, err\n\t}\n"));
        assert!(out.contains("\treturn w.GetUserByID(ctx, int64(arg.ID))\n"));
    }

    #[test]
    fn test_embedded_records_are_rebuilt() {
        let row = || {
            RecordType::new("GetUserWithTeamRow")
                .with_field(Field::new("User", "User"))
                .with_field(Field::new("TeamName", "string"))
                .with_field(Field::new("Members", "[]User"))
        };
        let method = MethodSignature::new("GetUserWithTeam")
            .with_param("ctx", "context.Context")
            .with_param("id", "int64")
            .with_return("GetUserWithTeamRow")
            .with_return("error");
        let fixture = Fixture::new()
            .canonical(method.clone())
            .canonical_type(user())
            .canonical_type(row())
            .target(method)
            .target_type(engine_user())
            .target_type(row());

        let out = fixture.emit("GetUserWithTeam");

        assert!(!out.contains("User: res.User,"));
        assert!(out.contains(
            "\treturn GetUserWithTeamRow{\n\
             \t\tUser: User{\n\
             \t\t\tID: res.User.ID,\n\
             \t\t\tBio: res.User.Bio.String,\n\
             \t\t},\n\
             \t\tTeamName: res.TeamName,\n\
             \t\tMembers: func() []User {\n\
             \t\t\tout := make([]User, 0, len(res.Members))\n\
             \t\t\tfor _, e := range res.Members {\n\
             \t\t\t\tout = append(out, User{\n\
             \t\t\t\t\tID: e.ID,\n\
             \t\t\t\t\tBio: e.Bio.String,\n\
             \t\t\t\t})\n\
             \t\t\t}\n\
             \t\t\treturn out\n\
             \t\t}(),\n\
             \t}, nil\n"
        ));
    }
}
