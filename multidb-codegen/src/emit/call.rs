//! Argument conversion for calls into an engine's accessor layer.

use multidb_model::{Category, MethodSignature, Param, RecordType};

use super::EngineEmitter;
use crate::convert::{Conversion, convert, nest};
use crate::error::{CodegenError, Result};

impl EngineEmitter<'_> {
    /// `w.adapter.<Target>(args)` for a canonical method.
    pub(super) fn call_expr(
        &self,
        method: &MethodSignature,
        target: &MethodSignature,
    ) -> Result<String> {
        let args = self.call_args(method, target)?;
        Ok(format!("w.adapter.{}({})", target.name, args.join(", ")))
    }

    /// Convert each canonical parameter into the engine's parameter at the
    /// same position.
    pub(super) fn call_args(
        &self,
        method: &MethodSignature,
        target: &MethodSignature,
    ) -> Result<Vec<String>> {
        method
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| self.call_arg(method, param, target.params.get(i)))
            .collect()
    }

    fn call_arg(
        &self,
        method: &MethodSignature,
        param: &Param,
        target: Option<&Param>,
    ) -> Result<String> {
        match self.vocab.classify(&param.ty) {
            Category::DomainCollection => Err(CodegenError::unsupported_slice(
                &self.engine.name,
                &method.name,
                &param.name,
                &param.ty,
            )),
            Category::Domain => Ok(self.domain_arg(param, target)),
            _ => Ok(match target {
                Some(target) if target.ty != param.ty => {
                    let target_ty = self.qualify(&target.ty);
                    convert(self.vocab, &target.name, &target_ty, &param.ty, &param.name).expr
                }
                _ => param.name.clone(),
            }),
        }
    }

    /// Expand a domain value into the engine's parameter bundle, field by
    /// field. Bundle fields the value does not carry are left out.
    fn domain_arg(&self, param: &Param, target: Option<&Param>) -> String {
        let Some(target) = target else {
            return format!("{}.{}({})", self.engine.package, param.ty, param.name);
        };

        let source = self.canonical.record(&param.ty);
        let bundle = self.target.record(&target.ty);
        match (source, bundle) {
            (Some(source), Some(bundle)) => {
                let fields = bundle
                    .fields
                    .iter()
                    .filter_map(|field| {
                        let from = source.field(&field.name)?;
                        Some(convert(
                            self.vocab,
                            &field.name,
                            &self.qualify(&field.ty),
                            &from.ty,
                            &format!("{}.{}", param.name, from.name),
                        ))
                    })
                    .collect::<Vec<_>>();
                self.bundle_literal(bundle, &fields)
            }
            // Named non-struct types (enums) convert directly.
            _ => format!("{}({})", self.qualify(&target.ty), param.name),
        }
    }

    /// `pkg.Bundle{\n\tField: expr,\n}` with one line per conversion.
    pub(super) fn bundle_literal(&self, bundle: &RecordType, fields: &[Conversion]) -> String {
        let ty = self.qualify(&bundle.name);
        if fields.is_empty() {
            return format!("{}{{}}", ty);
        }
        let body: String = fields
            .iter()
            .map(|c| format!("\t{}: {},\n", c.field, nest(&c.expr)))
            .collect();
        format!("{}{{\n{}}}", ty, body)
    }
}

#[cfg(test)]
mod tests {
    use multidb_model::{Field, MethodSignature, RecordType};

    use crate::emit::tests::Fixture;

    fn create_user(param: &str) -> MethodSignature {
        MethodSignature::new("CreateUser")
            .with_param("ctx", "context.Context")
            .with_param("user", param)
            .with_return("error")
    }

    fn engine_create_user() -> MethodSignature {
        MethodSignature::new("CreateUser")
            .with_param("ctx", "context.Context")
            .with_param("arg", "CreateUserParams")
            .with_return("error")
    }

    fn fixture() -> Fixture {
        Fixture::new()
            .canonical(create_user("User"))
            .canonical_type(
                RecordType::new("User")
                    .with_field(Field::new("Username", "string"))
                    .with_field(Field::new("Bio", "string")),
            )
            .target(engine_create_user())
            .target_type(
                RecordType::new("CreateUserParams")
                    .with_field(Field::new("Username", "string"))
                    .with_field(Field::new("Bio", "sql.NullString"))
                    .with_field(Field::new("CreatedAt", "time.Time")),
            )
    }

    #[test]
    fn test_domain_param_expands_into_bundle() {
        let fixture = fixture();
        let method = fixture.canonical.method("CreateUser").unwrap();
        let target = fixture.target.method("CreateUser").unwrap();

        let call = fixture.emitter().call_expr(method, target).unwrap();

        assert_eq!(
            call,
            "w.adapter.CreateUser(ctx, sqlitedb.CreateUserParams{\n\
             \tUsername: user.Username,\n\
             \tBio: sql.NullString{String: user.Bio, Valid: true},\n\
             })"
        );
    }

    #[test]
    fn test_slice_of_domain_param_is_rejected() {
        let fixture = Fixture::new()
            .canonical(create_user("[]User"))
            .target(engine_create_user());
        let method = fixture.canonical.method("CreateUser").unwrap();
        let target = fixture.target.method("CreateUser").unwrap();

        let err = fixture.emitter().call_args(method, target).unwrap_err();

        assert!(
            err.to_string()
                .starts_with("unsupported parameter type: slice of domain struct []User"),
            "{}",
            err
        );
    }

    #[test]
    fn test_domain_param_without_engine_param() {
        let fixture = Fixture::new().canonical(create_user("User")).target(
            MethodSignature::new("CreateUser")
                .with_param("ctx", "context.Context")
                .with_return("error"),
        );
        let method = fixture.canonical.method("CreateUser").unwrap();
        let target = fixture.target.method("CreateUser").unwrap();

        let args = fixture.emitter().call_args(method, target).unwrap();

        assert_eq!(args, ["ctx", "sqlitedb.User(user)"]);
    }

    #[test]
    fn test_named_non_struct_type_converts_directly() {
        let fixture = Fixture::new()
            .canonical(
                MethodSignature::new("SetStatus")
                    .with_param("ctx", "context.Context")
                    .with_param("status", "UserStatus")
                    .with_return("error"),
            )
            .target(
                MethodSignature::new("SetStatus")
                    .with_param("ctx", "context.Context")
                    .with_param("status", "UserStatus")
                    .with_return("error"),
            );
        let method = fixture.canonical.method("SetStatus").unwrap();
        let target = fixture.target.method("SetStatus").unwrap();

        let args = fixture.emitter().call_args(method, target).unwrap();

        assert_eq!(args, ["ctx", "sqlitedb.UserStatus(status)"]);
    }

    #[test]
    fn test_primitive_params_cast_when_types_differ() {
        let fixture = Fixture::new()
            .canonical(
                MethodSignature::new("GetNarFile")
                    .with_param("ctx", "context.Context")
                    .with_param("id", "int64")
                    .with_param("hash", "string")
                    .with_return("error"),
            )
            .target(
                MethodSignature::new("GetNarFile")
                    .with_param("ctx", "context.Context")
                    .with_param("id", "int32")
                    .with_param("hash", "sql.NullString")
                    .with_return("error"),
            );
        let method = fixture.canonical.method("GetNarFile").unwrap();
        let target = fixture.target.method("GetNarFile").unwrap();

        let args = fixture.emitter().call_args(method, target).unwrap();

        assert_eq!(
            args,
            [
                "ctx",
                "int32(id)",
                "sql.NullString{String: hash, Valid: true}"
            ]
        );
    }
}
