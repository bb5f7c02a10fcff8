//! Method synthesis over the canonical model.

use multidb_core::singularize;
use multidb_model::{
    COLLECTION_PREFIX, Category, Field, MethodSignature, Model, RecordType, TypeVocabulary,
};
use tracing::info;

/// Name of the by-id accessor for a record type.
pub fn get_by_id_name(record: &str) -> String {
    format!("Get{}ByID", record)
}

/// Add a `Get<Type>ByID(ctx context.Context, id int64) (<Type>, error)`
/// accessor for every domain record with an `ID` field that lacks one.
///
/// Parameter bundles (`*Params`) and row projections (`*Row`) are not domain
/// values and are skipped. Running this twice adds nothing the second time.
/// Returns the names of the synthesized methods.
pub fn synthesize_accessors(model: &mut Model, vocab: &TypeVocabulary) -> Vec<String> {
    let candidates: Vec<String> = model
        .records()
        .filter(|record| is_entity(record, vocab))
        .map(|record| get_by_id_name(&record.name))
        .filter(|name| !model.has_method(name))
        .collect();

    for name in &candidates {
        let record = &name["Get".len()..name.len() - "ByID".len()];
        let method = MethodSignature::new(name.as_str())
            .with_param("ctx", "context.Context")
            .with_param("id", "int64")
            .with_return(record)
            .with_return("error")
            .with_doc(format!("// {} (Synthetic)", name))
            .synthetic()
            .resolve(vocab);
        info!(method = %name, "synthesizing accessor");
        model.insert_method(method);
    }

    candidates
}

/// Mark `Xs` as the bulk form of `X` when no annotation says otherwise.
///
/// Applies to error-only methods whose name singularizes to another method of
/// the model and whose parameter bundle carries a collection field. Returns
/// `(bulk, singular)` pairs for every method newly marked.
pub fn infer_bulk_methods(model: &mut Model) -> Vec<(String, String)> {
    let inferred: Vec<(String, String)> = model
        .methods()
        .filter(|m| m.bulk_for.is_none() && m.returns_only_error())
        .filter_map(|m| {
            let singular = singularize(&m.name);
            (singular != m.name && model.has_method(&singular)).then_some((m, singular))
        })
        .filter(|(m, _)| {
            m.params
                .iter()
                .filter_map(|p| model.record(&p.ty))
                .any(|record| collection_field(record).is_some())
        })
        .map(|(m, singular)| (m.name.clone(), singular))
        .collect();

    for (bulk, singular) in &inferred {
        if let Some(method) = model.method_mut(bulk) {
            info!(method = %bulk, singular = %singular, "inferred bulk method");
            method.bulk_for = Some(singular.clone());
        }
    }

    inferred
}

/// The first collection field of a bundle, excluding byte slices.
pub fn collection_field(record: &RecordType) -> Option<&Field> {
    record
        .fields
        .iter()
        .find(|f| f.ty.starts_with(COLLECTION_PREFIX) && f.ty != "[]byte")
}

fn is_entity(record: &RecordType, vocab: &TypeVocabulary) -> bool {
    vocab.classify(&record.name) == Category::Domain
        && !record.name.ends_with("Params")
        && !record.name.ends_with("Row")
        && record.has_field("ID")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> Model {
        let mut model = Model::new();
        model.insert_type(
            RecordType::new("User")
                .with_field(Field::new("ID", "int64"))
                .with_field(Field::new("Username", "string")),
        );
        model.insert_type(
            RecordType::new("Tag")
                .with_field(Field::new("ID", "int64"))
                .with_field(Field::new("Name", "string")),
        );
        model.insert_type(RecordType::new("Setting").with_field(Field::new("Key", "string")));
        model.insert_type(
            RecordType::new("CreateUserParams").with_field(Field::new("ID", "int64")),
        );
        model.insert_type(RecordType::new("ListTagsRow").with_field(Field::new("ID", "int64")));
        model.insert_method(
            MethodSignature::new("GetTagByID")
                .with_param("ctx", "context.Context")
                .with_param("id", "int64")
                .with_return("Tag")
                .with_return("error"),
        );
        model
    }

    #[test]
    fn test_synthesizes_missing_accessor() {
        let vocab = TypeVocabulary::database_sql();
        let mut model = model();

        let added = synthesize_accessors(&mut model, &vocab);

        assert_eq!(added, ["GetUserByID"]);
        let method = model.method("GetUserByID").unwrap();
        assert!(method.is_synthetic);
        assert_eq!(method.params_signature(), "ctx context.Context, id int64");
        assert_eq!(method.returns_signature(), "(User, error)");
        assert_eq!(method.docs, ["// GetUserByID (Synthetic)"]);
    }

    #[test]
    fn test_existing_accessor_is_kept() {
        let vocab = TypeVocabulary::database_sql();
        let mut model = model();
        synthesize_accessors(&mut model, &vocab);

        assert!(!model.method("GetTagByID").unwrap().is_synthetic);
        assert!(!model.has_method("GetSettingByID"));
        assert!(!model.has_method("GetCreateUserParamsByID"));
        assert!(!model.has_method("GetListTagsRowByID"));
    }

    #[test]
    fn test_synthesis_is_idempotent() {
        let vocab = TypeVocabulary::database_sql();
        let mut model = model();
        synthesize_accessors(&mut model, &vocab);
        let once = model.clone();

        let added = synthesize_accessors(&mut model, &vocab);

        assert!(added.is_empty());
        assert_eq!(model, once);
    }

    #[test]
    fn test_methods_stay_sorted() {
        let vocab = TypeVocabulary::database_sql();
        let mut model = model();
        synthesize_accessors(&mut model, &vocab);

        let names: Vec<_> = model.methods().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["GetTagByID", "GetUserByID"]);
    }

    fn bulk_model() -> Model {
        let mut model = Model::new();
        model.insert_type(
            RecordType::new("CreateUsersParams")
                .with_field(Field::new("Usernames", "[]string"))
                .with_field(Field::new("Avatar", "[]byte")),
        );
        model.insert_type(RecordType::new("TouchUsersParams").with_field(Field::new("At", "[]byte")));
        for (name, param) in [
            ("CreateUser", "string"),
            ("CreateUsers", "CreateUsersParams"),
            ("TouchUser", "string"),
            ("TouchUsers", "TouchUsersParams"),
        ] {
            model.insert_method(
                MethodSignature::new(name)
                    .with_param("ctx", "context.Context")
                    .with_param("arg", param)
                    .with_return("error"),
            );
        }
        model
    }

    #[test]
    fn test_infers_bulk_from_plural_name() {
        let mut model = bulk_model();

        let inferred = infer_bulk_methods(&mut model);

        assert_eq!(
            inferred,
            [("CreateUsers".to_string(), "CreateUser".to_string())]
        );
        assert_eq!(
            model.method("CreateUsers").unwrap().bulk_for.as_deref(),
            Some("CreateUser")
        );
        // []byte is a blob, not a collection
        assert!(model.method("TouchUsers").unwrap().bulk_for.is_none());
    }

    #[test]
    fn test_explicit_annotation_wins() {
        let mut model = bulk_model();
        let method = MethodSignature::new("ImportUsers")
            .with_param("arg", "CreateUsersParams")
            .with_return("error")
            .with_doc("// @bulk-for CreateUser");
        model.insert_method(method);

        let inferred = infer_bulk_methods(&mut model);

        assert!(inferred.iter().all(|(bulk, _)| bulk != "ImportUsers"));
        assert_eq!(
            model.method("ImportUsers").unwrap().bulk_for.as_deref(),
            Some("CreateUser")
        );
    }
}
