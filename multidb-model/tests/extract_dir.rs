//! Integration tests for extracting a model from a package directory.

use std::fs;

use multidb_model::{ExtractError, TypeVocabulary, extract_dir};
use tempfile::TempDir;

const MODELS_GO: &str = r#"// Code generated by sqlc. DO NOT EDIT.

package postgresdb

import (
	"database/sql"
)

type User struct {
	ID       int64          `json:"id"`
	Username string         `json:"username"`
	Bio      sql.NullString `json:"bio"`
}

type CreateUserParams struct {
	Username string         `json:"username"`
	Bio      sql.NullString `json:"bio"`
}
"#;

const QUERIER_GO: &str = r#"// Code generated by sqlc. DO NOT EDIT.

package postgresdb

import (
	"context"
)

type Querier interface {
	//CreateUser
	//
	//  INSERT INTO users (username, bio) VALUES ($1, $2) RETURNING id, username, bio
	CreateUser(ctx context.Context, arg CreateUserParams) (User, error)
	//GetUser
	//
	//  SELECT id, username, bio FROM users WHERE username = $1
	GetUser(ctx context.Context, username string) (User, error)
}

var _ Querier = (*Queries)(nil)
"#;

fn write_package(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("Failed to write file");
    }
    dir
}

#[test]
fn test_extract_package() {
    let dir = write_package(&[("models.go", MODELS_GO), ("querier.go", QUERIER_GO)]);
    let model = extract_dir(dir.path(), &TypeVocabulary::database_sql()).unwrap();

    let names: Vec<_> = model.methods().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["CreateUser", "GetUser"]);

    let create = model.method("CreateUser").unwrap();
    assert_eq!(create.docs.len(), 3);
    assert!(create.docs[2].contains("INSERT INTO users"));
    assert!(create.is_create);

    let records: Vec<_> = model.records().map(|r| r.name.as_str()).collect();
    assert_eq!(records, ["CreateUserParams", "User"]);
    assert_eq!(
        model.record("User").unwrap().field("Bio").unwrap().ty,
        "sql.NullString"
    );
    assert!(model.interface_source.as_deref().unwrap().ends_with("querier.go"));
}

#[test]
fn test_test_files_and_other_extensions_ignored() {
    let dir = write_package(&[
        ("querier.go", QUERIER_GO),
        ("querier_test.go", "this is not go"),
        ("README.md", "type X struct {"),
    ]);
    let model = extract_dir(dir.path(), &TypeVocabulary::database_sql()).unwrap();
    assert_eq!(model.method_count(), 2);
}

#[test]
fn test_parse_error_aborts() {
    let dir = write_package(&[
        ("models.go", MODELS_GO),
        ("broken.go", "package postgresdb\n\ntype Broken struct {\n\tF func()\n}\n"),
    ]);
    let err = extract_dir(dir.path(), &TypeVocabulary::database_sql()).unwrap_err();
    assert!(matches!(*err, ExtractError::UnsupportedType { .. }));
}

#[test]
fn test_duplicate_type_across_files() {
    let dir = write_package(&[("a.go", MODELS_GO), ("b.go", MODELS_GO)]);
    let err = extract_dir(dir.path(), &TypeVocabulary::database_sql()).unwrap_err();
    match *err {
        ExtractError::DuplicateType {
            ref name,
            ref first,
            ref second,
        } => {
            assert_eq!(name, "User");
            assert!(first.ends_with("a.go"));
            assert!(second.ends_with("b.go"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_empty_dir() {
    let dir = write_package(&[("notes.txt", "nothing")]);
    let err = extract_dir(dir.path(), &TypeVocabulary::database_sql()).unwrap_err();
    assert!(matches!(*err, ExtractError::EmptyDir { .. }));
}

#[test]
fn test_missing_dir() {
    let dir = TempDir::new().unwrap();
    let err = extract_dir(&dir.path().join("nope"), &TypeVocabulary::database_sql()).unwrap_err();
    assert!(matches!(*err, ExtractError::Io { .. }));
}
