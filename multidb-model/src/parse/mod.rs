//! Build a [`Model`] from Go declaration text.

mod decl;
mod lexer;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ExtractError, Result, SourceContext};
use crate::model::Model;
use crate::vocab::TypeVocabulary;

/// One declaration file: its display name and contents.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a file, naming it by its path.
    pub fn read(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ExtractError::io(path, e))?;
        Ok(Self::new(path.display().to_string(), content))
    }
}

/// Extract a model from every non-test `.go` file in `dir`, in file name
/// order.
pub fn extract_dir(dir: &Path, vocab: &TypeVocabulary) -> Result<Model> {
    let entries = std::fs::read_dir(dir).map_err(|e| ExtractError::io(dir, e))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ExtractError::io(dir, e))?.path();
        let is_source = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".go") && !n.ends_with("_test.go"));
        if is_source {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(Box::new(ExtractError::EmptyDir {
            path: dir.to_path_buf(),
        }));
    }

    let files = paths
        .iter()
        .map(|p| SourceFile::read(p))
        .collect::<Result<Vec<_>>>()?;
    extract_sources(&files, vocab)
}

/// Extract a model from in-memory files. Any parse failure aborts the whole
/// extraction.
pub fn extract_sources(files: &[SourceFile], vocab: &TypeVocabulary) -> Result<Model> {
    let mut model = Model::new();
    let mut type_origin: HashMap<String, String> = HashMap::new();

    for file in files {
        let ctx = SourceContext::new(&file.content, &file.name);
        let decls = decl::parse_file(&ctx, vocab)?;
        debug!(
            file = %file.name,
            records = decls.records.len(),
            interface = decls.interface.is_some(),
            "parsed declaration file"
        );

        for record in decls.records {
            let name = record.name.clone();
            if !model.insert_type(record) {
                return Err(Box::new(ExtractError::DuplicateType {
                    first: type_origin.get(&name).cloned().unwrap_or_default(),
                    second: file.name.clone(),
                    name,
                }));
            }
            type_origin.insert(name, file.name.clone());
        }

        if let Some(methods) = decls.interface {
            if let Some(first) = &model.interface_source {
                return Err(Box::new(ExtractError::DuplicateInterface {
                    name: vocab.self_type().to_string(),
                    first: first.clone(),
                    second: file.name.clone(),
                }));
            }
            model.interface_source = Some(file.name.clone());
            for method in methods {
                model.insert_method(method);
            }
        }
    }

    Ok(model)
}
