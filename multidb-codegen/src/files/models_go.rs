use std::collections::{BTreeMap, VecDeque};

use multidb_core::GeneratedFile;
use multidb_model::{Field, Model, RecordType};

use super::go_source;
use crate::builder::{CodeBuilder, ImportTable};

/// Records reachable from the canonical method set: every record named by a
/// parameter or return (directly, through a slice or a pointer), closed over
/// field types. Sorted by name.
pub fn referenced_records(model: &Model) -> Vec<&RecordType> {
    let mut found: BTreeMap<&str, &RecordType> = BTreeMap::new();
    let mut queue: VecDeque<&str> = model
        .methods()
        .flat_map(|m| {
            m.params
                .iter()
                .map(|p| p.ty.as_str())
                .chain(m.returns.iter().map(|r| r.ty.as_str()))
        })
        .collect();

    while let Some(ty) = queue.pop_front() {
        let name = ty.trim_start_matches(['[', ']', '*']);
        if found.contains_key(name) {
            continue;
        }
        if let Some(record) = model.record(name) {
            found.insert(name, record);
            queue.extend(record.fields.iter().map(|f| f.ty.as_str()));
        }
    }

    found.into_values().collect()
}

/// Canonical record declarations.
pub struct ModelsGo {
    prefix: String,
    package: String,
    table: ImportTable,
    records: Vec<RecordType>,
}

impl ModelsGo {
    pub fn new(
        prefix: impl Into<String>,
        package: impl Into<String>,
        table: ImportTable,
        records: Vec<RecordType>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            package: package.into(),
            table,
            records,
        }
    }

    fn render_record(record: &RecordType) -> String {
        if record.fields.is_empty() {
            return format!("type {} struct{{}}\n", record.name);
        }
        CodeBuilder::go()
            .block(&format!("type {} struct {{", record.name), "}", |b| {
                b.each(align_fields(&record.fields), |b, line| b.line(&line))
            })
            .build()
    }
}

impl GeneratedFile for ModelsGo {
    fn file_name(&self) -> String {
        format!("{}models.go", self.prefix)
    }

    fn render(&self) -> String {
        let body = self
            .records
            .iter()
            .map(Self::render_record)
            .collect::<Vec<_>>()
            .join("\n");
        go_source(&self.package, &self.table, &body)
    }
}

/// Field lines with names and types padded into columns. Types are only
/// padded across consecutive tagged fields, as gofmt does.
fn align_fields(fields: &[Field]) -> Vec<String> {
    let name_width = fields.iter().map(|f| f.name.len()).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(fields.len());
    let mut start = 0;
    while start < fields.len() {
        let tagged = fields[start].tag.is_some();
        let end = fields[start..]
            .iter()
            .position(|f| f.tag.is_some() != tagged)
            .map_or(fields.len(), |n| start + n);
        let run = &fields[start..end];
        let type_width = run.iter().map(|f| f.ty.len()).max().unwrap_or(0);

        for field in run {
            let line = match &field.tag {
                Some(tag) => format!(
                    "{:nw$} {:tw$} `{}`",
                    field.name,
                    field.ty,
                    tag,
                    nw = name_width,
                    tw = type_width
                ),
                None => format!("{:nw$} {}", field.name, field.ty, nw = name_width),
            };
            lines.push(line);
        }
        start = end;
    }
    lines
}
