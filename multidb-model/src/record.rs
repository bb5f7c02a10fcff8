use serde::Serialize;

/// A field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    /// Declared type as written, e.g. `sql.NullString` or `[]User`.
    pub ty: String,
    /// Unquoted struct tag, e.g. `json:"bio"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Value of `key` in the struct tag, e.g. `tag_value("json")` on
    /// `json:"bio,omitempty"` yields `bio`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        let tag = self.tag.as_deref()?;
        let needle = format!("{}:\"", key);
        let start = tag
            .match_indices(&needle)
            .map(|(i, _)| i)
            .find(|&i| i == 0 || tag.as_bytes()[i - 1] == b' ')?
            + needle.len();
        let rest = &tag[start..];
        let value = &rest[..rest.find('"')?];
        let value = value.split(',').next().unwrap_or(value);
        (!value.is_empty() && value != "-").then_some(value)
    }
}

/// A record (struct) type with ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordType {
    pub name: String,
    pub fields: Vec<Field>,
}

impl RecordType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
