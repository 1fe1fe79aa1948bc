//! Schema model
//!
//! The schema describes the legal keywords, fields, functions and enum
//! groups of the DSL. It is loaded from JSON (normally `dsl_icm.json`) and
//! only ever read by the analysis code.
//!
//! ```json
//! {
//!   "keywords": [{ "name": "Records", "required_params": ["Range"], "fields": ["Format", "Range"] }],
//!   "fields": [{ "name": "Range", "type": "text" }, { "name": "Status", "type": "Enum:StatusKind" }],
//!   "enums": { "StatusKind": ["open", "closed"] }
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Schema file could not be read
    #[error("failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema content is not valid JSON for the schema shape
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A DSL keyword (the name introducing a block)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Parameters expected in the block; absence is a warning
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_params: Option<Vec<String>>,
    /// Allow-list of field names; `None` means any known field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,
}

/// A function usable inside values
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
}

/// A globally named field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    /// Free-form type: `"number"`, `"Enum:<Group>"`, or anything else
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// The full schema; every collection is empty when absent from the source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    pub keywords: Vec<KeywordSpec>,
    pub functions: Vec<FunctionSpec>,
    pub fields: Vec<FieldSpec>,
    pub enums: HashMap<String, Vec<String>>,
    pub examples: Vec<String>,
}

/// Extract the enum group name from a field type such as `Enum:StatusKind`
pub fn enum_group(field_type: &str) -> Option<&str> {
    static ENUM_RE: OnceLock<Regex> = OnceLock::new();
    let re = ENUM_RE.get_or_init(|| Regex::new(r"Enum\s*:\s*([A-Za-z0-9_+]+)").unwrap());

    re.captures(field_type)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
}

impl KeywordSpec {
    /// Whether `field` may appear in this keyword's blocks.
    ///
    /// An absent or empty allow-list places no restriction.
    pub fn allows_field(&self, field: &str) -> bool {
        match &self.fields {
            Some(allowed) if !allowed.is_empty() => allowed.iter().any(|f| f == field),
            _ => true,
        }
    }

    /// Required parameter names (empty when none are declared)
    pub fn required_params(&self) -> &[String] {
        self.required_params.as_deref().unwrap_or_default()
    }
}

impl FieldSpec {
    /// Enum group named by this field's type, if any
    pub fn enum_group(&self) -> Option<&str> {
        self.field_type.as_deref().and_then(enum_group)
    }

    /// Whether the field is declared numeric
    pub fn is_number(&self) -> bool {
        self.field_type.as_deref() == Some("number")
    }
}

impl Schema {
    /// Parse a schema from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a schema file
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Look up a keyword by exact name
    pub fn keyword(&self, name: &str) -> Option<&KeywordSpec> {
        self.keywords.iter().find(|k| k.name == name)
    }

    /// Look up a field by exact name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a function by exact name
    pub fn function(&self, name: &str) -> Option<&FunctionSpec> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Values of an enum group
    pub fn enum_values(&self, group: &str) -> Option<&[String]> {
        self.enums.get(group).map(Vec::as_slice)
    }

    /// Values allowed for an enum-typed field whose group exists
    pub fn enum_values_for(&self, field: &FieldSpec) -> Option<&[String]> {
        field.enum_group().and_then(|group| self.enum_values(group))
    }

    /// Fields offered inside a keyword's block, in schema order
    pub fn fields_for_keyword<'a>(
        &'a self,
        keyword: Option<&'a KeywordSpec>,
    ) -> impl Iterator<Item = &'a FieldSpec> + 'a {
        self.fields
            .iter()
            .filter(move |f| keyword.map_or(true, |k| k.allows_field(&f.name)))
    }

    /// Names of all keywords, in schema order
    pub fn keyword_names(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.name.as_str())
    }

    /// Names of all fields, in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

/// Shared reference cell holding the current schema.
///
/// Readers take an `Arc` snapshot and analyze against it; a reload swaps
/// the whole snapshot, so no reader ever sees a half-updated schema.
#[derive(Debug, Default)]
pub struct SchemaRef {
    current: RwLock<Arc<Schema>>,
}

impl SchemaRef {
    pub fn new(schema: Schema) -> Self {
        Self {
            current: RwLock::new(Arc::new(schema)),
        }
    }

    /// Snapshot of the current schema
    pub fn current(&self) -> Arc<Schema> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Replace the schema, returning the previous snapshot
    pub fn replace(&self, schema: Schema) -> Arc<Schema> {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        std::mem::replace(&mut *guard, Arc::new(schema))
    }
}
