use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::{define_cli_error, CliError, InvalidJson, MissingRequiredField};

/// Canonical field carrying the environment name.
pub const NAME_FIELD: &str = "name";
/// Older descriptors name the environment under this key instead. Accepted on
/// read and rewritten to `name` on publish.
pub const LEGACY_NAME_FIELD: &str = "environment";
pub const CONFIG_REPO_FIELD: &str = "config_repo";
pub const CONFIG_BRANCH_FIELD: &str = "config_branch";

define_cli_error!(
    InvalidDescriptorField,
    "Field '{field}' in {source_name} must be a string.",
    { field: &str, source_name: &str }
);

/// The document bound to an account under the environment parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentDescriptor {
    pub name: String,
    pub config_repo: Option<String>,
    pub config_branch: Option<String>,
    /// Every other field, kept verbatim and in document order.
    pub extra: Map<String, Value>,
}

impl EnvironmentDescriptor {
    pub fn from_json_str(input: &str, source_name: &str) -> Result<Self, CliError> {
        let value: Value =
            serde_json::from_str(input).map_err(|e| InvalidJson::with_debug(source_name, &e))?;
        Self::from_value(value, source_name)
    }

    pub fn from_value(value: Value, source_name: &str) -> Result<Self, CliError> {
        let Value::Object(fields) = value else {
            return Err(InvalidJson::with_debug(
                source_name,
                "expected a JSON object at the top level",
            ));
        };

        let mut name = None;
        let mut legacy_name = None;
        let mut config_repo = None;
        let mut config_branch = None;
        let mut extra = Map::new();
        for (key, value) in fields {
            match key.as_str() {
                NAME_FIELD => name = Some(value),
                LEGACY_NAME_FIELD => legacy_name = Some(value),
                // An explicit null is published and compared as written.
                CONFIG_REPO_FIELD | CONFIG_BRANCH_FIELD if value.is_null() => {
                    extra.insert(key, value);
                }
                CONFIG_REPO_FIELD => config_repo = optional_string(value, &key, source_name)?,
                CONFIG_BRANCH_FIELD => {
                    config_branch = optional_string(value, &key, source_name)?
                }
                _ => {
                    extra.insert(key, value);
                }
            }
        }

        let name = match (name, legacy_name) {
            (Some(name), legacy_name) => {
                // Both present: `name` governs, the legacy key is just data.
                if let Some(legacy_name) = legacy_name {
                    extra.insert(LEGACY_NAME_FIELD.to_string(), legacy_name);
                }
                name
            }
            (None, Some(legacy_name)) => legacy_name,
            (None, None) => return Err(MissingRequiredField::new(NAME_FIELD, source_name)),
        };
        let name = match name {
            Value::String(name) if !name.trim().is_empty() => name,
            _ => return Err(MissingRequiredField::new(NAME_FIELD, source_name)),
        };

        Ok(EnvironmentDescriptor {
            name,
            config_repo,
            config_branch,
            extra,
        })
    }

    /// Canonical fields of this descriptor, as they are published.
    pub fn to_document(&self) -> Map<String, Value> {
        let mut document = Map::new();
        document.insert(NAME_FIELD.to_string(), Value::String(self.name.clone()));
        if let Some(config_repo) = &self.config_repo {
            document.insert(
                CONFIG_REPO_FIELD.to_string(),
                Value::String(config_repo.clone()),
            );
        }
        if let Some(config_branch) = &self.config_branch {
            document.insert(
                CONFIG_BRANCH_FIELD.to_string(),
                Value::String(config_branch.clone()),
            );
        }
        for (key, value) in &self.extra {
            document.insert(key.clone(), value.clone());
        }
        document
    }

    /// Compact JSON, the form stored in the parameter store.
    pub fn to_json(&self) -> String {
        Value::Object(self.to_document()).to_string()
    }
}

impl Serialize for EnvironmentDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let document = self.to_document();
        let mut map = serializer.serialize_map(Some(document.len()))?;
        for (key, value) in &document {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn optional_string(value: Value, field: &str, source_name: &str) -> Result<Option<String>, CliError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(InvalidDescriptorField::new(field, source_name)),
    }
}

/// Lenient counterpart of [`EnvironmentDescriptor::from_value`], used for the
/// stored side of a comparison: the document only needs to be an object, and
/// a legacy `environment` key is renamed to `name` when `name` is absent.
pub fn canonical_fields(value: Value, source_name: &str) -> Result<Map<String, Value>, CliError> {
    let Value::Object(fields) = value else {
        return Err(InvalidJson::with_debug(
            source_name,
            "expected a JSON object at the top level",
        ));
    };
    if fields.contains_key(NAME_FIELD) || !fields.contains_key(LEGACY_NAME_FIELD) {
        return Ok(fields);
    }
    Ok(fields
        .into_iter()
        .map(|(key, value)| match key.as_str() {
            LEGACY_NAME_FIELD => (NAME_FIELD.to_string(), value),
            _ => (key, value),
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMismatch {
    pub key: String,
    pub expected: Value,
    /// `None` when the key is absent from the stored document.
    pub actual: Option<Value>,
}

impl std::fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: expected {}, got {}",
            self.key,
            display_value(&self.expected),
            self.actual
                .as_ref()
                .map(display_value)
                .unwrap_or_else(|| "<missing>".to_string())
        )
    }
}

/// Field-by-field comparison over the keys of `expected` only. Keys that exist
/// only in `actual` never produce a mismatch.
pub fn compare_fields(expected: &Map<String, Value>, actual: &Map<String, Value>) -> Vec<FieldMismatch> {
    expected
        .iter()
        .filter(|(key, value)| actual.get(key.as_str()) != Some(*value))
        .map(|(key, value)| FieldMismatch {
            key: key.clone(),
            expected: value.clone(),
            actual: actual.get(key.as_str()).cloned(),
        })
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
