use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::{read_file, CliError, CriticalError, InvalidJson};

pub fn parse_json(input: &str, source_name: &str) -> Result<Value, CliError> {
    serde_json::from_str(input).map_err(|e| InvalidJson::with_debug(source_name, &e))
}

pub fn read_json_file(path: &Path) -> Result<Value, CliError> {
    debug!(path = %path.display(), "reading JSON document");
    let content = read_file(path)?;
    parse_json(&content, &path.display().to_string())
}

/// Serialization with `,` and `:` separators and no whitespace.
pub fn compact_json(value: &Value) -> String {
    value.to_string()
}

pub fn pretty_json(value: &Value) -> Result<String, CliError> {
    serde_json::to_string_pretty(value).map_err(|e| CriticalError::with_debug("failed to format JSON", &e))
}
