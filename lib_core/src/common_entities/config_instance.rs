use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use regex::Regex;
use serde_json::Value;

use crate::{compact_json, define_cli_error, read_json_file, CliError, MissingLocalFile};

pub const CONFIG_FILE_NAME: &str = "config.json";

define_cli_error!(
    InvalidConfigPath,
    "Config must be in the format <component>/<instance> (got '{path}').",
    { path: &str }
);
define_cli_error!(
    InvalidPathSegment,
    "Invalid {what} '{value}': only letters, digits, '.', '_' and '-' are allowed.",
    { what: &str, value: &str }
);

/// Rejects anything that could not be used both as one directory name and as
/// one segment of a parameter name.
pub fn require_path_segment(what: &str, value: &str) -> Result<(), CliError> {
    let segment = Regex::new(r"^[A-Za-z0-9_.\-]+$").expect("Hardcoded regex should be valid.");
    if value == "." || value == ".." || !segment.is_match(value) {
        return Err(InvalidPathSegment::new(what, value));
    }
    Ok(())
}

/// Logical `<component>/<instance>` selector of a config instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    component: String,
    instance: String,
}

impl ConfigPath {
    pub fn new(component: &str, instance: &str) -> Result<Self, CliError> {
        require_path_segment("component", component)?;
        require_path_segment("instance", instance)?;
        Ok(ConfigPath {
            component: component.to_string(),
            instance: instance.to_string(),
        })
    }

    pub fn parse(path: &str) -> Result<Self, CliError> {
        let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
        match parts.as_slice() {
            [component, instance] if !component.is_empty() && !instance.is_empty() => {
                Self::new(component, instance)
            }
            _ => Err(InvalidConfigPath::new(path)),
        }
    }

    pub fn component(&self) -> &str {
        &self.component
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// `<config_root>/<environment>/<component>/<instance>/config.json`
    pub fn config_file(&self, config_root: &Path, environment: &str) -> Result<PathBuf, CliError> {
        require_path_segment("environment", environment)?;
        Ok(config_root
            .join(environment)
            .join(&self.component)
            .join(&self.instance)
            .join(CONFIG_FILE_NAME))
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.component, self.instance)
    }
}

impl FromStr for ConfigPath {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigPath::parse(s)
    }
}

/// A parsed `config.json` resolved for one environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigInstance {
    pub path: ConfigPath,
    pub environment: String,
    pub source_file: PathBuf,
    pub document: Value,
}

impl ConfigInstance {
    pub fn load(config_root: &Path, environment: &str, path: &ConfigPath) -> Result<Self, CliError> {
        let source_file = path.config_file(config_root, environment)?;
        if !source_file.is_file() {
            return Err(MissingLocalFile::new(&source_file.display()));
        }
        let document = read_json_file(&source_file)?;
        Ok(ConfigInstance {
            path: path.clone(),
            environment: environment.to_string(),
            source_file,
            document,
        })
    }

    /// Payload as published: re-serialized without any whitespace.
    pub fn compact(&self) -> String {
        compact_json(&self.document)
    }
}
