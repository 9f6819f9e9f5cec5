use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{
        DEFAULT_ALLOWED_ROLE, DEFAULT_CONFIG_PARAM_TEMPLATE, DEFAULT_CONFIG_ROOT,
        DEFAULT_ENVIRONMENTS_DIR, DEFAULT_ENVIRONMENT_PARAM, DEFAULT_PARAM_PREFIX,
        DEFAULT_SETTINGS_FILE, LEGACY_ENVIRONMENTS_DIR,
    },
    define_cli_error, read_file, CliError, ConfigParameterTemplate, ParameterTier,
};

define_cli_error!(SettingsError, "Invalid settings file {path}.", { path: &std::path::Display<'_> });

/// Optional per-repository defaults, read from `envctl.yaml`.
///
/// Values given on the command line (or through their environment variables)
/// take precedence over the file, and the file over the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub environment_param: Option<String>,
    #[serde(default)]
    pub environments_dir: Option<PathBuf>,
    #[serde(default)]
    pub config_root: Option<PathBuf>,
    #[serde(default)]
    pub param_prefix: Option<String>,
    #[serde(default)]
    pub config_param_template: Option<ConfigParameterTemplate>,
    #[serde(default)]
    pub tier: Option<ParameterTier>,
    #[serde(default)]
    pub allowed_role: Option<String>,
    #[serde(default)]
    pub aws: AwsSettings,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsSettings {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

impl Settings {
    /// Loads `path`, or `./envctl.yaml` when no path is given. Only an
    /// explicitly named file is required to exist.
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
        };
        if !required && !path.is_file() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = read_file(&path)?;
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        let settings = serde_yaml::from_str::<Settings>(&content)
            .map_err(|e| SettingsError::with_debug(&path.display(), &e))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn environment_param(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.environment_param.clone())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT_PARAM.to_string())
    }

    /// Directory holding `<env>.json` descriptors. Without an explicit choice,
    /// `account_environments` is used, or `account-environments` if only that
    /// one exists.
    pub fn environments_dir(&self, flag: Option<&Path>) -> PathBuf {
        if let Some(dir) = flag.map(Path::to_path_buf).or_else(|| self.environments_dir.clone()) {
            return dir;
        }
        let default = PathBuf::from(DEFAULT_ENVIRONMENTS_DIR);
        let legacy = PathBuf::from(LEGACY_ENVIRONMENTS_DIR);
        if !default.is_dir() && legacy.is_dir() {
            legacy
        } else {
            default
        }
    }

    pub fn config_root(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.config_root.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_ROOT))
    }

    pub fn param_prefix(&self, flag: Option<&str>) -> String {
        let prefix = flag
            .map(str::to_string)
            .or_else(|| self.param_prefix.clone())
            .unwrap_or_else(|| DEFAULT_PARAM_PREFIX.to_string());
        prefix.trim_end_matches('/').to_string()
    }

    pub fn config_param_template(&self) -> Result<ConfigParameterTemplate, CliError> {
        match &self.config_param_template {
            Some(template) => Ok(template.clone()),
            None => ConfigParameterTemplate::new(DEFAULT_CONFIG_PARAM_TEMPLATE.to_string()),
        }
    }

    pub fn tier(&self, flag: Option<ParameterTier>) -> ParameterTier {
        flag.or(self.tier).unwrap_or_default()
    }

    pub fn allowed_role(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.allowed_role.clone())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ROLE.to_string())
    }

    pub fn aws_profile(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string).or_else(|| self.aws.profile.clone())
    }

    pub fn aws_region(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string).or_else(|| self.aws.region.clone())
    }
}
