use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{CallerIdentity, CallerIdentityProvider, ParameterStore};
use crate::{
    define_cli_error, mkdir_p, parse_json, read_file, write_file, CliError, ParameterTier,
    ReadFailure, WriteFailure,
};

pub const LOCAL_ACCOUNT_ID: &str = "000000000000";
pub const LOCAL_REGION: &str = "local";

define_cli_error!(
    LocalStoreCorrupt,
    "Local parameter store {path} is not valid.",
    { path: &std::path::Display<'_> }
);

/// Parameter store kept in a single JSON file, for offline runs and tests.
///
/// The file is created on first write. It also stands in for the identity
/// service, reporting `000000000000` / `local` unless the file says otherwise.
#[derive(Debug, Clone)]
pub struct LocalParameterStore {
    path: PathBuf,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct LocalStoreFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    #[serde(default)]
    parameters: BTreeMap<String, StoredParameter>,
    #[serde(default)]
    policies: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredParameter {
    value: String,
    tier: ParameterTier,
}

impl LocalParameterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalParameterStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Policy attached to `resource_arn`, if any.
    pub fn resource_policy(&self, resource_arn: &str) -> Result<Option<Value>, CliError> {
        Ok(self.load()?.policies.get(resource_arn).cloned())
    }

    /// Tier a parameter was last written with.
    pub fn tier_of(&self, name: &str) -> Result<Option<ParameterTier>, CliError> {
        Ok(self.load()?.parameters.get(name).map(|p| p.tier))
    }

    fn load(&self) -> Result<LocalStoreFile, CliError> {
        if !self.path.exists() {
            return Ok(LocalStoreFile::default());
        }
        let content = read_file(&self.path)?;
        // Derived struct deserializers also accept sequences, so the shape is
        // checked before conversion.
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| LocalStoreCorrupt::with_debug(&self.path.display(), &e))?;
        if !value.is_object() {
            return Err(LocalStoreCorrupt::with_debug(
                &self.path.display(),
                "expected a JSON object at the top level",
            ));
        }
        serde_json::from_value(value)
            .map_err(|e| LocalStoreCorrupt::with_debug(&self.path.display(), &e))
    }

    fn save(&self, file: &LocalStoreFile) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            mkdir_p(parent)?;
        }
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| LocalStoreCorrupt::with_debug(&self.path.display(), &e))?;
        write_file(&self.path, content)
    }
}

#[async_trait]
impl ParameterStore for LocalParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, CliError> {
        let file = self.load().map_err(|e| ReadFailure::with_debug(name, &e))?;
        Ok(file.parameters.get(name).map(|p| p.value.clone()))
    }

    async fn put(&self, name: &str, value: &str, tier: ParameterTier) -> Result<(), CliError> {
        debug!(parameter = name, tier = %tier, path = %self.path.display(), "writing local parameter");
        let mut file = self.load().map_err(|e| WriteFailure::with_debug(name, &e))?;
        file.parameters.insert(
            name.to_string(),
            StoredParameter {
                value: value.to_string(),
                tier,
            },
        );
        self.save(&file).map_err(|e| WriteFailure::with_debug(name, &e))
    }

    async fn put_resource_policy(&self, resource_arn: &str, policy: &str) -> Result<(), CliError> {
        let policy = parse_json(policy, "resource policy")?;
        let mut file = self
            .load()
            .map_err(|e| WriteFailure::with_debug(resource_arn, &e))?;
        file.policies.insert(resource_arn.to_string(), policy);
        self.save(&file)
            .map_err(|e| WriteFailure::with_debug(resource_arn, &e))
    }
}

#[async_trait]
impl CallerIdentityProvider for LocalParameterStore {
    async fn caller_identity(&self) -> Result<CallerIdentity, CliError> {
        let file = self.load()?;
        let account_id = file
            .account_id
            .unwrap_or_else(|| LOCAL_ACCOUNT_ID.to_string());
        Ok(CallerIdentity {
            arn: format!("arn:aws:iam::{}:user/local", account_id),
            account_id,
            region: file.region.unwrap_or_else(|| LOCAL_REGION.to_string()),
        })
    }
}
