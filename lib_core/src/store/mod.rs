mod local;

pub use local::*;

use async_trait::async_trait;
use serde_json::Value;

use crate::{parse_json, CliError, MissingRemoteParameter, ParameterTier};

/// Key-value store holding one string document per parameter name.
///
/// Writes overwrite unconditionally and nothing is retried: a failed call is
/// surfaced to the caller as is.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// `Ok(None)` when no parameter exists under `name`.
    async fn get(&self, name: &str) -> Result<Option<String>, CliError>;

    async fn put(&self, name: &str, value: &str, tier: ParameterTier) -> Result<(), CliError>;

    async fn put_resource_policy(&self, resource_arn: &str, policy: &str) -> Result<(), CliError>;

    async fn get_required(&self, name: &str) -> Result<String, CliError> {
        self.get(name)
            .await?
            .ok_or_else(|| MissingRemoteParameter::new(name))
    }

    async fn get_json(&self, name: &str) -> Result<Value, CliError> {
        let value = self.get_required(name).await?;
        parse_json(&value, &format!("parameter {}", name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account_id: String,
    pub arn: String,
    pub region: String,
}

/// Resolves who is calling, and where.
#[async_trait]
pub trait CallerIdentityProvider: Send + Sync {
    async fn caller_identity(&self) -> Result<CallerIdentity, CliError>;
}
