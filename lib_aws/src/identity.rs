use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sts::Client;
use lib_core::{define_cli_error, CallerIdentity, CallerIdentityProvider, CliError};
use tracing::debug;

use crate::require_aws_account_id;

define_cli_error!(IdentityLookupFailure, "Failed to resolve the caller identity via AWS STS.");
define_cli_error!(
    MissingRegion,
    "No AWS region configured. Pass --region, set AWS_REGION, or configure one for the profile."
);

/// Caller identity resolved through STS `GetCallerIdentity`.
#[derive(Debug, Clone)]
pub struct StsIdentity {
    client: Client,
    region: Option<String>,
}

impl StsIdentity {
    pub fn new(config: &SdkConfig) -> Self {
        StsIdentity {
            client: Client::new(config),
            region: config.region().map(|r| r.as_ref().to_string()),
        }
    }
}

#[async_trait]
impl CallerIdentityProvider for StsIdentity {
    async fn caller_identity(&self) -> Result<CallerIdentity, CliError> {
        let region = self.region.clone().ok_or_else(MissingRegion::new)?;
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| IdentityLookupFailure::with_debug(&e))?;
        let account_id = require_aws_account_id(
            output
                .account()
                .ok_or_else(|| IdentityLookupFailure::with_debug("response has no account"))?,
        )?;
        let arn = output
            .arn()
            .ok_or_else(|| IdentityLookupFailure::with_debug("response has no ARN"))?
            .to_string();
        debug!(account_id = %account_id, arn = %arn, region = %region, "resolved caller identity");
        Ok(CallerIdentity {
            account_id,
            arn,
            region,
        })
    }
}
