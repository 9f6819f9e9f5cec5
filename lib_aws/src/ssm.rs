use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_ssm::{
    types::{ParameterTier as SsmParameterTier, ParameterType},
    Client,
};
use lib_core::{CliError, ParameterStore, ParameterTier, ReadFailure, WriteFailure};
use tracing::debug;

/// Parameter store backed by AWS SSM Parameter Store.
///
/// Values are plain `String` parameters; reads never request decryption.
#[derive(Debug, Clone)]
pub struct SsmParameterStore {
    client: Client,
}

impl SsmParameterStore {
    pub fn new(config: &SdkConfig) -> Self {
        SsmParameterStore {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get(&self, name: &str) -> Result<Option<String>, CliError> {
        debug!(parameter = name, "reading SSM parameter");
        let output = match self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(false)
            .send()
            .await
        {
            Ok(output) => output,
            Err(e)
                if e.as_service_error()
                    .map(|e| e.is_parameter_not_found())
                    .unwrap_or(false) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(ReadFailure::with_debug(name, &e)),
        };
        Ok(output.parameter.and_then(|parameter| parameter.value))
    }

    async fn put(&self, name: &str, value: &str, tier: ParameterTier) -> Result<(), CliError> {
        debug!(parameter = name, tier = %tier, bytes = value.len(), "writing SSM parameter");
        self.client
            .put_parameter()
            .name(name)
            .value(value)
            .r#type(ParameterType::String)
            .overwrite(true)
            .tier(ssm_tier(tier))
            .send()
            .await
            .map_err(|e| WriteFailure::with_debug(name, &e))?;
        Ok(())
    }

    async fn put_resource_policy(&self, resource_arn: &str, policy: &str) -> Result<(), CliError> {
        debug!(resource_arn, "attaching SSM resource policy");
        self.client
            .put_resource_policy()
            .resource_arn(resource_arn)
            .policy(policy)
            .send()
            .await
            .map_err(|e| WriteFailure::with_debug(resource_arn, &e))?;
        Ok(())
    }
}

fn ssm_tier(tier: ParameterTier) -> SsmParameterTier {
    SsmParameterTier::from(tier.as_aws_str())
}
