use lib_core::{
    CliError, ConfigParameterTemplate, ConfigPath, ParameterStore, ParameterTier, Printer,
};
use tracing::info;

use super::{load_instance, resolve_environment, ConfigSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployMode {
    /// Write the payload to the target parameter.
    Publish,
    /// Print the payload that would be written. Never writes.
    Preview,
}

#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub config: ConfigPath,
    pub environment_param: String,
    /// Skip, rather than fail, when no environment is bound.
    pub environment_optional: bool,
    pub source: ConfigSource,
    pub target: ConfigParameterTemplate,
    pub prefix: String,
    pub tier: ParameterTier,
    pub mode: DeployMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Published { parameter: String, payload: String },
    Previewed { parameter: String, payload: String },
    /// The environment parameter does not exist and was marked optional.
    NoEnvironment { environment_param: String },
}

/// Resolves the bound environment, loads
/// `<root>/<env>/<component>/<instance>/config.json` and publishes it in
/// compact form under the templated target parameter.
pub async fn deploy_config(
    pr: &Printer,
    store: &dyn ParameterStore,
    request: &DeployRequest,
) -> Result<DeployOutcome, CliError> {
    let Some(descriptor) = resolve_environment(
        store,
        &request.environment_param,
        request.environment_optional,
    )
    .await?
    else {
        pr.warn(&format!(
            "Parameter {} not found; skipping deployment.",
            request.environment_param
        ));
        return Ok(DeployOutcome::NoEnvironment {
            environment_param: request.environment_param.clone(),
        });
    };
    pr.info(&format!("Environment: {}", descriptor.name));

    let parameter = request.target.get(
        &request.prefix,
        request.config.component(),
        request.config.instance(),
    )?;
    let instance = load_instance(
        pr,
        &descriptor,
        &request.environment_param,
        &request.source,
        &request.config,
    )?;
    let payload = instance.compact();

    match request.mode {
        DeployMode::Publish => {
            store.put(&parameter, &payload, request.tier).await?;
            info!(parameter = %parameter, bytes = payload.len(), "deployed config");
            Ok(DeployOutcome::Published { parameter, payload })
        }
        DeployMode::Preview => Ok(DeployOutcome::Previewed { parameter, payload }),
    }
}
