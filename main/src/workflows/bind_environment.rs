use std::path::PathBuf;

use lib_core::{
    parameter_arn, CallerIdentityProvider, CliError, EnvironmentDescriptor, ParameterStore,
    ParameterTier, Printer, ResourcePolicy,
};
use tracing::info;

use super::load_local_descriptor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyRequest {
    Skip,
    /// Deny writes and deletes to everyone but this role of the caller's
    /// account.
    RestrictTo { role: String },
}

#[derive(Debug, Clone)]
pub struct BindRequest {
    pub environment: String,
    pub environments_dir: PathBuf,
    pub parameter: String,
    pub tier: ParameterTier,
    pub policy: PolicyRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    Attached {
        resource_arn: String,
        principal_arn: String,
    },
    Skipped,
    UnsupportedTier(ParameterTier),
}

#[derive(Debug, Clone)]
pub struct BindReport {
    pub parameter: String,
    pub descriptor: EnvironmentDescriptor,
    pub policy: PolicyOutcome,
}

/// Publishes `<dir>/<env>.json` as the account's environment descriptor,
/// replacing whatever was stored before, then optionally locks the parameter
/// down with a resource policy.
pub async fn bind_environment(
    pr: &Printer,
    store: &dyn ParameterStore,
    identity: &dyn CallerIdentityProvider,
    request: &BindRequest,
) -> Result<BindReport, CliError> {
    // Parsing validates the descriptor, so nothing is written for a bad file.
    let (_, descriptor) =
        load_local_descriptor(pr, &request.environments_dir, &request.environment)?;

    pr.info(&format!(
        "Writing parameter {} to the parameter store ({} tier)...",
        request.parameter, request.tier
    ));
    store
        .put(&request.parameter, &descriptor.to_json(), request.tier)
        .await?;
    pr.success("Parameter written successfully.");
    info!(parameter = %request.parameter, environment = %descriptor.name, "bound environment");

    let policy = match &request.policy {
        PolicyRequest::Skip => PolicyOutcome::Skipped,
        PolicyRequest::RestrictTo { .. } if !request.tier.supports_resource_policies() => {
            PolicyOutcome::UnsupportedTier(request.tier)
        }
        PolicyRequest::RestrictTo { role } => {
            let caller = identity.caller_identity().await?;
            let policy = ResourcePolicy::deny_writes_except_role(&caller.account_id, role);
            let resource_arn = parameter_arn(&caller.region, &caller.account_id, &request.parameter);
            pr.info(&format!("Applying restrictive policy to {}...", request.parameter));
            store
                .put_resource_policy(&resource_arn, &policy.to_json())
                .await?;
            pr.success("Policy applied successfully.");
            PolicyOutcome::Attached {
                resource_arn,
                principal_arn: policy.principal_arn().to_string(),
            }
        }
    };

    Ok(BindReport {
        parameter: request.parameter.clone(),
        descriptor,
        policy,
    })
}
