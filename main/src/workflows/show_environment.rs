use lib_core::{CliError, EnvironmentDescriptor, MissingRemoteParameter, ParameterStore};

use super::resolve_environment;

/// The descriptor currently bound to the account.
pub async fn show_environment(
    store: &dyn ParameterStore,
    parameter: &str,
) -> Result<EnvironmentDescriptor, CliError> {
    let descriptor = resolve_environment(store, parameter, false).await?;
    // Only an optional lookup can come back empty.
    descriptor.ok_or_else(|| MissingRemoteParameter::new(parameter))
}
