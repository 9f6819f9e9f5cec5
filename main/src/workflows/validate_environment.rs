use std::path::PathBuf;

use lib_core::{canonical_fields, compare_fields, CliError, FieldMismatch, ParameterStore, Printer};
use tracing::debug;

use super::load_local_descriptor;

#[derive(Debug, Clone)]
pub struct ValidateEnvironmentRequest {
    pub environment: String,
    pub environments_dir: PathBuf,
    pub parameter: String,
}

/// Compares the local descriptor with the stored one. Only keys of the local
/// document are checked; an empty result means the binding is current.
pub async fn validate_environment(
    pr: &Printer,
    store: &dyn ParameterStore,
    request: &ValidateEnvironmentRequest,
) -> Result<Vec<FieldMismatch>, CliError> {
    let (_, expected) = load_local_descriptor(pr, &request.environments_dir, &request.environment)?;
    pr.info(&format!("Reading parameter {}...", request.parameter));
    let stored = store.get_json(&request.parameter).await?;
    let actual = canonical_fields(stored, &format!("parameter {}", request.parameter))?;
    let mismatches = compare_fields(&expected.to_document(), &actual);
    debug!(mismatches = mismatches.len(), "compared environment descriptors");
    Ok(mismatches)
}
