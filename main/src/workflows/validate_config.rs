use std::path::{Path, PathBuf};

use lib_core::{
    CliError, ConfigInstance, ConfigPath, IOError, InvalidJson, MissingLocalFile,
    MissingRemoteParameter, ParameterStore, Printer,
};
use tracing::debug;

use super::{resolve_environment, with_config_root, ConfigSource};

#[derive(Debug, Clone)]
pub struct ValidateConfigRequest {
    pub config: ConfigPath,
    pub environment_param: String,
    pub source: ConfigSource,
}

/// Result of checking one config file. `file` is relative to the checkout
/// when the tree was cloned, since the checkout is gone by the time this is
/// reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigCheck {
    Valid { file: PathBuf },
    Missing { file: PathBuf },
    Invalid { file: PathBuf, reason: String },
}

impl ConfigCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, ConfigCheck::Valid { .. })
    }
}

/// Confirms that the config file for the bound environment exists and parses.
/// Lookup failures (no environment, no repository, failed clone) are errors;
/// a missing or malformed file is a failed check.
pub async fn validate_config(
    pr: &Printer,
    store: &dyn ParameterStore,
    request: &ValidateConfigRequest,
) -> Result<ConfigCheck, CliError> {
    let descriptor = resolve_environment(store, &request.environment_param, false)
        .await?
        .ok_or_else(|| MissingRemoteParameter::new(&request.environment_param))?;
    pr.info(&format!("Environment: {}", descriptor.name));

    let cloned = matches!(request.source, ConfigSource::Repository { .. });
    with_config_root(
        pr,
        &descriptor,
        &request.environment_param,
        &request.source,
        |root| {
            let file = request.config.config_file(root, &descriptor.name)?;
            let shown = if cloned {
                display_path(root, &file)
            } else {
                file.clone()
            };
            let check = match ConfigInstance::load(root, &descriptor.name, &request.config) {
                Ok(_) => ConfigCheck::Valid { file: shown },
                Err(e) if e.is::<MissingLocalFile>() => ConfigCheck::Missing { file: shown },
                // Unreadable content (ex. not UTF-8) fails the check the same way.
                Err(e) if e.is::<InvalidJson>() || e.is::<IOError>() => ConfigCheck::Invalid {
                    file: shown,
                    reason: e.to_string(),
                },
                Err(e) => return Err(e),
            };
            debug!(config = %request.config, valid = check.is_valid(), "checked config");
            Ok(check)
        },
    )
}

fn display_path(root: &Path, file: &Path) -> PathBuf {
    file.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| file.to_path_buf())
}
