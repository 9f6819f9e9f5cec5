//! One module per operation. Each workflow is a single linear sequence
//! against the parameter store (and, for configs, the repository fetcher):
//! nothing is retried and nothing is rolled back.

mod bind_environment;
mod deploy_config;
mod show_environment;
mod validate_config;
mod validate_environment;

pub use bind_environment::*;
pub use deploy_config::*;
pub use show_environment::*;
pub use validate_config::*;
pub use validate_environment::*;

use std::path::{Path, PathBuf};

use lib_core::{
    read_file, require_path_segment, CliError, ConfigInstance, ConfigPath, EnvironmentDescriptor,
    MissingLocalFile, MissingRemoteParameter, MissingRequiredField, ParameterStore, Printer,
    CONFIG_BRANCH_FIELD, CONFIG_REPO_FIELD,
};
use lib_git::with_repository_snapshot;
use tracing::debug;

/// Where config instances are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A config tree already present on disk.
    LocalTree(PathBuf),
    /// A fresh clone of the repository recorded in the environment
    /// descriptor, with optional overrides.
    Repository {
        repo: Option<String>,
        branch: Option<String>,
    },
}

/// `<dir>/<env>.json`, parsed and validated.
pub fn load_local_descriptor(
    pr: &Printer,
    environments_dir: &Path,
    environment: &str,
) -> Result<(PathBuf, EnvironmentDescriptor), CliError> {
    require_path_segment("environment", environment)?;
    let file = environments_dir.join(format!("{}.json", environment));
    if !file.is_file() {
        return Err(MissingLocalFile::new(&file.display()));
    }
    pr.info(&format!("Loading environment descriptor from {}", file.display()));
    let descriptor = EnvironmentDescriptor::from_json_str(&read_file(&file)?, &file.display().to_string())?;
    debug!(environment = %descriptor.name, file = %file.display(), "loaded local descriptor");
    Ok((file, descriptor))
}

/// Reads the descriptor currently bound to the account. With `optional`, a
/// missing parameter yields `Ok(None)` instead of an error.
pub async fn resolve_environment(
    store: &dyn ParameterStore,
    parameter: &str,
    optional: bool,
) -> Result<Option<EnvironmentDescriptor>, CliError> {
    let source_name = format!("parameter {}", parameter);
    match store.get(parameter).await? {
        Some(value) => {
            let descriptor = EnvironmentDescriptor::from_json_str(&value, &source_name)?;
            debug!(environment = %descriptor.name, parameter, "resolved environment");
            Ok(Some(descriptor))
        }
        None if optional => Ok(None),
        None => Err(MissingRemoteParameter::new(parameter)),
    }
}

/// Repository URL and branch: explicit overrides first, then the descriptor.
pub fn repository_location(
    descriptor: &EnvironmentDescriptor,
    environment_param: &str,
    repo: Option<&str>,
    branch: Option<&str>,
) -> Result<(String, String), CliError> {
    let source_name = format!("parameter {}", environment_param);
    let repo = repo
        .map(str::to_string)
        .or_else(|| descriptor.config_repo.clone())
        .ok_or_else(|| MissingRequiredField::new(CONFIG_REPO_FIELD, &source_name))?;
    let branch = branch
        .map(str::to_string)
        .or_else(|| descriptor.config_branch.clone())
        .ok_or_else(|| MissingRequiredField::new(CONFIG_BRANCH_FIELD, &source_name))?;
    Ok((repo, branch))
}

/// Runs `f` with the root of the config tree selected by `source`. A cloned
/// tree only lives for the duration of `f`.
pub(crate) fn with_config_root<F, R>(
    pr: &Printer,
    descriptor: &EnvironmentDescriptor,
    environment_param: &str,
    source: &ConfigSource,
    f: F,
) -> Result<R, CliError>
where
    F: FnOnce(&Path) -> Result<R, CliError>,
{
    match source {
        ConfigSource::LocalTree(root) => f(root),
        ConfigSource::Repository { repo, branch } => {
            let (repo, branch) = repository_location(
                descriptor,
                environment_param,
                repo.as_deref(),
                branch.as_deref(),
            )?;
            with_repository_snapshot(pr, &repo, &branch, f)
        }
    }
}

pub(crate) fn load_instance(
    pr: &Printer,
    descriptor: &EnvironmentDescriptor,
    environment_param: &str,
    source: &ConfigSource,
    config: &ConfigPath,
) -> Result<ConfigInstance, CliError> {
    with_config_root(pr, descriptor, environment_param, source, |root| {
        ConfigInstance::load(root, &descriptor.name, config)
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use std::{fs, path::Path, sync::Mutex};

    use async_trait::async_trait;
    use git2::{IndexAddOption, Repository, Signature};
    use lib_core::{CliError, LocalParameterStore, ParameterStore, ParameterTier};

    /// Local store that also records every write attempt.
    pub struct RecordingStore {
        pub inner: LocalParameterStore,
        pub puts: Mutex<Vec<(String, String)>>,
        pub policies: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        pub fn new(dir: &Path) -> Self {
            RecordingStore {
                inner: LocalParameterStore::new(dir.join("params.json")),
                puts: Mutex::new(Vec::new()),
                policies: Mutex::new(Vec::new()),
            }
        }

        pub fn put_count(&self) -> usize {
            self.puts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ParameterStore for RecordingStore {
        async fn get(&self, name: &str) -> Result<Option<String>, CliError> {
            self.inner.get(name).await
        }

        async fn put(&self, name: &str, value: &str, tier: ParameterTier) -> Result<(), CliError> {
            self.puts
                .lock()
                .unwrap()
                .push((name.to_string(), value.to_string()));
            self.inner.put(name, value, tier).await
        }

        async fn put_resource_policy(&self, resource_arn: &str, policy: &str) -> Result<(), CliError> {
            self.policies.lock().unwrap().push(resource_arn.to_string());
            self.inner.put_resource_policy(resource_arn, policy).await
        }
    }

    pub fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// Git repository at `dir` with one commit on `branch` holding `files`.
    pub fn git_repo(dir: &Path, branch: &str, files: &[(&str, &str)]) {
        let repo = Repository::init(dir).unwrap();
        for (relative, content) in files {
            write(dir, relative, content);
        }
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let signature = Signature::now("envctl", "envctl@example.com").unwrap();
        let reference = format!("refs/heads/{}", branch);
        repo.commit(Some(&reference), &signature, &signature, "initial", &tree, &[])
            .unwrap();
        repo.set_head(&reference).unwrap();
    }
}
