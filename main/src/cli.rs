use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lib_aws::{load_sdk_config, SsmParameterStore, StsIdentity};
use lib_core::{
    define_cli_error, pretty_json, CallerIdentityProvider, CliError, ConfigPath,
    LocalParameterStore, ParameterStore, ParameterTier, Printer, Settings,
};
use serde_json::Value;
use tracing::debug;

use crate::workflows::{
    bind_environment, deploy_config, show_environment, validate_config, validate_environment,
    BindRequest, ConfigCheck, ConfigSource, DeployMode, DeployOutcome, DeployRequest,
    PolicyOutcome, PolicyRequest, ValidateConfigRequest, ValidateEnvironmentRequest,
};

define_cli_error!(
    MissingConfigSelector,
    "Select a config with --config <component>/<instance> or with --component and --nickname."
);

#[derive(Parser, Debug)]
#[command(
    name = "envctl",
    about = "Bind AWS accounts to an environment and deploy per-component config through SSM Parameter Store",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Settings file (defaults to ./envctl.yaml when present)
    #[arg(long, global = true, env = "ENVCTL_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Use a JSON file as the parameter store instead of AWS
    #[arg(long, global = true, env = "ENVCTL_LOCAL_STORE")]
    pub local_store: Option<PathBuf>,

    /// AWS profile
    #[arg(long, global = true, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, global = true, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct EnvironmentParam {
    /// Parameter holding the environment descriptor
    #[arg(long = "param-name", env = "ENVCTL_ENVIRONMENT_PARAM")]
    pub param_name: Option<String>,
}

#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = true)]
pub struct ConfigSelector {
    /// Config as <component>/<instance>
    #[arg(long, conflicts_with_all = ["component", "nickname"])]
    pub config: Option<String>,

    /// Component name
    #[arg(long, requires = "nickname")]
    pub component: Option<String>,

    /// Instance nickname
    #[arg(long, requires = "component")]
    pub nickname: Option<String>,
}

impl ConfigSelector {
    pub fn resolve(&self) -> Result<ConfigPath, CliError> {
        match (&self.config, &self.component, &self.nickname) {
            (Some(config), _, _) => ConfigPath::parse(config),
            (None, Some(component), Some(nickname)) => ConfigPath::new(component, nickname),
            _ => Err(MissingConfigSelector::new()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write <path>/<env>.json to the environment parameter
    DefineEnvironment {
        /// Environment name (dev, prod, ...)
        #[arg(long)]
        env: String,

        /// Directory holding the environment descriptors
        #[arg(long)]
        path: Option<PathBuf>,

        #[command(flatten)]
        param: EnvironmentParam,

        /// Parameter tier
        #[arg(long, value_enum)]
        tier: Option<ParameterTier>,

        /// Only role allowed to overwrite the parameter
        #[arg(long)]
        allow_role: Option<String>,

        /// Do not attach a resource policy
        #[arg(long)]
        skip_policy: bool,
    },

    /// Compare <path>/<env>.json against the environment parameter
    ValidateEnvironment {
        /// Environment name (dev, prod, ...)
        #[arg(long)]
        env: String,

        /// Directory holding the environment descriptors
        #[arg(long)]
        path: Option<PathBuf>,

        #[command(flatten)]
        param: EnvironmentParam,
    },

    /// Print the environment descriptor bound to the account
    ShowEnvironment {
        #[command(flatten)]
        param: EnvironmentParam,
    },

    /// Publish a config file for the bound environment
    DeployConfig {
        #[command(flatten)]
        selector: ConfigSelector,

        #[command(flatten)]
        param: EnvironmentParam,

        /// Local config tree (defaults to ./iac)
        #[arg(long, conflicts_with_all = ["from_repo", "repo", "branch"])]
        config_root: Option<PathBuf>,

        /// Clone the config repository named by the environment descriptor
        #[arg(long)]
        from_repo: bool,

        /// Repository URL, overriding the descriptor
        #[arg(long, requires = "from_repo")]
        repo: Option<String>,

        /// Branch, overriding the descriptor
        #[arg(long, requires = "from_repo")]
        branch: Option<String>,

        /// Prefix of the target parameter
        #[arg(long, env = "IAC_PARAM_PREFIX")]
        prefix: Option<String>,

        /// Parameter tier
        #[arg(long, value_enum)]
        tier: Option<ParameterTier>,

        /// Skip instead of failing when no environment is bound
        #[arg(long)]
        optional_environment: bool,
    },

    /// Print what deploy-config would publish, without writing
    PreviewConfig {
        #[command(flatten)]
        selector: ConfigSelector,

        #[command(flatten)]
        param: EnvironmentParam,

        /// Local config tree, instead of cloning the repository
        #[arg(long, conflicts_with_all = ["repo", "branch"])]
        config_root: Option<PathBuf>,

        /// Repository URL, overriding the descriptor
        #[arg(long)]
        repo: Option<String>,

        /// Branch, overriding the descriptor
        #[arg(long)]
        branch: Option<String>,

        /// Prefix of the target parameter
        #[arg(long, env = "IAC_PARAM_PREFIX")]
        prefix: Option<String>,
    },

    /// Check that the config file exists and is valid JSON
    ValidateConfig {
        #[command(flatten)]
        selector: ConfigSelector,

        #[command(flatten)]
        param: EnvironmentParam,

        /// Local config tree, instead of cloning the repository
        #[arg(long, conflicts_with_all = ["repo", "branch"])]
        config_root: Option<PathBuf>,

        /// Repository URL, overriding the descriptor
        #[arg(long)]
        repo: Option<String>,

        /// Branch, overriding the descriptor
        #[arg(long)]
        branch: Option<String>,
    },
}

/// Parameter store and identity service used by one invocation.
pub struct Backend {
    pub store: Box<dyn ParameterStore>,
    pub identity: Box<dyn CallerIdentityProvider>,
}

impl Backend {
    pub async fn connect(global: &GlobalArgs, settings: &Settings) -> Backend {
        if let Some(path) = &global.local_store {
            debug!(path = %path.display(), "using local parameter store");
            let store = LocalParameterStore::new(path);
            return Backend {
                store: Box::new(store.clone()),
                identity: Box::new(store),
            };
        }
        let profile = settings.aws_profile(global.profile.as_deref());
        let region = settings.aws_region(global.region.as_deref());
        let config = load_sdk_config(profile.as_deref(), region.as_deref()).await;
        Backend {
            store: Box::new(SsmParameterStore::new(&config)),
            identity: Box::new(StsIdentity::new(&config)),
        }
    }
}

fn remote_source(config_root: Option<PathBuf>, repo: Option<String>, branch: Option<String>) -> ConfigSource {
    match config_root {
        Some(root) => ConfigSource::LocalTree(root),
        None => ConfigSource::Repository { repo, branch },
    }
}

/// Runs one command. `Ok(false)` means the command ran but its check failed
/// (mismatch, missing or invalid config), which maps to exit code 1.
pub async fn execute(cli: Cli) -> Result<bool, CliError> {
    let pr = Printer::new();
    let settings = Settings::load(cli.global.settings.as_deref())?;
    let backend = Backend::connect(&cli.global, &settings).await;
    let store = backend.store.as_ref();

    match cli.command {
        Command::DefineEnvironment {
            env,
            path,
            param,
            tier,
            allow_role,
            skip_policy,
        } => {
            let request = BindRequest {
                environment: env,
                environments_dir: settings.environments_dir(path.as_deref()),
                parameter: settings.environment_param(param.param_name.as_deref()),
                tier: settings.tier(tier),
                policy: if skip_policy {
                    PolicyRequest::Skip
                } else {
                    PolicyRequest::RestrictTo {
                        role: settings.allowed_role(allow_role.as_deref()),
                    }
                },
            };
            let report = bind_environment(&pr, store, backend.identity.as_ref(), &request).await?;
            match report.policy {
                PolicyOutcome::Attached { principal_arn, .. } => {
                    pr.item(&format!("Only {} may modify {}.", principal_arn, report.parameter));
                }
                PolicyOutcome::Skipped => pr.info("Skipping resource policy."),
                PolicyOutcome::UnsupportedTier(tier) => pr.warn(&format!(
                    "Resource policies are not supported on the {} tier; skipping policy.",
                    tier
                )),
            }
            Ok(true)
        }

        Command::ValidateEnvironment { env, path, param } => {
            let request = ValidateEnvironmentRequest {
                environment: env,
                environments_dir: settings.environments_dir(path.as_deref()),
                parameter: settings.environment_param(param.param_name.as_deref()),
            };
            let mismatches = validate_environment(&pr, store, &request).await?;
            if mismatches.is_empty() {
                pr.success(&format!(
                    "Parameter {} matches environment '{}'.",
                    request.parameter, request.environment
                ));
                return Ok(true);
            }
            pr.error(&format!(
                "Parameter {} does not match environment '{}':",
                request.parameter, request.environment
            ));
            for mismatch in &mismatches {
                pr.item(&mismatch.to_string());
            }
            Ok(false)
        }

        Command::ShowEnvironment { param } => {
            let parameter = settings.environment_param(param.param_name.as_deref());
            let descriptor = show_environment(store, &parameter).await?;
            pr.info(&pretty_json(&Value::Object(descriptor.to_document()))?);
            Ok(true)
        }

        Command::DeployConfig {
            selector,
            param,
            config_root,
            from_repo,
            repo,
            branch,
            prefix,
            tier,
            optional_environment,
        } => {
            let source = if from_repo {
                ConfigSource::Repository { repo, branch }
            } else {
                ConfigSource::LocalTree(settings.config_root(config_root.as_deref()))
            };
            let request = DeployRequest {
                config: selector.resolve()?,
                environment_param: settings.environment_param(param.param_name.as_deref()),
                environment_optional: optional_environment,
                source,
                target: settings.config_param_template()?,
                prefix: settings.param_prefix(prefix.as_deref()),
                tier: settings.tier(tier),
                mode: DeployMode::Publish,
            };
            report_deploy(&pr, &request, deploy_config(&pr, store, &request).await?);
            Ok(true)
        }

        Command::PreviewConfig {
            selector,
            param,
            config_root,
            repo,
            branch,
            prefix,
        } => {
            let request = DeployRequest {
                config: selector.resolve()?,
                environment_param: settings.environment_param(param.param_name.as_deref()),
                environment_optional: false,
                source: remote_source(config_root, repo, branch),
                target: settings.config_param_template()?,
                prefix: settings.param_prefix(prefix.as_deref()),
                tier: settings.tier(None),
                mode: DeployMode::Preview,
            };
            report_deploy(&pr, &request, deploy_config(&pr, store, &request).await?);
            Ok(true)
        }

        Command::ValidateConfig {
            selector,
            param,
            config_root,
            repo,
            branch,
        } => {
            let request = ValidateConfigRequest {
                config: selector.resolve()?,
                environment_param: settings.environment_param(param.param_name.as_deref()),
                source: remote_source(config_root, repo, branch),
            };
            match validate_config(&pr, store, &request).await? {
                ConfigCheck::Valid { file } => {
                    pr.success(&format!("Config file {} exists and is valid JSON.", file.display()));
                    Ok(true)
                }
                ConfigCheck::Missing { file } => {
                    pr.error(&format!("Config file not found: {}", file.display()));
                    Ok(false)
                }
                ConfigCheck::Invalid { file, reason } => {
                    pr.error(&format!("Config file {} is not valid JSON.", file.display()));
                    pr.item(&reason);
                    Ok(false)
                }
            }
        }
    }
}

fn report_deploy(pr: &Printer, request: &DeployRequest, outcome: DeployOutcome) {
    match outcome {
        DeployOutcome::Published { parameter, .. } => {
            pr.success(&format!("Deployed {} to {}.", request.config, parameter));
        }
        DeployOutcome::Previewed { parameter, payload } => {
            pr.section_open(&format!("Dry run: would write {} to {}", request.config, parameter));
            pr.info(&payload);
            pr.section_close();
        }
        DeployOutcome::NoEnvironment { .. } => {}
    }
}
