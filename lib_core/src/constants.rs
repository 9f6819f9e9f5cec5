pub const DEFAULT_SETTINGS_FILE: &str = "envctl.yaml";

pub const DEFAULT_ENVIRONMENT_PARAM: &str = "/aws-config/environment";
pub const DEFAULT_ENVIRONMENTS_DIR: &str = "account_environments";
pub const LEGACY_ENVIRONMENTS_DIR: &str = "account-environments";

pub const DEFAULT_CONFIG_ROOT: &str = "iac";
pub const DEFAULT_PARAM_PREFIX: &str = "/iac";
pub const DEFAULT_CONFIG_PARAM_TEMPLATE: &str = "{prefix}/{component}/{instance}/config";

pub const DEFAULT_ALLOWED_ROLE: &str = "OrgAdmin";

pub const TMP_CLONE_PREFIX: &str = "envctl-config-repo-";
