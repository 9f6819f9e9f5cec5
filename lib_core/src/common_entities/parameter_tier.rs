use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Storage tier of a parameter-store entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[clap(rename_all = "kebab-case")]
pub enum ParameterTier {
    #[default]
    Standard,
    Advanced,
    IntelligentTiering,
}

impl ParameterTier {
    /// Resource policies can only be attached to advanced-tier parameters.
    /// Intelligent tiering may still store the value as standard, so it does
    /// not qualify either.
    pub fn supports_resource_policies(&self) -> bool {
        matches!(self, ParameterTier::Advanced)
    }

    /// Tier name as the AWS API spells it.
    pub fn as_aws_str(&self) -> &'static str {
        match self {
            ParameterTier::Standard => "Standard",
            ParameterTier::Advanced => "Advanced",
            ParameterTier::IntelligentTiering => "Intelligent-Tiering",
        }
    }
}

impl std::fmt::Display for ParameterTier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        serde::Serialize::serialize(self, f)
    }
}
