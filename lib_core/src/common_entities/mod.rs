mod config_instance;
mod environment_descriptor;
mod parameter_tier;
mod resource_policy;

pub use config_instance::*;
pub use environment_descriptor::*;
pub use parameter_tier::*;
pub use resource_policy::*;
