mod account;
mod identity;
mod shared_config;
mod ssm;

pub use account::*;
pub use identity::*;
pub use shared_config::*;
pub use ssm::*;
