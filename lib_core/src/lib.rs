mod cli_error;
mod common_entities;
mod config;
mod constants;
mod files;
mod printer;
mod processing;
mod store;

pub use cli_error::*;
pub use common_entities::*;
pub use config::*;
pub use constants::*;
pub use files::*;
pub use printer::*;
pub use processing::*;
pub use store::*;
