pub mod cli;
pub mod workflows;
