mod parameterized_string;
mod settings;

pub use parameterized_string::*;
pub use settings::*;
