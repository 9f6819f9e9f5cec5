mod management;
mod temporary;

pub use management::*;
pub use temporary::*;
