mod clone;

pub use clone::*;
