pub mod file_operations;
pub mod markdown;

pub use file_operations::*;
pub use markdown::*;
