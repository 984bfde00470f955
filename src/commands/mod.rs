pub mod fetch;
pub mod format;
pub mod sync;

pub use fetch::*;
pub use format::*;
pub use sync::*;
