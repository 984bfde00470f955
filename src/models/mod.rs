pub mod snapshot;
pub mod test_case;
pub mod test_status;

pub use snapshot::*;
pub use test_case::*;
pub use test_status::*;
