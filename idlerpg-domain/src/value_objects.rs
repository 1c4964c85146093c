// Domain value objects
pub mod identifiers;
pub mod penalty_kind;
pub mod store_keys;

pub use identifiers::*;
pub use penalty_kind::*;
pub use store_keys::*;
