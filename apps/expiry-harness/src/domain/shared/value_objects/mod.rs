//! Shared Value Objects
//!
//! Immutable domain types used across bounded contexts.
//! Value objects are compared by value, not identity.

mod identifiers;
mod symbol;
mod timestamp;

pub use identifiers::OrderId;
pub use symbol::{MAX_ROOT_LEN, Symbol};
pub use timestamp::Timestamp;
