//! Selection Bounded Context
//!
//! Resolving one option contract out of a chain listing.

mod criteria;
mod errors;
mod selector;

pub use criteria::{SelectionCriteria, TieBreak};
pub use errors::{ContractMismatchError, SelectionError};
pub use selector::ContractSelector;
