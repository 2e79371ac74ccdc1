//! Contract Bounded Context
//!
//! Identity of option contracts and the instruments around them.

mod occ;
pub mod value_objects;

pub use value_objects::{ContractIdentifier, Market, OptionRight, OptionStyle, SecurityId};
