//! Contract value objects.

mod option_contract;
mod security_id;

pub use option_contract::{ContractIdentifier, Market, OptionRight, OptionStyle};
pub use security_id::SecurityId;
