//! Portfolio Bounded Context
//!
//! Read access to holdings, passed explicitly into every scenario callback.

mod snapshot;

pub use snapshot::PortfolioSnapshot;

use rust_decimal::Decimal;

use crate::domain::contract::SecurityId;

/// Read-only view of holdings at the moment a callback runs.
pub trait PortfolioView {
    /// Signed quantity held in `security` (zero when absent).
    fn holdings(&self, security: &SecurityId) -> Decimal;

    /// Every instrument with a non-zero quantity.
    fn open_positions(&self) -> Vec<(SecurityId, Decimal)>;

    /// True when any instrument has a non-zero quantity.
    fn invested(&self) -> bool {
        !self.open_positions().is_empty()
    }
}
