//! Contract Selector
//!
//! Pure selection of exactly one contract from a chain.

use std::cmp::Ordering;

use tracing::debug;

use super::criteria::{SelectionCriteria, TieBreak};
use super::errors::{ContractMismatchError, SelectionError};
use crate::domain::contract::ContractIdentifier;

/// Picks exactly one contract from a candidate list.
pub struct ContractSelector;

impl ContractSelector {
    /// Select the highest-strike candidate that passes `criteria`.
    ///
    /// Deterministic and side-effect free: the same candidates and criteria
    /// always yield the same result regardless of candidate order.
    ///
    /// # Errors
    ///
    /// - `SelectionError::NoMatch` if nothing passes the predicate.
    /// - `SelectionError::Ambiguous` if several survivors share the top strike
    ///   and the tie-break policy is `Reject`.
    pub fn select(
        candidates: &[ContractIdentifier],
        criteria: &SelectionCriteria,
    ) -> Result<ContractIdentifier, SelectionError> {
        let mut survivors: Vec<&ContractIdentifier> =
            candidates.iter().filter(|c| criteria.matches(c)).collect();

        survivors.sort_by(|a, b| b.strike().cmp(&a.strike()).then_with(|| a.cmp(b)));
        survivors.dedup();

        let Some(top_strike) = survivors.first().map(|c| c.strike()) else {
            return Err(SelectionError::NoMatch {
                criteria: criteria.to_string(),
                candidates: candidates.len(),
            });
        };

        let mut tied: Vec<&ContractIdentifier> = survivors
            .into_iter()
            .take_while(|c| c.strike() == top_strike)
            .collect();

        debug!(
            criteria = %criteria,
            candidates = candidates.len(),
            tied = tied.len(),
            strike = %top_strike,
            "Contract selection filtered chain"
        );

        if tied.len() > 1 {
            match criteria.tie_break {
                TieBreak::Reject => {
                    let mut tickers: Vec<String> = tied.iter().map(|c| c.occ_ticker()).collect();
                    tickers.sort();
                    return Err(SelectionError::Ambiguous {
                        strike: top_strike,
                        tied: tickers,
                    });
                }
                TieBreak::EarliestExpiration => tied.sort_by(|a, b| {
                    a.expiration()
                        .cmp(&b.expiration())
                        .then_with(|| by_ticker(a, b))
                }),
                TieBreak::LowestTicker => tied.sort_by(|a, b| by_ticker(a, b)),
            }
        }

        Ok(tied[0].clone())
    }

    /// Cross-check a selected contract against one built from literals.
    ///
    /// # Errors
    ///
    /// Returns `ContractMismatchError` if the two differ in any field.
    pub fn verify(
        selected: &ContractIdentifier,
        expected: &ContractIdentifier,
    ) -> Result<(), ContractMismatchError> {
        if selected == expected {
            Ok(())
        } else {
            Err(ContractMismatchError {
                expected: expected.clone(),
                actual: selected.clone(),
            })
        }
    }
}

fn by_ticker(a: &ContractIdentifier, b: &ContractIdentifier) -> Ordering {
    a.occ_ticker().cmp(&b.occ_ticker()).then_with(|| a.cmp(b))
}
