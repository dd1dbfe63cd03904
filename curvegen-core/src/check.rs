//! Regression checks over the compiled-in catalog.
//!
//! Exact checks use rational arithmetic, the rank check goes through the
//! floating-point [`LinearSystem`] so both views of each matrix agree.

use crate::catalog::SplineFamily;
use crate::conversion::{conversion_matrix, conversion_targets};
use crate::error::Result;
use crate::linear_system::LinearSystem;
use tracing::warn;

const RANK_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: String,
    pub expected: String,
    pub observed: String,
}

impl CheckOutcome {
    fn new(name: String, expected: impl ToString, observed: impl ToString) -> Self {
        let outcome = Self {
            name,
            expected: expected.to_string(),
            observed: observed.to_string(),
        };
        if !outcome.is_ok() {
            warn!(check = %outcome.name, expected = %outcome.expected, observed = %outcome.observed, "catalog mismatch");
        }
        outcome
    }

    pub fn is_ok(&self) -> bool {
        self.expected == self.observed
    }
}

/// Every characteristic matrix inverts exactly and has full numeric rank,
/// and every conversion pair composes to the identity.
pub fn check_catalog() -> Result<Vec<CheckOutcome>> {
    let mut outcomes = Vec::new();
    for family in SplineFamily::ALL {
        let m = family.characteristic_matrix();
        let roundtrip = m.multiply(&m.inverse()?)?;
        outcomes.push(CheckOutcome::new(
            format!("{} M·M⁻¹ = I", family),
            true,
            roundtrip.is_identity(),
        ));
        let rank = LinearSystem::from_rational(m).rank(RANK_TOLERANCE);
        outcomes.push(CheckOutcome::new(format!("{} rank", family), m.size(), rank));
    }
    for source in SplineFamily::ALL {
        for target in conversion_targets(source) {
            let there = conversion_matrix(source, target)?;
            let back = conversion_matrix(target, source)?;
            outcomes.push(CheckOutcome::new(
                format!("{} -> {} -> {}", source, target, source),
                true,
                back.multiply(&there)?.is_identity(),
            ));
        }
    }
    Ok(outcomes)
}
