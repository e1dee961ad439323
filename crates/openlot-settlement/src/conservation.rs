//! Funds conservation invariant checker.
//!
//! Every unit of currency that enters the auction is accounted for at all
//! times:
//! ```text
//! deposited == held_in_escrow + refunded_to_bidders + proceeds_paid_out
//! ```
//!
//! The tracker accumulates the three flow totals; [`FundsConservation::verify`]
//! compares what escrow actually holds against what the flows say it must
//! hold. A mismatch means funds were created or destroyed and the auction
//! state can no longer be trusted.

use openlot_types::{OpenlotError, Result};
use rust_decimal::Decimal;

/// Running totals of money in and money out.
#[derive(Debug, Clone, Copy, Default)]
pub struct FundsConservation {
    deposited: Decimal,
    refunded: Decimal,
    proceeds_paid: Decimal,
}

impl FundsConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a bid deposit entering escrow.
    pub fn record_deposit(&mut self, amount: Decimal) {
        self.deposited += amount;
    }

    /// Records funds leaving escrow back to a bidder, refund or excess.
    pub fn record_refund(&mut self, amount: Decimal) {
        self.refunded += amount;
    }

    /// Records funds leaving escrow to the operator treasury.
    pub fn record_proceeds(&mut self, amount: Decimal) {
        self.proceeds_paid += amount;
    }

    /// What escrow must hold right now for the books to balance.
    #[must_use]
    pub fn expected_held(&self) -> Decimal {
        self.deposited - self.refunded - self.proceeds_paid
    }

    /// Checks `actual_held` against the flow totals.
    ///
    /// # Errors
    /// Returns [`OpenlotError::ConservationViolation`] if the held amount
    /// does not match.
    pub fn verify(&self, actual_held: Decimal) -> Result<()> {
        let expected = self.expected_held();
        if actual_held != expected {
            return Err(OpenlotError::ConservationViolation {
                expected,
                actual: actual_held,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn total_deposited(&self) -> Decimal {
        self.deposited
    }

    #[must_use]
    pub fn total_refunded(&self) -> Decimal {
        self.refunded
    }

    #[must_use]
    pub fn total_proceeds_paid(&self) -> Decimal {
        self.proceeds_paid
    }
}
