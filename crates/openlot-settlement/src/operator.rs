//! One-shot operator proceeds withdrawal.
//!
//! After validation the operator collects the pot plus the clearing price of
//! every still-unredeemed winning claim, and takes back the unsold items.
//! That collection happens once; retrying returns
//! [`OpenlotError::OperatorAlreadyWithdrawn`].

use chrono::{DateTime, Utc};
use openlot_types::{AccountId, OpenlotError, OperatorWithdrawal, Result};
use rust_decimal::Decimal;

/// Records whether and how the operator has collected proceeds.
#[derive(Debug, Clone, Default)]
pub struct OperatorBook {
    withdrawal: Option<OperatorWithdrawal>,
}

impl OperatorBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Books the operator withdrawal of `funds` to `treasury`, with
    /// `items_returned` unsold items going back as well.
    ///
    /// # Errors
    /// Returns [`OpenlotError::OperatorAlreadyWithdrawn`] on a second call.
    pub fn record(
        &mut self,
        funds: Decimal,
        items_returned: usize,
        treasury: AccountId,
        now: DateTime<Utc>,
    ) -> Result<&OperatorWithdrawal> {
        if self.withdrawal.is_some() {
            return Err(OpenlotError::OperatorAlreadyWithdrawn);
        }
        Ok(self.withdrawal.insert(OperatorWithdrawal {
            funds,
            items_returned,
            treasury,
            withdrawn_at: now,
        }))
    }

    /// The booked withdrawal, if any.
    #[must_use]
    pub fn withdrawal(&self) -> Option<&OperatorWithdrawal> {
        self.withdrawal.as_ref()
    }

    /// Whether proceeds have been collected.
    #[must_use]
    pub fn has_withdrawn(&self) -> bool {
        self.withdrawal.is_some()
    }

    /// Funds collected so far, zero until the withdrawal happens.
    #[must_use]
    pub fn proceeds(&self) -> Decimal {
        self.withdrawal
            .as_ref()
            .map_or(Decimal::ZERO, |w| w.funds)
    }
}
