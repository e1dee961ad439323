//! Escrowed balance ledger.
//!
//! Tracks the funds the auction holds on each bidder's behalf, plus the
//! proceeds sub-account ("pot") that accumulates cleared sale revenue
//! between redemptions and the operator withdrawal. All mutations are
//! atomic: either the full operation succeeds or the ledger is unchanged.

use std::collections::HashMap;

use openlot_types::{AccountId, OpenlotError, Result};
use rust_decimal::Decimal;

/// The auction's escrow book: who is owed what.
///
/// The ledger is the single source of truth for balances. The bidder
/// registry holds ordering only, so the two structures cannot disagree
/// about an amount.
pub struct EscrowLedger {
    /// Per-bidder escrowed balance. Entries are removed when they reach
    /// zero, so `holders()` counts live balances.
    balances: HashMap<AccountId, Decimal>,
    /// Cleared sale revenue awaiting the operator withdrawal.
    pot: Decimal,
}

impl EscrowLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
            pot: Decimal::ZERO,
        }
    }

    /// Add to an account's escrowed balance. Amounts accumulate.
    pub fn deposit(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// The balance held for an account. Zero if none.
    #[must_use]
    pub fn held(&self, account: AccountId) -> Decimal {
        self.balances
            .get(&account)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Release an account's entire balance, returning the amount.
    ///
    /// # Errors
    /// Returns `NoEscrowHeld` if nothing is held.
    pub fn withdraw_all(&mut self, account: AccountId) -> Result<Decimal> {
        match self.balances.remove(&account) {
            Some(amount) if amount > Decimal::ZERO => Ok(amount),
            _ => Err(OpenlotError::NoEscrowHeld(account)),
        }
    }

    /// Deduct part of an account's balance, leaving the remainder held.
    ///
    /// # Errors
    /// Returns `EscrowUnderflow` if the balance is smaller than `amount`.
    pub fn deduct(&mut self, account: AccountId, amount: Decimal) -> Result<()> {
        let held = self.held(account);
        if held < amount {
            return Err(OpenlotError::EscrowUnderflow {
                account,
                needed: amount,
                held,
            });
        }
        let remaining = held - amount;
        if remaining.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, remaining);
        }
        Ok(())
    }

    /// Move revenue into the proceeds sub-account.
    pub fn credit_pot(&mut self, amount: Decimal) {
        self.pot += amount;
    }

    /// Take everything out of the proceeds sub-account.
    pub fn drain_pot(&mut self) -> Decimal {
        std::mem::take(&mut self.pot)
    }

    /// Current proceeds sub-account balance.
    #[must_use]
    pub fn pot(&self) -> Decimal {
        self.pot
    }

    /// Number of accounts with a live (nonzero) balance.
    #[must_use]
    pub fn holders(&self) -> usize {
        self.balances.len()
    }

    /// Everything the auction currently holds: all balances plus the pot.
    #[must_use]
    pub fn total_held(&self) -> Decimal {
        self.balances.values().copied().sum::<Decimal>() + self.pot
    }
}

impl Default for EscrowLedger {
    fn default() -> Self {
        Self::new()
    }
}
