//! At-most-once payout ledger.
//!
//! Every account leaves a settled auction through exactly one door: winners
//! redeem an item (paying out any escrow above the clearing price), everyone
//! else withdraws their full escrow. The book records which door each account
//! took; a second payout attempt of either kind is rejected.
//!
//! Records are kept for the life of the auction, so the guard never forgets
//! a payout.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use openlot_types::{AccountId, ItemId, OpenlotError, PayoutKind, PayoutRecord, Result};
use rust_decimal::Decimal;

/// Records one payout per account and blocks the second.
#[derive(Debug, Clone, Default)]
pub struct PayoutBook {
    payouts: HashMap<AccountId, PayoutRecord>,
}

impl PayoutBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `account` redeemed `item`, receiving `excess` back.
    ///
    /// # Errors
    /// Returns [`OpenlotError::AlreadyRedeemed`] or
    /// [`OpenlotError::AlreadyWithdrawn`] if the account has already been
    /// paid out, naming the payout that came first.
    pub fn record_redemption(
        &mut self,
        account: AccountId,
        excess: Decimal,
        item: ItemId,
        now: DateTime<Utc>,
    ) -> Result<&PayoutRecord> {
        self.ensure_unpaid(account)?;
        let record = PayoutRecord {
            kind: PayoutKind::Redeemed,
            amount: excess,
            item: Some(item),
            at: now,
        };
        Ok(self.payouts.entry(account).or_insert(record))
    }

    /// Records that `account` withdrew `amount` of escrow.
    ///
    /// # Errors
    /// Returns [`OpenlotError::AlreadyRedeemed`] or
    /// [`OpenlotError::AlreadyWithdrawn`] if the account has already been
    /// paid out.
    pub fn record_withdrawal(
        &mut self,
        account: AccountId,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<&PayoutRecord> {
        self.ensure_unpaid(account)?;
        let record = PayoutRecord {
            kind: PayoutKind::Withdrawn,
            amount,
            item: None,
            at: now,
        };
        Ok(self.payouts.entry(account).or_insert(record))
    }

    /// Fails if `account` has already been paid out, naming the payout
    /// that came first.
    pub fn ensure_unpaid(&self, account: AccountId) -> Result<()> {
        match self.payouts.get(&account).map(|record| record.kind) {
            Some(PayoutKind::Redeemed) => Err(OpenlotError::AlreadyRedeemed(account)),
            Some(PayoutKind::Withdrawn) => Err(OpenlotError::AlreadyWithdrawn(account)),
            None => Ok(()),
        }
    }

    /// The payout recorded for `account`, if any.
    #[must_use]
    pub fn payout(&self, account: AccountId) -> Option<&PayoutRecord> {
        self.payouts.get(&account)
    }

    /// Whether `account` has taken either payout.
    #[must_use]
    pub fn is_paid(&self, account: AccountId) -> bool {
        self.payouts.contains_key(&account)
    }

    /// Whether `account` redeemed an item.
    #[must_use]
    pub fn has_redeemed(&self, account: AccountId) -> bool {
        self.payouts
            .get(&account)
            .is_some_and(|record| record.kind == PayoutKind::Redeemed)
    }

    /// Number of items redeemed so far.
    #[must_use]
    pub fn num_redeemed(&self) -> usize {
        self.payouts
            .values()
            .filter(|record| record.kind == PayoutKind::Redeemed)
            .count()
    }

    /// Sum of all amounts returned to bidders, both excess and refunds.
    #[must_use]
    pub fn total_paid(&self) -> Decimal {
        self.payouts.values().map(|record| record.amount).sum()
    }

    /// Number of accounts paid out.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_redemption_recorded() {
        let mut book = PayoutBook::new();
        let account = AccountId::new();
        let record = book
            .record_redemption(account, Decimal::new(5, 0), ItemId(7), Utc::now())
            .unwrap();
        assert_eq!(record.kind, PayoutKind::Redeemed);
        assert_eq!(record.item, Some(ItemId(7)));
        assert!(book.has_redeemed(account));
        assert_eq!(book.num_redeemed(), 1);
    }

    #[test]
    fn second_redemption_blocked() {
        let mut book = PayoutBook::new();
        let account = AccountId::new();
        book.record_redemption(account, Decimal::ZERO, ItemId(1), Utc::now())
            .unwrap();

        let err = book
            .record_redemption(account, Decimal::ZERO, ItemId(2), Utc::now())
            .unwrap_err();
        assert!(matches!(err, OpenlotError::AlreadyRedeemed(a) if a == account));
    }

    #[test]
    fn redeem_then_withdraw_blocked() {
        let mut book = PayoutBook::new();
        let account = AccountId::new();
        book.record_redemption(account, Decimal::new(3, 0), ItemId(1), Utc::now())
            .unwrap();

        let err = book
            .record_withdrawal(account, Decimal::new(10, 0), Utc::now())
            .unwrap_err();
        assert!(matches!(err, OpenlotError::AlreadyRedeemed(_)));
    }

    #[test]
    fn withdraw_then_redeem_blocked() {
        let mut book = PayoutBook::new();
        let account = AccountId::new();
        book.record_withdrawal(account, Decimal::new(10, 0), Utc::now())
            .unwrap();

        let err = book
            .record_redemption(account, Decimal::ZERO, ItemId(1), Utc::now())
            .unwrap_err();
        assert!(matches!(err, OpenlotError::AlreadyWithdrawn(a) if a == account));
        assert!(!book.has_redeemed(account));
    }

    #[test]
    fn accounts_are_independent() {
        let mut book = PayoutBook::new();
        let winner = AccountId::new();
        let loser = AccountId::new();

        book.record_redemption(winner, Decimal::new(2, 0), ItemId(1), Utc::now())
            .unwrap();
        book.record_withdrawal(loser, Decimal::new(8, 0), Utc::now())
            .unwrap();

        assert_eq!(book.len(), 2);
        assert_eq!(book.num_redeemed(), 1);
        assert_eq!(book.total_paid(), Decimal::new(10, 0));
    }

    #[test]
    fn unpaid_account_has_no_record() {
        let book = PayoutBook::new();
        assert!(book.is_empty());
        assert!(!book.is_paid(AccountId::new()));
        assert_eq!(book.total_paid(), Decimal::ZERO);
    }
}
