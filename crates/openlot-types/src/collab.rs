//! Collaborator seams: the two external systems the auction consumes.
//!
//! The engine never owns token bookkeeping or role management. It sees
//! them only through these traits, passed by reference into each
//! operation. Custody preconditions are verified through [`TokenLedger`]
//! **before** any internal mutation, and the actual transfer is always the
//! last action of an operation.

use crate::{AccountId, ItemId, Result, SeriesId};

/// The token/ownership ledger the auctioned items live in.
pub trait TokenLedger {
    /// Current owner of an item.
    fn owner_of(&self, item: ItemId) -> Result<AccountId>;

    /// The series an item belongs to.
    fn series_of(&self, item: ItemId) -> Result<SeriesId>;

    /// True iff `custodian` currently owns every listed item.
    fn is_custodied_by(&self, custodian: AccountId, items: &[ItemId]) -> Result<bool> {
        for &item in items {
            if self.owner_of(item)? != custodian {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Move an item. Fails unless `from` is the current owner.
    fn transfer_item(&mut self, item: ItemId, from: AccountId, to: AccountId) -> Result<()>;
}

/// Role and pause checks.
pub trait AccessControl {
    fn is_manager(&self, account: AccountId) -> bool;

    fn is_owner(&self, account: AccountId) -> bool;

    /// A paused system rejects new bids; refund paths stay open.
    fn is_paused(&self) -> bool;
}
