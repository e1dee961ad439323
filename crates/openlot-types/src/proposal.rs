//! The clearing-price proposal and its validation progress.
//!
//! A proposal is created when the manager proposes a price and is reset
//! whenever the price changes before validation. The validation scan walks
//! the bidder registry in bounded batches, persisting its cursor and the
//! confirmed winners here between calls. Once `validated` flips to true
//! the proposal is immutable.
//!
//! Winners are **persisted at scan time** rather than recomputed from live
//! balances: settlement zeroes balances as it pays out, so a recomputation
//! after the first redemption would no longer see the same qualifying set.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// A proposed clearing price plus the state of its validation scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceProposal {
    /// The proposed uniform clearing price. Always positive.
    pub price: Decimal,
    /// When this price was proposed.
    pub proposed_at: DateTime<Utc>,
    /// True once the scan has covered the whole registry (or hit the
    /// winner cap). Irreversible.
    pub validated: bool,
    /// `min(#qualifying bidders, item count)`. Provisional until
    /// `validated`; seeded with `min(registry len, item count)`.
    pub num_items_sellable: usize,
    /// Confirmed winners so far. Equals `winners.len()`.
    pub num_winners_confirmed: usize,
    /// Next registry index the scan will visit. Monotonic; equals the
    /// registry length exactly when `validated`.
    pub cursor: usize,
    /// Confirmed winners in insertion order, capped at the item count.
    pub winners: Vec<AccountId>,
}

impl PriceProposal {
    /// Fresh unvalidated proposal with the scan at the beginning.
    #[must_use]
    pub fn new(price: Decimal, provisional_sellable: usize, now: DateTime<Utc>) -> Self {
        Self {
            price,
            proposed_at: now,
            validated: false,
            num_items_sellable: provisional_sellable,
            num_winners_confirmed: 0,
            cursor: 0,
            winners: Vec::new(),
        }
    }

    /// True iff validation completed and `account` is a confirmed winner.
    #[must_use]
    pub fn is_winner(&self, account: AccountId) -> bool {
        self.validated && self.winners.contains(&account)
    }

    /// Zero-based rank of a confirmed winner, in insertion order.
    #[must_use]
    pub fn winner_rank(&self, account: AccountId) -> Option<usize> {
        if !self.validated {
            return None;
        }
        self.winners.iter().position(|w| *w == account)
    }
}
