//! Per-bidder bid record.
//!
//! One record exists per distinct bidder; repeated bids accumulate into the
//! same record and never mint a new insertion index. The insertion index is
//! the ranking key for clearing: among bidders meeting the clearing price,
//! the earliest insertion indices win.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AccountId;

/// One bidder's accumulated escrowed bid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    /// The bidding account.
    pub bidder: AccountId,
    /// Accumulated escrowed amount. Zero means withdrawn or consumed.
    pub amount: Decimal,
    /// Position in the registry, assigned at first bid, never reassigned.
    pub insertion_index: usize,
    /// When the first bid arrived.
    pub first_bid_at: DateTime<Utc>,
}

impl BidRecord {
    #[must_use]
    pub fn new(
        bidder: AccountId,
        amount: Decimal,
        insertion_index: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            bidder,
            amount,
            insertion_index,
            first_bid_at: now,
        }
    }

    /// Fold an additional bid into the accumulated amount.
    pub fn accumulate(&mut self, amount: Decimal) {
        self.amount += amount;
    }

    /// A bidder is active while escrow is held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// True iff this bid meets the given clearing price.
    #[must_use]
    pub fn qualifies(&self, price: Decimal) -> bool {
        self.is_active() && self.amount >= price
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl BidRecord {
    /// Bid from a fresh account with a fixed amount.
    pub fn dummy(amount: Decimal, insertion_index: usize) -> Self {
        Self {
            bidder: AccountId::new(),
            amount,
            insertion_index,
            first_bid_at: Utc::now(),
        }
    }

    /// Bid from a fresh account with a random amount in `1..=100`.
    pub fn dummy_random(insertion_index: usize) -> Self {
        Self::dummy(Decimal::from(rand::random::<u8>() % 100 + 1), insertion_index)
    }
}
