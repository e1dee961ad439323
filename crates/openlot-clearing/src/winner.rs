//! Single-pass reference clearing over a complete bid view.
//!
//! [`clear_lot`] computes the full outcome in one call with no engine state,
//! which makes it the yardstick for the batched scan: however the bounded
//! scan is partitioned, its winners and sellable count must match this
//! function applied to the same bids.

use openlot_types::{AccountId, BidRecord};
use rust_decimal::Decimal;

/// Complete clearing outcome for one lot at one price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotClearing {
    /// Winners in rank order, capped at the item count.
    pub winners: Vec<AccountId>,
    /// Bidders whose accumulated amount met the price, uncapped.
    pub num_qualifying: usize,
    /// Items that sell: the smaller of qualifying bidders and items offered.
    pub num_items_sellable: usize,
}

/// Clears `bids` at `price` for a lot of `item_count` items.
///
/// `bids` must be in registration order. Every bidder at or above the price
/// qualifies; the first `item_count` of them win one item each. Bidders with
/// a zero accumulated amount are skipped.
#[must_use]
pub fn clear_lot(bids: &[BidRecord], price: Decimal, item_count: usize) -> LotClearing {
    let mut winners = Vec::new();
    let mut num_qualifying = 0;
    for bid in bids {
        if bid.qualifies(price) {
            num_qualifying += 1;
            if winners.len() < item_count {
                winners.push(bid.bidder);
            }
        }
    }
    let num_items_sellable = num_qualifying.min(item_count);
    LotClearing {
        winners,
        num_qualifying,
        num_items_sellable,
    }
}
