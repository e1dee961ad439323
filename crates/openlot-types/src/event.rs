//! Auction event journal types.
//!
//! Every state-changing operation appends exactly one event. The journal
//! is the audit trail external indexers consume; sequence numbers are
//! assigned by the auction in call order.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, ItemId, SeriesId};

/// One observable auction occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AuctionEvent {
    AuctionInitialized {
        series: SeriesId,
        items: Vec<ItemId>,
        bidding_end: DateTime<Utc>,
    },
    AuctionExtended {
        new_bidding_end: DateTime<Utc>,
    },
    AuctionCancelled {
        items_returned: usize,
    },
    Bid {
        bidder: AccountId,
        bid_amount: Decimal,
        accumulated_bid_amount: Decimal,
    },
    BidCancelled {
        bidder: AccountId,
        amount: Decimal,
    },
    PriceProposed {
        price: Decimal,
    },
    PriceValidated {
        price: Decimal,
        num_items_sellable: usize,
    },
    ItemRedeemed {
        redeemer: AccountId,
        item: ItemId,
        excess: Decimal,
    },
    BidWithdrawn {
        withdrawer: AccountId,
        amount: Decimal,
    },
    OperatorWithdrawal {
        funds: Decimal,
        items_returned: usize,
    },
    AuctionRetired,
}

impl AuctionEvent {
    /// Stable event name for filtering journal output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AuctionInitialized { .. } => "AUCTION_INITIALIZED",
            Self::AuctionExtended { .. } => "AUCTION_EXTENDED",
            Self::AuctionCancelled { .. } => "AUCTION_CANCELLED",
            Self::Bid { .. } => "BID",
            Self::BidCancelled { .. } => "BID_CANCELLED",
            Self::PriceProposed { .. } => "PRICE_PROPOSED",
            Self::PriceValidated { .. } => "PRICE_VALIDATED",
            Self::ItemRedeemed { .. } => "ITEM_REDEEMED",
            Self::BidWithdrawn { .. } => "BID_WITHDRAWN",
            Self::OperatorWithdrawal { .. } => "OPERATOR_WITHDRAWAL",
            Self::AuctionRetired => "AUCTION_RETIRED",
        }
    }
}

/// A journaled event with its sequence number and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the journal, starting at 0, gap-free.
    pub seq: u64,
    /// Clock reading of the call that produced the event.
    pub at: DateTime<Utc>,
    pub event: AuctionEvent,
}
