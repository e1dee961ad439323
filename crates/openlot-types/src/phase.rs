//! # Auction phase machine
//!
//! The auction advances through a small set of phases. Two of them,
//! `Open` and `BiddingClosed`, are derived lazily from the clock reading
//! passed into each operation, never from a background timer.
//!
//! ```text
//!   ┌───────────────┐ initialize ┌──────┐  deadline  ┌───────────────┐
//!   │ UNINITIALIZED ├───────────▶│ OPEN ├───────────▶│ BIDDING_CLOSED│
//!   └───────────────┘            └──┬───┘◀───────────┴──┬───────┬────┘
//!                                   │      extend       │       │ propose
//!                                   │ cancel            │cancel ▼
//!                                   ▼                   ▼   ┌───────────┐
//!                              ┌───────────┐◀───────────────┤ PRICE_SET │
//!                              │ CANCELLED │    cancel      └─────┬─────┘
//!                              └───────────┘                      │ scan done
//!                                                                 ▼
//!                                                        ┌─────────────────┐
//!                                                        │ PRICE_VALIDATED │
//!                                                        └─────────────────┘
//! ```
//!
//! `PRICE_VALIDATED` and `CANCELLED` are terminal: settlement continues
//! inside them, but no further phase transition exists. A deadline
//! extension can move `BIDDING_CLOSED` back to `OPEN` as long as no price
//! has been proposed.

use serde::{Deserialize, Serialize};

/// The lifecycle phase of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionPhase {
    /// No lot stored yet; only `initialize` is accepted.
    Uninitialized,
    /// The bidding window is open: `now < bidding_end`.
    Open,
    /// The bidding window elapsed; awaiting a price proposal.
    BiddingClosed,
    /// A clearing price is proposed; the validation scan is in progress.
    PriceSet,
    /// The clearing price is locked. **Irreversible.** Settlement only.
    PriceValidated,
    /// The auction was cancelled. **Irreversible.** Refunds only.
    Cancelled,
}

impl AuctionPhase {
    /// Can the auction move from this phase to the given target?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Uninitialized, Self::Open)
                | (Self::Open, Self::BiddingClosed | Self::Cancelled)
                | (
                    Self::BiddingClosed,
                    Self::Open | Self::PriceSet | Self::Cancelled
                )
                | (Self::PriceSet, Self::PriceValidated | Self::Cancelled)
        )
    }

    /// Terminal phases admit no further transition.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PriceValidated | Self::Cancelled)
    }

    /// True while bids are being accepted.
    #[must_use]
    pub fn accepts_bids(&self) -> bool {
        matches!(self, Self::Open)
    }
}

impl std::fmt::Display for AuctionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "UNINITIALIZED"),
            Self::Open => write!(f, "OPEN"),
            Self::BiddingClosed => write!(f, "BIDDING_CLOSED"),
            Self::PriceSet => write!(f, "PRICE_SET"),
            Self::PriceValidated => write!(f, "PRICE_VALIDATED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}
