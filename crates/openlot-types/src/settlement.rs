//! Settlement record types: per-bidder payout outcomes and the one-shot
//! operator withdrawal.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{AccountId, ItemId};

/// How a bidder exited the auction. The two kinds are mutually exclusive
/// and each happens at most once per bidder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayoutKind {
    /// Winner claimed an item; the excess over the clearing price was
    /// refunded.
    Redeemed,
    /// Full remaining escrow was refunded (loser, cancelled auction,
    /// safety timeout, or winner-after-sell-out).
    Withdrawn,
}

impl std::fmt::Display for PayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redeemed => write!(f, "REDEEMED"),
            Self::Withdrawn => write!(f, "WITHDRAWN"),
        }
    }
}

/// One bidder's final payout, recorded when it happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRecord {
    pub kind: PayoutKind,
    /// Amount refunded to the bidder (excess for a redemption, full
    /// balance for a withdrawal).
    pub amount: Decimal,
    /// The item assigned, for redemptions.
    pub item: Option<ItemId>,
    pub at: DateTime<Utc>,
}

/// The operator's one-shot proceeds collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorWithdrawal {
    /// Proceeds paid to the treasury: clearing price × items sellable.
    pub funds: Decimal,
    /// Unsold items returned to the manager.
    pub items_returned: usize,
    /// The treasury account that received the funds.
    pub treasury: AccountId,
    pub withdrawn_at: DateTime<Utc>,
}
