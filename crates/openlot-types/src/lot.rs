//! The auction lot: the fixed batch of items under the hammer.
//!
//! A lot is a non-empty ordered set of unique items from a single series,
//! plus the bidding deadline. Item order matters: winners are assigned
//! items in list order at redemption time. The lot carries a SHA-256
//! commitment digest so journals and logs can reference it compactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ItemId, SeriesId};

/// The batch of items a single auction sells.
///
/// Immutable after initialization except for `bidding_end`, which a
/// deadline extension may push later. The digest covers only the immutable
/// parts (series, items, creation time), so extensions do not disturb it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionLot {
    /// The series every item in this lot belongs to.
    pub series: SeriesId,
    /// Ordered, duplicate-free item list. Assignment order at redemption.
    pub items: Vec<ItemId>,
    /// End of the bidding window.
    pub bidding_end: DateTime<Utc>,
    /// When the lot was initialized.
    pub created_at: DateTime<Utc>,
    /// SHA-256 commitment over series, items, and creation time.
    pub lot_digest: [u8; 32],
}

impl AuctionLot {
    #[must_use]
    pub fn new(
        series: SeriesId,
        items: Vec<ItemId>,
        bidding_end: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let lot_digest = compute_lot_digest(series, &items, created_at);
        Self {
            series,
            items,
            bidding_end,
            created_at,
            lot_digest,
        }
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    /// First 4 digest bytes as hex, for log lines.
    #[must_use]
    pub fn short_digest(&self) -> String {
        hex::encode(&self.lot_digest[..4])
    }
}

/// Deterministic lot commitment.
///
/// Preimage: `"openlot:lot:v1:" || series || item_count || items || created_at_ms`,
/// all integers little-endian. Same lot, same digest, on every host.
#[must_use]
pub fn compute_lot_digest(
    series: SeriesId,
    items: &[ItemId],
    created_at: DateTime<Utc>,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"openlot:lot:v1:");
    hasher.update(series.0.to_le_bytes());
    hasher.update((items.len() as u64).to_le_bytes());
    for item in items {
        hasher.update(item.0.to_le_bytes());
    }
    hasher.update(created_at.timestamp_millis().to_le_bytes());
    hasher.finalize().into()
}
