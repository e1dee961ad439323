//! Insertion-ordered bidder registry.
//!
//! Append-only: an account is registered once, at its first bid, and its
//! position never changes, not even on cancellation. The
//! validation scan walks this order, so first-bid position is the ranking
//! key among bidders meeting the clearing price.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use openlot_types::AccountId;

#[derive(Debug, Clone, Copy)]
struct RegistryEntry {
    insertion_index: usize,
    first_bid_at: DateTime<Utc>,
}

/// First-bid ordering of all accounts that ever bid.
///
/// Holds no amounts; balances live in the escrow ledger.
pub struct BidderRegistry {
    /// Accounts in first-bid order. Never reordered or truncated.
    order: Vec<AccountId>,
    entries: HashMap<AccountId, RegistryEntry>,
}

impl BidderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    /// Register an account at its first bid. Idempotent: a repeat call
    /// returns the original insertion index and records nothing.
    pub fn register(&mut self, account: AccountId, now: DateTime<Utc>) -> usize {
        if let Some(entry) = self.entries.get(&account) {
            return entry.insertion_index;
        }
        let insertion_index = self.order.len();
        self.order.push(account);
        self.entries.insert(
            account,
            RegistryEntry {
                insertion_index,
                first_bid_at: now,
            },
        );
        insertion_index
    }

    #[must_use]
    pub fn contains(&self, account: AccountId) -> bool {
        self.entries.contains_key(&account)
    }

    #[must_use]
    pub fn insertion_index(&self, account: AccountId) -> Option<usize> {
        self.entries.get(&account).map(|e| e.insertion_index)
    }

    #[must_use]
    pub fn first_bid_at(&self, account: AccountId) -> Option<DateTime<Utc>> {
        self.entries.get(&account).map(|e| e.first_bid_at)
    }

    /// All accounts in first-bid order.
    #[must_use]
    pub fn accounts(&self) -> &[AccountId] {
        &self.order
    }

    /// A bounded window of the registry starting at `start`, at most
    /// `max` entries. Empty when `start` is at or past the end.
    #[must_use]
    pub fn span(&self, start: usize, max: usize) -> &[AccountId] {
        if start >= self.order.len() {
            return &[];
        }
        let end = (start + max).min(self.order.len());
        &self.order[start..end]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for BidderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
