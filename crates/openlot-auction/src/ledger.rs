//! In-memory reference implementation of the token ledger.
//!
//! Items are non-fungible and grouped into series with a fixed capacity
//! set at series creation. Good enough for embedding the auction in tests
//! and single-process tools; anything durable implements
//! [`TokenLedger`] against its own storage.

use std::collections::HashMap;

use openlot_types::{AccountId, ItemId, OpenlotError, Result, SeriesId, TokenLedger};

struct SeriesRecord {
    capacity: usize,
    minted: usize,
}

struct ItemRecord {
    owner: AccountId,
    series: SeriesId,
}

/// Owner and series bookkeeping for a set of collectible items.
#[derive(Default)]
pub struct InMemoryTokenLedger {
    series: HashMap<SeriesId, SeriesRecord>,
    items: HashMap<ItemId, ItemRecord>,
}

impl InMemoryTokenLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new series with a fixed mint capacity.
    ///
    /// # Errors
    /// Returns [`OpenlotError::Configuration`] if the series already exists.
    pub fn create_series(&mut self, series: SeriesId, capacity: usize) -> Result<()> {
        if self.series.contains_key(&series) {
            return Err(OpenlotError::Configuration(format!(
                "{series} already exists"
            )));
        }
        self.series.insert(
            series,
            SeriesRecord {
                capacity,
                minted: 0,
            },
        );
        Ok(())
    }

    /// Mints `item` into `series`, owned by `to`.
    pub fn mint(&mut self, item: ItemId, series: SeriesId, to: AccountId) -> Result<()> {
        let record = self
            .series
            .get_mut(&series)
            .ok_or(OpenlotError::SeriesNotFound(series))?;
        if self.items.contains_key(&item) {
            return Err(OpenlotError::DuplicateMint(item));
        }
        if record.minted >= record.capacity {
            return Err(OpenlotError::SeriesFull {
                series,
                capacity: record.capacity,
            });
        }
        record.minted += 1;
        self.items.insert(item, ItemRecord { owner: to, series });
        Ok(())
    }

    /// Items minted into a series so far.
    pub fn minted_in(&self, series: SeriesId) -> Result<usize> {
        self.series
            .get(&series)
            .map(|record| record.minted)
            .ok_or(OpenlotError::SeriesNotFound(series))
    }

    /// Total items across all series.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl TokenLedger for InMemoryTokenLedger {
    fn owner_of(&self, item: ItemId) -> Result<AccountId> {
        self.items
            .get(&item)
            .map(|record| record.owner)
            .ok_or(OpenlotError::ItemNotFound(item))
    }

    fn series_of(&self, item: ItemId) -> Result<SeriesId> {
        self.items
            .get(&item)
            .map(|record| record.series)
            .ok_or(OpenlotError::ItemNotFound(item))
    }

    fn transfer_item(&mut self, item: ItemId, from: AccountId, to: AccountId) -> Result<()> {
        let record = self
            .items
            .get_mut(&item)
            .ok_or(OpenlotError::ItemNotFound(item))?;
        if record.owner != from {
            return Err(OpenlotError::NotItemOwner {
                item,
                account: from,
            });
        }
        record.owner = to;
        Ok(())
    }
}
