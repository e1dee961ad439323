//! The auction timeline: lot storage, the bidding deadline, and the
//! safety timeout.
//!
//! All time checks take the clock reading as a parameter and are evaluated
//! lazily at call time; nothing here schedules or sleeps. The `Open` /
//! `BiddingClosed` distinction is purely `now` versus `bidding_end`.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use openlot_types::{
    AuctionConfig, AuctionLot, ItemId, OpenlotError, Result, SeriesId, constants,
};

/// Owns the lot and the cancellation flag; answers every "what time is it
/// for this auction" question.
///
/// Structural item checks (non-empty, unique, size) happen here; custody
/// and series-membership checks need the token ledger and happen in the
/// facade before `initialize` is reached.
pub struct AuctionTimeline {
    config: AuctionConfig,
    lot: Option<AuctionLot>,
    cancelled: bool,
}

impl AuctionTimeline {
    #[must_use]
    pub fn new(config: AuctionConfig) -> Self {
        Self {
            config,
            lot: None,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// Store the lot and open bidding. One-shot.
    ///
    /// # Errors
    /// - `AlreadyInitialized` on a repeat call
    /// - `EmptyItemSet`, `LotTooLarge`, `DuplicateItem` for bad item lists
    /// - `DurationOutOfRange` unless `bidding_end` lands within
    ///   `[now + min_auction_period, now + max_auction_period]`
    pub fn initialize(
        &mut self,
        series: SeriesId,
        items: Vec<ItemId>,
        bidding_end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<&AuctionLot> {
        if self.lot.is_some() {
            return Err(OpenlotError::AlreadyInitialized);
        }
        if items.is_empty() {
            return Err(OpenlotError::EmptyItemSet);
        }
        if items.len() > constants::MAX_ITEMS_PER_LOT {
            return Err(OpenlotError::LotTooLarge {
                count: items.len(),
                max: constants::MAX_ITEMS_PER_LOT,
            });
        }
        let mut seen = HashSet::with_capacity(items.len());
        for &item in &items {
            if !seen.insert(item) {
                return Err(OpenlotError::DuplicateItem(item));
            }
        }
        if bidding_end < now + self.config.min_period_chrono()
            || bidding_end > now + self.config.max_period_chrono()
        {
            return Err(OpenlotError::DurationOutOfRange {
                min_secs: self.config.min_auction_period.as_secs(),
                max_secs: self.config.max_auction_period.as_secs(),
            });
        }
        Ok(self
            .lot
            .insert(AuctionLot::new(series, items, bidding_end, now)))
    }

    /// Push the bidding deadline later. Allowed until a price is proposed
    /// (the facade guards that) and until the safety timeout fires; a
    /// deadline in the past can be extended, which re-opens bidding.
    ///
    /// # Errors
    /// - `NotInitialized`, `Cancelled`
    /// - `SafetyTimeoutElapsed` once the timeout has fired: re-opening
    ///   would re-arm pricing, which the timeout permanently disables
    /// - `DeadlineNotExtended` unless `new_end` is strictly later
    /// - `ExtensionBeyondMax` past `created_at + max_auction_period`
    pub fn extend(&mut self, new_end: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
        if self.cancelled {
            return Err(OpenlotError::Cancelled);
        }
        if self.is_safety_timeout_elapsed(now) {
            return Err(OpenlotError::SafetyTimeoutElapsed);
        }
        let max_period = self.config.max_period_chrono();
        let lot = self.lot.as_mut().ok_or(OpenlotError::NotInitialized)?;
        if new_end <= lot.bidding_end {
            return Err(OpenlotError::DeadlineNotExtended);
        }
        if new_end > lot.created_at + max_period {
            return Err(OpenlotError::ExtensionBeyondMax);
        }
        lot.bidding_end = new_end;
        Ok(())
    }

    /// Flip the cancellation flag. Irreversible. The facade checks that
    /// no validated price exists before calling this.
    pub fn cancel(&mut self) -> Result<()> {
        if self.lot.is_none() {
            return Err(OpenlotError::NotInitialized);
        }
        if self.cancelled {
            return Err(OpenlotError::Cancelled);
        }
        self.cancelled = true;
        Ok(())
    }

    #[must_use]
    pub fn lot(&self) -> Option<&AuctionLot> {
        self.lot.as_ref()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Bidding is open: initialized, not cancelled, deadline not reached.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        !self.cancelled
            && self
                .lot
                .as_ref()
                .is_some_and(|lot| now < lot.bidding_end)
    }

    /// The bidding window has elapsed.
    #[must_use]
    pub fn has_bidding_ended(&self, now: DateTime<Utc>) -> bool {
        self.lot
            .as_ref()
            .is_some_and(|lot| now >= lot.bidding_end)
    }

    /// The post-deadline grace period has elapsed too.
    #[must_use]
    pub fn is_safety_timeout_elapsed(&self, now: DateTime<Utc>) -> bool {
        self.lot
            .as_ref()
            .is_some_and(|lot| now >= lot.bidding_end + self.config.safety_timeout_chrono())
    }
}
