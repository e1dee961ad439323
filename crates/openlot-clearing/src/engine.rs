//! Price proposal lifecycle and the resumable winner-determination scan.
//!
//! The scan is the only part of clearing whose cost grows with the number of
//! bidders, so it is metered: each call consumes at most `max_iterations`
//! registry entries and records where it stopped. Callers keep invoking
//! [`ClearingEngine::validate_batch`] until a report comes back `completed`.

use chrono::{DateTime, Utc};
use openlot_types::{AccountId, BidRecord, OpenlotError, PriceProposal, Result};
use rust_decimal::Decimal;

/// Outcome of a single [`ClearingEngine::validate_batch`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Registry entries consumed by this call.
    pub processed: usize,
    /// Scan position after this call. Equals the registry length once the
    /// scan has completed.
    pub cursor: usize,
    /// Winners confirmed so far, across all calls.
    pub num_winners_confirmed: usize,
    /// Items that will actually sell. Provisional until `completed`.
    pub num_items_sellable: usize,
    /// Whether this call finished the scan and sealed the proposal.
    pub completed: bool,
}

/// Drives one price proposal at a time through bounded validation.
///
/// A proposal starts unvalidated with its cursor at zero. Each
/// [`validate_batch`] call consumes a bounded slice of the bidder registry
/// and persists the new cursor, so validation can stop and resume at any
/// point without losing work. Proposing a different price discards the scan
/// state and starts over; once a proposal is validated it is final.
///
/// [`validate_batch`]: ClearingEngine::validate_batch
#[derive(Debug, Clone)]
pub struct ClearingEngine {
    proposal: Option<PriceProposal>,
    max_iterations: u32,
}

impl ClearingEngine {
    #[must_use]
    pub fn new(max_iterations: u32) -> Self {
        Self {
            proposal: None,
            max_iterations,
        }
    }

    /// Current scan batch size.
    #[must_use]
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Changes the scan batch size.
    ///
    /// Takes effect from the next [`validate_batch`] call. Batch size governs
    /// how much work each call performs, never which bidders win.
    ///
    /// [`validate_batch`]: ClearingEngine::validate_batch
    pub fn set_max_iterations(&mut self, iterations: u32) -> Result<()> {
        if iterations == 0 {
            return Err(OpenlotError::ZeroIterations);
        }
        if iterations == self.max_iterations {
            return Err(OpenlotError::IterationsUnchanged(iterations));
        }
        self.max_iterations = iterations;
        Ok(())
    }

    /// The active proposal, if any.
    #[must_use]
    pub fn proposal(&self) -> Option<&PriceProposal> {
        self.proposal.as_ref()
    }

    /// Proposed clearing price, if any.
    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.proposal.as_ref().map(|p| p.price)
    }

    /// Whether the active proposal has been fully validated.
    #[must_use]
    pub fn is_validated(&self) -> bool {
        self.proposal.as_ref().is_some_and(|p| p.validated)
    }

    /// Scan position of the active proposal, or zero if none.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.proposal.as_ref().map_or(0, |p| p.cursor)
    }

    /// Confirmed winners in rank order. Empty until validation completes.
    #[must_use]
    pub fn confirmed_winners(&self) -> &[AccountId] {
        match &self.proposal {
            Some(p) if p.validated => &p.winners,
            _ => &[],
        }
    }

    /// Whether `account` holds a confirmed claim on an item.
    #[must_use]
    pub fn is_winner(&self, account: AccountId) -> bool {
        self.proposal.as_ref().is_some_and(|p| p.is_winner(account))
    }

    /// Proposes `price` as the clearing price and resets the scan.
    ///
    /// `registry_len` and `item_count` size the provisional sellable count
    /// reported while the scan is in flight; the definitive count is fixed
    /// when validation completes.
    pub fn propose(
        &mut self,
        price: Decimal,
        registry_len: usize,
        item_count: usize,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.is_validated() {
            return Err(OpenlotError::AlreadyValidated);
        }
        if price <= Decimal::ZERO {
            return Err(OpenlotError::ZeroPrice);
        }
        if registry_len == 0 {
            return Err(OpenlotError::NoBidders);
        }
        if let Some(current) = &self.proposal {
            if current.price == price {
                return Err(OpenlotError::PriceUnchanged(price));
            }
        }
        let provisional = registry_len.min(item_count);
        self.proposal = Some(PriceProposal::new(price, provisional, now));
        tracing::debug!(price = %price, provisional_sellable = provisional, "Clearing price proposed");
        Ok(())
    }

    /// Runs one bounded validation batch over `window`.
    ///
    /// `window` must start at the current cursor and follow registration
    /// order; at most `max_iterations` entries of it are consumed. Bidders
    /// whose accumulated amount meets the proposed price are confirmed as
    /// winners in window order until `item_count` of them are found or the
    /// registry is exhausted, whichever comes first. On completion the
    /// cursor snaps to `registry_len` and the proposal seals.
    pub fn validate_batch(
        &mut self,
        window: &[BidRecord],
        registry_len: usize,
        item_count: usize,
    ) -> Result<ScanReport> {
        let budget = usize::try_from(self.max_iterations).unwrap_or(usize::MAX);
        let Some(proposal) = self.proposal.as_mut() else {
            return Err(OpenlotError::NoPriceProposed);
        };
        if proposal.validated {
            return Err(OpenlotError::AlreadyValidated);
        }

        let mut processed = 0;
        for bid in window.iter().take(budget) {
            processed += 1;
            if bid.qualifies(proposal.price) {
                proposal.winners.push(bid.bidder);
                proposal.num_winners_confirmed += 1;
                if proposal.num_winners_confirmed == item_count {
                    break;
                }
            }
        }
        proposal.cursor += processed;

        let cap_reached = proposal.num_winners_confirmed == item_count;
        if cap_reached || proposal.cursor >= registry_len {
            // Entries past a full winner list can never change the outcome,
            // so the cursor jumps straight to the end.
            proposal.cursor = registry_len;
            proposal.num_items_sellable = proposal.num_winners_confirmed.min(item_count);
            proposal.validated = true;
            tracing::info!(
                price = %proposal.price,
                num_winners = proposal.num_winners_confirmed,
                num_items_sellable = proposal.num_items_sellable,
                scanned = registry_len,
                "Clearing price validated"
            );
        } else {
            tracing::debug!(
                cursor = proposal.cursor,
                num_winners = proposal.num_winners_confirmed,
                "Validation batch processed"
            );
        }

        Ok(ScanReport {
            processed,
            cursor: proposal.cursor,
            num_winners_confirmed: proposal.num_winners_confirmed,
            num_items_sellable: proposal.num_items_sellable,
            completed: proposal.validated,
        })
    }
}
