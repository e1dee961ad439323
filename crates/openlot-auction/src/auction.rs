//! The auction facade: every public operation of one lot auction.
//!
//! All mutation funnels through [`LotAuction`]; the bidding, clearing, and
//! settlement planes beneath it never see callers or collaborators
//! directly. Each operation follows the same shape: role and phase guards
//! first, then internal state changes, then collaborator transfers as the
//! very last action. An error from any guard leaves the auction exactly as
//! it was.
//!
//! Funds conservation is re-checked after every operation that moves
//! money. A [`OpenlotError::ConservationViolation`] coming out of any
//! method means internal state is corrupt and the auction must be taken
//! out of service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use openlot_bidding::{AuctionTimeline, BidderRegistry, EscrowLedger};
use openlot_clearing::{ClearingEngine, ScanReport};
use openlot_settlement::{FundsConservation, OperatorBook, PayoutBook};
use openlot_types::{
    AccessControl, AccountId, AuctionConfig, AuctionEvent, AuctionId, AuctionLot, AuctionPhase,
    BidRecord, EventRecord, ItemId, OpenlotError, OperatorWithdrawal, PayoutRecord, PriceProposal,
    Result, SeriesId, TokenLedger,
};

/// One clearing-price auction over a single lot of same-series items.
///
/// Construction allocates a fresh auction identity and a vault account;
/// items must be transferred to the vault before [`initialize`] will
/// accept them. The clock is always supplied by the caller, so phase
/// boundaries (bidding end, safety timeout) take effect lazily at the
/// next call rather than through any scheduler.
///
/// [`initialize`]: LotAuction::initialize
pub struct LotAuction {
    id: AuctionId,
    vault: AccountId,
    treasury: AccountId,
    timeline: AuctionTimeline,
    registry: BidderRegistry,
    escrow: EscrowLedger,
    engine: ClearingEngine,
    payouts: PayoutBook,
    operator: OperatorBook,
    conservation: FundsConservation,
    /// Sellable items handed to winners so far, indexing into the lot's
    /// item list from the front.
    items_assigned: usize,
    /// Every item that has left the vault: redeemed, cancelled back, or
    /// returned unsold.
    items_transferred: usize,
    retired: bool,
    journal: Vec<EventRecord>,
    next_seq: u64,
}

impl LotAuction {
    /// Creates an empty auction with the given configuration and proceeds
    /// treasury.
    ///
    /// # Errors
    /// Returns [`OpenlotError::Configuration`] for an inconsistent config.
    pub fn new(config: AuctionConfig, treasury: AccountId) -> Result<Self> {
        config.validate()?;
        let max_iterations = config.max_validation_iterations;
        Ok(Self {
            id: AuctionId::new(),
            vault: AccountId::new(),
            treasury,
            timeline: AuctionTimeline::new(config),
            registry: BidderRegistry::new(),
            escrow: EscrowLedger::new(),
            engine: ClearingEngine::new(max_iterations),
            payouts: PayoutBook::new(),
            operator: OperatorBook::new(),
            conservation: FundsConservation::new(),
            items_assigned: 0,
            items_transferred: 0,
            retired: false,
            journal: Vec::new(),
            next_seq: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Stores the lot and opens bidding.
    ///
    /// Every item must already sit in the auction vault and belong to
    /// `series`; the deadline must land within the configured window from
    /// `now`.
    pub fn initialize(
        &mut self,
        caller: AccountId,
        series: SeriesId,
        items: Vec<ItemId>,
        bidding_end: DateTime<Utc>,
        ledger: &impl TokenLedger,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        if self.timeline.lot().is_some() {
            return Err(OpenlotError::AlreadyInitialized);
        }
        for &item in &items {
            let actual = ledger.series_of(item)?;
            if actual != series {
                return Err(OpenlotError::SeriesMismatch {
                    expected: series,
                    actual,
                });
            }
            let owner = ledger.owner_of(item)?;
            if owner != self.vault {
                return Err(OpenlotError::NotCustodied {
                    item,
                    custodian: self.vault,
                });
            }
        }
        let lot = self.timeline.initialize(series, items, bidding_end, now)?;
        let item_list = lot.items.clone();
        let digest = lot.short_digest();
        tracing::info!(
            auction = %self.id,
            series = %series,
            items = item_list.len(),
            digest = %digest,
            "Auction initialized"
        );
        self.record(
            AuctionEvent::AuctionInitialized {
                series,
                items: item_list,
                bidding_end,
            },
            now,
        );
        Ok(())
    }

    /// Pushes the bidding deadline out, re-opening bidding if it had
    /// already closed. Blocked once a price has been proposed.
    pub fn extend_deadline(
        &mut self,
        caller: AccountId,
        new_end: DateTime<Utc>,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        if self.engine.proposal().is_some() {
            return Err(OpenlotError::WrongPhase {
                expected: AuctionPhase::Open,
                actual: self.phase(now),
            });
        }
        self.timeline.extend(new_end, now)?;
        self.record(
            AuctionEvent::AuctionExtended {
                new_bidding_end: new_end,
            },
            now,
        );
        Ok(())
    }

    /// Cancels the auction and returns every custodied item to the caller.
    ///
    /// Allowed any time before price validation. Escrow stays put; bidders
    /// reclaim it through [`cancel_bid`] or [`withdraw_bid`].
    ///
    /// [`cancel_bid`]: LotAuction::cancel_bid
    /// [`withdraw_bid`]: LotAuction::withdraw_bid
    pub fn cancel_auction(
        &mut self,
        caller: AccountId,
        ledger: &mut impl TokenLedger,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        if self.engine.is_validated() {
            return Err(OpenlotError::CancelAfterValidation);
        }
        self.timeline.cancel()?;
        let items: Vec<ItemId> = self
            .timeline
            .lot()
            .map(|lot| lot.items.clone())
            .unwrap_or_default();
        self.items_transferred += items.len();
        self.record(
            AuctionEvent::AuctionCancelled {
                items_returned: items.len(),
            },
            now,
        );
        for &item in &items {
            ledger
                .transfer_item(item, self.vault, caller)
                .map_err(|err| OpenlotError::Internal(format!("custody return failed: {err}")))?;
        }
        Ok(items.len())
    }

    /// Retires a fully drained auction. Owner only; every escrow balance,
    /// the pot, and the item custody must all be empty.
    pub fn retire(
        &mut self,
        caller: AccountId,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if self.retired {
            return Err(OpenlotError::Retired);
        }
        if !control.is_owner(caller) {
            return Err(OpenlotError::NotOwner(caller));
        }
        let held = self.escrow.total_held();
        if held != Decimal::ZERO {
            return Err(OpenlotError::EscrowOutstanding { held });
        }
        if let Some(lot) = self.timeline.lot() {
            if self.items_transferred < lot.item_count() {
                return Err(OpenlotError::ItemsStillReserved);
            }
        }
        self.retired = true;
        self.record(AuctionEvent::AuctionRetired, now);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Bidding
    // -----------------------------------------------------------------------

    /// Deposits an escrowed bid, registering the bidder on first contact.
    /// Repeat bids accumulate into the same record and keep the original
    /// insertion rank. Returns the accumulated amount.
    pub fn bid(
        &mut self,
        caller: AccountId,
        amount: Decimal,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.ensure_active()?;
        if control.is_paused() {
            return Err(OpenlotError::Paused);
        }
        if self.timeline.lot().is_none() {
            return Err(OpenlotError::NotInitialized);
        }
        if self.timeline.is_cancelled() {
            return Err(OpenlotError::Cancelled);
        }
        if self.timeline.has_bidding_ended(now) {
            return Err(OpenlotError::BiddingWindowClosed);
        }
        if amount <= Decimal::ZERO {
            return Err(OpenlotError::ZeroBid);
        }
        self.registry.register(caller, now);
        self.escrow.deposit(caller, amount);
        self.conservation.record_deposit(amount);
        let accumulated = self.escrow.held(caller);
        self.record(
            AuctionEvent::Bid {
                bidder: caller,
                bid_amount: amount,
                accumulated_bid_amount: accumulated,
            },
            now,
        );
        self.conservation.verify(self.escrow.total_held())?;
        Ok(accumulated)
    }

    /// Refunds the caller's full accumulated bid.
    ///
    /// Open until a clearing price is proposed; after that the settlement
    /// withdrawal paths take over. Always open once the auction is
    /// cancelled. The registry slot survives, so re-bidding keeps the
    /// original insertion rank.
    pub fn cancel_bid(&mut self, caller: AccountId, now: DateTime<Utc>) -> Result<Decimal> {
        self.ensure_active()?;
        if self.timeline.lot().is_none() {
            return Err(OpenlotError::NotInitialized);
        }
        if self.escrow.held(caller) == Decimal::ZERO {
            return Err(OpenlotError::NoEscrowHeld(caller));
        }
        if self.engine.proposal().is_some() && !self.timeline.is_cancelled() {
            return Err(OpenlotError::BidLocked);
        }
        let amount = self.escrow.withdraw_all(caller)?;
        self.conservation.record_refund(amount);
        self.record(
            AuctionEvent::BidCancelled {
                bidder: caller,
                amount,
            },
            now,
        );
        self.conservation.verify(self.escrow.total_held())?;
        Ok(amount)
    }

    // -----------------------------------------------------------------------
    // Clearing
    // -----------------------------------------------------------------------

    /// Proposes the uniform clearing price once bidding has closed.
    ///
    /// Re-proposing a different price before validation restarts the scan.
    /// Permanently unavailable after the safety timeout.
    pub fn propose_price(
        &mut self,
        caller: AccountId,
        price: Decimal,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        let Some(lot) = self.timeline.lot() else {
            return Err(OpenlotError::NotInitialized);
        };
        let item_count = lot.item_count();
        if self.timeline.is_cancelled() {
            return Err(OpenlotError::Cancelled);
        }
        if !self.timeline.has_bidding_ended(now) {
            return Err(OpenlotError::BiddingStillOpen);
        }
        if self.timeline.is_safety_timeout_elapsed(now) {
            return Err(OpenlotError::SafetyTimeoutElapsed);
        }
        self.engine
            .propose(price, self.registry.len(), item_count, now)?;
        self.record(AuctionEvent::PriceProposed { price }, now);
        Ok(())
    }

    /// Runs one bounded validation batch and journals completion.
    ///
    /// Call repeatedly until the returned report is `completed`; each call
    /// scans at most the configured batch size and resumes from the
    /// persisted cursor.
    pub fn validate_price(
        &mut self,
        caller: AccountId,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<ScanReport> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        let Some(lot) = self.timeline.lot() else {
            return Err(OpenlotError::NotInitialized);
        };
        let item_count = lot.item_count();
        if self.timeline.is_cancelled() {
            return Err(OpenlotError::Cancelled);
        }
        if !self.timeline.has_bidding_ended(now) {
            return Err(OpenlotError::BiddingStillOpen);
        }
        if self.timeline.is_safety_timeout_elapsed(now) {
            return Err(OpenlotError::SafetyTimeoutElapsed);
        }
        let price = self.engine.price().ok_or(OpenlotError::NoPriceProposed)?;
        let budget = usize::try_from(self.engine.max_iterations()).unwrap_or(usize::MAX);
        let window = self.window_from(self.engine.cursor(), budget);
        let report = self
            .engine
            .validate_batch(&window, self.registry.len(), item_count)?;
        if report.completed {
            self.record(
                AuctionEvent::PriceValidated {
                    price,
                    num_items_sellable: report.num_items_sellable,
                },
                now,
            );
        }
        Ok(report)
    }

    /// Changes the validation batch size. Affects call count, never the
    /// winner set.
    pub fn set_max_iterations(
        &mut self,
        caller: AccountId,
        iterations: u32,
        control: &impl AccessControl,
    ) -> Result<()> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        self.engine.set_max_iterations(iterations)
    }

    // -----------------------------------------------------------------------
    // Settlement
    // -----------------------------------------------------------------------

    /// Hands the caller their won item and refunds escrow above the
    /// clearing price. The price portion moves to the proceeds pot unless
    /// the operator has already collected it.
    ///
    /// Items are assigned in lot order as winners arrive; the item
    /// transfer is the last action of the call.
    pub fn redeem_item(
        &mut self,
        caller: AccountId,
        ledger: &mut impl TokenLedger,
        now: DateTime<Utc>,
    ) -> Result<(ItemId, Decimal)> {
        self.ensure_active()?;
        let Some(lot) = self.timeline.lot() else {
            return Err(OpenlotError::NotInitialized);
        };
        if !self.engine.is_validated() {
            return Err(OpenlotError::NotValidated);
        }
        if !self.engine.is_winner(caller) {
            return Err(OpenlotError::NotWinner(caller));
        }
        self.payouts.ensure_unpaid(caller)?;
        let proposal = self
            .engine
            .proposal()
            .ok_or_else(|| OpenlotError::Internal("validated without a proposal".into()))?;
        let price = proposal.price;
        if self.items_assigned >= proposal.num_items_sellable {
            return Err(OpenlotError::SoldOut);
        }
        let item = lot.items[self.items_assigned];
        let held = self.escrow.held(caller);
        // Once the operator has withdrawn, the price portion has already
        // been deducted from this winner's balance.
        let excess = if self.operator.has_withdrawn() {
            held
        } else {
            if held < price {
                return Err(OpenlotError::Internal(format!(
                    "winner {caller} holds {held}, below clearing price {price}"
                )));
            }
            held - price
        };
        self.payouts.record_redemption(caller, excess, item, now)?;
        if held > Decimal::ZERO {
            let _ = self.escrow.withdraw_all(caller)?;
        }
        if !self.operator.has_withdrawn() {
            self.escrow.credit_pot(price);
        }
        self.conservation.record_refund(excess);
        self.items_assigned += 1;
        self.items_transferred += 1;
        self.record(
            AuctionEvent::ItemRedeemed {
                redeemer: caller,
                item,
                excess,
            },
            now,
        );
        self.conservation.verify(self.escrow.total_held())?;
        ledger
            .transfer_item(item, self.vault, caller)
            .map_err(|err| {
                OpenlotError::Internal(format!("item transfer failed after payout: {err}"))
            })?;
        Ok((item, excess))
    }

    /// Refunds the caller's full remaining escrow.
    ///
    /// Open to non-winners once the price is validated, to everyone once
    /// the auction is cancelled, and to everyone once the safety timeout
    /// elapses without a validated price. A winner may only take this exit
    /// after every sellable item has been assigned.
    pub fn withdraw_bid(&mut self, caller: AccountId, now: DateTime<Utc>) -> Result<Decimal> {
        self.ensure_active()?;
        if self.timeline.lot().is_none() {
            return Err(OpenlotError::NotInitialized);
        }
        let held = self.escrow.held(caller);
        if held == Decimal::ZERO {
            return Err(OpenlotError::NoEscrowHeld(caller));
        }
        let timed_out =
            self.timeline.is_safety_timeout_elapsed(now) && !self.engine.is_validated();
        if self.timeline.is_cancelled() || timed_out {
            // Refunds unconditionally open.
        } else if self.engine.is_validated() {
            if self.engine.is_winner(caller) {
                let sellable = self
                    .engine
                    .proposal()
                    .map_or(0, |proposal| proposal.num_items_sellable);
                if self.items_assigned < sellable {
                    return Err(OpenlotError::ItemsStillReserved);
                }
            }
        } else if !self.timeline.has_bidding_ended(now) {
            return Err(OpenlotError::BiddingStillOpen);
        } else {
            return Err(OpenlotError::NotValidated);
        }
        self.payouts.record_withdrawal(caller, held, now)?;
        let _ = self.escrow.withdraw_all(caller)?;
        self.conservation.record_refund(held);
        self.record(
            AuctionEvent::BidWithdrawn {
                withdrawer: caller,
                amount: held,
            },
            now,
        );
        if timed_out {
            tracing::warn!(
                auction = %self.id,
                bidder = %caller,
                amount = %held,
                "Escrow released by safety timeout"
            );
        }
        self.conservation.verify(self.escrow.total_held())?;
        Ok(held)
    }

    /// Collects the auction proceeds and takes back the unsold items.
    ///
    /// Proceeds are the pot plus the clearing price of every winning claim
    /// not yet redeemed; those winners keep only their excess in escrow.
    /// Funds go to the treasury account, items to the caller. One-shot.
    pub fn operator_withdraw(
        &mut self,
        caller: AccountId,
        ledger: &mut impl TokenLedger,
        control: &impl AccessControl,
        now: DateTime<Utc>,
    ) -> Result<Decimal> {
        self.ensure_active()?;
        self.require_manager(control, caller)?;
        let Some(lot) = self.timeline.lot() else {
            return Err(OpenlotError::NotInitialized);
        };
        if !self.engine.is_validated() {
            return Err(OpenlotError::NotValidated);
        }
        if self.operator.has_withdrawn() {
            return Err(OpenlotError::OperatorAlreadyWithdrawn);
        }
        let proposal = self
            .engine
            .proposal()
            .ok_or_else(|| OpenlotError::Internal("validated without a proposal".into()))?;
        let price = proposal.price;
        let unsold: Vec<ItemId> = lot.items[proposal.num_items_sellable..].to_vec();
        let winners: Vec<AccountId> = self.engine.confirmed_winners().to_vec();
        let mut funds = self.escrow.drain_pot();
        for winner in winners {
            if !self.payouts.has_redeemed(winner) {
                self.escrow.deduct(winner, price).map_err(|err| {
                    OpenlotError::Internal(format!("winner escrow below clearing price: {err}"))
                })?;
                funds += price;
            }
        }
        self.conservation.record_proceeds(funds);
        self.operator.record(funds, unsold.len(), self.treasury, now)?;
        self.items_transferred += unsold.len();
        self.record(
            AuctionEvent::OperatorWithdrawal {
                funds,
                items_returned: unsold.len(),
            },
            now,
        );
        tracing::info!(
            auction = %self.id,
            funds = %funds,
            items_returned = unsold.len(),
            "Operator proceeds withdrawn"
        );
        self.conservation.verify(self.escrow.total_held())?;
        for &item in &unsold {
            ledger
                .transfer_item(item, self.vault, caller)
                .map_err(|err| OpenlotError::Internal(format!("custody return failed: {err}")))?;
        }
        Ok(funds)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> AuctionId {
        self.id
    }

    /// The custody account lot items must be transferred to before
    /// initialization.
    #[must_use]
    pub fn vault(&self) -> AccountId {
        self.vault
    }

    #[must_use]
    pub fn treasury(&self) -> AccountId {
        self.treasury
    }

    #[must_use]
    pub fn config(&self) -> &AuctionConfig {
        self.timeline.config()
    }

    /// Current phase, derived lazily from stored state and `now`.
    #[must_use]
    pub fn phase(&self, now: DateTime<Utc>) -> AuctionPhase {
        if self.timeline.is_cancelled() {
            return AuctionPhase::Cancelled;
        }
        if self.timeline.lot().is_none() {
            return AuctionPhase::Uninitialized;
        }
        if self.engine.is_validated() {
            return AuctionPhase::PriceValidated;
        }
        if self.engine.proposal().is_some() {
            return AuctionPhase::PriceSet;
        }
        if self.timeline.is_open(now) {
            AuctionPhase::Open
        } else {
            AuctionPhase::BiddingClosed
        }
    }

    #[must_use]
    pub fn lot(&self) -> Option<&AuctionLot> {
        self.timeline.lot()
    }

    /// The caller-visible view of one bidder: registry rank joined with
    /// the live escrow balance.
    #[must_use]
    pub fn bid_of(&self, account: AccountId) -> Option<BidRecord> {
        let insertion_index = self.registry.insertion_index(account)?;
        let first_bid_at = self.registry.first_bid_at(account)?;
        Some(BidRecord {
            bidder: account,
            amount: self.escrow.held(account),
            insertion_index,
            first_bid_at,
        })
    }

    /// All bid records in insertion order.
    #[must_use]
    pub fn bids(&self) -> Vec<BidRecord> {
        self.registry
            .accounts()
            .iter()
            .filter_map(|&account| self.bid_of(account))
            .collect()
    }

    #[must_use]
    pub fn num_bidders(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn escrow_held(&self, account: AccountId) -> Decimal {
        self.escrow.held(account)
    }

    /// Everything currently in custody of the auction: balances plus pot.
    #[must_use]
    pub fn total_escrow(&self) -> Decimal {
        self.escrow.total_held()
    }

    #[must_use]
    pub fn proceeds_pot(&self) -> Decimal {
        self.escrow.pot()
    }

    #[must_use]
    pub fn proposal(&self) -> Option<&PriceProposal> {
        self.engine.proposal()
    }

    #[must_use]
    pub fn clearing_price(&self) -> Option<Decimal> {
        self.engine.price()
    }

    #[must_use]
    pub fn is_winner(&self, account: AccountId) -> bool {
        self.engine.is_winner(account)
    }

    /// Zero-based rank among confirmed winners, once validated.
    #[must_use]
    pub fn winner_rank(&self, account: AccountId) -> Option<usize> {
        self.engine
            .proposal()
            .and_then(|proposal| proposal.winner_rank(account))
    }

    #[must_use]
    pub fn payout(&self, account: AccountId) -> Option<&PayoutRecord> {
        self.payouts.payout(account)
    }

    #[must_use]
    pub fn operator_withdrawal(&self) -> Option<&OperatorWithdrawal> {
        self.operator.withdrawal()
    }

    /// Items still sitting in the vault.
    #[must_use]
    pub fn items_in_custody(&self) -> usize {
        self.timeline
            .lot()
            .map_or(0, |lot| lot.item_count() - self.items_transferred)
    }

    #[must_use]
    pub fn is_safety_timeout_elapsed(&self, now: DateTime<Utc>) -> bool {
        self.timeline.is_safety_timeout_elapsed(now)
    }

    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired
    }

    /// The full event journal, in sequence order.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.journal
    }

    /// Checks that everything deposited is still held, refunded, or paid
    /// out as proceeds.
    pub fn verify_escrow(&self) -> Result<()> {
        self.conservation.verify(self.escrow.total_held())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn ensure_active(&self) -> Result<()> {
        if self.retired {
            return Err(OpenlotError::Retired);
        }
        Ok(())
    }

    fn require_manager(&self, control: &impl AccessControl, caller: AccountId) -> Result<()> {
        if control.is_manager(caller) {
            Ok(())
        } else {
            Err(OpenlotError::NotManager(caller))
        }
    }

    fn window_from(&self, cursor: usize, budget: usize) -> Vec<BidRecord> {
        self.registry
            .span(cursor, budget)
            .iter()
            .filter_map(|&account| self.bid_of(account))
            .collect()
    }

    fn record(&mut self, event: AuctionEvent, at: DateTime<Utc>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.journal.push(EventRecord { seq, at, event });
    }
}
