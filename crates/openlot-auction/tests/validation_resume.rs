//! Resumable price-validation tests.
//!
//! Validation scans the bidder registry in insertion order under a
//! caller-set batch budget, persisting its cursor between calls. These
//! tests pin the resume protocol: monotonic cursor, winner cap
//! short-circuit, re-proposal resets, and the invariant that any chunking
//! of the scan lands on the same winner set as a single pass.

use chrono::{DateTime, Duration, TimeZone, Utc};
use openlot_auction::{InMemoryTokenLedger, LotAuction, RoleTable, ScanReport};
use openlot_types::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Helper: an auction closed over `amounts`, one bid per account, ready
/// for pricing.
struct ClosedAuction {
    manager: AccountId,
    control: RoleTable,
    ledger: InMemoryTokenLedger,
    auction: LotAuction,
    bidders: Vec<AccountId>,
    after: DateTime<Utc>,
}

impl ClosedAuction {
    fn new(num_items: usize, amounts: &[i64]) -> Self {
        let accounts: Vec<AccountId> = amounts.iter().map(|_| AccountId::new()).collect();
        Self::with_accounts(num_items, amounts, &accounts)
    }

    /// Same as `new` but bidding from caller-provided accounts, so two
    /// auctions can share an identical bidder population.
    fn with_accounts(num_items: usize, amounts: &[i64], accounts: &[AccountId]) -> Self {
        assert_eq!(amounts.len(), accounts.len());
        let owner = AccountId::new();
        let manager = AccountId::new();
        let mut control = RoleTable::new(owner);
        control.add_manager(owner, manager).expect("seat manager");

        let mut auction =
            LotAuction::new(AuctionConfig::default(), AccountId::new()).expect("config");
        let mut ledger = InMemoryTokenLedger::new();
        let series = SeriesId(3);
        ledger.create_series(series, num_items).expect("series");
        let items: Vec<ItemId> = (0..num_items).map(|i| ItemId(i as u64)).collect();
        for &item in &items {
            ledger.mint(item, series, auction.vault()).expect("mint");
        }
        let end = t0() + Duration::days(1);
        auction
            .initialize(manager, series, items, end, &ledger, &control, t0())
            .expect("initialize");

        for (i, (&account, &amount)) in accounts.iter().zip(amounts).enumerate() {
            auction
                .bid(
                    account,
                    dec(amount),
                    &control,
                    t0() + Duration::minutes(i as i64 + 1),
                )
                .expect("bid");
        }

        Self {
            manager,
            control,
            ledger,
            auction,
            bidders: accounts.to_vec(),
            after: end + Duration::minutes(5),
        }
    }

    fn propose(&mut self, price: i64) {
        self.auction
            .propose_price(self.manager, dec(price), &self.control, self.after)
            .expect("propose");
    }

    fn validate(&mut self) -> ScanReport {
        self.auction
            .validate_price(self.manager, &self.control, self.after)
            .expect("validate batch")
    }

    fn set_batch(&mut self, iterations: u32) {
        self.auction
            .set_max_iterations(self.manager, iterations, &self.control)
            .expect("batch size change");
    }

    fn winners(&self) -> Vec<AccountId> {
        self.auction
            .proposal()
            .map(|proposal| proposal.winners.clone())
            .unwrap_or_default()
    }

    fn propose_err(&mut self, price: i64) -> OpenlotError {
        self.auction
            .propose_price(self.manager, dec(price), &self.control, self.after)
            .expect_err("proposal must be rejected")
    }

    fn validate_err(&mut self) -> OpenlotError {
        self.auction
            .validate_price(self.manager, &self.control, self.after)
            .expect_err("validation must be rejected")
    }
}

// =============================================================================
// Test: Three qualifiers, two items: first-come order picks the winners
// =============================================================================
#[test]
fn first_come_order_breaks_the_tie() {
    let mut c = ClosedAuction::new(2, &[10, 15, 12]);
    let (x, y, z) = (c.bidders[0], c.bidders[1], c.bidders[2]);

    c.propose(10);
    let report = c.validate();
    assert!(report.completed);
    assert_eq!(report.num_winners_confirmed, 2, "winner list caps at the lot size");
    assert_eq!(c.winners(), vec![x, y]);
    assert!(
        !c.auction.is_winner(z),
        "z qualifies on amount but arrived third"
    );

    // The losing qualifier exits whole.
    assert!(matches!(
        c.auction.redeem_item(z, &mut c.ledger, c.after),
        Err(OpenlotError::NotWinner(a)) if a == z
    ));
    assert_eq!(
        c.auction.withdraw_bid(z, c.after).expect("refund"),
        dec(12)
    );
}

// =============================================================================
// Test: Batch size one advances the cursor one bidder per call
// =============================================================================
#[test]
fn single_entry_batches_advance_monotonically() {
    let mut c = ClosedAuction::new(2, &[5, 20, 5, 20, 5]);
    c.set_batch(1);
    c.propose(20);

    let r1 = c.validate();
    assert_eq!((r1.processed, r1.cursor, r1.num_winners_confirmed), (1, 1, 0));
    assert!(!r1.completed);

    let r2 = c.validate();
    assert_eq!((r2.processed, r2.cursor, r2.num_winners_confirmed), (1, 2, 1));
    assert!(!r2.completed);

    let r3 = c.validate();
    assert_eq!((r3.processed, r3.cursor, r3.num_winners_confirmed), (1, 3, 1));
    assert!(!r3.completed);

    // Fourth call confirms the second winner; the cap short-circuits the
    // rest of the registry.
    let r4 = c.validate();
    assert_eq!(r4.processed, 1);
    assert_eq!(r4.cursor, 5, "cursor snaps past unscannable entries");
    assert_eq!(r4.num_winners_confirmed, 2);
    assert_eq!(r4.num_items_sellable, 2);
    assert!(r4.completed);

    assert_eq!(c.winners(), vec![c.bidders[1], c.bidders[3]]);
    assert!(matches!(
        c.validate_err(),
        OpenlotError::AlreadyValidated
    ));
}

// =============================================================================
// Test: A full winner list short-circuits within a single call too
// =============================================================================
#[test]
fn winner_cap_short_circuits_one_call() {
    let mut c = ClosedAuction::new(2, &[9, 9, 9, 9, 9, 9]);
    c.propose(9);
    let report = c.validate();
    assert!(report.completed);
    assert_eq!(report.processed, 2, "scan stops at the second confirmation");
    assert_eq!(report.cursor, 6);
    assert_eq!(report.num_winners_confirmed, 2);
    assert_eq!(c.winners(), vec![c.bidders[0], c.bidders[1]]);
}

// =============================================================================
// Test: Any chunking of the scan equals the single-pass outcome
// =============================================================================
#[test]
fn chunked_validation_matches_single_call() {
    let mut rng = StdRng::seed_from_u64(11);
    for round in 0..10 {
        let amounts: Vec<i64> = (0..12).map(|_| rng.gen_range(1..=30)).collect();
        let accounts: Vec<AccountId> = amounts.iter().map(|_| AccountId::new()).collect();

        let mut whole = ClosedAuction::with_accounts(3, &amounts, &accounts);
        whole.propose(15);
        let reference = whole.validate();
        assert!(reference.completed, "budget 500 covers 12 bidders");

        let mut chunked = ClosedAuction::with_accounts(3, &amounts, &accounts);
        let mut batch = 0;
        chunked.propose(15);
        let mut calls = 0;
        let final_report = loop {
            let next = rng.gen_range(1..=4);
            if next != batch {
                chunked.set_batch(next);
                batch = next;
            }
            let report = chunked.validate();
            calls += 1;
            assert!(calls <= 12, "scan must terminate");
            if report.completed {
                break report;
            }
        };

        assert_eq!(
            chunked.winners(),
            whole.winners(),
            "round {round}: winner set must not depend on batching"
        );
        assert_eq!(
            final_report.num_items_sellable, reference.num_items_sellable,
            "round {round}"
        );
        assert_eq!(final_report.num_winners_confirmed, reference.num_winners_confirmed);
    }
}

// =============================================================================
// Test: Re-proposing a different price restarts the scan from zero
// =============================================================================
#[test]
fn reproposal_resets_the_scan() {
    let mut c = ClosedAuction::new(2, &[10, 11, 12, 13]);
    c.set_batch(2);
    c.propose(11);
    let partial = c.validate();
    assert!(!partial.completed);
    assert_eq!(partial.cursor, 2);

    // Same price again is a no-op and keeps the cursor.
    assert!(matches!(
        c.propose_err(11),
        OpenlotError::PriceUnchanged(p) if p == dec(11)
    ));

    // A new price discards the partial scan.
    c.propose(12);
    let proposal = c.auction.proposal().expect("proposal exists");
    assert_eq!(proposal.cursor, 0);
    assert!(!proposal.validated);
    assert!(proposal.winners.is_empty());

    let r1 = c.validate();
    let r2 = c.validate();
    assert!(r2.completed);
    assert_eq!(r1.cursor, 2);
    // At price 12 only the third and fourth bidders qualify.
    assert_eq!(c.winners(), vec![c.bidders[2], c.bidders[3]]);
    assert_eq!(r2.num_items_sellable, 2);

    // Once validated the price is immutable.
    assert!(matches!(c.propose_err(13), OpenlotError::AlreadyValidated));
}

// =============================================================================
// Test: Pricing guards through the facade
// =============================================================================
#[test]
fn pricing_guards() {
    // While bidding is open, pricing is unreachable.
    let mut c = ClosedAuction::new(1, &[5]);
    let open = t0() + Duration::hours(2);
    assert!(matches!(
        c.auction
            .propose_price(c.manager, dec(5), &c.control, open),
        Err(OpenlotError::BiddingStillOpen)
    ));
    assert!(matches!(
        c.auction.validate_price(c.manager, &c.control, open),
        Err(OpenlotError::BiddingStillOpen)
    ));

    // Validation needs a proposal on the table.
    assert!(matches!(c.validate_err(), OpenlotError::NoPriceProposed));

    // Non-positive prices are refused.
    assert!(matches!(c.propose_err(0), OpenlotError::ZeroPrice));
    assert!(matches!(c.propose_err(-3), OpenlotError::ZeroPrice));

    // An empty registry cannot be priced.
    let mut empty = ClosedAuction::new(1, &[]);
    assert!(matches!(empty.propose_err(5), OpenlotError::NoBidders));

    // Cancellation shuts pricing down.
    c.auction
        .cancel_auction(c.manager, &mut c.ledger, &c.control, c.after)
        .expect("cancel");
    assert!(matches!(c.propose_err(5), OpenlotError::Cancelled));
    assert!(matches!(c.validate_err(), OpenlotError::Cancelled));
}

// =============================================================================
// Test: Batch size bounds
// =============================================================================
#[test]
fn batch_size_bounds() {
    let mut c = ClosedAuction::new(1, &[5]);
    assert!(matches!(
        c.auction.set_max_iterations(c.manager, 0, &c.control),
        Err(OpenlotError::ZeroIterations)
    ));
    c.set_batch(25);
    assert!(matches!(
        c.auction.set_max_iterations(c.manager, 25, &c.control),
        Err(OpenlotError::IterationsUnchanged(25))
    ));
}
