//! Settlement tests: redemption, refunds, operator proceeds, retirement.
//!
//! The interesting part of settlement is ordering. Winners may redeem
//! before or after the operator collects proceeds, losers may exit at any
//! point after validation, and every interleaving must land on the same
//! totals: deposits equal refunds plus proceeds, at-most-once per payout,
//! custody fully drained before retirement.

use chrono::{DateTime, Duration, TimeZone, Utc};
use openlot_auction::{InMemoryTokenLedger, LotAuction, RoleTable};
use openlot_types::*;
use rust_decimal::Decimal;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().unwrap()
}

fn dec(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Helper: a three-item auction priced at 10 with two winners.
///
/// Bids (in order): `a` 10, `b` 20, `c` 5. Winners are `a` and `b`;
/// two items sellable, one unsold.
struct PricedAuction {
    owner: AccountId,
    manager: AccountId,
    control: RoleTable,
    ledger: InMemoryTokenLedger,
    auction: LotAuction,
    a: AccountId,
    b: AccountId,
    c: AccountId,
    after: DateTime<Utc>,
}

impl PricedAuction {
    fn new() -> Self {
        Self::with_price(Some(10))
    }

    /// `price`: `None` leaves the auction merely closed, `Some(p)`
    /// proposes and fully validates `p`.
    fn with_price(price: Option<i64>) -> Self {
        let owner = AccountId::new();
        let manager = AccountId::new();
        let mut control = RoleTable::new(owner);
        control.add_manager(owner, manager).expect("seat manager");

        let mut auction =
            LotAuction::new(AuctionConfig::default(), AccountId::new()).expect("config");
        let mut ledger = InMemoryTokenLedger::new();
        let series = SeriesId(5);
        ledger.create_series(series, 3).expect("series");
        let items: Vec<ItemId> = (0..3).map(ItemId).collect();
        for &item in &items {
            ledger.mint(item, series, auction.vault()).expect("mint");
        }
        let end = t0() + Duration::days(1);
        auction
            .initialize(manager, series, items, end, &ledger, &control, t0())
            .expect("initialize");

        let a = AccountId::new();
        let b = AccountId::new();
        let c = AccountId::new();
        auction
            .bid(a, dec(10), &control, t0() + Duration::hours(1))
            .expect("a bids");
        auction
            .bid(b, dec(20), &control, t0() + Duration::hours(2))
            .expect("b bids");
        auction
            .bid(c, dec(5), &control, t0() + Duration::hours(3))
            .expect("c bids");

        let after = end + Duration::minutes(5);
        if let Some(p) = price {
            auction
                .propose_price(manager, dec(p), &control, after)
                .expect("propose");
            let report = auction
                .validate_price(manager, &control, after)
                .expect("validate");
            assert!(report.completed);
        }

        Self {
            owner,
            manager,
            control,
            ledger,
            auction,
            a,
            b,
            c,
            after,
        }
    }

    fn redeem(&mut self, who: AccountId) -> (ItemId, Decimal) {
        let got = self
            .auction
            .redeem_item(who, &mut self.ledger, self.after)
            .expect("redeem");
        self.auction.verify_escrow().expect("conservation holds");
        got
    }

    fn withdraw(&mut self, who: AccountId) -> Decimal {
        let got = self
            .auction
            .withdraw_bid(who, self.after)
            .expect("withdraw");
        self.auction.verify_escrow().expect("conservation holds");
        got
    }

    fn operator_withdraw(&mut self) -> Decimal {
        let got = self
            .auction
            .operator_withdraw(self.manager, &mut self.ledger, &self.control, self.after)
            .expect("operator withdraw");
        self.auction.verify_escrow().expect("conservation holds");
        got
    }
}

// =============================================================================
// Test: Redemption first, operator second, late winner last
// =============================================================================
#[test]
fn mixed_settlement_order_balances() {
    let mut p = PricedAuction::new();
    let (a, b, c) = (p.a, p.b, p.c);

    // First winner redeems; the price lands in the pot.
    let (item_a, excess_a) = p.redeem(a);
    assert_eq!((item_a, excess_a), (ItemId(0), Decimal::ZERO));
    assert_eq!(p.auction.proceeds_pot(), dec(10));

    // Operator collects: the pot plus b's unredeemed price portion.
    let funds = p.operator_withdraw();
    assert_eq!(funds, dec(20));
    assert_eq!(p.auction.proceeds_pot(), Decimal::ZERO);
    assert_eq!(
        p.auction.escrow_held(b),
        dec(10),
        "only b's excess remains escrowed"
    );
    let withdrawal = p.auction.operator_withdrawal().expect("recorded");
    assert_eq!(withdrawal.funds, dec(20));
    assert_eq!(withdrawal.items_returned, 1);
    assert_eq!(p.ledger.owner_of(ItemId(2)).unwrap(), p.manager);

    // The late winner still gets item and excess.
    let (item_b, excess_b) = p.redeem(b);
    assert_eq!((item_b, excess_b), (ItemId(1), dec(10)));
    assert_eq!(p.ledger.owner_of(item_b).unwrap(), b);

    // Loser exits whole; books land on zero.
    assert_eq!(p.withdraw(c), dec(5));
    assert_eq!(p.auction.total_escrow(), Decimal::ZERO);
    assert_eq!(p.auction.items_in_custody(), 0);
}

// =============================================================================
// Test: Operator first; a fully-deducted winner still redeems
// =============================================================================
#[test]
fn operator_first_then_redemptions() {
    let mut p = PricedAuction::new();
    let (a, b) = (p.a, p.b);

    // No redemptions yet: proceeds come entirely out of winner escrow.
    let funds = p.operator_withdraw();
    assert_eq!(funds, dec(20), "price times two sellable items");
    assert_eq!(
        p.auction.escrow_held(a),
        Decimal::ZERO,
        "a bid exactly the price"
    );
    assert_eq!(p.auction.escrow_held(b), dec(10));

    // a's balance is empty but the claim is intact.
    let (item_a, excess_a) = p.redeem(a);
    assert_eq!((item_a, excess_a), (ItemId(0), Decimal::ZERO));
    assert_eq!(p.ledger.owner_of(item_a).unwrap(), a);

    let (item_b, excess_b) = p.redeem(b);
    assert_eq!((item_b, excess_b), (ItemId(1), dec(10)));

    assert_eq!(p.withdraw(p.c), dec(5));
    assert_eq!(p.auction.total_escrow(), Decimal::ZERO);
}

// =============================================================================
// Test: Each payout happens at most once, in either direction
// =============================================================================
#[test]
fn payouts_are_at_most_once() {
    let mut p = PricedAuction::new();
    let (a, c) = (p.a, p.c);

    p.redeem(a);
    assert!(matches!(
        p.auction.redeem_item(a, &mut p.ledger, p.after),
        Err(OpenlotError::AlreadyRedeemed(_))
    ));
    assert!(matches!(
        p.auction.withdraw_bid(a, p.after),
        Err(OpenlotError::AlreadyRedeemed(_))
    ));

    p.withdraw(c);
    assert!(matches!(
        p.auction.withdraw_bid(c, p.after),
        Err(OpenlotError::NoEscrowHeld(who)) if who == c
    ));

    // A loser who exited cannot come back through the winner door.
    assert!(matches!(
        p.auction.redeem_item(c, &mut p.ledger, p.after),
        Err(OpenlotError::NotWinner(who)) if who == c
    ));

    let record = p.auction.payout(a).expect("a settled");
    assert_eq!(record.kind, PayoutKind::Redeemed);
    assert_eq!(record.item, Some(ItemId(0)));
    assert_eq!(record.amount, Decimal::ZERO);
    let record = p.auction.payout(c).expect("c settled");
    assert_eq!(record.kind, PayoutKind::Withdrawn);
    assert_eq!(record.item, None);
    assert_eq!(record.amount, dec(5));
}

// =============================================================================
// Test: A winner's escrow is locked until their claim is served
// =============================================================================
#[test]
fn winner_escrow_locked_while_claim_open() {
    let mut p = PricedAuction::new();
    let b = p.b;

    assert!(matches!(
        p.auction.withdraw_bid(b, p.after),
        Err(OpenlotError::ItemsStillReserved)
    ));

    // Redemption is the way out; afterwards nothing is left to withdraw.
    let (_, excess) = p.redeem(b);
    assert_eq!(excess, dec(10));
    assert!(matches!(
        p.auction.withdraw_bid(b, p.after),
        Err(OpenlotError::AlreadyRedeemed(_))
    ));
}

// =============================================================================
// Test: Items hand out in redemption order, not bid order
// =============================================================================
#[test]
fn assignment_follows_redemption_order() {
    let mut p = PricedAuction::new();
    let (a, b) = (p.a, p.b);

    // b redeems first despite bidding second.
    let (item_b, _) = p.redeem(b);
    let (item_a, _) = p.redeem(a);
    assert_eq!(item_b, ItemId(0));
    assert_eq!(item_a, ItemId(1));
    assert_eq!(p.ledger.owner_of(ItemId(0)).unwrap(), b);
    assert_eq!(p.ledger.owner_of(ItemId(1)).unwrap(), a);
}

// =============================================================================
// Test: Validation with zero winners still settles cleanly
// =============================================================================
#[test]
fn no_qualifying_bidders_settles_to_full_refunds() {
    // Price 50 beats every bid: zero winners, zero sellable.
    let mut p = PricedAuction::with_price(Some(50));
    assert_eq!(p.auction.proposal().unwrap().num_items_sellable, 0);
    assert_eq!(p.auction.phase(p.after), AuctionPhase::PriceValidated);

    for who in [p.a, p.b, p.c] {
        assert!(!p.auction.is_winner(who));
    }
    assert_eq!(p.withdraw(p.a), dec(10));
    assert_eq!(p.withdraw(p.b), dec(20));
    assert_eq!(p.withdraw(p.c), dec(5));

    // Escrow is empty but three items still sit in the vault.
    assert!(matches!(
        p.auction.retire(p.owner, &p.control, p.after),
        Err(OpenlotError::ItemsStillReserved)
    ));

    // Proceeds are empty; every item comes back unsold.
    let funds = p.operator_withdraw();
    assert_eq!(funds, Decimal::ZERO);
    assert_eq!(
        p.auction.operator_withdrawal().unwrap().items_returned,
        3
    );
    assert_eq!(p.auction.items_in_custody(), 0);

    p.auction
        .retire(p.owner, &p.control, p.after)
        .expect("retire");
}

// =============================================================================
// Test: Settlement guards before and after their windows
// =============================================================================
#[test]
fn settlement_guards() {
    // Merely closed: no settlement surface is open yet.
    let mut p = PricedAuction::with_price(None);
    assert!(matches!(
        p.auction.redeem_item(p.a, &mut p.ledger, p.after),
        Err(OpenlotError::NotValidated)
    ));
    assert!(matches!(
        p.auction.withdraw_bid(p.a, p.after),
        Err(OpenlotError::NotValidated)
    ));
    assert!(matches!(
        p.auction
            .operator_withdraw(p.manager, &mut p.ledger, &p.control, p.after),
        Err(OpenlotError::NotValidated)
    ));

    // Validated: the operator collection is one-shot.
    let mut p = PricedAuction::new();
    p.operator_withdraw();
    assert!(matches!(
        p.auction
            .operator_withdraw(p.manager, &mut p.ledger, &p.control, p.after),
        Err(OpenlotError::OperatorAlreadyWithdrawn)
    ));
}

// =============================================================================
// Test: Retirement is blocked until funds and items are fully drained
// =============================================================================
#[test]
fn retire_waits_for_drained_books() {
    let mut p = PricedAuction::new();
    let (a, b, c) = (p.a, p.b, p.c);

    // Outstanding bidder escrow blocks retirement.
    assert!(matches!(
        p.auction.retire(p.owner, &p.control, p.after),
        Err(OpenlotError::EscrowOutstanding { held }) if held == dec(35)
    ));

    // Drain the bidder balances but leave the pot funded.
    p.redeem(a);
    p.redeem(b);
    p.withdraw(c);
    assert_eq!(p.auction.proceeds_pot(), dec(20));
    assert!(matches!(
        p.auction.retire(p.owner, &p.control, p.after),
        Err(OpenlotError::EscrowOutstanding { held }) if held == dec(20)
    ));

    // Operator collection empties the pot and returns the unsold item.
    let funds = p.operator_withdraw();
    assert_eq!(funds, dec(20));
    p.auction
        .retire(p.owner, &p.control, p.after)
        .expect("fully drained");
    assert!(p.auction.is_retired());

    // Retirement is terminal.
    assert!(matches!(
        p.auction.redeem_item(a, &mut p.ledger, p.after),
        Err(OpenlotError::Retired)
    ));
    assert!(matches!(
        p.auction
            .operator_withdraw(p.manager, &mut p.ledger, &p.control, p.after),
        Err(OpenlotError::Retired)
    ));
}
