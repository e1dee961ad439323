//! Error types for the OpenLot auction engine.
//!
//! All errors use the `OL_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Lifecycle / phase errors
//! - 2xx: Authorization errors
//! - 3xx: Bidding / escrow errors
//! - 4xx: Clearing / validation errors
//! - 5xx: Settlement / payout errors
//! - 6xx: Item custody / series errors
//! - 9xx: General / internal errors
//!
//! Every precondition violation rejects the whole call with no state
//! change; an error from any operation means the auction is exactly as it
//! was before the call.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AccountId, AuctionPhase, ItemId, SeriesId};

/// Central error enum for all OpenLot operations.
#[derive(Debug, Error)]
pub enum OpenlotError {
    // =================================================================
    // Lifecycle / Phase Errors (1xx)
    // =================================================================
    /// The auction already holds a lot; `initialize` is one-shot.
    #[error("OL_ERR_100: Auction already initialized")]
    AlreadyInitialized,

    /// The operation needs an initialized auction.
    #[error("OL_ERR_101: Auction not initialized")]
    NotInitialized,

    /// The operation is invalid for the auction's current phase.
    #[error("OL_ERR_102: Wrong phase: expected {expected}, got {actual}")]
    WrongPhase {
        expected: AuctionPhase,
        actual: AuctionPhase,
    },

    /// The operation requires the bidding window to have elapsed.
    #[error("OL_ERR_103: Bidding window still open")]
    BiddingStillOpen,

    /// The bidding window has elapsed; no further bids.
    #[error("OL_ERR_104: Bidding window closed")]
    BiddingWindowClosed,

    /// The auction was cancelled; only refund paths remain.
    #[error("OL_ERR_105: Auction cancelled")]
    Cancelled,

    /// Cancellation is blocked once a price has been validated.
    #[error("OL_ERR_106: Cannot cancel after price validation")]
    CancelAfterValidation,

    /// The safety timeout elapsed without a validated price; pricing is
    /// permanently disabled and all bids are withdrawable.
    #[error("OL_ERR_107: Safety timeout elapsed, pricing disabled")]
    SafetyTimeoutElapsed,

    /// The auction was retired; no further operations.
    #[error("OL_ERR_108: Auction retired")]
    Retired,

    /// Retirement requires escrow, pot included, to be fully drained.
    #[error("OL_ERR_109: Cannot retire: {held} still held in escrow")]
    EscrowOutstanding { held: Decimal },

    /// The bidding deadline must land within the configured window.
    #[error("OL_ERR_110: Bidding duration out of range: must be {min_secs}..={max_secs} seconds from now")]
    DurationOutOfRange { min_secs: u64, max_secs: u64 },

    /// A deadline extension must move the end time forward.
    #[error("OL_ERR_111: New deadline does not extend the current one")]
    DeadlineNotExtended,

    /// A deadline extension may not push the total duration past the
    /// configured maximum from creation.
    #[error("OL_ERR_112: Extension exceeds maximum auction duration")]
    ExtensionBeyondMax,

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The caller is not the manager.
    #[error("OL_ERR_200: Caller is not the manager: {0}")]
    NotManager(AccountId),

    /// The caller is not the owner.
    #[error("OL_ERR_201: Caller is not the owner: {0}")]
    NotOwner(AccountId),

    /// The system is paused; bidding is rejected.
    #[error("OL_ERR_202: System is paused")]
    Paused,

    // =================================================================
    // Bidding / Escrow Errors (3xx)
    // =================================================================
    /// Bids must carry a positive amount.
    #[error("OL_ERR_300: Bid amount must be positive")]
    ZeroBid,

    /// The account holds no escrow.
    #[error("OL_ERR_301: No escrow held for account {0}")]
    NoEscrowHeld(AccountId),

    /// Bids are locked once a clearing price has been proposed;
    /// withdrawal paths take over after validation.
    #[error("OL_ERR_302: Bid locked: a clearing price has been proposed")]
    BidLocked,

    /// An escrow deduction would exceed the held balance.
    #[error("OL_ERR_303: Escrow underflow for {account}: need {needed}, hold {held}")]
    EscrowUnderflow {
        account: AccountId,
        needed: Decimal,
        held: Decimal,
    },

    // =================================================================
    // Clearing / Validation Errors (4xx)
    // =================================================================
    /// The clearing price must be positive.
    #[error("OL_ERR_400: Clearing price must be positive")]
    ZeroPrice,

    /// A price can only be proposed once at least one bid exists.
    #[error("OL_ERR_401: No bidders registered")]
    NoBidders,

    /// Re-proposing the identical price is a no-op and rejected.
    #[error("OL_ERR_402: Price unchanged: {0}")]
    PriceUnchanged(Decimal),

    /// The proposal was already validated and is immutable.
    #[error("OL_ERR_403: Price already validated")]
    AlreadyValidated,

    /// Validation requires a proposed price.
    #[error("OL_ERR_404: No price proposed")]
    NoPriceProposed,

    /// The validation batch size must be positive.
    #[error("OL_ERR_405: Max validation iterations must be positive")]
    ZeroIterations,

    /// Setting the batch size to its current value is rejected.
    #[error("OL_ERR_406: Max validation iterations unchanged: {0}")]
    IterationsUnchanged(u32),

    /// Settlement requires a validated price.
    #[error("OL_ERR_407: Price not yet validated")]
    NotValidated,

    // =================================================================
    // Settlement / Payout Errors (5xx)
    // =================================================================
    /// Only confirmed winners may redeem.
    #[error("OL_ERR_500: Account is not a winner: {0}")]
    NotWinner(AccountId),

    /// The account already redeemed an item.
    #[error("OL_ERR_501: Already redeemed: {0}")]
    AlreadyRedeemed(AccountId),

    /// The account already withdrew its bid.
    #[error("OL_ERR_502: Already withdrawn: {0}")]
    AlreadyWithdrawn(AccountId),

    /// Every sellable item has been assigned.
    #[error("OL_ERR_503: All sellable items assigned")]
    SoldOut,

    /// A winner may only withdraw instead of redeeming once every
    /// sellable item has been assigned.
    #[error("OL_ERR_504: Winner cannot withdraw while items remain unassigned")]
    ItemsStillReserved,

    /// The operator withdrawal is one-shot.
    #[error("OL_ERR_505: Operator already withdrew proceeds")]
    OperatorAlreadyWithdrawn,

    /// Funds-conservation check failed. Critical safety alert.
    #[error("OL_ERR_506: Escrow conservation violation: expected held {expected}, found {actual}")]
    ConservationViolation { expected: Decimal, actual: Decimal },

    // =================================================================
    // Item Custody / Series Errors (6xx)
    // =================================================================
    /// A lot must contain at least one item.
    #[error("OL_ERR_600: Empty item set")]
    EmptyItemSet,

    /// Lot items must be unique.
    #[error("OL_ERR_601: Duplicate item in lot: {0}")]
    DuplicateItem(ItemId),

    /// All lot items must belong to one series.
    #[error("OL_ERR_602: Series mismatch: expected {expected}, got {actual}")]
    SeriesMismatch {
        expected: SeriesId,
        actual: SeriesId,
    },

    /// An item is not held in custody by the required account.
    #[error("OL_ERR_603: Item {item} not custodied by {custodian}")]
    NotCustodied { item: ItemId, custodian: AccountId },

    /// The ledger has no such item.
    #[error("OL_ERR_604: Item not found: {0}")]
    ItemNotFound(ItemId),

    /// A transfer was attempted by a non-owner.
    #[error("OL_ERR_605: Account {account} does not own {item}")]
    NotItemOwner { item: ItemId, account: AccountId },

    /// The ledger has no such series.
    #[error("OL_ERR_606: Series not found: {0}")]
    SeriesNotFound(SeriesId),

    /// The series reached its fixed capacity.
    #[error("OL_ERR_607: Series {series} is full (capacity {capacity})")]
    SeriesFull { series: SeriesId, capacity: usize },

    /// The item was already minted.
    #[error("OL_ERR_608: Item already minted: {0}")]
    DuplicateMint(ItemId),

    /// The lot exceeds the maximum item count.
    #[error("OL_ERR_609: Lot too large: {count} items, max {max}")]
    LotTooLarge { count: usize, max: usize },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OL_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Arithmetic overflow in amount math.
    #[error("OL_ERR_901: Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// Configuration error (invalid periods, zero batch size, etc.).
    #[error("OL_ERR_902: Configuration error: {0}")]
    Configuration(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenlotError>;
