//! # openlot-bidding
//!
//! **Bidding plane**: escrowed balance tracking, the insertion-ordered
//! bidder registry, and the auction timeline.
//!
//! ## Architecture
//!
//! Three components with one responsibility each:
//! 1. **EscrowLedger**: per-bidder escrowed balances plus the proceeds
//!    sub-account; the single source of truth for funds
//! 2. **BidderRegistry**: append-only first-bid ordering; the ranking key
//!    for clearing
//! 3. **AuctionTimeline**: the lot, the bidding deadline, the safety
//!    timeout, and the cancellation flag, with all time checks evaluated
//!    lazily against a caller-supplied clock
//!
//! ## Bid Flow
//!
//! ```text
//! bid → AuctionTimeline.is_open(now) → BidderRegistry.register()
//!     → EscrowLedger.deposit()
//! ```
//!
//! Balances live **only** in the ledger; the registry never stores an
//! amount, so the two cannot drift apart.

pub mod escrow;
pub mod registry;
pub mod timeline;

pub use escrow::EscrowLedger;
pub use registry::BidderRegistry;
pub use timeline::AuctionTimeline;
