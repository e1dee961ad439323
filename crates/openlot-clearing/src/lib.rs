//! **Clearing plane for OpenLot.**
//!
//! Everything needed to turn a closed book of accumulated bids into a
//! confirmed set of winners at a single clearing price:
//!
//! - [`ClearingEngine`]: holds the active [`PriceProposal`] and runs the
//!   winner-determination scan in bounded batches, resuming from a persisted
//!   cursor across calls.
//! - [`clear_lot`]: a single-pass reference clearing over a full bid view,
//!   used to cross-check that batched validation converges to the same
//!   outcome regardless of how the scan is partitioned.
//!
//! The engine never touches escrow balances or token custody. Callers feed it
//! read-only bid windows in registration order and apply the outcome
//! elsewhere.
//!
//! [`PriceProposal`]: openlot_types::PriceProposal

pub mod engine;
pub mod winner;

pub use engine::{ClearingEngine, ScanReport};
pub use winner::{LotClearing, clear_lot};
