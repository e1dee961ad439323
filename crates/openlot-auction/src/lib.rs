//! # openlot-auction
//!
//! The auction facade: a single [`LotAuction`] handle that wires the
//! bidding, clearing, and settlement planes into the full lifecycle of one
//! lot auction.
//!
//! ## Lifecycle
//!
//! 1. Manager initializes the lot: custodied, same-series items plus a
//!    bidding deadline
//! 2. Bidders deposit escrowed bids while the window is open; repeat bids
//!    accumulate
//! 3. After the window closes the manager proposes a clearing price and
//!    drives the bounded validation scan to completion
//! 4. Winners redeem one item each and get their excess back; everyone
//!    else withdraws in full; the operator collects proceeds and unsold
//!    items once
//!
//! Every operation takes the caller, the current clock reading, and the
//! external collaborators it needs. Time is never scheduled; deadlines and
//! the safety timeout are evaluated lazily against the supplied `now`.
//!
//! [`InMemoryTokenLedger`] and [`RoleTable`] are reference collaborators
//! for embedding and tests; production deployments supply their own
//! [`TokenLedger`] and [`AccessControl`] implementations.
//!
//! [`TokenLedger`]: openlot_types::TokenLedger
//! [`AccessControl`]: openlot_types::AccessControl

pub mod auction;
pub mod control;
pub mod ledger;

pub use auction::LotAuction;
pub use control::RoleTable;
pub use ledger::InMemoryTokenLedger;
pub use openlot_clearing::ScanReport;
