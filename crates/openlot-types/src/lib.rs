//! # openlot-types
//!
//! Shared types, errors, and configuration for the **OpenLot** auction engine.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`AuctionId`], [`ItemId`], [`SeriesId`]
//! - **Bid model**: [`BidRecord`]
//! - **Lot model**: [`AuctionLot`] with its SHA-256 commitment digest
//! - **Phase machine**: [`AuctionPhase`] with transition checks
//! - **Clearing model**: [`PriceProposal`] (price, cursor, winner list)
//! - **Settlement model**: [`PayoutKind`], [`PayoutRecord`], [`OperatorWithdrawal`]
//! - **Event model**: [`AuctionEvent`], [`EventRecord`]
//! - **Collaborator seams**: [`TokenLedger`], [`AccessControl`]
//! - **Configuration**: [`AuctionConfig`]
//! - **Errors**: [`OpenlotError`] with `OL_ERR_` prefix codes
//! - **Constants**: system-wide limits and defaults

pub mod bid;
pub mod collab;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod lot;
pub mod phase;
pub mod proposal;
pub mod settlement;

// Re-export all primary types at crate root for ergonomic imports:
//   use openlot_types::{AccountId, BidRecord, AuctionPhase, ...};

pub use bid::*;
pub use collab::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use lot::*;
pub use phase::*;
pub use proposal::*;
pub use settlement::*;

// Constants are accessed via `openlot_types::constants::FOO`
// (not re-exported to avoid name collisions).
