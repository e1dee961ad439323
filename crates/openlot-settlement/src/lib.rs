//! # openlot-settlement
//!
//! **Settlement plane**: everything that happens to escrowed funds and item
//! claims after the clearing price is validated.
//!
//! ## Flow
//!
//! Once validation seals the winner list, settlement:
//! 1. Pays each account at most once, either an item redemption or a full
//!    escrow refund, never both
//! 2. Books the operator's one-shot proceeds withdrawal
//! 3. Re-checks funds conservation after every movement: everything
//!    deposited is still held, refunded, or paid out as proceeds
//!
//! The books here track outcomes; they hold no balances themselves. Escrow
//! amounts stay in the bidding plane until the auction facade moves them.

pub mod conservation;
pub mod operator;
pub mod payout_book;

pub use conservation::FundsConservation;
pub use operator::OperatorBook;
pub use payout_book::PayoutBook;
