//! Nullable infrastructure for deterministic testing.
//!
//! The governance core talks to the outside world through two seams: the
//! clock and the credit ledger. This crate provides implementations of both
//! that return deterministic values, can be steered from a test, and never
//! touch the system clock.

pub mod clock;
pub mod ledger;

pub use clock::NullClock;
pub use ledger::{LedgerCall, NullLedger};
