//! Staking ledger for the Agora governance engine.
//!
//! Holders lock credit for one of two purposes, voting or proposing. Each
//! `(account, purpose)` pair has a [`StakeRecord`] whose unlock time only ever
//! moves forward: every stake sets `unlock_at = max(unlock_at, now + lock)`.
//!
//! Staking burns the tokens on the external credit ledger before the record
//! is updated; unstaking mints them back once the lock has elapsed.

pub mod engine;
pub mod error;
pub mod stake;

pub use engine::{StakePlan, StakeView, StakingEngine};
pub use error::StakingError;
pub use stake::{extend_lock, StakeRecord};
