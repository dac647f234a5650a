//! Credit ledger interface for the Agora governance engine.
//!
//! The staking token is owned by an external ledger. This crate defines the
//! minimal interface the governance core depends on ([`CreditLedger`]) and an
//! in-memory implementation ([`MemoryLedger`]) for local replays and tests.

pub mod error;
pub mod ledger;
pub mod memory;

pub use error::LedgerError;
pub use ledger::CreditLedger;
pub use memory::MemoryLedger;
