//! The Agora DAO facade.
//!
//! [`Dao`] is the single entry point over the governance components. It owns
//! the parameter store, staking ledger, proposal manager and circuit breaker,
//! and talks to an external [`CreditLedger`](agora_ledger::CreditLedger) for
//! token movements. Each operation is all-or-nothing: on failure no component
//! state and no notification survives.

pub mod config;
pub mod dao;
pub mod error;

pub use config::{ConfigError, DaoConfig, ParamsConfig};
pub use dao::{CallContext, Dao};
pub use error::DaoError;
