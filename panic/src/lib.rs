//! Panic circuit breaker.
//!
//! While panicked, every mutating facade operation is rejected. Only the
//! panic operator may trip or reset the breaker, and only the dao may
//! appoint a new operator.

pub mod error;
pub mod manager;

pub use error::PanicError;
pub use manager::{PanicManager, PanicState};
