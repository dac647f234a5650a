//! Fundamental types for the Agora governance engine.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: account identifiers, timestamps and the clock seam, protocol
//! parameters, lifecycle enums, change notifications, and stable error codes.

pub mod address;
pub mod error;
pub mod event;
pub mod params;
pub mod state;
pub mod time;

pub use address::{AccountId, ParseAccountIdError};
pub use error::ErrorCode;
pub use event::{Event, ProposalId};
pub use params::ProtocolParams;
pub use state::{ProposalState, StakePurpose, VoteType};
pub use time::{Clock, SystemClock, Timestamp};
