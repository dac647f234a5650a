//! Proposal lifecycle, voting strategies and governable parameters.
//!
//! A proposal opens ACTIVE and is settled exactly once into ACCEPTED,
//! REJECTED or EXPIRED. Votes are stake-weighted: the caller supplies the
//! weight computed by the active [`VotingStrategy`], which the owner may swap
//! at any time. The new strategy applies to the next finalization.

pub mod engine;
pub mod error;
pub mod params;
pub mod proposal;
pub mod strategy;

pub use engine::ProposalManager;
pub use error::GovernanceError;
pub use params::{GovernableParam, ParameterStore};
pub use proposal::{Proposal, VoteRecord};
pub use strategy::{
    stake_to_power, strategy_id, QuorumMajorityStrategy, SimpleMajorityStrategy, StrategyManager,
    VotingStrategy,
};
