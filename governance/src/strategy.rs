//! Pluggable voting strategies and the manager that holds the active one.
//!
//! The proposal engine never special-cases a strategy: it asks whatever is
//! active for voting power and for the verdict on a tally.

use crate::error::GovernanceError;
use agora_staking::StakeView;
use agora_types::{AccountId, Event, ProtocolParams, Timestamp};
use std::fmt;
use std::sync::Arc;

/// Converts stake into voting power and judges tallies.
pub trait VotingStrategy: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Voting power of `account` under the current stakes and parameters.
    fn calculate_voting_power(
        &self,
        account: &AccountId,
        stakes: &dyn StakeView,
        params: &ProtocolParams,
    ) -> Result<u128, GovernanceError>;

    /// Voting power of all voting stake combined.
    fn total_voting_power(&self, stakes: &dyn StakeView, params: &ProtocolParams) -> u128;

    /// Whether a tally passes.
    fn is_proposal_accepted(
        &self,
        votes_for: u128,
        votes_against: u128,
        total_voting_power: u128,
    ) -> bool;
}

impl fmt::Debug for dyn VotingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VotingStrategy({})", self.name())
    }
}

/// Floor division of stake by the token ratio; a zero ratio yields no power.
pub fn stake_to_power(stake: u128, tokens_per_voting_power: u128) -> u128 {
    stake
        .checked_div(tokens_per_voting_power)
        .unwrap_or(0)
}

/// Identity of a strategy instance (two handles to the same instance compare equal).
pub fn strategy_id(strategy: &Arc<dyn VotingStrategy>) -> usize {
    Arc::as_ptr(strategy) as *const () as usize
}

/// One token-weighted vote per `tokens_per_voting_power` staked; strict majority wins.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleMajorityStrategy;

impl VotingStrategy for SimpleMajorityStrategy {
    fn name(&self) -> &str {
        "simple_majority"
    }

    fn calculate_voting_power(
        &self,
        account: &AccountId,
        stakes: &dyn StakeView,
        params: &ProtocolParams,
    ) -> Result<u128, GovernanceError> {
        if account.is_zero() {
            return Err(GovernanceError::InvalidAddress);
        }
        Ok(stake_to_power(
            stakes.voting_stake(account),
            params.tokens_per_voting_power,
        ))
    }

    fn total_voting_power(&self, stakes: &dyn StakeView, params: &ProtocolParams) -> u128 {
        stake_to_power(stakes.total_voting_staked(), params.tokens_per_voting_power)
    }

    fn is_proposal_accepted(&self, votes_for: u128, votes_against: u128, _total: u128) -> bool {
        votes_for > votes_against
    }
}

/// Simple majority that additionally requires turnout of at least
/// `quorum_bps` basis points of total voting power.
#[derive(Debug, Clone, Copy)]
pub struct QuorumMajorityStrategy {
    pub quorum_bps: u32,
}

impl QuorumMajorityStrategy {
    pub fn new(quorum_bps: u32) -> Self {
        Self {
            quorum_bps: quorum_bps.min(10_000),
        }
    }

    fn quorum_met(&self, turnout: u128, total: u128) -> bool {
        // turnout / total >= bps / 10_000, in integers
        match (
            turnout.checked_mul(10_000),
            total.checked_mul(u128::from(self.quorum_bps)),
        ) {
            (Some(lhs), Some(rhs)) => lhs >= rhs,
            _ => turnout >= total / 10_000 * u128::from(self.quorum_bps),
        }
    }
}

impl VotingStrategy for QuorumMajorityStrategy {
    fn name(&self) -> &str {
        "quorum_majority"
    }

    fn calculate_voting_power(
        &self,
        account: &AccountId,
        stakes: &dyn StakeView,
        params: &ProtocolParams,
    ) -> Result<u128, GovernanceError> {
        SimpleMajorityStrategy.calculate_voting_power(account, stakes, params)
    }

    fn total_voting_power(&self, stakes: &dyn StakeView, params: &ProtocolParams) -> u128 {
        SimpleMajorityStrategy.total_voting_power(stakes, params)
    }

    fn is_proposal_accepted(
        &self,
        votes_for: u128,
        votes_against: u128,
        total_voting_power: u128,
    ) -> bool {
        let turnout = votes_for.saturating_add(votes_against);
        votes_for > votes_against && self.quorum_met(turnout, total_voting_power)
    }
}

/// Holds the active strategy and swaps it on the owner's request.
pub struct StrategyManager {
    owner: AccountId,
    active: Arc<dyn VotingStrategy>,
    events: Vec<Event>,
}

impl StrategyManager {
    pub fn new(owner: AccountId, initial: Arc<dyn VotingStrategy>) -> Self {
        Self {
            owner,
            active: initial,
            events: Vec::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Replace the active strategy.
    ///
    /// `None` models a missing strategy reference and is rejected.
    pub fn set_active_strategy(
        &mut self,
        caller: &AccountId,
        new_strategy: Option<Arc<dyn VotingStrategy>>,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        if *caller != self.owner {
            return Err(GovernanceError::NotOwner(*caller));
        }
        let new_strategy = new_strategy.ok_or(GovernanceError::InvalidStrategy)?;
        if Arc::ptr_eq(&new_strategy, &self.active) {
            return Err(GovernanceError::SameStrategy(new_strategy.name().to_string()));
        }
        let old = std::mem::replace(&mut self.active, new_strategy);
        tracing::info!(old = old.name(), new = self.active.name(), at = %now, "voting strategy changed");
        self.events.push(Event::StrategyChanged {
            old: old.name().to_string(),
            new: self.active.name().to_string(),
            at: now,
        });
        Ok(())
    }

    pub fn active_strategy(&self) -> &Arc<dyn VotingStrategy> {
        &self.active
    }

    pub fn active_strategy_id(&self) -> usize {
        strategy_id(&self.active)
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
