//! Owner-gated parameter store.
//!
//! Every field of [`ProtocolParams`] is addressable through [`GovernableParam`]
//! and changed only by the configured owner. Each change emits an
//! `(old, new)` notification. No cross-field validation happens here.

use crate::error::GovernanceError;
use agora_types::{AccountId, Event, ProtocolParams};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every parameter the owner can change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GovernableParam {
    TokenPrice,
    TokensPerVotingPower,
    MinStakeForVoting,
    MinStakeForProposing,
    StakingLockTime,
    ProposalDuration,
}

impl GovernableParam {
    pub const ALL: [GovernableParam; 6] = [
        Self::TokenPrice,
        Self::TokensPerVotingPower,
        Self::MinStakeForVoting,
        Self::MinStakeForProposing,
        Self::StakingLockTime,
        Self::ProposalDuration,
    ];

    /// Human-readable name of this parameter.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TokenPrice => "token_price",
            Self::TokensPerVotingPower => "tokens_per_voting_power",
            Self::MinStakeForVoting => "min_stake_for_voting",
            Self::MinStakeForProposing => "min_stake_for_proposing",
            Self::StakingLockTime => "staking_lock_time",
            Self::ProposalDuration => "proposal_duration",
        }
    }

    /// Whether the value is a duration in seconds (stored as `u64`).
    pub fn is_duration(&self) -> bool {
        matches!(self, Self::StakingLockTime | Self::ProposalDuration)
    }

    /// Read this parameter from a parameter set.
    pub fn get(&self, params: &ProtocolParams) -> u128 {
        match self {
            Self::TokenPrice => params.token_price,
            Self::TokensPerVotingPower => params.tokens_per_voting_power,
            Self::MinStakeForVoting => params.min_stake_for_voting,
            Self::MinStakeForProposing => params.min_stake_for_proposing,
            Self::StakingLockTime => u128::from(params.staking_lock_time_secs),
            Self::ProposalDuration => u128::from(params.proposal_duration_secs),
        }
    }
}

impl fmt::Display for GovernableParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GovernableParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown parameter {s:?}"))
    }
}

/// The singleton parameter store.
pub struct ParameterStore {
    owner: AccountId,
    params: ProtocolParams,
    events: Vec<Event>,
}

impl ParameterStore {
    pub fn new(owner: AccountId, params: ProtocolParams) -> Self {
        Self {
            owner,
            params,
            events: Vec::new(),
        }
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    pub fn get(&self, param: GovernableParam) -> u128 {
        param.get(&self.params)
    }

    /// Check that `set(param, value)` would be accepted, without applying it.
    pub fn validate(
        &self,
        caller: &AccountId,
        param: GovernableParam,
        value: u128,
    ) -> Result<(), GovernanceError> {
        if *caller != self.owner {
            return Err(GovernanceError::NotOwner(*caller));
        }
        if param.is_duration() && u64::try_from(value).is_err() {
            return Err(GovernanceError::ValueOutOfRange {
                param: param.name(),
                value,
            });
        }
        Ok(())
    }

    /// Set a parameter. Returns the previous value.
    pub fn set(
        &mut self,
        caller: &AccountId,
        param: GovernableParam,
        value: u128,
    ) -> Result<u128, GovernanceError> {
        self.validate(caller, param, value)?;
        let old = self.get(param);
        match param {
            GovernableParam::TokenPrice => self.params.token_price = value,
            GovernableParam::TokensPerVotingPower => self.params.tokens_per_voting_power = value,
            GovernableParam::MinStakeForVoting => self.params.min_stake_for_voting = value,
            GovernableParam::MinStakeForProposing => self.params.min_stake_for_proposing = value,
            GovernableParam::StakingLockTime => {
                self.params.staking_lock_time_secs = value as u64
            }
            GovernableParam::ProposalDuration => self.params.proposal_duration_secs = value as u64,
        }
        tracing::info!(param = param.name(), old, new = value, "parameter changed");
        self.events.push(Event::ParameterChanged {
            param: param.name().to_string(),
            old,
            new: value,
        });
        Ok(old)
    }

    pub fn set_token_price(&mut self, caller: &AccountId, value: u128) -> Result<u128, GovernanceError> {
        self.set(caller, GovernableParam::TokenPrice, value)
    }

    pub fn set_tokens_per_voting_power(
        &mut self,
        caller: &AccountId,
        value: u128,
    ) -> Result<u128, GovernanceError> {
        self.set(caller, GovernableParam::TokensPerVotingPower, value)
    }

    pub fn set_min_stake_for_voting(
        &mut self,
        caller: &AccountId,
        value: u128,
    ) -> Result<u128, GovernanceError> {
        self.set(caller, GovernableParam::MinStakeForVoting, value)
    }

    pub fn set_min_stake_for_proposing(
        &mut self,
        caller: &AccountId,
        value: u128,
    ) -> Result<u128, GovernanceError> {
        self.set(caller, GovernableParam::MinStakeForProposing, value)
    }

    pub fn set_staking_lock_time(
        &mut self,
        caller: &AccountId,
        secs: u64,
    ) -> Result<u128, GovernanceError> {
        self.set(caller, GovernableParam::StakingLockTime, u128::from(secs))
    }

    pub fn set_proposal_duration(
        &mut self,
        caller: &AccountId,
        secs: u64,
    ) -> Result<u128, GovernanceError> {
        self.set(caller, GovernableParam::ProposalDuration, u128::from(secs))
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
