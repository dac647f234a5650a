//! Protocol parameters for staking and proposals.
//!
//! Plain data. Ownership checks and change notifications live in
//! `agora_governance::ParameterStore`; this struct is what every component
//! reads.

use serde::{Deserialize, Serialize};

/// One week in seconds.
pub const WEEK_SECS: u64 = 7 * 24 * 3600;

/// All owner-tunable parameters.
///
/// Values are unvalidated integers. Consumers handle degenerate values
/// themselves (`tokens_per_voting_power == 0` means nobody has voting power).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    /// Native value (raw units) required per token in `buy_tokens`.
    pub token_price: u128,

    /// Staked tokens per unit of voting power.
    pub tokens_per_voting_power: u128,

    /// Minimum voting stake to vote (and total voting stake after a stake).
    pub min_stake_for_voting: u128,

    /// Minimum proposing stake to create a proposal.
    pub min_stake_for_proposing: u128,

    /// Lock applied to a stake record each time it grows, in seconds.
    pub staking_lock_time_secs: u64,

    /// Voting window of a new proposal, in seconds.
    pub proposal_duration_secs: u64,
}

impl ProtocolParams {
    /// Production defaults.
    pub fn defaults() -> Self {
        Self {
            token_price: 1_000_000_000,
            tokens_per_voting_power: 100,
            min_stake_for_voting: 100,
            min_stake_for_proposing: 1_000,
            staking_lock_time_secs: WEEK_SECS,
            proposal_duration_secs: WEEK_SECS,
        }
    }

    /// Short timelines for test networks and local replays.
    pub fn testnet_defaults() -> Self {
        Self {
            token_price: 1,
            staking_lock_time_secs: 600,
            proposal_duration_secs: 3600,
            ..Self::defaults()
        }
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn testnet_keeps_ratios_but_shortens_time() {
        let live = ProtocolParams::defaults();
        let test = ProtocolParams::testnet_defaults();
        assert_eq!(test.tokens_per_voting_power, live.tokens_per_voting_power);
        assert!(test.staking_lock_time_secs < live.staking_lock_time_secs);
        assert!(test.proposal_duration_secs < live.proposal_duration_secs);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let params: ProtocolParams =
            serde_json::from_str(r#"{"token_price": 2}"#).unwrap();
        assert_eq!(params.token_price, 2);
        assert_eq!(params.staking_lock_time_secs, WEEK_SECS);
    }
}
