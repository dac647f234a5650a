//! Change notifications emitted by accepted mutations.

use crate::address::AccountId;
use crate::state::{ProposalState, StakePurpose, VoteType};
use crate::time::Timestamp;
use serde::Serialize;

/// Sequential proposal identifier, starting at 0.
pub type ProposalId = u64;

/// A notification describing one accepted state change.
///
/// Serialize-only: internally tagged enums cannot be read back when they
/// carry `u128` fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    ParameterChanged {
        param: String,
        old: u128,
        new: u128,
    },
    Staked {
        account: AccountId,
        purpose: StakePurpose,
        amount: u128,
        unlock_at: Timestamp,
    },
    Unstaked {
        account: AccountId,
        purpose: StakePurpose,
        amount: u128,
    },
    StrategyChanged {
        old: String,
        new: String,
        at: Timestamp,
    },
    ProposalCreated {
        id: ProposalId,
        proposer: AccountId,
        title: String,
        deadline: Timestamp,
    },
    VoteCast {
        id: ProposalId,
        voter: AccountId,
        vote: VoteType,
        weight: u128,
    },
    VoteChanged {
        id: ProposalId,
        voter: AccountId,
        old: VoteType,
        new: VoteType,
        weight: u128,
    },
    ProposalStateChanged {
        id: ProposalId,
        old: ProposalState,
        new: ProposalState,
    },
    MinVotingPowerToProposeChanged {
        old: u128,
        new: u128,
    },
    DefaultProposalDurationChanged {
        old: u64,
        new: u64,
    },
    Panicked {
        by: AccountId,
    },
    Calmed {
        by: AccountId,
    },
    PanicOperatorChanged {
        old: AccountId,
        new: AccountId,
    },
    TokensPurchased {
        buyer: AccountId,
        value: u128,
        amount: u128,
    },
    TokensMinted {
        to: AccountId,
        amount: u128,
    },
    AllowanceApproved {
        holder: AccountId,
        spender: AccountId,
        amount: u128,
    },
    EthWithdrawn {
        to: AccountId,
        amount: u128,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_event_tag() {
        let event = Event::ProposalStateChanged {
            id: 3,
            old: ProposalState::Active,
            new: ProposalState::Expired,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "proposal_state_changed");
        assert_eq!(json["new"], "EXPIRED");
    }
}
