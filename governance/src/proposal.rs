//! Governance proposals and recorded votes.

use agora_types::{AccountId, ProposalId, ProposalState, Timestamp, VoteType};
use serde::{Deserialize, Serialize};

/// A time-boxed proposal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Sequential id, starting at 0.
    pub id: ProposalId,
    /// Who proposed it.
    pub proposer: AccountId,
    pub title: String,
    pub description: String,
    pub created_at: Timestamp,
    /// Last instant at which votes are accepted.
    pub deadline: Timestamp,
    pub votes_for: u128,
    pub votes_against: u128,
    pub state: ProposalState,
}

impl Proposal {
    pub fn is_active(&self) -> bool {
        self.state == ProposalState::Active
    }

    /// Voting closes strictly after the deadline.
    pub fn deadline_passed(&self, now: Timestamp) -> bool {
        now > self.deadline
    }

    pub fn total_votes(&self) -> u128 {
        self.votes_for.saturating_add(self.votes_against)
    }
}

/// One account's recorded vote on one proposal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub vote: VoteType,
    pub weight: u128,
}

impl VoteRecord {
    pub fn has_voted(&self) -> bool {
        self.vote != VoteType::None
    }
}
