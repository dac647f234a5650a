//! Proposal engine: the ACTIVE → {ACCEPTED, REJECTED, EXPIRED} state machine.

use crate::error::GovernanceError;
use crate::proposal::{Proposal, VoteRecord};
use crate::strategy::{StrategyManager, VotingStrategy};
use agora_types::{AccountId, Event, ProposalId, ProposalState, Timestamp, VoteType};
use std::collections::HashMap;
use std::sync::Arc;

/// Tallies after moving `weight` out of `from` (if any) and into `to`.
fn retally(
    votes_for: u128,
    votes_against: u128,
    from: Option<(VoteType, u128)>,
    to: (VoteType, u128),
) -> Option<(u128, u128)> {
    let (mut f, mut a) = (votes_for, votes_against);
    if let Some((vote, weight)) = from {
        match vote {
            VoteType::For => f = f.checked_sub(weight)?,
            VoteType::Against => a = a.checked_sub(weight)?,
            VoteType::None => {}
        }
    }
    match to.0 {
        VoteType::For => f = f.checked_add(to.1)?,
        VoteType::Against => a = a.checked_add(to.1)?,
        VoteType::None => {}
    }
    Some((f, a))
}

/// Owns every proposal and vote, and the strategy used to judge them.
pub struct ProposalManager {
    owner: AccountId,
    strategies: StrategyManager,
    proposals: Vec<Proposal>,
    votes: HashMap<ProposalId, HashMap<AccountId, VoteRecord>>,
    min_voting_power_to_propose: u128,
    default_proposal_duration: u64,
    events: Vec<Event>,
}

impl ProposalManager {
    pub fn new(
        owner: AccountId,
        strategy: Arc<dyn VotingStrategy>,
        min_voting_power_to_propose: u128,
        default_proposal_duration: u64,
    ) -> Result<Self, GovernanceError> {
        if default_proposal_duration == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        Ok(Self {
            owner,
            strategies: StrategyManager::new(owner, strategy),
            proposals: Vec::new(),
            votes: HashMap::new(),
            min_voting_power_to_propose,
            default_proposal_duration,
            events: Vec::new(),
        })
    }

    /// Open a new proposal for voting.
    pub fn create_proposal(
        &mut self,
        proposer: &AccountId,
        title: &str,
        description: &str,
        proposer_voting_power: u128,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        if title.trim().is_empty() {
            return Err(GovernanceError::EmptyTitle);
        }
        if description.trim().is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }
        if proposer_voting_power < self.min_voting_power_to_propose {
            return Err(GovernanceError::InsufficientVotingPower {
                have: proposer_voting_power,
                need: self.min_voting_power_to_propose,
            });
        }
        let id = self.proposals.len() as ProposalId;
        let deadline = now.saturating_add(self.default_proposal_duration);
        self.proposals.push(Proposal {
            id,
            proposer: *proposer,
            title: title.to_string(),
            description: description.to_string(),
            created_at: now,
            deadline,
            votes_for: 0,
            votes_against: 0,
            state: ProposalState::Active,
        });
        tracing::info!(id, %proposer, %deadline, "proposal created");
        self.events.push(Event::ProposalCreated {
            id,
            proposer: *proposer,
            title: title.to_string(),
            deadline,
        });
        Ok(id)
    }

    /// Record a first vote.
    pub fn vote(
        &mut self,
        voter: &AccountId,
        id: ProposalId,
        vote: VoteType,
        weight: u128,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let proposal = self.open_proposal(id, now)?;
        if vote == VoteType::None {
            return Err(GovernanceError::InvalidVoteType);
        }
        if weight == 0 {
            return Err(GovernanceError::ZeroVotingPower);
        }
        if self.has_user_voted(id, voter) {
            return Err(GovernanceError::AlreadyVoted { id, voter: *voter });
        }
        let (votes_for, votes_against) =
            retally(proposal.votes_for, proposal.votes_against, None, (vote, weight))
                .ok_or(GovernanceError::Overflow)?;

        let proposal = &mut self.proposals[id as usize];
        proposal.votes_for = votes_for;
        proposal.votes_against = votes_against;
        self.votes
            .entry(id)
            .or_default()
            .insert(*voter, VoteRecord { vote, weight });
        tracing::info!(id, %voter, %vote, weight, "vote cast");
        self.events.push(Event::VoteCast {
            id,
            voter: *voter,
            vote,
            weight,
        });
        Ok(())
    }

    /// Move a recorded vote to the other side.
    ///
    /// The weight recorded on the first vote is what moves between buckets;
    /// `weight` only has to be non-zero.
    pub fn change_vote(
        &mut self,
        voter: &AccountId,
        id: ProposalId,
        new_vote: VoteType,
        weight: u128,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.proposal(id)?;
        let previous = self.get_user_vote(id, voter);
        if !previous.has_voted() {
            return Err(GovernanceError::NotVotedYet { id, voter: *voter });
        }
        let proposal = self.open_proposal(id, now)?;
        if new_vote == VoteType::None {
            return Err(GovernanceError::InvalidVoteType);
        }
        if weight == 0 {
            return Err(GovernanceError::ZeroVotingPower);
        }
        let (votes_for, votes_against) = retally(
            proposal.votes_for,
            proposal.votes_against,
            Some((previous.vote, previous.weight)),
            (new_vote, previous.weight),
        )
        .ok_or(GovernanceError::Overflow)?;

        let proposal = &mut self.proposals[id as usize];
        proposal.votes_for = votes_for;
        proposal.votes_against = votes_against;
        self.votes.entry(id).or_default().insert(
            *voter,
            VoteRecord {
                vote: new_vote,
                weight: previous.weight,
            },
        );
        tracing::info!(id, %voter, old = %previous.vote, new = %new_vote, "vote changed");
        self.events.push(Event::VoteChanged {
            id,
            voter: *voter,
            old: previous.vote,
            new: new_vote,
            weight: previous.weight,
        });
        Ok(())
    }

    /// Settle an active proposal.
    ///
    /// Past the deadline the result is always EXPIRED, whatever the tally.
    /// Otherwise the active strategy decides between ACCEPTED and REJECTED.
    pub fn finalize_proposal(
        &mut self,
        id: ProposalId,
        total_voting_power: u128,
        now: Timestamp,
    ) -> Result<ProposalState, GovernanceError> {
        let proposal = self.active_proposal(id)?;
        let new_state = if proposal.deadline_passed(now) {
            ProposalState::Expired
        } else if self.strategies.active_strategy().is_proposal_accepted(
            proposal.votes_for,
            proposal.votes_against,
            total_voting_power,
        ) {
            ProposalState::Accepted
        } else {
            ProposalState::Rejected
        };
        self.transition(id, new_state);
        Ok(new_state)
    }

    /// Mark an overdue active proposal as EXPIRED.
    pub fn expire_proposal(&mut self, id: ProposalId, now: Timestamp) -> Result<(), GovernanceError> {
        let proposal = self.active_proposal(id)?;
        if !proposal.deadline_passed(now) {
            return Err(GovernanceError::DeadlineNotPassed {
                id,
                deadline: proposal.deadline,
            });
        }
        self.transition(id, ProposalState::Expired);
        Ok(())
    }

    // ── Admin ─────────────────────────────────────────────────────────────

    pub fn set_voting_strategy(
        &mut self,
        caller: &AccountId,
        strategy: Option<Arc<dyn VotingStrategy>>,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.only_owner(caller)?;
        self.strategies.set_active_strategy(caller, strategy, now)
    }

    pub fn set_min_voting_power_to_propose(
        &mut self,
        caller: &AccountId,
        value: u128,
    ) -> Result<(), GovernanceError> {
        self.only_owner(caller)?;
        let old = std::mem::replace(&mut self.min_voting_power_to_propose, value);
        tracing::info!(old, new = value, "min voting power to propose changed");
        self.events
            .push(Event::MinVotingPowerToProposeChanged { old, new: value });
        Ok(())
    }

    pub fn set_default_proposal_duration(
        &mut self,
        caller: &AccountId,
        secs: u64,
    ) -> Result<(), GovernanceError> {
        self.validate_default_proposal_duration(caller, secs)?;
        let old = std::mem::replace(&mut self.default_proposal_duration, secs);
        tracing::info!(old, new = secs, "default proposal duration changed");
        self.events
            .push(Event::DefaultProposalDurationChanged { old, new: secs });
        Ok(())
    }

    /// Check that `set_default_proposal_duration` would succeed.
    pub fn validate_default_proposal_duration(
        &self,
        caller: &AccountId,
        secs: u64,
    ) -> Result<(), GovernanceError> {
        self.only_owner(caller)?;
        if secs == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    pub fn get_proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposal(id)
    }

    pub fn get_proposal_state(&self, id: ProposalId) -> Result<ProposalState, GovernanceError> {
        Ok(self.proposal(id)?.state)
    }

    /// `(votes_for, votes_against)`.
    pub fn get_proposal_results(&self, id: ProposalId) -> Result<(u128, u128), GovernanceError> {
        let p = self.proposal(id)?;
        Ok((p.votes_for, p.votes_against))
    }

    /// The recorded vote, or `NONE` with zero weight.
    pub fn get_user_vote(&self, id: ProposalId, voter: &AccountId) -> VoteRecord {
        self.votes
            .get(&id)
            .and_then(|votes| votes.get(voter))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_proposal_active(&self, id: ProposalId) -> bool {
        self.proposal(id).map(Proposal::is_active).unwrap_or(false)
    }

    pub fn has_user_voted(&self, id: ProposalId, voter: &AccountId) -> bool {
        self.get_user_vote(id, voter).has_voted()
    }

    pub fn has_proposal_deadline_passed(
        &self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<bool, GovernanceError> {
        Ok(self.proposal(id)?.deadline_passed(now))
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Ids of proposals still in the ACTIVE state, including overdue ones.
    pub fn active_proposal_ids(&self) -> Vec<ProposalId> {
        self.proposals
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.id)
            .collect()
    }

    pub fn min_voting_power_to_propose(&self) -> u128 {
        self.min_voting_power_to_propose
    }

    pub fn default_proposal_duration(&self) -> u64 {
        self.default_proposal_duration
    }

    /// The strategy in force right now.
    pub fn active_strategy(&self) -> &Arc<dyn VotingStrategy> {
        self.strategies.active_strategy()
    }

    pub fn strategy_manager(&self) -> &StrategyManager {
        &self.strategies
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Notifications from this engine and its strategy manager, in order of
    /// component (strategy swaps first).
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut events = self.strategies.drain_events();
        events.append(&mut self.events);
        events
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        usize::try_from(id)
            .ok()
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    fn active_proposal(&self, id: ProposalId) -> Result<&Proposal, GovernanceError> {
        let proposal = self.proposal(id)?;
        if !proposal.is_active() {
            return Err(GovernanceError::ProposalNotActive {
                id,
                state: proposal.state,
            });
        }
        Ok(proposal)
    }

    /// An active proposal that still accepts votes at `now`.
    fn open_proposal(&self, id: ProposalId, now: Timestamp) -> Result<&Proposal, GovernanceError> {
        let proposal = self.active_proposal(id)?;
        if proposal.deadline_passed(now) {
            return Err(GovernanceError::DeadlinePassed {
                id,
                deadline: proposal.deadline,
            });
        }
        Ok(proposal)
    }

    fn transition(&mut self, id: ProposalId, new_state: ProposalState) {
        let proposal = &mut self.proposals[id as usize];
        let old = std::mem::replace(&mut proposal.state, new_state);
        tracing::info!(id, %old, new = %new_state, "proposal state changed");
        self.events.push(Event::ProposalStateChanged {
            id,
            old,
            new: new_state,
        });
    }

    fn only_owner(&self, caller: &AccountId) -> Result<(), GovernanceError> {
        if *caller != self.owner {
            return Err(GovernanceError::NotOwner(*caller));
        }
        Ok(())
    }
}
