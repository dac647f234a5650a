//! The DAO facade: the single authorized entry point.
//!
//! Every mutating operation except `panic` and `calm` runs the panic check
//! first, then its own authorization and minimum-stake checks, then delegates
//! to the components.
//! Component notifications are collected into the journal only once the
//! whole operation has succeeded.

use std::sync::Arc;

use agora_governance::{
    GovernableParam, ParameterStore, Proposal, ProposalManager, SimpleMajorityStrategy,
    VoteRecord, VotingStrategy,
};
use agora_ledger::CreditLedger;
use agora_panic::PanicManager;
use agora_staking::{StakeRecord, StakingEngine, StakingError};
use agora_types::{
    AccountId, Event, ProposalId, ProposalState, ProtocolParams, StakePurpose, Timestamp,
    VoteType,
};
use serde::{Deserialize, Serialize};

use crate::config::DaoConfig;
use crate::error::DaoError;

/// Who is calling, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallContext {
    pub caller: AccountId,
    pub now: Timestamp,
}

impl CallContext {
    pub fn new(caller: AccountId, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// Composes parameters, staking, proposals and the circuit breaker over an
/// external credit ledger.
pub struct Dao<L: CreditLedger> {
    address: AccountId,
    owner: AccountId,
    ledger: L,
    params: ParameterStore,
    staking: StakingEngine,
    proposals: ProposalManager,
    panic: PanicManager,
    eth_balance: u128,
    pending: Vec<Event>,
    journal: Vec<Event>,
}

impl<L: CreditLedger> Dao<L> {
    /// Build a facade from configuration, starting with the simple-majority
    /// strategy.
    pub fn new(config: &DaoConfig, ledger: L) -> Result<Self, DaoError> {
        Self::with_strategy(config, ledger, Arc::new(SimpleMajorityStrategy))
    }

    pub fn with_strategy(
        config: &DaoConfig,
        ledger: L,
        strategy: Arc<dyn VotingStrategy>,
    ) -> Result<Self, DaoError> {
        if config.owner.is_zero() {
            return Err(DaoError::InvalidAddress);
        }
        let address = config.dao_address;
        let params = config.protocol_params();
        let panic = PanicManager::new(address, config.panic_operator)?;
        let proposals = ProposalManager::new(
            address,
            strategy,
            u128::from(config.min_voting_power_to_propose),
            params.proposal_duration_secs,
        )?;
        tracing::info!(
            dao = %address,
            owner = %config.owner,
            panic_operator = %config.panic_operator,
            "dao initialised"
        );
        Ok(Self {
            address,
            owner: config.owner,
            ledger,
            params: ParameterStore::new(address, params),
            staking: StakingEngine::new(address),
            proposals,
            panic,
            eth_balance: 0,
            pending: Vec::new(),
            journal: Vec::new(),
        })
    }

    // ── Tokens and native value ───────────────────────────────────────────

    /// Exchange native value for tokens at the current price.
    ///
    /// Mints `value / price` tokens; the whole `value` is kept.
    pub fn buy_tokens(&mut self, ctx: CallContext, value: u128) -> Result<u128, DaoError> {
        self.run("buy_tokens", ctx, |dao| {
            dao.check_not_panicked()?;
            let price = dao.params.params().token_price;
            if price == 0 {
                return Err(DaoError::ZeroPrice);
            }
            if value < price {
                return Err(DaoError::InsufficientEth {
                    needed: price,
                    available: value,
                });
            }
            let amount = value / price;
            let eth_balance = dao
                .eth_balance
                .checked_add(value)
                .ok_or(DaoError::Overflow)?;
            dao.ledger.mint(&ctx.caller, amount)?;
            dao.eth_balance = eth_balance;
            tracing::info!(buyer = %ctx.caller, value, amount, "tokens purchased");
            dao.pending.push(Event::TokensPurchased {
                buyer: ctx.caller,
                value,
                amount,
            });
            Ok(amount)
        })
    }

    pub fn mint_tokens(
        &mut self,
        ctx: CallContext,
        to: AccountId,
        amount: u128,
    ) -> Result<(), DaoError> {
        self.run("mint_tokens", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.only_owner(&ctx.caller)?;
            if to.is_zero() {
                return Err(DaoError::InvalidAddress);
            }
            if amount == 0 {
                return Err(DaoError::ZeroAmount);
            }
            dao.ledger.mint(&to, amount)?;
            tracing::info!(%to, amount, "tokens minted");
            dao.pending.push(Event::TokensMinted { to, amount });
            Ok(())
        })
    }

    /// Let the dao burn up to `amount` of the caller's credits when they
    /// stake. Replaces any earlier allowance; zero revokes it.
    pub fn approve(&mut self, ctx: CallContext, amount: u128) -> Result<(), DaoError> {
        self.run("approve", ctx, |dao| {
            dao.check_not_panicked()?;
            let spender = dao.address;
            dao.ledger.approve(&ctx.caller, &spender, amount)?;
            tracing::debug!(holder = %ctx.caller, amount, "allowance set");
            dao.pending.push(Event::AllowanceApproved {
                holder: ctx.caller,
                spender,
                amount,
            });
            Ok(())
        })
    }

    pub fn withdraw_eth(
        &mut self,
        ctx: CallContext,
        to: AccountId,
        amount: u128,
    ) -> Result<(), DaoError> {
        self.run("withdraw_eth", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.only_owner(&ctx.caller)?;
            if to.is_zero() {
                return Err(DaoError::InvalidAddress);
            }
            if amount == 0 {
                return Err(DaoError::ZeroAmount);
            }
            if dao.eth_balance < amount {
                return Err(DaoError::InsufficientEth {
                    needed: amount,
                    available: dao.eth_balance,
                });
            }
            dao.eth_balance -= amount;
            tracing::info!(%to, amount, remaining = dao.eth_balance, "native value withdrawn");
            dao.pending.push(Event::EthWithdrawn { to, amount });
            Ok(())
        })
    }

    // ── Staking ───────────────────────────────────────────────────────────

    pub fn stake_for_voting(
        &mut self,
        ctx: CallContext,
        amount: u128,
    ) -> Result<StakeRecord, DaoError> {
        self.run("stake_for_voting", ctx, |dao| {
            dao.stake(ctx, StakePurpose::Voting, amount)
        })
    }

    pub fn stake_for_proposing(
        &mut self,
        ctx: CallContext,
        amount: u128,
    ) -> Result<StakeRecord, DaoError> {
        self.run("stake_for_proposing", ctx, |dao| {
            dao.stake(ctx, StakePurpose::Proposing, amount)
        })
    }

    /// Release the caller's whole voting stake.
    pub fn unstake_voting(&mut self, ctx: CallContext) -> Result<u128, DaoError> {
        self.run("unstake_voting", ctx, |dao| {
            dao.unstake_all(ctx, StakePurpose::Voting)
        })
    }

    /// Release the caller's whole proposing stake.
    pub fn unstake_proposing(&mut self, ctx: CallContext) -> Result<u128, DaoError> {
        self.run("unstake_proposing", ctx, |dao| {
            dao.unstake_all(ctx, StakePurpose::Proposing)
        })
    }

    // ── Proposals ─────────────────────────────────────────────────────────

    pub fn create_proposal(
        &mut self,
        ctx: CallContext,
        title: &str,
        description: &str,
    ) -> Result<ProposalId, DaoError> {
        self.run("create_proposal", ctx, |dao| {
            dao.check_not_panicked()?;
            let min = dao.params.params().min_stake_for_proposing;
            dao.require_min_stake(&ctx.caller, StakePurpose::Proposing, min)?;
            let power = dao.voting_power(&ctx.caller)?;
            let id = dao
                .proposals
                .create_proposal(&ctx.caller, title, description, power, ctx.now)?;
            Ok(id)
        })
    }

    pub fn vote(
        &mut self,
        ctx: CallContext,
        id: ProposalId,
        vote: VoteType,
    ) -> Result<(), DaoError> {
        self.run("vote", ctx, |dao| {
            dao.check_not_panicked()?;
            let weight = dao.voter_weight(&ctx.caller)?;
            dao.proposals.vote(&ctx.caller, id, vote, weight, ctx.now)?;
            Ok(())
        })
    }

    pub fn change_vote(
        &mut self,
        ctx: CallContext,
        id: ProposalId,
        new_vote: VoteType,
    ) -> Result<(), DaoError> {
        self.run("change_vote", ctx, |dao| {
            dao.check_not_panicked()?;
            let weight = dao.voter_weight(&ctx.caller)?;
            dao.proposals
                .change_vote(&ctx.caller, id, new_vote, weight, ctx.now)?;
            Ok(())
        })
    }

    /// Settle a proposal against the current total voting power.
    pub fn finalize_proposal(
        &mut self,
        ctx: CallContext,
        id: ProposalId,
    ) -> Result<ProposalState, DaoError> {
        self.run("finalize_proposal", ctx, |dao| {
            dao.check_not_panicked()?;
            let total = dao.total_voting_power();
            let state = dao.proposals.finalize_proposal(id, total, ctx.now)?;
            Ok(state)
        })
    }

    pub fn expire_proposal(&mut self, ctx: CallContext, id: ProposalId) -> Result<(), DaoError> {
        self.run("expire_proposal", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.proposals.expire_proposal(id, ctx.now)?;
            Ok(())
        })
    }

    // ── Administration ────────────────────────────────────────────────────

    /// Swap the voting strategy. `None` is rejected as an invalid strategy.
    pub fn change_strategy(
        &mut self,
        ctx: CallContext,
        strategy: Option<Arc<dyn VotingStrategy>>,
    ) -> Result<(), DaoError> {
        self.run("change_strategy", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.only_owner(&ctx.caller)?;
            dao.proposals
                .set_voting_strategy(&dao.address, strategy, ctx.now)?;
            Ok(())
        })
    }

    /// Set a protocol parameter. A new proposal duration also becomes the
    /// default duration of proposals created from now on.
    pub fn set_parameter(
        &mut self,
        ctx: CallContext,
        param: GovernableParam,
        value: u128,
    ) -> Result<u128, DaoError> {
        self.run("set_parameter", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.only_owner(&ctx.caller)?;
            dao.params.validate(&dao.address, param, value)?;
            let duration = match param {
                GovernableParam::ProposalDuration => {
                    let secs = u64::try_from(value).map_err(|_| DaoError::Overflow)?;
                    dao.proposals
                        .validate_default_proposal_duration(&dao.address, secs)?;
                    Some(secs)
                }
                _ => None,
            };
            let old = dao.params.set(&dao.address, param, value)?;
            if let Some(secs) = duration {
                dao.proposals
                    .set_default_proposal_duration(&dao.address, secs)?;
            }
            Ok(old)
        })
    }

    pub fn set_min_voting_power_to_propose(
        &mut self,
        ctx: CallContext,
        value: u128,
    ) -> Result<(), DaoError> {
        self.run("set_min_voting_power_to_propose", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.only_owner(&ctx.caller)?;
            dao.proposals
                .set_min_voting_power_to_propose(&dao.address, value)?;
            Ok(())
        })
    }

    /// Hand the circuit breaker to a new operator.
    pub fn set_panic_operator(
        &mut self,
        ctx: CallContext,
        new_operator: AccountId,
    ) -> Result<(), DaoError> {
        self.run("set_panic_operator", ctx, |dao| {
            dao.check_not_panicked()?;
            dao.only_owner(&ctx.caller)?;
            dao.panic.set_panic_operator(&dao.address, new_operator)?;
            Ok(())
        })
    }

    pub fn panic(&mut self, ctx: CallContext) -> Result<(), DaoError> {
        self.run("panic", ctx, |dao| {
            dao.panic.panic(&ctx.caller)?;
            Ok(())
        })
    }

    pub fn calm(&mut self, ctx: CallContext) -> Result<(), DaoError> {
        self.run("calm", ctx, |dao| {
            dao.panic.calm(&ctx.caller)?;
            Ok(())
        })
    }

    // ── Reads ─────────────────────────────────────────────────────────────

    pub fn address(&self) -> &AccountId {
        &self.address
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    pub fn params(&self) -> &ProtocolParams {
        self.params.params()
    }

    pub fn parameter(&self, param: GovernableParam) -> u128 {
        self.params.get(param)
    }

    pub fn voting_stake(&self, account: &AccountId) -> u128 {
        self.staking.get_voting_stake(account)
    }

    pub fn proposing_stake(&self, account: &AccountId) -> u128 {
        self.staking.get_proposing_stake(account)
    }

    pub fn voting_unlock_at(&self, account: &AccountId) -> Timestamp {
        self.staking.voting_unlock_at(account)
    }

    pub fn proposing_unlock_at(&self, account: &AccountId) -> Timestamp {
        self.staking.proposing_unlock_at(account)
    }

    pub fn lock_remaining(&self, account: &AccountId, purpose: StakePurpose, now: Timestamp) -> u64 {
        self.staking.lock_remaining(account, purpose, now)
    }

    pub fn total_staked(&self, purpose: StakePurpose) -> u128 {
        self.staking.total_staked(purpose)
    }

    /// Voting power of `account` under the active strategy.
    pub fn voting_power(&self, account: &AccountId) -> Result<u128, DaoError> {
        Ok(self.proposals.active_strategy().calculate_voting_power(
            account,
            &self.staking,
            self.params.params(),
        )?)
    }

    pub fn total_voting_power(&self) -> u128 {
        self.proposals
            .active_strategy()
            .total_voting_power(&self.staking, self.params.params())
    }

    pub fn active_strategy(&self) -> &Arc<dyn VotingStrategy> {
        self.proposals.active_strategy()
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&Proposal, DaoError> {
        Ok(self.proposals.get_proposal(id)?)
    }

    pub fn proposal_state(&self, id: ProposalId) -> Result<ProposalState, DaoError> {
        Ok(self.proposals.get_proposal_state(id)?)
    }

    /// `(votes_for, votes_against)`.
    pub fn proposal_results(&self, id: ProposalId) -> Result<(u128, u128), DaoError> {
        Ok(self.proposals.get_proposal_results(id)?)
    }

    pub fn user_vote(&self, id: ProposalId, voter: &AccountId) -> VoteRecord {
        self.proposals.get_user_vote(id, voter)
    }

    pub fn has_user_voted(&self, id: ProposalId, voter: &AccountId) -> bool {
        self.proposals.has_user_voted(id, voter)
    }

    pub fn is_proposal_active(&self, id: ProposalId) -> bool {
        self.proposals.is_proposal_active(id)
    }

    pub fn has_proposal_deadline_passed(
        &self,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<bool, DaoError> {
        Ok(self.proposals.has_proposal_deadline_passed(id, now)?)
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.proposal_count()
    }

    pub fn active_proposal_ids(&self) -> Vec<ProposalId> {
        self.proposals.active_proposal_ids()
    }

    pub fn min_voting_power_to_propose(&self) -> u128 {
        self.proposals.min_voting_power_to_propose()
    }

    pub fn default_proposal_duration(&self) -> u64 {
        self.proposals.default_proposal_duration()
    }

    pub fn token_balance(&self, account: &AccountId) -> u128 {
        self.ledger.balance_of(account)
    }

    /// Native value held by the facade.
    pub fn eth_balance(&self) -> u128 {
        self.eth_balance
    }

    pub fn is_panicked(&self) -> bool {
        self.panic.is_panicked()
    }

    pub fn panic_operator(&self) -> &AccountId {
        self.panic.panic_operator()
    }

    /// Every notification from accepted operations, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.journal
    }

    pub fn drain_journal(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.journal)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Run one operation and settle its notifications.
    fn run<T>(
        &mut self,
        op: &'static str,
        ctx: CallContext,
        f: impl FnOnce(&mut Self) -> Result<T, DaoError>,
    ) -> Result<T, DaoError> {
        let result = f(self);
        let events = self.collect_events();
        match result {
            Ok(value) => {
                self.journal.extend(events);
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(
                    op,
                    caller = %ctx.caller,
                    now = %ctx.now,
                    code = %e.code(),
                    error = %e,
                    "operation rejected"
                );
                Err(e)
            }
        }
    }

    fn collect_events(&mut self) -> Vec<Event> {
        let mut events = self.params.drain_events();
        events.append(&mut self.staking.drain_events());
        events.append(&mut self.proposals.drain_events());
        events.append(&mut self.panic.drain_events());
        events.append(&mut self.pending);
        events
    }

    fn check_not_panicked(&self) -> Result<(), DaoError> {
        Ok(self.panic.check_not_panicked()?)
    }

    fn only_owner(&self, caller: &AccountId) -> Result<(), DaoError> {
        if *caller != self.owner {
            return Err(DaoError::NotOwner(*caller));
        }
        Ok(())
    }

    fn require_min_stake(
        &self,
        account: &AccountId,
        purpose: StakePurpose,
        needed: u128,
    ) -> Result<(), DaoError> {
        let have = self.staking.record(account, purpose).amount;
        if have < needed {
            return Err(DaoError::MinStakeNotMet {
                purpose,
                needed,
                have,
            });
        }
        Ok(())
    }

    /// Weight of a voter's ballot, after the facade's minimum-stake check.
    fn voter_weight(&self, voter: &AccountId) -> Result<u128, DaoError> {
        let min = self.params.params().min_stake_for_voting;
        self.require_min_stake(voter, StakePurpose::Voting, min)?;
        self.voting_power(voter)
    }

    fn stake(
        &mut self,
        ctx: CallContext,
        purpose: StakePurpose,
        amount: u128,
    ) -> Result<StakeRecord, DaoError> {
        self.check_not_panicked()?;
        if amount == 0 {
            return Err(DaoError::ZeroAmount);
        }
        let params = self.params.params();
        let min = match purpose {
            StakePurpose::Voting => params.min_stake_for_voting,
            StakePurpose::Proposing => params.min_stake_for_proposing,
        };
        let have = self
            .staking
            .record(&ctx.caller, purpose)
            .amount
            .checked_add(amount)
            .ok_or(DaoError::Overflow)?;
        if have < min {
            return Err(DaoError::MinStakeNotMet {
                purpose,
                needed: min,
                have,
            });
        }
        let record = self.staking.stake(
            &mut self.ledger,
            &ctx.caller,
            purpose,
            amount,
            ctx.now,
            self.params.params(),
        )?;
        Ok(record)
    }

    fn unstake_all(&mut self, ctx: CallContext, purpose: StakePurpose) -> Result<u128, DaoError> {
        self.check_not_panicked()?;
        let amount = self.staking.record(&ctx.caller, purpose).amount;
        if amount == 0 {
            return Err(StakingError::InsufficientStake {
                purpose,
                requested: 0,
                staked: 0,
            }
            .into());
        }
        self.staking
            .unstake(&mut self.ledger, &ctx.caller, purpose, amount, ctx.now)?;
        Ok(amount)
    }
}
