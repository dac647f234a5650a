//! Core staking engine.

use crate::error::StakingError;
use crate::stake::{extend_lock, StakeRecord};
use agora_ledger::CreditLedger;
use agora_types::{AccountId, Event, ProtocolParams, StakePurpose, Timestamp};
use std::collections::HashMap;

/// Read access to staked balances, as needed by voting strategies.
pub trait StakeView {
    fn voting_stake(&self, account: &AccountId) -> u128;
    fn total_voting_staked(&self) -> u128;
}

/// A validated stake that has not been applied yet.
///
/// Produced by [`StakingEngine::plan_stake`]; applying it with
/// [`StakingEngine::commit`] cannot fail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakePlan {
    pub account: AccountId,
    pub purpose: StakePurpose,
    pub amount: u128,
    pub record: StakeRecord,
    total: u128,
}

/// Ledger of locked balances per account and purpose.
///
/// Tokens are burned from the holder's balance on stake (through the
/// custodian's allowance) and minted back on unstake.
pub struct StakingEngine {
    custodian: AccountId,
    voting: HashMap<AccountId, StakeRecord>,
    proposing: HashMap<AccountId, StakeRecord>,
    total_voting: u128,
    total_proposing: u128,
    events: Vec<Event>,
}

impl StakingEngine {
    /// `custodian` is the spender whose allowance is consumed when staking.
    pub fn new(custodian: AccountId) -> Self {
        Self {
            custodian,
            voting: HashMap::new(),
            proposing: HashMap::new(),
            total_voting: 0,
            total_proposing: 0,
            events: Vec::new(),
        }
    }

    pub fn custodian(&self) -> &AccountId {
        &self.custodian
    }

    /// Validate a stake and compute the resulting record without touching state.
    pub fn plan_stake(
        &self,
        account: &AccountId,
        purpose: StakePurpose,
        amount: u128,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<StakePlan, StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        if account.is_zero() {
            return Err(StakingError::InvalidAccount);
        }
        let current = self.record(account, purpose);
        let record = StakeRecord {
            amount: current
                .amount
                .checked_add(amount)
                .ok_or(StakingError::Overflow)?,
            unlock_at: extend_lock(current.unlock_at, now, params.staking_lock_time_secs),
        };
        let total = self
            .total(purpose)
            .checked_add(amount)
            .ok_or(StakingError::Overflow)?;
        Ok(StakePlan {
            account: *account,
            purpose,
            amount,
            record,
            total,
        })
    }

    /// Apply a plan produced by [`plan_stake`](Self::plan_stake).
    pub fn commit(&mut self, plan: StakePlan) -> StakeRecord {
        let StakePlan {
            account,
            purpose,
            amount,
            record,
            total,
        } = plan;
        self.records_mut(purpose).insert(account, record);
        *self.total_mut(purpose) = total;
        tracing::info!(
            %account,
            %purpose,
            amount,
            staked = record.amount,
            unlock_at = %record.unlock_at,
            "stake locked"
        );
        self.events.push(Event::Staked {
            account,
            purpose,
            amount,
            unlock_at: record.unlock_at,
        });
        record
    }

    /// Burn `amount` from the holder and lock it for `purpose`.
    ///
    /// The ledger debit runs between validation and commit, so a rejected
    /// debit leaves the staking ledger untouched.
    pub fn stake(
        &mut self,
        ledger: &mut dyn CreditLedger,
        account: &AccountId,
        purpose: StakePurpose,
        amount: u128,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<StakeRecord, StakingError> {
        let plan = self.plan_stake(account, purpose, amount, now, params)?;
        ledger.burn_from(account, &self.custodian, amount)?;
        Ok(self.commit(plan))
    }

    pub fn stake_for_voting(
        &mut self,
        ledger: &mut dyn CreditLedger,
        account: &AccountId,
        amount: u128,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<StakeRecord, StakingError> {
        self.stake(ledger, account, StakePurpose::Voting, amount, now, params)
    }

    pub fn stake_for_proposing(
        &mut self,
        ledger: &mut dyn CreditLedger,
        account: &AccountId,
        amount: u128,
        now: Timestamp,
        params: &ProtocolParams,
    ) -> Result<StakeRecord, StakingError> {
        self.stake(ledger, account, StakePurpose::Proposing, amount, now, params)
    }

    /// Release `amount` of an unlocked stake back to the holder.
    ///
    /// The record is decremented before the ledger credit and restored if the
    /// credit fails.
    pub fn unstake(
        &mut self,
        ledger: &mut dyn CreditLedger,
        account: &AccountId,
        purpose: StakePurpose,
        amount: u128,
        now: Timestamp,
    ) -> Result<StakeRecord, StakingError> {
        if amount == 0 {
            return Err(StakingError::InvalidAmount);
        }
        let previous = self.record(account, purpose);
        if !previous.is_unlocked(now) {
            return Err(StakingError::StakeLocked {
                purpose,
                unlock_at: previous.unlock_at,
                now,
            });
        }
        if amount > previous.amount {
            return Err(StakingError::InsufficientStake {
                purpose,
                requested: amount,
                staked: previous.amount,
            });
        }
        let previous_total = self.total(purpose);
        let record = StakeRecord {
            amount: previous.amount - amount,
            ..previous
        };
        self.records_mut(purpose).insert(*account, record);
        *self.total_mut(purpose) = previous_total.saturating_sub(amount);

        if let Err(e) = ledger.mint(account, amount) {
            self.records_mut(purpose).insert(*account, previous);
            *self.total_mut(purpose) = previous_total;
            tracing::warn!(%account, %purpose, amount, error = %e, "unstake rolled back");
            return Err(e.into());
        }

        tracing::info!(%account, %purpose, amount, staked = record.amount, "stake released");
        self.events.push(Event::Unstaked {
            account: *account,
            purpose,
            amount,
        });
        Ok(record)
    }

    pub fn unstake_from_voting(
        &mut self,
        ledger: &mut dyn CreditLedger,
        account: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<StakeRecord, StakingError> {
        self.unstake(ledger, account, StakePurpose::Voting, amount, now)
    }

    pub fn unstake_from_proposing(
        &mut self,
        ledger: &mut dyn CreditLedger,
        account: &AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<StakeRecord, StakingError> {
        self.unstake(ledger, account, StakePurpose::Proposing, amount, now)
    }

    /// The record for `account`, or an empty one if it never staked.
    pub fn record(&self, account: &AccountId, purpose: StakePurpose) -> StakeRecord {
        self.records(purpose)
            .get(account)
            .copied()
            .unwrap_or_default()
    }

    pub fn get_voting_stake(&self, account: &AccountId) -> u128 {
        self.record(account, StakePurpose::Voting).amount
    }

    pub fn get_proposing_stake(&self, account: &AccountId) -> u128 {
        self.record(account, StakePurpose::Proposing).amount
    }

    pub fn voting_unlock_at(&self, account: &AccountId) -> Timestamp {
        self.record(account, StakePurpose::Voting).unlock_at
    }

    pub fn proposing_unlock_at(&self, account: &AccountId) -> Timestamp {
        self.record(account, StakePurpose::Proposing).unlock_at
    }

    /// Seconds until the record for `purpose` unlocks (0 if already unlocked).
    pub fn lock_remaining(
        &self,
        account: &AccountId,
        purpose: StakePurpose,
        now: Timestamp,
    ) -> u64 {
        self.record(account, purpose).unlock_at.remaining_from(now)
    }

    pub fn total_staked(&self, purpose: StakePurpose) -> u128 {
        self.total(purpose)
    }

    pub fn total_proposing_staked(&self) -> u128 {
        self.total_proposing
    }

    /// Take all notifications emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn records(&self, purpose: StakePurpose) -> &HashMap<AccountId, StakeRecord> {
        match purpose {
            StakePurpose::Voting => &self.voting,
            StakePurpose::Proposing => &self.proposing,
        }
    }

    fn records_mut(&mut self, purpose: StakePurpose) -> &mut HashMap<AccountId, StakeRecord> {
        match purpose {
            StakePurpose::Voting => &mut self.voting,
            StakePurpose::Proposing => &mut self.proposing,
        }
    }

    fn total(&self, purpose: StakePurpose) -> u128 {
        match purpose {
            StakePurpose::Voting => self.total_voting,
            StakePurpose::Proposing => self.total_proposing,
        }
    }

    fn total_mut(&mut self, purpose: StakePurpose) -> &mut u128 {
        match purpose {
            StakePurpose::Voting => &mut self.total_voting,
            StakePurpose::Proposing => &mut self.total_proposing,
        }
    }
}

impl StakeView for StakingEngine {
    fn voting_stake(&self, account: &AccountId) -> u128 {
        self.get_voting_stake(account)
    }

    fn total_voting_staked(&self) -> u128 {
        self.total_voting
    }
}
