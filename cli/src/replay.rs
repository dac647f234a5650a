//! Operation scripts: a JSON list of timestamped facade calls replayed
//! against an in-memory DAO.
//!
//! Step times never go backwards; a script that rewinds the clock is
//! rejected before anything runs.
//!
//! ```json
//! { "steps": [
//!   { "at": 0, "caller": "0x…01", "op": { "mint_tokens": { "to": "0x…64", "amount": 5000 } } },
//!   { "at": 0, "caller": "0x…64", "op": { "approve": { "amount": 5000 } } },
//!   { "at": 1, "caller": "0x…64", "op": { "stake_for_voting": { "amount": 1000 } } },
//!   { "at": 2, "caller": "0x…02", "op": "panic" }
//! ] }
//! ```

use std::sync::Arc;

use agora_dao::{CallContext, Dao};
use agora_governance::{GovernableParam, QuorumMajorityStrategy, SimpleMajorityStrategy, VotingStrategy};
use agora_ledger::CreditLedger;
use agora_types::{AccountId, ErrorCode, Event, ProposalId, Timestamp, VoteType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("malformed script: {0}")]
    Json(#[from] serde_json::Error),

    #[error("step {step} runs at {at}s, before the previous step at {previous}s")]
    ClockWentBackwards { step: usize, at: u64, previous: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    steps: Vec<Step>,
}

impl Script {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn check_clock(&self) -> Result<(), ScriptError> {
        for (i, pair) in self.steps.windows(2).enumerate() {
            if pair[1].at < pair[0].at {
                return Err(ScriptError::ClockWentBackwards {
                    step: i + 1,
                    at: pair[1].at,
                    previous: pair[0].at,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Seconds after the replay start at which the call happens.
    pub at: u64,
    pub caller: AccountId,
    pub op: Operation,
}

/// Voting strategy named in a script.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyChoice {
    SimpleMajority,
    QuorumMajority { quorum_bps: u32 },
    /// No strategy at all; always rejected.
    Null,
}

impl StrategyChoice {
    fn build(&self) -> Option<Arc<dyn VotingStrategy>> {
        match self {
            Self::SimpleMajority => Some(Arc::new(SimpleMajorityStrategy)),
            Self::QuorumMajority { quorum_bps } => {
                Some(Arc::new(QuorumMajorityStrategy::new(*quorum_bps)))
            }
            Self::Null => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Holder-side allowance for the dao on the credit ledger.
    Approve { amount: u128 },
    BuyTokens { value: u128 },
    CreateProposal { title: String, description: String },
    Vote { id: ProposalId, vote: VoteType },
    ChangeVote { id: ProposalId, vote: VoteType },
    StakeForVoting { amount: u128 },
    StakeForProposing { amount: u128 },
    UnstakeVoting,
    UnstakeProposing,
    MintTokens { to: AccountId, amount: u128 },
    ChangeStrategy { strategy: StrategyChoice },
    WithdrawEth { to: AccountId, amount: u128 },
    FinalizeProposal { id: ProposalId },
    ExpireProposal { id: ProposalId },
    SetParameter { param: GovernableParam, value: u128 },
    SetMinVotingPowerToPropose { value: u128 },
    SetPanicOperator { operator: AccountId },
    Panic,
    Calm,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "approve",
            Self::BuyTokens { .. } => "buy_tokens",
            Self::CreateProposal { .. } => "create_proposal",
            Self::Vote { .. } => "vote",
            Self::ChangeVote { .. } => "change_vote",
            Self::StakeForVoting { .. } => "stake_for_voting",
            Self::StakeForProposing { .. } => "stake_for_proposing",
            Self::UnstakeVoting => "unstake_voting",
            Self::UnstakeProposing => "unstake_proposing",
            Self::MintTokens { .. } => "mint_tokens",
            Self::ChangeStrategy { .. } => "change_strategy",
            Self::WithdrawEth { .. } => "withdraw_eth",
            Self::FinalizeProposal { .. } => "finalize_proposal",
            Self::ExpireProposal { .. } => "expire_proposal",
            Self::SetParameter { .. } => "set_parameter",
            Self::SetMinVotingPowerToPropose { .. } => "set_min_voting_power_to_propose",
            Self::SetPanicOperator { .. } => "set_panic_operator",
            Self::Panic => "panic",
            Self::Calm => "calm",
        }
    }
}

/// Result of one replayed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub step: usize,
    pub at: Timestamp,
    pub caller: AccountId,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub events: Vec<Event>,
}

impl Outcome {
    /// One-line human rendering.
    pub fn render(&self) -> String {
        let head = format!("#{} t={} {} {}", self.step, self.at, self.caller, self.op);
        match (&self.code, &self.error) {
            (Some(code), Some(error)) => format!("{head}: {code} ({error})"),
            _ if self.events.is_empty() => format!("{head}: ok"),
            _ => {
                let events: Vec<String> = self.events.iter().map(|e| format!("{e:?}")).collect();
                format!("{head}: ok [{}]", events.join(", "))
            }
        }
    }
}

pub fn parse_script(json: &str) -> Result<Script, ScriptError> {
    let script: Script = serde_json::from_str(json)?;
    script.check_clock()?;
    Ok(script)
}

/// Apply one step, `step.at` seconds after `start`, and report what happened.
pub fn apply_step<L: CreditLedger>(
    dao: &mut Dao<L>,
    start: Timestamp,
    index: usize,
    step: &Step,
) -> Outcome {
    let ctx = CallContext::new(step.caller, start.saturating_add(step.at));
    let journal_before = dao.events().len();
    let result = dispatch(dao, ctx, &step.op);
    let events = dao.events()[journal_before..].to_vec();
    let (code, error) = match result {
        Ok(()) => (None, None),
        Err(Failure { code, message }) => (Some(code), Some(message)),
    };
    Outcome {
        step: index,
        at: ctx.now,
        caller: ctx.caller,
        op: step.op.name(),
        ok: code.is_none(),
        code,
        error,
        events,
    }
}

/// Replay a whole script in order. Failed steps do not stop the replay.
pub fn replay<L: CreditLedger>(dao: &mut Dao<L>, script: &Script, start: Timestamp) -> Vec<Outcome> {
    script
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| apply_step(dao, start, i, step))
        .collect()
}

struct Failure {
    code: ErrorCode,
    message: String,
}

impl From<agora_dao::DaoError> for Failure {
    fn from(e: agora_dao::DaoError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

fn dispatch<L: CreditLedger>(
    dao: &mut Dao<L>,
    ctx: CallContext,
    op: &Operation,
) -> Result<(), Failure> {
    match op {
        Operation::Approve { amount } => dao.approve(ctx, *amount)?,
        Operation::BuyTokens { value } => {
            dao.buy_tokens(ctx, *value)?;
        }
        Operation::CreateProposal { title, description } => {
            dao.create_proposal(ctx, title, description)?;
        }
        Operation::Vote { id, vote } => dao.vote(ctx, *id, *vote)?,
        Operation::ChangeVote { id, vote } => dao.change_vote(ctx, *id, *vote)?,
        Operation::StakeForVoting { amount } => {
            dao.stake_for_voting(ctx, *amount)?;
        }
        Operation::StakeForProposing { amount } => {
            dao.stake_for_proposing(ctx, *amount)?;
        }
        Operation::UnstakeVoting => {
            dao.unstake_voting(ctx)?;
        }
        Operation::UnstakeProposing => {
            dao.unstake_proposing(ctx)?;
        }
        Operation::MintTokens { to, amount } => dao.mint_tokens(ctx, *to, *amount)?,
        Operation::ChangeStrategy { strategy } => dao.change_strategy(ctx, strategy.build())?,
        Operation::WithdrawEth { to, amount } => dao.withdraw_eth(ctx, *to, *amount)?,
        Operation::FinalizeProposal { id } => {
            dao.finalize_proposal(ctx, *id)?;
        }
        Operation::ExpireProposal { id } => dao.expire_proposal(ctx, *id)?,
        Operation::SetParameter { param, value } => {
            dao.set_parameter(ctx, *param, *value)?;
        }
        Operation::SetMinVotingPowerToPropose { value } => {
            dao.set_min_voting_power_to_propose(ctx, *value)?
        }
        Operation::SetPanicOperator { operator } => dao.set_panic_operator(ctx, *operator)?,
        Operation::Panic => dao.panic(ctx)?,
        Operation::Calm => dao.calm(ctx)?,
    }
    Ok(())
}
