//! Stable error codes.
//!
//! Every crate keeps its own `thiserror` enum with descriptive messages; each
//! of those maps onto exactly one [`ErrorCode`]. Clients key off the code,
//! never the message text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable failure reason shared by every component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Required positive quantity was zero
    ZeroAmount,
    ZeroPrice,
    InvalidAmount,
    ZeroVotingPower,
    InvalidDuration,

    // Available resource below request
    InsufficientEth,
    InsufficientStake,
    InsufficientAllowance,
    InsufficientBalance,
    InsufficientVotingPower,
    MinStakeNotMet,

    // Identity and authorization
    InvalidAddress,
    NotOwner,
    NotDao,
    NotPanicOperator,

    // Text
    EmptyString,
    EmptyTitle,
    EmptyDescription,

    // Voting protocol
    InvalidVoteType,
    AlreadyVoted,
    NotVotedYet,

    // Proposal lifecycle
    ProposalNotFound,
    ProposalNotActive,
    ProposalDeadlinePassed,
    DeadlineNotPassed,

    // Strategy swap
    InvalidStrategy,
    SameStrategy,

    // Staking lock
    StakeLocked,

    // Circuit breaker
    PanicActive,
    PanicNotActive,

    Overflow,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::ZeroPrice => "ZERO_PRICE",
            Self::InvalidAmount => "INVALID_AMOUNT",
            Self::ZeroVotingPower => "ZERO_VOTING_POWER",
            Self::InvalidDuration => "INVALID_DURATION",
            Self::InsufficientEth => "INSUFFICIENT_ETH",
            Self::InsufficientStake => "INSUFFICIENT_STAKE",
            Self::InsufficientAllowance => "INSUFFICIENT_ALLOWANCE",
            Self::InsufficientBalance => "INSUFFICIENT_BALANCE",
            Self::InsufficientVotingPower => "INSUFFICIENT_VOTING_POWER",
            Self::MinStakeNotMet => "MIN_STAKE_NOT_MET",
            Self::InvalidAddress => "INVALID_ADDRESS",
            Self::NotOwner => "NOT_OWNER",
            Self::NotDao => "NOT_DAO",
            Self::NotPanicOperator => "NOT_PANIC_OPERATOR",
            Self::EmptyString => "EMPTY_STRING",
            Self::EmptyTitle => "EMPTY_TITLE",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::InvalidVoteType => "INVALID_VOTE_TYPE",
            Self::AlreadyVoted => "ALREADY_VOTED",
            Self::NotVotedYet => "NOT_VOTED_YET",
            Self::ProposalNotFound => "PROPOSAL_NOT_FOUND",
            Self::ProposalNotActive => "PROPOSAL_NOT_ACTIVE",
            Self::ProposalDeadlinePassed => "PROPOSAL_DEADLINE_PASSED",
            Self::DeadlineNotPassed => "DEADLINE_NOT_PASSED",
            Self::InvalidStrategy => "INVALID_STRATEGY",
            Self::SameStrategy => "SAME_STRATEGY",
            Self::StakeLocked => "STAKE_LOCKED",
            Self::PanicActive => "PANIC_ACTIVE",
            Self::PanicNotActive => "PANIC_NOT_ACTIVE",
            Self::Overflow => "OVERFLOW",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
