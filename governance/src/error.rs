use agora_types::{AccountId, ErrorCode, ProposalId, ProposalState, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GovernanceError {
    #[error("{0} is not the owner")]
    NotOwner(AccountId),

    #[error("null account is not allowed here")]
    InvalidAddress,

    #[error("proposal title must not be empty")]
    EmptyTitle,

    #[error("proposal description must not be empty")]
    EmptyDescription,

    #[error("insufficient voting power to propose: have {have}, need {need}")]
    InsufficientVotingPower { have: u128, need: u128 },

    #[error("proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("proposal {id} is {state}, not ACTIVE")]
    ProposalNotActive { id: ProposalId, state: ProposalState },

    #[error("voting on proposal {id} closed at {deadline}")]
    DeadlinePassed { id: ProposalId, deadline: Timestamp },

    #[error("proposal {id} is open until {deadline}")]
    DeadlineNotPassed { id: ProposalId, deadline: Timestamp },

    #[error("vote must be FOR or AGAINST")]
    InvalidVoteType,

    #[error("vote weight must be non-zero")]
    ZeroVotingPower,

    #[error("{voter} has already voted on proposal {id}")]
    AlreadyVoted { id: ProposalId, voter: AccountId },

    #[error("{voter} has not voted on proposal {id}")]
    NotVotedYet { id: ProposalId, voter: AccountId },

    #[error("strategy must be set")]
    InvalidStrategy,

    #[error("strategy {0} is already active")]
    SameStrategy(String),

    #[error("proposal duration must be non-zero")]
    InvalidDuration,

    #[error("value {value} out of range for {param}")]
    ValueOutOfRange { param: &'static str, value: u128 },

    #[error("arithmetic overflow in vote tally")]
    Overflow,
}

impl GovernanceError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotOwner(_) => ErrorCode::NotOwner,
            Self::InvalidAddress => ErrorCode::InvalidAddress,
            Self::EmptyTitle => ErrorCode::EmptyTitle,
            Self::EmptyDescription => ErrorCode::EmptyDescription,
            Self::InsufficientVotingPower { .. } => ErrorCode::InsufficientVotingPower,
            Self::ProposalNotFound(_) => ErrorCode::ProposalNotFound,
            Self::ProposalNotActive { .. } => ErrorCode::ProposalNotActive,
            Self::DeadlinePassed { .. } => ErrorCode::ProposalDeadlinePassed,
            Self::DeadlineNotPassed { .. } => ErrorCode::DeadlineNotPassed,
            Self::InvalidVoteType => ErrorCode::InvalidVoteType,
            Self::ZeroVotingPower => ErrorCode::ZeroVotingPower,
            Self::AlreadyVoted { .. } => ErrorCode::AlreadyVoted,
            Self::NotVotedYet { .. } => ErrorCode::NotVotedYet,
            Self::InvalidStrategy => ErrorCode::InvalidStrategy,
            Self::SameStrategy(_) => ErrorCode::SameStrategy,
            Self::InvalidDuration => ErrorCode::InvalidDuration,
            Self::ValueOutOfRange { .. } => ErrorCode::InvalidAmount,
            Self::Overflow => ErrorCode::Overflow,
        }
    }
}
