use agora_governance::GovernanceError;
use agora_ledger::LedgerError;
use agora_panic::PanicError;
use agora_staking::StakingError;
use agora_types::{AccountId, ErrorCode, StakePurpose};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DaoError {
    #[error("staking error: {0}")]
    Staking(#[from] StakingError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("panic manager error: {0}")]
    Panic(#[from] PanicError),

    #[error("credit ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("{0} is not the owner")]
    NotOwner(AccountId),

    #[error("the null account is not a valid target")]
    InvalidAddress,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("token price is zero")]
    ZeroPrice,

    #[error("insufficient native value: need {needed}, have {available}")]
    InsufficientEth { needed: u128, available: u128 },

    #[error("{purpose} stake {have} is below the minimum of {needed}")]
    MinStakeNotMet {
        purpose: StakePurpose,
        needed: u128,
        have: u128,
    },

    #[error("arithmetic overflow")]
    Overflow,
}

impl DaoError {
    /// Stable code for this failure, including failures raised by components.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Staking(e) => e.code(),
            Self::Governance(e) => e.code(),
            Self::Panic(e) => e.code(),
            Self::Ledger(e) => e.code(),
            Self::NotOwner(_) => ErrorCode::NotOwner,
            Self::InvalidAddress => ErrorCode::InvalidAddress,
            Self::ZeroAmount => ErrorCode::ZeroAmount,
            Self::ZeroPrice => ErrorCode::ZeroPrice,
            Self::InsufficientEth { .. } => ErrorCode::InsufficientEth,
            Self::MinStakeNotMet { .. } => ErrorCode::MinStakeNotMet,
            Self::Overflow => ErrorCode::Overflow,
        }
    }
}
