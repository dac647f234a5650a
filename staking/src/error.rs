//! Staking-specific errors.

use agora_ledger::LedgerError;
use agora_types::{ErrorCode, StakePurpose, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StakingError {
    #[error("stake amount must be non-zero")]
    InvalidAmount,

    #[error("cannot stake for the null account")]
    InvalidAccount,

    #[error("{purpose} stake is locked until {unlock_at} (now {now})")]
    StakeLocked {
        purpose: StakePurpose,
        unlock_at: Timestamp,
        now: Timestamp,
    },

    #[error("insufficient {purpose} stake: requested {requested}, staked {staked}")]
    InsufficientStake {
        purpose: StakePurpose,
        requested: u128,
        staked: u128,
    },

    #[error("credit ledger rejected the transfer: {0}")]
    Ledger(#[from] LedgerError),

    #[error("arithmetic overflow in staking ledger")]
    Overflow,
}

impl StakingError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAmount => ErrorCode::InvalidAmount,
            Self::InvalidAccount => ErrorCode::InvalidAddress,
            Self::StakeLocked { .. } => ErrorCode::StakeLocked,
            Self::InsufficientStake { .. } => ErrorCode::InsufficientStake,
            Self::Ledger(e) => e.code(),
            Self::Overflow => ErrorCode::Overflow,
        }
    }
}
