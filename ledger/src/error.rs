use agora_types::{AccountId, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("insufficient allowance from {owner} to {spender}: need {needed}, have {available}")]
    InsufficientAllowance {
        owner: AccountId,
        spender: AccountId,
        needed: u128,
        available: u128,
    },

    #[error("cannot operate on the null account")]
    InvalidAccount,

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("arithmetic overflow in credit ledger")]
    Overflow,

    #[error("{0}")]
    Other(String),
}

impl LedgerError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            Self::InsufficientAllowance { .. } => ErrorCode::InsufficientAllowance,
            Self::InvalidAccount => ErrorCode::InvalidAddress,
            Self::ZeroAmount => ErrorCode::ZeroAmount,
            Self::Overflow | Self::Other(_) => ErrorCode::Overflow,
        }
    }
}
