use agora_types::{AccountId, ErrorCode};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanicError {
    #[error("null account is not a valid role holder")]
    InvalidAddress,

    #[error("{0} is not the panic operator")]
    NotPanicOperator(AccountId),

    #[error("{0} is not the dao")]
    NotDao(AccountId),

    #[error("system is panicked")]
    PanicActive,

    #[error("system is not panicked")]
    PanicNotActive,
}

impl PanicError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAddress => ErrorCode::InvalidAddress,
            Self::NotPanicOperator(_) => ErrorCode::NotPanicOperator,
            Self::NotDao(_) => ErrorCode::NotDao,
            Self::PanicActive => ErrorCode::PanicActive,
            Self::PanicNotActive => ErrorCode::PanicNotActive,
        }
    }
}
