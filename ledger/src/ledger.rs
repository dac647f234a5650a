//! The credit ledger seam.
//!
//! The staking token lives outside the governance core. The core only needs
//! the handful of operations below, each of which is atomic: it either applies
//! fully or returns an error and changes nothing.

use crate::error::LedgerError;
use agora_types::AccountId;

/// External ledger of the fungible credit that gets staked.
pub trait CreditLedger {
    /// Credit `amount` new tokens to `to`.
    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError>;

    /// Destroy `amount` tokens held by `from`.
    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError>;

    /// Destroy `amount` tokens held by `owner` on behalf of `spender`,
    /// consuming the same amount of allowance.
    fn burn_from(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    /// Let `spender` burn up to `amount` of `owner`'s tokens.
    fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError>;

    fn balance_of(&self, account: &AccountId) -> u128;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128;

    fn total_supply(&self) -> u128;
}
