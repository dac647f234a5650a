//! In-process credit ledger backed by hash maps.

use crate::error::LedgerError;
use crate::ledger::CreditLedger;
use agora_types::AccountId;
use std::collections::HashMap;

/// A complete in-memory implementation of [`CreditLedger`].
///
/// Used by the replay CLI and as the backing store of test doubles.
#[derive(Clone, Debug, Default)]
pub struct MemoryLedger {
    balances: HashMap<AccountId, u128>,
    allowances: HashMap<(AccountId, AccountId), u128>,
    total_supply: u128,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accounts that have ever held a balance.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    fn debit(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                account: *from,
                needed: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        Ok(())
    }
}

impl CreditLedger for MemoryLedger {
    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if to.is_zero() {
            return Err(LedgerError::InvalidAccount);
        }
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(*to, balance);
        self.total_supply = supply;
        Ok(())
    }

    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        self.debit(from, amount)
    }

    fn burn_from(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let allowed = self.allowance(owner, spender);
        if allowed < amount {
            return Err(LedgerError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                needed: amount,
                available: allowed,
            });
        }
        self.debit(owner, amount)?;
        self.allowances.insert((*owner, *spender), allowed - amount);
        Ok(())
    }

    fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if owner.is_zero() || spender.is_zero() {
            return Err(LedgerError::InvalidAccount);
        }
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn total_supply(&self) -> u128 {
        self.total_supply
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(n: u64) -> AccountId {
        AccountId::from_low_u64(n)
    }

    #[test]
    fn mint_and_burn_track_supply() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&acct(1), 500).unwrap();
        ledger.mint(&acct(2), 250).unwrap();
        assert_eq!(ledger.total_supply(), 750);

        ledger.burn(&acct(1), 200).unwrap();
        assert_eq!(ledger.balance_of(&acct(1)), 300);
        assert_eq!(ledger.total_supply(), 550);
    }

    #[test]
    fn burn_more_than_balance_fails_without_effect() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&acct(1), 100).unwrap();
        let err = ledger.burn(&acct(1), 101).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: acct(1),
                needed: 101,
                available: 100
            }
        );
        assert_eq!(ledger.balance_of(&acct(1)), 100);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn burn_from_consumes_allowance() {
        let mut ledger = MemoryLedger::new();
        let (owner, spender) = (acct(1), acct(9));
        ledger.mint(&owner, 1_000).unwrap();
        ledger.approve(&owner, &spender, 600).unwrap();

        ledger.burn_from(&owner, &spender, 400).unwrap();
        assert_eq!(ledger.allowance(&owner, &spender), 200);
        assert_eq!(ledger.balance_of(&owner), 600);

        let err = ledger.burn_from(&owner, &spender, 300).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientAllowance { available: 200, .. }));
        assert_eq!(ledger.balance_of(&owner), 600);
    }

    #[test]
    fn burn_from_with_allowance_but_no_balance_keeps_allowance() {
        let mut ledger = MemoryLedger::new();
        let (owner, spender) = (acct(1), acct(9));
        ledger.mint(&owner, 10).unwrap();
        ledger.approve(&owner, &spender, 1_000).unwrap();

        assert!(ledger.burn_from(&owner, &spender, 50).is_err());
        assert_eq!(ledger.allowance(&owner, &spender), 1_000);
    }

    #[test]
    fn mint_rejects_null_account_and_zero() {
        let mut ledger = MemoryLedger::new();
        assert_eq!(ledger.mint(&AccountId::ZERO, 5), Err(LedgerError::InvalidAccount));
        assert_eq!(ledger.mint(&acct(1), 0), Err(LedgerError::ZeroAmount));
        assert_eq!(ledger.holder_count(), 0);
    }

    #[test]
    fn mint_overflow_is_rejected() {
        let mut ledger = MemoryLedger::new();
        ledger.mint(&acct(1), u128::MAX).unwrap();
        assert_eq!(ledger.mint(&acct(2), 1), Err(LedgerError::Overflow));
        assert_eq!(ledger.balance_of(&acct(2)), 0);
    }
}
