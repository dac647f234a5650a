//! Nullable credit ledger: an in-memory ledger that records every mutating
//! call and can be told to fail the next one.

use std::cell::RefCell;

use agora_ledger::{CreditLedger, LedgerError, MemoryLedger};
use agora_types::AccountId;

/// A mutating call observed by [`NullLedger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Mint {
        to: AccountId,
        amount: u128,
    },
    Burn {
        from: AccountId,
        amount: u128,
    },
    BurnFrom {
        owner: AccountId,
        spender: AccountId,
        amount: u128,
    },
    Approve {
        owner: AccountId,
        spender: AccountId,
        amount: u128,
    },
}

/// Test ledger with call recording and failure injection.
///
/// Failed calls are recorded too, so a test can assert that a call was
/// attempted and rejected. Injection and the call log work through `&self`,
/// so a ledger owned by the facade can still be driven from a test.
#[derive(Debug, Default)]
pub struct NullLedger {
    inner: MemoryLedger,
    calls: RefCell<Vec<LedgerCall>>,
    fail_next: RefCell<Option<LedgerError>>,
}

impl NullLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing ledger state.
    pub fn with_state(inner: MemoryLedger) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Make the next mutating call return `error` without touching state.
    pub fn fail_next(&self, error: LedgerError) {
        *self.fail_next.borrow_mut() = Some(error);
    }

    /// All mutating calls so far, in order.
    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn state(&self) -> &MemoryLedger {
        &self.inner
    }

    fn record(&self, call: LedgerCall) -> Result<(), LedgerError> {
        self.calls.borrow_mut().push(call);
        match self.fail_next.borrow_mut().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl CreditLedger for NullLedger {
    fn mint(&mut self, to: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.record(LedgerCall::Mint { to: *to, amount })?;
        self.inner.mint(to, amount)
    }

    fn burn(&mut self, from: &AccountId, amount: u128) -> Result<(), LedgerError> {
        self.record(LedgerCall::Burn {
            from: *from,
            amount,
        })?;
        self.inner.burn(from, amount)
    }

    fn burn_from(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::BurnFrom {
            owner: *owner,
            spender: *spender,
            amount,
        })?;
        self.inner.burn_from(owner, spender, amount)
    }

    fn approve(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        self.record(LedgerCall::Approve {
            owner: *owner,
            spender: *spender,
            amount,
        })?;
        self.inner.approve(owner, spender, amount)
    }

    fn balance_of(&self, account: &AccountId) -> u128 {
        self.inner.balance_of(account)
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> u128 {
        self.inner.allowance(owner, spender)
    }

    fn total_supply(&self) -> u128 {
        self.inner.total_supply()
    }
}
