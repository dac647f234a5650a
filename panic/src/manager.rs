//! The panic manager.

use crate::error::PanicError;
use agora_types::{AccountId, Event};
use serde::{Deserialize, Serialize};

/// Snapshot of the breaker state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanicState {
    pub is_panicked: bool,
    pub panic_operator: AccountId,
    pub dao: AccountId,
}

/// Global circuit breaker.
///
/// Two roles, never interchangeable: the panic operator flips the breaker,
/// the dao reassigns the operator.
pub struct PanicManager {
    state: PanicState,
    events: Vec<Event>,
}

impl PanicManager {
    pub fn new(dao: AccountId, panic_operator: AccountId) -> Result<Self, PanicError> {
        if dao.is_zero() || panic_operator.is_zero() {
            return Err(PanicError::InvalidAddress);
        }
        Ok(Self {
            state: PanicState {
                is_panicked: false,
                panic_operator,
                dao,
            },
            events: Vec::new(),
        })
    }

    /// Trip the breaker.
    pub fn panic(&mut self, caller: &AccountId) -> Result<(), PanicError> {
        self.only_operator(caller)?;
        if self.state.is_panicked {
            return Err(PanicError::PanicActive);
        }
        self.state.is_panicked = true;
        tracing::warn!(operator = %caller, "panic engaged, mutating operations halted");
        self.events.push(Event::Panicked { by: *caller });
        Ok(())
    }

    /// Reset the breaker.
    pub fn calm(&mut self, caller: &AccountId) -> Result<(), PanicError> {
        self.only_operator(caller)?;
        if !self.state.is_panicked {
            return Err(PanicError::PanicNotActive);
        }
        self.state.is_panicked = false;
        tracing::warn!(operator = %caller, "panic cleared, mutating operations resumed");
        self.events.push(Event::Calmed { by: *caller });
        Ok(())
    }

    pub fn set_panic_operator(
        &mut self,
        caller: &AccountId,
        new_operator: AccountId,
    ) -> Result<(), PanicError> {
        if *caller != self.state.dao {
            return Err(PanicError::NotDao(*caller));
        }
        if new_operator.is_zero() {
            return Err(PanicError::InvalidAddress);
        }
        let old = std::mem::replace(&mut self.state.panic_operator, new_operator);
        tracing::info!(%old, new = %new_operator, "panic operator reassigned");
        self.events.push(Event::PanicOperatorChanged {
            old,
            new: new_operator,
        });
        Ok(())
    }

    /// Guard run at the top of every mutating operation.
    pub fn check_not_panicked(&self) -> Result<(), PanicError> {
        if self.state.is_panicked {
            return Err(PanicError::PanicActive);
        }
        Ok(())
    }

    pub fn is_panicked(&self) -> bool {
        self.state.is_panicked
    }

    pub fn panic_operator(&self) -> &AccountId {
        &self.state.panic_operator
    }

    pub fn dao(&self) -> &AccountId {
        &self.state.dao
    }

    pub fn state(&self) -> PanicState {
        self.state
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    fn only_operator(&self, caller: &AccountId) -> Result<(), PanicError> {
        if *caller != self.state.panic_operator {
            return Err(PanicError::NotPanicOperator(*caller));
        }
        Ok(())
    }
}
