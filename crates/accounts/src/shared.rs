//! Thread-safe ledger handle.
//!
//! Every operation runs under one ledger-wide lock, which makes sequence
//! assignment + insertion, and a transfer's debit + credit, atomic with
//! respect to every other caller.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bankledger_core::{LedgerId, Money};

use crate::account::DebitOutcome;
use crate::command::{CommandOutcome, LedgerCommand};
use crate::error::LedgerResult;
use crate::holder::AccountHolder;
use crate::ledger::{ClosedAccount, Ledger, TransferOutcome};
use crate::number::AccountNumber;

/// Cloneable handle to one [`Ledger`]. Clones share the same accounts and sequence.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<Mutex<Ledger>>,
}

impl SharedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    // Ledger operations validate before they mutate, so the state behind a
    // poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access, for multi-step reads that must see one state.
    pub fn with<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.lock())
    }

    pub fn id(&self) -> LedgerId {
        self.lock().id_typed()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn balance(&self, holder: &AccountHolder) -> Option<Money> {
        self.lock().account(holder).map(|a| a.balance())
    }

    pub fn total_holdings(&self) -> Option<Money> {
        self.lock().total_holdings()
    }

    pub fn create_account(&self, holder: AccountHolder) -> LedgerResult<AccountNumber> {
        self.lock().create_account(holder)
    }

    pub fn deposit(&self, holder: &AccountHolder, amount: Money) -> LedgerResult<Money> {
        self.lock().deposit(holder, amount)
    }

    pub fn withdraw(&self, holder: &AccountHolder, amount: Money) -> LedgerResult<DebitOutcome> {
        self.lock().withdraw(holder, amount)
    }

    pub fn transfer(
        &self,
        amount: Money,
        from: &AccountHolder,
        to: &AccountHolder,
    ) -> LedgerResult<TransferOutcome> {
        self.lock().transfer(amount, from, to)
    }

    pub fn account_info(&self, holder: &AccountHolder) -> LedgerResult<String> {
        self.lock().account_info(holder)
    }

    pub fn remove_account(&self, holder: &AccountHolder) -> LedgerResult<ClosedAccount> {
        self.lock().remove_account(holder)
    }

    pub fn execute(&self, command: &LedgerCommand) -> LedgerResult<CommandOutcome> {
        self.lock().execute(command)
    }

    /// Take the ledger back if this is the last handle.
    pub fn try_unwrap(self) -> Result<Ledger, Self> {
        Arc::try_unwrap(self.inner)
            .map(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
            .map_err(|inner| Self { inner })
    }
}

impl From<Ledger> for SharedLedger {
    fn from(value: Ledger) -> Self {
        Self::new(value)
    }
}
