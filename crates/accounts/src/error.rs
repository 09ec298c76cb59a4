use thiserror::Error;

use bankledger_core::{DomainError, Money};

use crate::holder::AccountHolder;
use crate::number::AccountNumber;

/// Result type of every ledger operation.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures that abort a ledger operation.
///
/// Running short of funds is not one of them; see [`crate::DebitOutcome`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("an account for {holder} already exists")]
    DuplicateAccount { holder: AccountHolder },

    #[error("no account exists for {holder}")]
    AccountNotFound { holder: AccountHolder },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: Money },

    /// Crediting `amount` would take the balance out of `Money`'s range.
    #[error("crediting {amount} to {account} would overflow its balance of {balance}")]
    BalanceOverflow {
        account: AccountNumber,
        balance: Money,
        amount: Money,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl LedgerError {
    pub fn duplicate(holder: &AccountHolder) -> Self {
        Self::DuplicateAccount {
            holder: holder.clone(),
        }
    }

    pub fn not_found(holder: &AccountHolder) -> Self {
        Self::AccountNotFound {
            holder: holder.clone(),
        }
    }

    /// Stable machine-readable kind, for logs and CLI output.
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::DuplicateAccount { .. } => "duplicate_account",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::BalanceOverflow { .. } => "balance_overflow",
            LedgerError::Domain(_) => "validation_error",
        }
    }
}
