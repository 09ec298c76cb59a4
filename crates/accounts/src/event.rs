use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankledger_core::{LedgerId, Money};
use bankledger_events::Event;

use crate::account::Shortfall;
use crate::holder::AccountHolder;
use crate::number::AccountNumber;

/// Event: AccountOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountOpened {
    pub ledger_id: LedgerId,
    pub holder: AccountHolder,
    pub account_number: AccountNumber,
    pub sequence: u64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsDeposited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsDeposited {
    pub ledger_id: LedgerId,
    pub account_number: AccountNumber,
    pub amount: Money,
    pub balance: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsWithdrawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsWithdrawn {
    pub ledger_id: LedgerId,
    pub account_number: AccountNumber,
    pub amount: Money,
    pub balance: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: WithdrawalDeclined (balance left unchanged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalDeclined {
    pub ledger_id: LedgerId,
    pub account_number: AccountNumber,
    pub shortfall: Shortfall,
    pub occurred_at: DateTime<Utc>,
}

/// Event: FundsTransferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundsTransferred {
    pub ledger_id: LedgerId,
    pub from: AccountNumber,
    pub to: AccountNumber,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TransferDeclined (neither account changed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDeclined {
    pub ledger_id: LedgerId,
    pub from: AccountNumber,
    pub to: AccountNumber,
    pub shortfall: Shortfall,
    pub occurred_at: DateTime<Utc>,
}

/// Event: AccountClosed. `forfeited` is the balance discarded with the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountClosed {
    pub ledger_id: LedgerId,
    pub account_number: AccountNumber,
    pub forfeited: Money,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    AccountOpened(AccountOpened),
    FundsDeposited(FundsDeposited),
    FundsWithdrawn(FundsWithdrawn),
    WithdrawalDeclined(WithdrawalDeclined),
    FundsTransferred(FundsTransferred),
    TransferDeclined(TransferDeclined),
    AccountClosed(AccountClosed),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::AccountOpened(_) => "bank.account.opened",
            LedgerEvent::FundsDeposited(_) => "bank.account.deposited",
            LedgerEvent::FundsWithdrawn(_) => "bank.account.withdrawn",
            LedgerEvent::WithdrawalDeclined(_) => "bank.account.withdrawal_declined",
            LedgerEvent::FundsTransferred(_) => "bank.transfer.completed",
            LedgerEvent::TransferDeclined(_) => "bank.transfer.declined",
            LedgerEvent::AccountClosed(_) => "bank.account.closed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::AccountOpened(e) => e.occurred_at,
            LedgerEvent::FundsDeposited(e) => e.occurred_at,
            LedgerEvent::FundsWithdrawn(e) => e.occurred_at,
            LedgerEvent::WithdrawalDeclined(e) => e.occurred_at,
            LedgerEvent::FundsTransferred(e) => e.occurred_at,
            LedgerEvent::TransferDeclined(e) => e.occurred_at,
            LedgerEvent::AccountClosed(e) => e.occurred_at,
        }
    }
}
