//! Serializable ledger commands, so a batch of operations can be described as data.

use serde::{Deserialize, Serialize};

use bankledger_core::Money;

use crate::account::DebitOutcome;
use crate::error::LedgerResult;
use crate::holder::AccountHolder;
use crate::ledger::{ClosedAccount, Ledger, TransferOutcome};
use crate::number::AccountNumber;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LedgerCommand {
    CreateAccount {
        holder: AccountHolder,
    },
    Deposit {
        holder: AccountHolder,
        amount: Money,
    },
    Withdraw {
        holder: AccountHolder,
        amount: Money,
    },
    Transfer {
        amount: Money,
        from: AccountHolder,
        to: AccountHolder,
    },
    AccountInfo {
        holder: AccountHolder,
    },
    RemoveAccount {
        holder: AccountHolder,
    },
}

impl LedgerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            LedgerCommand::CreateAccount { .. } => "create_account",
            LedgerCommand::Deposit { .. } => "deposit",
            LedgerCommand::Withdraw { .. } => "withdraw",
            LedgerCommand::Transfer { .. } => "transfer",
            LedgerCommand::AccountInfo { .. } => "account_info",
            LedgerCommand::RemoveAccount { .. } => "remove_account",
        }
    }
}

/// Successful result of [`Ledger::execute`], one variant per command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    AccountCreated(AccountNumber),
    Deposited { balance: Money },
    Withdrawal(DebitOutcome),
    Transfer(TransferOutcome),
    AccountInfo(String),
    AccountRemoved(ClosedAccount),
}

impl core::fmt::Display for CommandOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandOutcome::AccountCreated(number) => write!(f, "account {number} created"),
            CommandOutcome::Deposited { balance } => write!(f, "deposited, balance {balance}"),
            CommandOutcome::Withdrawal(DebitOutcome::Completed { balance }) => {
                write!(f, "withdrawn, balance {balance}")
            }
            CommandOutcome::Withdrawal(DebitOutcome::Insufficient(s)) => {
                write!(f, "withdrawal declined: {s}")
            }
            CommandOutcome::Transfer(TransferOutcome::Completed {
                from_balance,
                to_balance,
            }) => write!(f, "transferred, balances {from_balance} / {to_balance}"),
            CommandOutcome::Transfer(TransferOutcome::Declined(s)) => {
                write!(f, "transfer declined: {s}")
            }
            CommandOutcome::AccountInfo(summary) => f.write_str(summary),
            CommandOutcome::AccountRemoved(closed) => write!(
                f,
                "account {} removed, {} forfeited",
                closed.account_number, closed.forfeited
            ),
        }
    }
}

impl Ledger {
    /// Run one command against this ledger.
    pub fn execute(&mut self, command: &LedgerCommand) -> LedgerResult<CommandOutcome> {
        match command {
            LedgerCommand::CreateAccount { holder } => self
                .create_account(holder.clone())
                .map(CommandOutcome::AccountCreated),
            LedgerCommand::Deposit { holder, amount } => self
                .deposit(holder, *amount)
                .map(|balance| CommandOutcome::Deposited { balance }),
            LedgerCommand::Withdraw { holder, amount } => {
                self.withdraw(holder, *amount).map(CommandOutcome::Withdrawal)
            }
            LedgerCommand::Transfer { amount, from, to } => {
                self.transfer(*amount, from, to).map(CommandOutcome::Transfer)
            }
            LedgerCommand::AccountInfo { holder } => {
                self.account_info(holder).map(CommandOutcome::AccountInfo)
            }
            LedgerCommand::RemoveAccount { holder } => {
                self.remove_account(holder).map(CommandOutcome::AccountRemoved)
            }
        }
    }
}
