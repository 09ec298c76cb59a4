use serde::{Deserialize, Serialize};

use bankledger_core::{Entity, Money};

use crate::error::{LedgerError, LedgerResult};
use crate::holder::AccountHolder;
use crate::number::AccountNumber;
use crate::settings::RoutingCode;

/// A debit that could not be covered by the available balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub available: Money,
    pub requested: Money,
}

impl Shortfall {
    /// How much is missing to cover the request.
    pub fn missing(&self) -> Money {
        self.requested
            .checked_sub(self.available)
            .unwrap_or(self.requested)
    }
}

impl core::fmt::Display for Shortfall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "insufficient balance. Current balance: {}, {} needed",
            self.available,
            self.missing()
        )
    }
}

/// Result of a debit attempt. Running short is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DebitOutcome {
    Completed { balance: Money },
    Insufficient(Shortfall),
}

impl DebitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DebitOutcome::Completed { .. })
    }

    pub fn shortfall(&self) -> Option<&Shortfall> {
        match self {
            DebitOutcome::Completed { .. } => None,
            DebitOutcome::Insufficient(s) => Some(s),
        }
    }
}

/// A bank account. Owned by the [`crate::Ledger`]; never handed out mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    holder: AccountHolder,
    number: AccountNumber,
    sequence: u64,
    routing_code: RoutingCode,
    balance: Money,
}

impl Account {
    pub(crate) fn open(
        holder: AccountHolder,
        number: AccountNumber,
        sequence: u64,
        routing_code: RoutingCode,
    ) -> Self {
        Self {
            holder,
            number,
            sequence,
            routing_code,
            balance: Money::ZERO,
        }
    }

    pub fn holder(&self) -> &AccountHolder {
        &self.holder
    }

    pub fn number(&self) -> &AccountNumber {
        &self.number
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn routing_code(&self) -> &RoutingCode {
        &self.routing_code
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Balance after crediting `amount`, without applying it.
    pub(crate) fn credited(&self, amount: Money) -> LedgerResult<Money> {
        self.balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                account: self.number.clone(),
                balance: self.balance,
                amount,
            })
    }

    /// Add `amount` and return the new balance. On overflow the balance is untouched.
    ///
    /// The sign of `amount` is the caller's concern; the ledger rejects
    /// negative amounts before they get here.
    pub(crate) fn credit(&mut self, amount: Money) -> LedgerResult<Money> {
        self.balance = self.credited(amount)?;
        Ok(self.balance)
    }

    /// Subtract `amount` if the balance covers it; otherwise leave the balance untouched.
    pub(crate) fn debit(&mut self, amount: Money) -> DebitOutcome {
        let remaining = self.balance.checked_sub(amount);
        if let Some(balance) = remaining.filter(|b| !b.is_negative()) {
            self.balance = balance;
            return DebitOutcome::Completed { balance };
        }

        let shortfall = Shortfall {
            available: self.balance,
            requested: amount,
        };
        tracing::warn!(
            account = %self.number,
            holder = %self.holder.full_name(),
            balance = %shortfall.available,
            missing = %shortfall.missing(),
            "{} has {}",
            self.holder.full_name(),
            shortfall
        );
        DebitOutcome::Insufficient(shortfall)
    }

    /// Multi-line, human-readable summary.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl Entity for Account {
    type Id = AccountNumber;

    fn id(&self) -> &Self::Id {
        &self.number
    }
}

impl core::fmt::Display for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "First Name: {}", self.holder.first_name())?;
        writeln!(f, "Last Name: {}", self.holder.last_name())?;
        writeln!(f, "Address: {}", self.holder.address())?;
        writeln!(f, "Phone Number: {}", self.holder.phone_number())?;
        writeln!(f, "Balance: {}", self.balance)?;
        writeln!(f, "Account Number: {}", self.number)?;
        write!(f, "Routing Code: {}", self.routing_code)
    }
}
