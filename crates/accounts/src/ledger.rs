//! The account registry.
//!
//! `Ledger` owns every account, keyed by holder, and is the only way to open,
//! fund, debit, transfer between and close them. It is single-threaded by
//! construction (`&mut self`); see [`crate::SharedLedger`] for concurrent use.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankledger_core::{AggregateRoot, LedgerId, Money};
use bankledger_events::EventLog;

use crate::account::{Account, DebitOutcome, Shortfall};
use crate::error::{LedgerError, LedgerResult};
use crate::event::{
    AccountClosed, AccountOpened, FundsDeposited, FundsTransferred, FundsWithdrawn, LedgerEvent,
    TransferDeclined, WithdrawalDeclined,
};
use crate::holder::AccountHolder;
use crate::number::AccountNumber;
use crate::settings::LedgerSettings;

/// Result of a transfer attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Completed { from_balance: Money, to_balance: Money },
    /// The source could not cover the amount; neither account changed.
    Declined(Shortfall),
}

impl TransferOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TransferOutcome::Completed { .. })
    }
}

/// What is left of an account after removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedAccount {
    pub account_number: AccountNumber,
    /// Balance held at removal time. It is discarded, not paid out.
    pub forfeited: Money,
}

#[derive(Debug, Clone)]
pub struct Ledger {
    id: LedgerId,
    settings: LedgerSettings,
    /// Last sequence number handed out. Never decremented or reused.
    sequence: u64,
    accounts: HashMap<AccountHolder, Account>,
    events: EventLog<LedgerEvent>,
}

impl Ledger {
    pub fn new(settings: LedgerSettings) -> Self {
        Self::with_id(LedgerId::new(), settings)
    }

    pub fn with_id(id: LedgerId, settings: LedgerSettings) -> Self {
        Self {
            id,
            settings,
            sequence: 0,
            accounts: HashMap::new(),
            events: EventLog::new(),
        }
    }

    pub fn id_typed(&self) -> LedgerId {
        self.id
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Last sequence number assigned (0 before the first account is opened).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn contains(&self, holder: &AccountHolder) -> bool {
        self.accounts.contains_key(holder)
    }

    pub fn account(&self, holder: &AccountHolder) -> Option<&Account> {
        self.accounts.get(holder)
    }

    /// Open accounts, in sequence order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|a| a.sequence());
        accounts.into_iter()
    }

    /// Sum of all open balances, or `None` if it leaves `Money`'s range.
    pub fn total_holdings(&self) -> Option<Money> {
        self.accounts
            .values()
            .try_fold(Money::ZERO, |total, a| total.checked_add(a.balance()))
    }

    /// Everything that happened so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        self.events.as_slice()
    }

    /// Events recorded after `version` (see [`AggregateRoot::version`]).
    pub fn events_since(&self, version: u64) -> &[LedgerEvent] {
        self.events.since(version)
    }

    /// Events of one kind (see [`bankledger_events::Event::event_type`]), oldest first.
    pub fn events_of_type<'a>(
        &'a self,
        event_type: &'a str,
    ) -> impl Iterator<Item = &'a LedgerEvent> + 'a {
        self.events.of_type(event_type)
    }

    /// When the ledger last changed, if ever.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.events.last_occurred_at()
    }

    /// Open an account for `holder` and return its identifier.
    pub fn create_account(&mut self, holder: AccountHolder) -> LedgerResult<AccountNumber> {
        if self.accounts.contains_key(&holder) {
            return Err(LedgerError::duplicate(&holder));
        }

        self.sequence += 1;
        let sequence = self.sequence;
        let number =
            AccountNumber::assign(&self.settings.country, &self.settings.bank_code, sequence);

        tracing::info!(
            ledger_id = %self.id,
            account = %number,
            sequence,
            holder = %holder,
            "account opened"
        );

        let account = Account::open(
            holder.clone(),
            number.clone(),
            sequence,
            self.settings.routing_code.clone(),
        );
        self.accounts.insert(holder.clone(), account);
        self.record(LedgerEvent::AccountOpened(AccountOpened {
            ledger_id: self.id,
            holder,
            account_number: number.clone(),
            sequence,
            occurred_at: Utc::now(),
        }));

        Ok(number)
    }

    /// Credit `amount` and return the new balance.
    pub fn deposit(&mut self, holder: &AccountHolder, amount: Money) -> LedgerResult<Money> {
        let ledger_id = self.id;
        let account = self.account_mut(holder)?;
        ensure_valid_amount(amount)?;

        let balance = account.credit(amount)?;
        let account_number = account.number().clone();
        tracing::debug!(%ledger_id, account = %account_number, %amount, %balance, "deposit");

        self.record(LedgerEvent::FundsDeposited(FundsDeposited {
            ledger_id,
            account_number,
            amount,
            balance,
            occurred_at: Utc::now(),
        }));
        Ok(balance)
    }

    /// Debit `amount` if the balance covers it.
    ///
    /// An uncovered request is `Ok(DebitOutcome::Insufficient(..))` and leaves
    /// the balance unchanged.
    pub fn withdraw(
        &mut self,
        holder: &AccountHolder,
        amount: Money,
    ) -> LedgerResult<DebitOutcome> {
        let ledger_id = self.id;
        let account = self.account_mut(holder)?;
        ensure_valid_amount(amount)?;

        let outcome = account.debit(amount);
        let account_number = account.number().clone();

        let event = match outcome {
            DebitOutcome::Completed { balance } => {
                tracing::debug!(
                    %ledger_id,
                    account = %account_number,
                    %amount,
                    %balance,
                    "withdrawal"
                );
                LedgerEvent::FundsWithdrawn(FundsWithdrawn {
                    ledger_id,
                    account_number,
                    amount,
                    balance,
                    occurred_at: Utc::now(),
                })
            }
            DebitOutcome::Insufficient(shortfall) => {
                LedgerEvent::WithdrawalDeclined(WithdrawalDeclined {
                    ledger_id,
                    account_number,
                    shortfall,
                    occurred_at: Utc::now(),
                })
            }
        };
        self.record(event);
        Ok(outcome)
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// The destination is credited only after the source debit succeeded, so
    /// a declined transfer changes nothing. A destination that cannot hold the
    /// credit fails the transfer before the source is touched.
    pub fn transfer(
        &mut self,
        amount: Money,
        from: &AccountHolder,
        to: &AccountHolder,
    ) -> LedgerResult<TransferOutcome> {
        let from_number = self.account_mut(from)?.number().clone();
        let to_account = self.account_mut(to)?;
        let to_number = to_account.number().clone();
        ensure_valid_amount(amount)?;
        // A self-transfer credits back what it debited.
        if from != to {
            to_account.credited(amount)?;
        }

        let debit = self.account_mut(from)?.debit(amount);
        let outcome = match debit {
            DebitOutcome::Completed {
                balance: from_balance,
            } => {
                let to_balance = self.account_mut(to)?.credit(amount)?;
                // A self-transfer debits and credits the same account.
                let from_balance = if from == to { to_balance } else { from_balance };
                TransferOutcome::Completed {
                    from_balance,
                    to_balance,
                }
            }
            DebitOutcome::Insufficient(shortfall) => TransferOutcome::Declined(shortfall),
        };

        let event = match outcome {
            TransferOutcome::Completed { .. } => {
                tracing::debug!(
                    ledger_id = %self.id,
                    from = %from_number,
                    to = %to_number,
                    %amount,
                    "transfer"
                );
                LedgerEvent::FundsTransferred(FundsTransferred {
                    ledger_id: self.id,
                    from: from_number,
                    to: to_number,
                    amount,
                    occurred_at: Utc::now(),
                })
            }
            TransferOutcome::Declined(shortfall) => LedgerEvent::TransferDeclined(TransferDeclined {
                ledger_id: self.id,
                from: from_number,
                to: to_number,
                shortfall,
                occurred_at: Utc::now(),
            }),
        };
        self.record(event);
        Ok(outcome)
    }

    /// Rendered summary of the holder's account.
    pub fn account_info(&self, holder: &AccountHolder) -> LedgerResult<String> {
        self.accounts
            .get(holder)
            .map(Account::summary)
            .ok_or_else(|| LedgerError::not_found(holder))
    }

    /// Delete the holder's account.
    ///
    /// Removal is unconditional: a remaining balance is discarded and reported
    /// back as [`ClosedAccount::forfeited`]. The sequence number is not reused.
    pub fn remove_account(&mut self, holder: &AccountHolder) -> LedgerResult<ClosedAccount> {
        let account = self
            .accounts
            .remove(holder)
            .ok_or_else(|| LedgerError::not_found(holder))?;

        let closed = ClosedAccount {
            account_number: account.number().clone(),
            forfeited: account.balance(),
        };

        if closed.forfeited.is_zero() {
            tracing::info!(
                ledger_id = %self.id,
                account = %closed.account_number,
                "account removed"
            );
        } else {
            tracing::warn!(
                ledger_id = %self.id,
                account = %closed.account_number,
                forfeited = %closed.forfeited,
                "account removed with non-zero balance; balance discarded"
            );
        }

        self.record(LedgerEvent::AccountClosed(AccountClosed {
            ledger_id: self.id,
            account_number: closed.account_number.clone(),
            forfeited: closed.forfeited,
            occurred_at: Utc::now(),
        }));
        Ok(closed)
    }

    fn account_mut(&mut self, holder: &AccountHolder) -> LedgerResult<&mut Account> {
        self.accounts
            .get_mut(holder)
            .ok_or_else(|| LedgerError::not_found(holder))
    }

    fn record(&mut self, event: LedgerEvent) {
        let version = self.events.record(event);
        tracing::trace!(ledger_id = %self.id, version, "event recorded");
    }
}

impl AggregateRoot for Ledger {
    type Id = LedgerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.events.version()
    }
}

fn ensure_valid_amount(amount: Money) -> LedgerResult<()> {
    if amount.is_negative() {
        return Err(LedgerError::InvalidAmount { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bankledger_events::Event;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn test_settings() -> LedgerSettings {
        LedgerSettings::new("BANKABXX", "AB", "1").unwrap()
    }

    fn holder(first: &str) -> AccountHolder {
        AccountHolder::new(first, "Tester", "1 Main St", "555-0000")
    }

    fn funded(ledger: &mut Ledger, who: &AccountHolder, amount: i64) {
        ledger.create_account(who.clone()).unwrap();
        ledger.deposit(who, Money::from(amount)).unwrap();
    }

    #[test]
    fn nth_account_gets_sequence_n() {
        let mut ledger = Ledger::new(test_settings());
        for n in 1..=5u64 {
            let number = ledger.create_account(holder(&format!("h{n}"))).unwrap();
            assert!(number.as_str().ends_with(&format!("{n:011}")));
            assert_eq!(ledger.sequence(), n);
        }
    }

    #[test]
    fn first_identifier_matches_reference() {
        let mut ledger = Ledger::new(test_settings());
        let number = ledger.create_account(holder("a")).unwrap();
        assert_eq!(number.as_str(), "AB07100000000001");
        assert_eq!(ledger.account(&holder("a")).unwrap().balance(), Money::ZERO);
    }

    #[test]
    fn duplicate_holder_is_rejected_without_side_effects() {
        let mut ledger = Ledger::new(test_settings());
        ledger.create_account(holder("a")).unwrap();

        let err = ledger.create_account(holder("a")).unwrap_err();
        assert_eq!(err, LedgerError::duplicate(&holder("a")));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.sequence(), 1);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn every_operation_rejects_unknown_holder() {
        let mut ledger = Ledger::new(test_settings());
        let known = holder("known");
        ledger.create_account(known.clone()).unwrap();
        let ghost = holder("ghost");
        let not_found = LedgerError::not_found(&ghost);

        assert_eq!(ledger.deposit(&ghost, Money::from(1)).unwrap_err(), not_found);
        assert_eq!(ledger.withdraw(&ghost, Money::from(1)).unwrap_err(), not_found);
        assert_eq!(ledger.transfer(Money::from(1), &ghost, &known).unwrap_err(), not_found);
        assert_eq!(ledger.transfer(Money::from(1), &known, &ghost).unwrap_err(), not_found);
        assert_eq!(ledger.account_info(&ghost).unwrap_err(), not_found);
        assert_eq!(ledger.remove_account(&ghost).unwrap_err(), not_found);
        assert_eq!(ledger.events().len(), 1);
    }

    #[test]
    fn insufficient_withdrawal_is_an_outcome_not_an_error() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        funded(&mut ledger, &a, 10);

        let outcome = ledger.withdraw(&a, Money::from(15)).unwrap();
        assert_eq!(outcome.shortfall().unwrap().missing(), Money::from(5));
        assert_eq!(ledger.account(&a).unwrap().balance(), Money::from(10));
        assert!(matches!(
            ledger.events().last(),
            Some(LedgerEvent::WithdrawalDeclined(_))
        ));
    }

    #[test]
    fn transfer_moves_funds_and_conserves_total() {
        let mut ledger = Ledger::new(test_settings());
        let (a, b) = (holder("a"), holder("b"));
        funded(&mut ledger, &a, 100);
        ledger.create_account(b.clone()).unwrap();

        let outcome = ledger.transfer(Money::from(40), &a, &b).unwrap();
        assert_eq!(
            outcome,
            TransferOutcome::Completed {
                from_balance: Money::from(60),
                to_balance: Money::from(40),
            }
        );

        let declined = ledger.transfer(Money::from(1000), &a, &b).unwrap();
        assert!(!declined.is_completed());
        assert_eq!(ledger.account(&a).unwrap().balance(), Money::from(60));
        assert_eq!(ledger.account(&b).unwrap().balance(), Money::from(40));
        assert_eq!(ledger.total_holdings(), Some(Money::from(100)));
    }

    #[test]
    fn self_transfer_leaves_balance_unchanged() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        funded(&mut ledger, &a, 50);

        let outcome = ledger.transfer(Money::from(20), &a, &a).unwrap();
        assert_eq!(
            outcome,
            TransferOutcome::Completed {
                from_balance: Money::from(50),
                to_balance: Money::from(50),
            }
        );
        assert_eq!(ledger.account(&a).unwrap().balance(), Money::from(50));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut ledger = Ledger::new(test_settings());
        let (a, b) = (holder("a"), holder("b"));
        funded(&mut ledger, &a, 10);
        ledger.create_account(b.clone()).unwrap();
        let minus = Money::new(dec!(-5));

        let invalid = LedgerError::InvalidAmount { amount: minus };
        assert_eq!(ledger.deposit(&a, minus).unwrap_err(), invalid);
        assert_eq!(ledger.withdraw(&a, minus).unwrap_err(), invalid);
        assert_eq!(ledger.transfer(minus, &a, &b).unwrap_err(), invalid);
        assert_eq!(ledger.account(&a).unwrap().balance(), Money::from(10));
    }

    #[test]
    fn deposit_past_max_balance_fails_without_side_effects() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        ledger.create_account(a.clone()).unwrap();
        let max = Money::new(Decimal::MAX);
        ledger.deposit(&a, max).unwrap();
        let version = ledger.version();

        let err = ledger.deposit(&a, max).unwrap_err();
        assert_eq!(err.kind(), "balance_overflow");
        assert_eq!(ledger.account(&a).unwrap().balance(), max);
        assert_eq!(ledger.version(), version);
    }

    #[test]
    fn transfer_into_full_account_fails_and_changes_neither_balance() {
        let mut ledger = Ledger::new(test_settings());
        let (a, b) = (holder("a"), holder("b"));
        funded(&mut ledger, &a, 10);
        ledger.create_account(b.clone()).unwrap();
        let max = Money::new(Decimal::MAX);
        ledger.deposit(&b, max).unwrap();

        let err = ledger.transfer(Money::from(10), &a, &b).unwrap_err();
        assert_eq!(
            err,
            LedgerError::BalanceOverflow {
                account: ledger.account(&b).unwrap().number().clone(),
                balance: max,
                amount: Money::from(10),
            }
        );
        assert_eq!(ledger.account(&a).unwrap().balance(), Money::from(10));
        assert_eq!(ledger.account(&b).unwrap().balance(), max);
        assert_eq!(ledger.events_of_type("bank.transfer.completed").count(), 0);
        assert_eq!(ledger.events_of_type("bank.transfer.declined").count(), 0);
    }

    #[test]
    fn self_transfer_of_full_account_succeeds() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        ledger.create_account(a.clone()).unwrap();
        let max = Money::new(Decimal::MAX);
        ledger.deposit(&a, max).unwrap();

        assert!(ledger.transfer(Money::from(1), &a, &a).unwrap().is_completed());
        assert_eq!(ledger.account(&a).unwrap().balance(), max);
    }

    #[test]
    fn total_holdings_is_none_when_the_sum_overflows() {
        let mut ledger = Ledger::new(test_settings());
        let max = Money::new(Decimal::MAX);
        for name in ["a", "b"] {
            ledger.create_account(holder(name)).unwrap();
            ledger.deposit(&holder(name), max).unwrap();
        }
        assert_eq!(ledger.total_holdings(), None);
    }

    #[test]
    fn zero_deposit_is_accepted() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        ledger.create_account(a.clone()).unwrap();
        assert_eq!(ledger.deposit(&a, Money::ZERO).unwrap(), Money::ZERO);
    }

    #[test]
    fn removal_discards_balance_and_never_recycles_sequence() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        funded(&mut ledger, &a, 75);
        let first = ledger.account(&a).unwrap().number().clone();

        let closed = ledger.remove_account(&a).unwrap();
        assert_eq!(closed.account_number, first);
        assert_eq!(closed.forfeited, Money::from(75));
        assert_eq!(
            ledger.deposit(&a, Money::from(1)).unwrap_err(),
            LedgerError::not_found(&a)
        );

        let second = ledger.create_account(a.clone()).unwrap();
        assert_ne!(second, first);
        let account = ledger.account(&a).unwrap();
        assert_eq!(account.sequence(), 2);
        assert_eq!(account.balance(), Money::ZERO);
    }

    #[test]
    fn account_info_renders_summary() {
        let mut ledger = Ledger::new(test_settings());
        let a = holder("a");
        funded(&mut ledger, &a, 12);

        let info = ledger.account_info(&a).unwrap();
        assert!(info.contains("Balance: 12.00"));
        assert!(info.contains("Account Number: AB07100000000001"));
        assert!(info.contains("Routing Code: BANKABXX"));
    }

    #[test]
    fn events_track_version_and_types() {
        let mut ledger = Ledger::new(test_settings());
        let (a, b) = (holder("a"), holder("b"));
        funded(&mut ledger, &a, 10);
        ledger.create_account(b.clone()).unwrap();
        ledger.transfer(Money::from(4), &a, &b).unwrap();
        ledger.withdraw(&b, Money::from(1)).unwrap();
        ledger.remove_account(&b).unwrap();

        let types: Vec<_> = ledger.events().iter().map(Event::event_type).collect();
        assert_eq!(
            types,
            vec![
                "bank.account.opened",
                "bank.account.deposited",
                "bank.account.opened",
                "bank.transfer.completed",
                "bank.account.withdrawn",
                "bank.account.closed",
            ]
        );
        assert_eq!(ledger.version(), 6);
        assert!(ledger.events().iter().all(|e| e.version() == 1));
        assert!(matches!(
            ledger.events_since(5),
            [LedgerEvent::AccountClosed(closed)] if closed.forfeited == Money::from(3)
        ));
    }

    #[test]
    fn events_filter_by_type_and_report_last_activity() {
        let mut ledger = Ledger::new(test_settings());
        assert_eq!(ledger.last_activity(), None);

        let (a, b) = (holder("a"), holder("b"));
        funded(&mut ledger, &a, 10);
        funded(&mut ledger, &b, 5);
        ledger.withdraw(&b, Money::from(50)).unwrap();

        let opened: Vec<_> = ledger
            .events_of_type("bank.account.opened")
            .filter_map(|e| match e {
                LedgerEvent::AccountOpened(opened) => Some(opened.sequence),
                _ => None,
            })
            .collect();
        assert_eq!(opened, vec![1, 2]);
        assert_eq!(ledger.events_of_type("bank.account.deposited").count(), 2);

        let last = ledger.events().last().unwrap().occurred_at();
        assert_eq!(ledger.last_activity(), Some(last));
    }

    #[test]
    fn separate_ledgers_have_independent_sequences() {
        let mut first = Ledger::new(test_settings());
        let mut second = Ledger::new(test_settings());
        first.create_account(holder("a")).unwrap();
        first.create_account(holder("b")).unwrap();

        let number = second.create_account(holder("a")).unwrap();
        assert_eq!(number.as_str(), "AB07100000000001");
        assert_ne!(first.id_typed(), second.id_typed());
    }

    #[test]
    fn accounts_iterate_in_sequence_order() {
        let mut ledger = Ledger::new(test_settings());
        for name in ["c", "a", "b"] {
            ledger.create_account(holder(name)).unwrap();
        }
        let names: Vec<_> = ledger
            .accounts()
            .map(|a| a.holder().first_name().to_string())
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
