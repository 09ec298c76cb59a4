//! Bank accounts and the ledger that owns them.
//!
//! Pure domain logic: no IO, no persistence. Logging goes through `tracing`;
//! installing a subscriber is the binary's job.

pub mod account;
pub mod command;
pub mod error;
pub mod event;
pub mod holder;
pub mod ledger;
pub mod number;
pub mod settings;
pub mod shared;

pub use account::{Account, DebitOutcome, Shortfall};
pub use command::{CommandOutcome, LedgerCommand};
pub use error::{LedgerError, LedgerResult};
pub use event::{
    AccountClosed, AccountOpened, FundsDeposited, FundsTransferred, FundsWithdrawn, LedgerEvent,
    TransferDeclined, WithdrawalDeclined,
};
pub use holder::AccountHolder;
pub use ledger::{ClosedAccount, Ledger, TransferOutcome};
pub use number::{AccountNumber, checksum, pad_sequence};
pub use settings::{BankCode, BankCodeInput, CountryCode, LedgerSettings, RoutingCode};
pub use shared::SharedLedger;
