//! Batch runner behind the `bankledger` binary.
//!
//! Reads ledger settings and a list of operations from the configuration
//! document, runs them in order and writes one line (or block) per outcome.

use std::io::{self, Write};

use bankledger_accounts::{
    CommandOutcome, DebitOutcome, Ledger, LedgerCommand, LedgerSettings, TransferOutcome,
};
use bankledger_config::{ConfigError, ConfigMap, optional_section, section};
use bankledger_observability::LoggingConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Typed view of the configuration document.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bank: LedgerSettings,
    pub logging: LoggingConfig,
    pub operations: Vec<LedgerCommand>,
}

impl AppConfig {
    pub fn from_map(config: &ConfigMap) -> Result<Self, ConfigError> {
        Ok(Self {
            bank: section(config, "bank")?,
            logging: optional_section(config, "logging")?.unwrap_or_default(),
            operations: optional_section(config, "operations")?.unwrap_or_default(),
        })
    }
}

/// Tally of a batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub succeeded: usize,
    /// Withdrawals and transfers the source balance could not cover.
    pub declined: usize,
    pub failed: usize,
}

/// Execute `operations` in order. A failed operation is reported and the
/// batch continues.
pub fn run_batch(
    ledger: &mut Ledger,
    operations: &[LedgerCommand],
    out: &mut impl Write,
) -> io::Result<BatchReport> {
    let mut report = BatchReport::default();

    for (index, command) in operations.iter().enumerate() {
        let step = index + 1;
        match ledger.execute(command) {
            Ok(outcome) => {
                if is_declined(&outcome) {
                    report.declined += 1;
                } else {
                    report.succeeded += 1;
                }
                match outcome {
                    CommandOutcome::AccountInfo(summary) => {
                        writeln!(out, "[{step}] {}:", command.name())?;
                        for line in summary.lines() {
                            writeln!(out, "    {line}")?;
                        }
                    }
                    other => writeln!(out, "[{step}] {}: {other}", command.name())?,
                }
            }
            Err(err) => {
                report.failed += 1;
                tracing::warn!(step, op = command.name(), kind = err.kind(), "{err}");
                writeln!(out, "[{step}] {} failed ({}): {err}", command.name(), err.kind())?;
            }
        }
    }

    Ok(report)
}

fn is_declined(outcome: &CommandOutcome) -> bool {
    matches!(
        outcome,
        CommandOutcome::Withdrawal(DebitOutcome::Insufficient(_))
            | CommandOutcome::Transfer(TransferOutcome::Declined(_))
    )
}
