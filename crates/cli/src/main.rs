use std::io::{self, Write};

use anyhow::Context;

use bankledger_accounts::Ledger;
use bankledger_cli::{AppConfig, DEFAULT_CONFIG_PATH, run_batch};
use bankledger_config::read_json_config;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let raw = read_json_config(&path)?;
    let config = AppConfig::from_map(&raw).with_context(|| format!("invalid config {path}"))?;

    bankledger_observability::init_with(&config.logging);

    let mut ledger = Ledger::new(config.bank);
    tracing::info!(
        ledger_id = %ledger.id_typed(),
        country = %ledger.settings().country,
        bank_code = %ledger.settings().bank_code,
        operations = config.operations.len(),
        "ledger ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let report = run_batch(&mut ledger, &config.operations, &mut out)?;

    tracing::info!(
        ledger_id = %ledger.id_typed(),
        events = ledger.events().len(),
        last_activity = ?ledger.last_activity(),
        "batch finished"
    );

    let holdings = ledger
        .total_holdings()
        .map_or_else(|| "more than can be summed".to_string(), |m| m.to_string());
    writeln!(
        out,
        "{} ok, {} declined, {} failed; {} open accounts holding {}",
        report.succeeded,
        report.declined,
        report.failed,
        ledger.len(),
        holdings
    )?;
    Ok(())
}
