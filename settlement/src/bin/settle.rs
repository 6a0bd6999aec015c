//! Settle CLI
//!
//! Reads an event file (roster + expenses) and prints the transfer plan as JSON.
//!
//! Usage:
//!   settle trip.toml
//!   settle --config settlement.toml --compact trip.json

use anyhow::{Context, Result};
use clap::Parser;
use expense_settlement::{
    money::from_minor_units, Config, EventFile, ParticipantId, SettlementEngine, SettlementPlan,
    SettlementStats,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "settle")]
#[command(about = "Compute who pays whom to settle shared event expenses")]
struct Args {
    /// Event file (.toml or .json)
    event: PathBuf,

    /// Configuration file; falls back to SETTLEMENT_* environment variables
    #[arg(long, env = "SETTLEMENT_CONFIG")]
    config: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

#[derive(Serialize)]
struct TransferView<'a> {
    from: &'a ParticipantId,
    to: &'a ParticipantId,
    amount: Decimal,
}

#[derive(Serialize)]
struct Report<'a> {
    event: Option<&'a str>,
    transfers: Vec<TransferView<'a>>,
    unsettled_remainder: Decimal,
    stats: &'a SettlementStats,
}

/// Render a plan for output, amounts in major units
fn build_report<'a>(
    event: &'a EventFile,
    plan: &'a SettlementPlan,
    stats: &'a SettlementStats,
    scale: u32,
) -> expense_settlement::Result<Report<'a>> {
    let transfers = plan
        .transfers
        .iter()
        .map(|t| {
            Ok(TransferView {
                from: &t.from,
                to: &t.to,
                amount: from_minor_units(t.amount, scale)?,
            })
        })
        .collect::<expense_settlement::Result<Vec<_>>>()?;

    Ok(Report {
        event: event.name.as_deref(),
        transfers,
        unsettled_remainder: from_minor_units(plan.unsettled_remainder, scale)?,
        stats,
    })
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::from_env().context("Failed to load config from environment")?,
    };
    let scale = config.minor_unit_scale;

    let event = EventFile::load(&args.event)
        .with_context(|| format!("Failed to load event {}", args.event.display()))?;
    let ledger = event.to_ledger(scale).context("Invalid expenses")?;
    let policy = event
        .split_policy(config.split.remainder_policy)
        .context("Invalid split")?;
    let participants = ledger.participants(&policy).context("Invalid split")?;

    let total = from_minor_units(ledger.total(), scale)?;
    tracing::info!(
        event = event.name.as_deref().unwrap_or("unnamed"),
        attendees = ledger.roster().len(),
        expenses = ledger.expenses().len(),
        total = %total,
        "Settling event"
    );

    let (plan, stats) = SettlementEngine::new()
        .compute_with_stats(&participants)
        .context("Settlement failed")?;

    let report = build_report(&event, &plan, &stats, scale)?;

    let output = if config.output.pretty_print && !args.compact {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", output);

    tracing::info!(
        transfers = stats.transfer_count,
        remainder = plan.unsettled_remainder,
        "Settlement complete"
    );

    Ok(())
}
