use std::path::Path;

use chrono::DateTime;
use eyre::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::events::ParsedEvent;
use crate::fetcher::{EventFetcher, DEFAULT_EVENT_LIMIT, DEFAULT_EVENT_OFFSET, DEFAULT_TX_LIMIT};
use crate::report::{build_report, write_report, MonitoringReport};
use crate::stats::{compute_fees, AggregateStatistics};

const MICRO_STX: f64 = 1_000_000.0;

/// One monitoring run: fetch events, parse and fold the page, fetch
/// transactions, compute fees, emit the report.
///
/// Best-effort throughout: a failed fetch degrades that stage to empty
/// data and the run still completes. The only fatal failure is the report
/// write. An all-zero report is the caller's cue to inspect the logs.
pub async fn run(config: &AppConfig, report_path: &Path) -> Result<MonitoringReport> {
    let contract_id = config.contract_id();

    info!("PASSKEY WALLET CHAINHOOK MONITOR");
    info!("Contract: {}", contract_id);
    info!("Network: {}", config.stacks_network);

    let fetcher = EventFetcher::new(config.stacks_api_url.clone(), contract_id.clone());

    let mut stats = AggregateStatistics::new();
    let mut event_log: Vec<ParsedEvent> = Vec::new();

    info!("Fetching contract events...");
    if let Some(page) = fetcher
        .fetch_events(DEFAULT_EVENT_LIMIT, DEFAULT_EVENT_OFFSET)
        .await
    {
        info!("Found {} events", page.results.len());
        for record in &page.results {
            if let Some(parsed) = crate::parser::parse(record) {
                display_event(&parsed);
                stats.record(&parsed);
                event_log.push(parsed);
            }
        }
    }

    info!("Fetching contract transactions...");
    let tx_page = fetcher.fetch_transactions(DEFAULT_TX_LIMIT).await;
    if let Some(page) = &tx_page {
        info!("Found {} transactions", page.results.len());
    }
    stats.total_fees = compute_fees(tx_page.as_ref());

    display_stats(&stats);

    let report = build_report(&contract_id, &config.stacks_network, &stats, event_log);
    write_report(&report, report_path)?;

    Ok(report)
}

fn display_event(event: &ParsedEvent) {
    let time = DateTime::from_timestamp(event.timestamp(), 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| event.timestamp().to_string());

    info!("{}", event.kind().to_uppercase());
    info!("  TX: {}", event.tx_id());
    info!("  Time: {}", time);
    match event {
        ParsedEvent::Deposit { amount, sender, .. } => {
            if let Some(stx) = displayed_amount(*amount) {
                info!("  Amount: {} STX", stx);
            }
            info!("  Sender: {}", sender);
        }
        ParsedEvent::Withdraw {
            amount, recipient, ..
        } => {
            if let Some(stx) = displayed_amount(*amount) {
                info!("  Amount: {} STX", stx);
            }
            info!("  Recipient: {}", recipient);
        }
        ParsedEvent::Registration { owner, .. } => {
            info!("  Owner: {}", owner);
        }
    }
}

/// STX value for the operator log, or nothing for a defaulted zero amount
/// so the line is suppressed.
fn displayed_amount(amount: u64) -> Option<f64> {
    (amount > 0).then(|| amount as f64 / MICRO_STX)
}

fn display_stats(stats: &AggregateStatistics) {
    info!("STATISTICS");
    info!("Total Deposits:        {}", stats.deposit_count);
    info!("Total Withdrawals:     {}", stats.withdrawal_count);
    info!("Total Registrations:   {}", stats.registration_count);
    info!(
        "Total Volume:          {:.6} STX",
        stats.total_volume as f64 / MICRO_STX
    );
    info!("Unique Users:          {}", stats.unique_users());
    info!(
        "Total Fees Generated:  {:.6} STX",
        stats.total_fees as f64 / MICRO_STX
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_not_displayed() {
        assert_eq!(displayed_amount(0), None);
        assert_eq!(displayed_amount(1_500_000), Some(1.5));
    }
}
