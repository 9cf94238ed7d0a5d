use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::events::ParsedEvent;
use crate::stats::AggregateStatistics;

/// Well-known report location, relative to the run's working directory.
/// Overwritten on every run.
pub const REPORT_PATH: &str = "CHAINHOOK-REPORT.json";

/// Report persistence failure. The report artifact is the entire point of
/// a run, so this is the one error class that aborts instead of degrading.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

/// Final persisted artifact of one monitoring run.
#[derive(Debug, Serialize)]
pub struct MonitoringReport {
    pub contract: String,
    pub network: String,
    /// ISO-8601 generation time.
    pub timestamp: String,
    pub statistics: ReportStatistics,
    pub events: Vec<ParsedEvent>,
    #[serde(rename = "builderChallenge")]
    pub builder_challenge: BuilderChallenge,
}

#[derive(Debug, Serialize)]
pub struct ReportStatistics {
    pub deposits: u64,
    pub withdrawals: u64,
    pub registrations: u64,
    #[serde(rename = "totalVolume")]
    pub total_volume: u64,
    #[serde(rename = "uniqueUsers")]
    pub unique_users: u64,
    pub fees: u64,
}

/// Fixed metadata block describing the monitoring methodology, kept in the
/// shape the builder challenge submission expects.
#[derive(Debug, Serialize)]
pub struct BuilderChallenge {
    #[serde(rename = "chainhooksUsed")]
    pub chainhooks_used: bool,
    #[serde(rename = "usersGenerated")]
    pub users_generated: u64,
    #[serde(rename = "feesGenerated")]
    pub fees_generated: u64,
    pub note: String,
}

/// Freeze the run's accumulator and event log into the report shape.
/// `unique_participants` is reduced to its cardinality.
pub fn build_report(
    contract_id: &str,
    network: &str,
    stats: &AggregateStatistics,
    events: Vec<ParsedEvent>,
) -> MonitoringReport {
    MonitoringReport {
        contract: contract_id.to_string(),
        network: network.to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        statistics: ReportStatistics {
            deposits: stats.deposit_count,
            withdrawals: stats.withdrawal_count,
            registrations: stats.registration_count,
            total_volume: stats.total_volume,
            unique_users: stats.unique_users(),
            fees: stats.total_fees,
        },
        events,
        builder_challenge: BuilderChallenge {
            chainhooks_used: true,
            users_generated: stats.unique_users(),
            fees_generated: stats.total_fees,
            note: "This project uses Hiro Chainhooks for real-time event monitoring"
                .to_string(),
        },
    }
}

/// Write the report as pretty-printed JSON, replacing any previous report
/// at `path`.
pub fn write_report(report: &MonitoringReport, path: &Path) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| ReportError::Write {
        path: path.display().to_string(),
        source,
    })?;
    info!("Report saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_stats() -> AggregateStatistics {
        let mut stats = AggregateStatistics::new();
        stats.record(&ParsedEvent::Deposit {
            amount: 5_000_000,
            sender: "SPABC".to_string(),
            timestamp: 1700000000,
            tx_id: "0x1".to_string(),
        });
        stats.total_fees = 400_000;
        stats
    }

    #[test]
    fn report_shape_matches_consumer_contract() {
        let stats = sample_stats();
        let report = build_report("SP1.passkey-wallet", "testnet", &stats, vec![]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["contract"], "SP1.passkey-wallet");
        assert_eq!(json["network"], "testnet");
        assert_eq!(json["statistics"]["deposits"], 1);
        assert_eq!(json["statistics"]["totalVolume"], 5_000_000);
        assert_eq!(json["statistics"]["uniqueUsers"], 1);
        assert_eq!(json["statistics"]["fees"], 400_000);
        assert_eq!(json["builderChallenge"]["chainhooksUsed"], true);
        assert_eq!(json["builderChallenge"]["usersGenerated"], 1);
        assert_eq!(json["builderChallenge"]["feesGenerated"], 400_000);
        assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
        assert!(json["events"].as_array().unwrap().is_empty());
    }

    #[test]
    fn write_overwrites_previous_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(REPORT_PATH);
        std::fs::write(&path, "stale").unwrap();

        let stats = sample_stats();
        let report = build_report("SP1.passkey-wallet", "testnet", &stats, vec![]);
        write_report(&report, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('{'));
        assert!(written.contains("\"uniqueUsers\": 1"));
    }

    #[test]
    fn write_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(REPORT_PATH);

        let stats = sample_stats();
        let report = build_report("SP1.passkey-wallet", "testnet", &stats, vec![]);
        let err = write_report(&report, &path).unwrap_err();
        assert!(matches!(err, ReportError::Write { .. }));
    }
}
