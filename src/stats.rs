use std::collections::HashSet;

use crate::events::{ParsedEvent, Transaction, TransactionsPage};

/// Running counters for one monitoring run. Constructed fresh per run,
/// folded over the parsed event log in arrival order, then frozen into the
/// report. Counts and volume only ever increase.
#[derive(Debug, Default)]
pub struct AggregateStatistics {
    pub deposit_count: u64,
    pub withdrawal_count: u64,
    pub registration_count: u64,
    /// Sum of deposit and withdrawal amounts, in micro-STX.
    pub total_volume: u64,
    /// One pool across all three event kinds: a registration followed by a
    /// deposit from the same address counts once.
    pub unique_participants: HashSet<String>,
    pub total_fees: u64,
}

impl AggregateStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one parsed event into the counters. Applied exactly once per
    /// event, in arrival order.
    pub fn record(&mut self, event: &ParsedEvent) {
        match event {
            ParsedEvent::Deposit { amount, sender, .. } => {
                self.deposit_count += 1;
                // The parser accepts any u64 literal; saturate rather than
                // wrap so the accumulator stays monotonic.
                self.total_volume = self.total_volume.saturating_add(*amount);
                self.unique_participants.insert(sender.clone());
            }
            ParsedEvent::Withdraw {
                amount, recipient, ..
            } => {
                self.withdrawal_count += 1;
                self.total_volume = self.total_volume.saturating_add(*amount);
                self.unique_participants.insert(recipient.clone());
            }
            ParsedEvent::Registration { owner, .. } => {
                self.registration_count += 1;
                self.unique_participants.insert(owner.clone());
            }
        }
    }

    pub fn unique_users(&self) -> u64 {
        self.unique_participants.len() as u64
    }
}

/// Sum fees across a fetched transaction page. Absent, null, or
/// non-numeric fees count as 0; a missing page yields 0. Independent of the
/// event stream: this runs over the raw transaction list.
pub fn compute_fees(page: Option<&TransactionsPage>) -> u64 {
    page.map(|p| {
        p.results
            .iter()
            .map(transaction_fee)
            .fold(0u64, u64::saturating_add)
    })
    .unwrap_or(0)
}

fn transaction_fee(tx: &Transaction) -> u64 {
    match tx.fee_rate.as_ref() {
        Some(serde_json::Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(serde_json::Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}
