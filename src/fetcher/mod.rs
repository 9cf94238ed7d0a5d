use reqwest::Client;
use tracing::{error, info};

use crate::events::{EventsPage, TransactionsPage};

/// Default page bounds against the Hiro API (events capped at 100 per
/// call upstream). Single-page fetch only; a contract with more history
/// than one page under-reports.
pub const DEFAULT_EVENT_LIMIT: u32 = 100;
pub const DEFAULT_EVENT_OFFSET: u32 = 0;
pub const DEFAULT_TX_LIMIT: u32 = 50;

/// Read-only client for the Stacks API event and transaction feeds.
///
/// Fetch failures are a degraded stage, not a fault: every transport,
/// status, or decode error is logged and surfaced as `None`, and the run
/// treats the page as empty. No retries.
pub struct EventFetcher {
    client: Client,
    api_url: String,
    contract_id: String,
}

impl EventFetcher {
    pub fn new(api_url: String, contract_id: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            contract_id,
        }
    }

    /// One page of contract events.
    pub async fn fetch_events(&self, limit: u32, offset: u32) -> Option<EventsPage> {
        let url = format!(
            "{}/extended/v1/contract/{}/events?limit={}&offset={}",
            self.api_url, self.contract_id, limit, offset
        );
        info!("Fetching events from: {}", url);
        self.get_json(&url, "events").await
    }

    /// One page of transactions touching the contract address.
    pub async fn fetch_transactions(&self, limit: u32) -> Option<TransactionsPage> {
        let url = format!(
            "{}/extended/v1/address/{}/transactions?limit={}",
            self.api_url, self.contract_id, limit
        );
        info!("Fetching transactions from: {}", url);
        self.get_json(&url, "transactions").await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, feed: &str) -> Option<T> {
        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                error!("Error fetching {}: {}", feed, e);
                return None;
            }
        };

        if !response.status().is_success() {
            error!("Error fetching {}: HTTP status {}", feed, response.status());
            return None;
        }

        match response.json::<T>().await {
            Ok(page) => Some(page),
            Err(e) => {
                error!("Error decoding {} response: {}", feed, e);
                None
            }
        }
    }
}
