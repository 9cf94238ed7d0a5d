use serde::{Deserialize, Serialize};

/// Raw event record from the Stacks API contract event feed.
///
/// Only the fields the monitor inspects are decoded; everything else in the
/// feed payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEventRecord {
    pub event_type: String,
    #[serde(default)]
    pub contract_log: Option<ContractLog>,
    #[serde(default)]
    pub block_time: Option<i64>,
    pub tx_id: String,
}

impl RawEventRecord {
    /// The textual Clarity representation carried by a contract log, if any.
    pub fn repr(&self) -> Option<&str> {
        self.contract_log
            .as_ref()
            .and_then(|log| log.value.as_ref())
            .and_then(|value| value.repr.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractLog {
    #[serde(default)]
    pub value: Option<ClarityValue>,
}

/// A Clarity value as the API returns it: a free-form textual
/// representation alongside whatever structured fields the API adds.
#[derive(Debug, Clone, Deserialize)]
pub struct ClarityValue {
    #[serde(default)]
    pub repr: Option<String>,
}

/// Transaction record from the address transaction feed. Only the fee is
/// of interest; the API has shipped `fee_rate` both as a number and as a
/// numeric string, so it stays loose here and is interpreted in `stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub fee_rate: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventsPage {
    pub results: Vec<RawEventRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionsPage {
    pub results: Vec<Transaction>,
}

/// A contract event the parser recognized, tagged for the report.
///
/// Amounts are in micro-STX. `timestamp` is epoch seconds from the record's
/// `block_time`, or the wall clock at parse time when the feed omits it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ParsedEvent {
    Deposit {
        amount: u64,
        sender: String,
        timestamp: i64,
        #[serde(rename = "txId")]
        tx_id: String,
    },
    Withdraw {
        amount: u64,
        recipient: String,
        timestamp: i64,
        #[serde(rename = "txId")]
        tx_id: String,
    },
    Registration {
        owner: String,
        timestamp: i64,
        #[serde(rename = "txId")]
        tx_id: String,
    },
}

impl ParsedEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ParsedEvent::Deposit { .. } => "deposit",
            ParsedEvent::Withdraw { .. } => "withdraw",
            ParsedEvent::Registration { .. } => "registration",
        }
    }

    pub fn tx_id(&self) -> &str {
        match self {
            ParsedEvent::Deposit { tx_id, .. }
            | ParsedEvent::Withdraw { tx_id, .. }
            | ParsedEvent::Registration { tx_id, .. } => tx_id,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            ParsedEvent::Deposit { timestamp, .. }
            | ParsedEvent::Withdraw { timestamp, .. }
            | ParsedEvent::Registration { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_event_feed_page() {
        let body = r#"{
            "results": [
                {
                    "event_index": 0,
                    "event_type": "smart_contract_log",
                    "tx_id": "0xabc123",
                    "block_time": 1700000000,
                    "contract_log": {
                        "contract_id": "SP1.passkey-wallet",
                        "topic": "print",
                        "value": { "hex": "0x0c", "repr": "{event: \"deposit\"}" }
                    }
                },
                {
                    "event_type": "stx_asset",
                    "tx_id": "0xdef456"
                }
            ]
        }"#;

        let page: EventsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].event_type, "smart_contract_log");
        assert_eq!(page.results[0].block_time, Some(1700000000));
        assert_eq!(page.results[0].repr(), Some("{event: \"deposit\"}"));
        assert!(page.results[1].repr().is_none());
        assert!(page.results[1].block_time.is_none());
    }

    #[test]
    fn decodes_transaction_page_with_loose_fees() {
        let body = r#"{
            "results": [
                { "tx_id": "0x1", "fee_rate": "1000" },
                { "tx_id": "0x2", "fee_rate": 2000 },
                { "tx_id": "0x3", "fee_rate": null },
                { "tx_id": "0x4" }
            ]
        }"#;

        let page: TransactionsPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.results.len(), 4);
        assert!(page.results[0].fee_rate.is_some());
        assert!(page.results[3].fee_rate.is_none());
    }

    #[test]
    fn parsed_event_serializes_with_type_tag() {
        let event = ParsedEvent::Deposit {
            amount: 1_500_000,
            sender: "SP1234ABCD".to_string(),
            timestamp: 1700000000,
            tx_id: "0xabc".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "deposit");
        assert_eq!(json["amount"], 1_500_000);
        assert_eq!(json["sender"], "SP1234ABCD");
        assert_eq!(json["txId"], "0xabc");
    }
}
