use chrono::Utc;
use tracing::debug;

use crate::events::{ParsedEvent, RawEventRecord};

/// Event type tag the Stacks API uses for contract `print` output.
const SMART_CONTRACT_LOG: &str = "smart_contract_log";

const DEPOSIT_MARKER: &str = "event: \"deposit\"";
const WITHDRAW_MARKER: &str = "event: \"withdraw\"";
const REGISTERED_MARKER: &str = "event: \"wallet_registered\"";

/// Classify a raw feed record into a [`ParsedEvent`].
///
/// Only `smart_contract_log` records carrying a non-empty Clarity `repr`
/// string are examined. Markers are tested in a fixed priority order
/// (deposit, withdraw, wallet_registered); the first match wins. Records
/// that match nothing are dropped with a debug line, never an error.
///
/// A record without `block_time` gets the wall clock at parse time, so its
/// timestamp is run-dependent. Accepted imprecision: the feed only omits
/// `block_time` for unconfirmed entries.
pub fn parse(record: &RawEventRecord) -> Option<ParsedEvent> {
    if record.event_type != SMART_CONTRACT_LOG {
        return None;
    }
    let repr = match record.repr() {
        Some(r) if !r.is_empty() => r,
        _ => return None,
    };

    let timestamp = record.block_time.unwrap_or_else(|| Utc::now().timestamp());
    let tx_id = record.tx_id.clone();

    if repr.contains(DEPOSIT_MARKER) {
        return Some(ParsedEvent::Deposit {
            amount: extract_uint(repr, "amount: u").unwrap_or(0),
            sender: extract_address(repr, "sender: ")
                .unwrap_or_else(|| "unknown".to_string()),
            timestamp,
            tx_id,
        });
    }

    if repr.contains(WITHDRAW_MARKER) {
        return Some(ParsedEvent::Withdraw {
            amount: extract_uint(repr, "amount: u").unwrap_or(0),
            recipient: extract_address(repr, "recipient: ")
                .unwrap_or_else(|| "unknown".to_string()),
            timestamp,
            tx_id,
        });
    }

    if repr.contains(REGISTERED_MARKER) {
        return Some(ParsedEvent::Registration {
            owner: extract_address(repr, "owner: ")
                .unwrap_or_else(|| "unknown".to_string()),
            timestamp,
            tx_id,
        });
    }

    debug!(tx_id = %record.tx_id, "contract log matched no known event marker");
    None
}

/// Extract the unsigned-integer literal following `prefix`, e.g. the
/// `1500000` in `amount: u1500000`. Every occurrence of the prefix is
/// tried; the first one followed by at least one digit wins.
fn extract_uint(repr: &str, prefix: &str) -> Option<u64> {
    for rest in occurrences(repr, prefix) {
        let digits: &str = &rest[..rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len())];
        if digits.is_empty() {
            continue;
        }
        match digits.parse::<u64>() {
            Ok(value) => return Some(value),
            // Overflow on a pathological literal: drop to the default.
            Err(e) => {
                debug!(literal = digits, error = %e, "unparseable uint literal");
                return None;
            }
        }
    }
    None
}

/// Extract a Stacks address literal following `prefix`: an `S` followed by
/// one or more uppercase letters or digits (`S[A-Z0-9]+`).
fn extract_address(repr: &str, prefix: &str) -> Option<String> {
    for rest in occurrences(repr, prefix) {
        if !rest.starts_with('S') {
            continue;
        }
        let tail = &rest[1..];
        let end = tail
            .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit()))
            .unwrap_or(tail.len());
        if end == 0 {
            continue;
        }
        return Some(rest[..=end].to_string());
    }
    None
}

/// Iterate over the suffixes of `haystack` that start right after each
/// occurrence of `needle`.
fn occurrences<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = &'a str> {
    let mut from = 0;
    std::iter::from_fn(move || {
        let pos = haystack[from..].find(needle)? + from;
        from = pos + needle.len();
        Some(&haystack[from..])
    })
}
