//! Chainhook-style event monitor for the passkey-wallet contract.
//!
//! One run walks a fixed pipeline over the Stacks API: fetch a page of
//! contract events, classify each into a typed event, fold the results
//! into running statistics, fetch a page of transactions for the fee
//! total, and persist a JSON report.

pub mod config;
pub mod events;
pub mod fetcher;
pub mod monitor;
pub mod parser;
pub mod report;
pub mod stats;
