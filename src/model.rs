//! Data model for conversion requests, outcomes and persisted records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical timestamp layout for persisted records: `DD/MM/YYYY HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A validated conversion request. Built once per user action, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// The normalized result of one successful conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub rate: f64,
    pub amount: f64,
    pub result: f64,
    pub date: String,
}

/// A persisted historical conversion entry. Immutable once written; the
/// store never updates or deletes these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub timestamp: String,
    pub source: String,
    pub target: String,
    pub amount: f64,
    pub result: f64,
}

/// Formats an epoch-millisecond timestamp as the canonical record timestamp,
/// in UTC.
pub fn format_timestamp(epoch_ms: i64) -> String {
    let datetime =
        DateTime::<Utc>::from_timestamp_millis(epoch_ms).unwrap_or(DateTime::UNIX_EPOCH);
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a canonical timestamp back to epoch milliseconds. Unparseable
/// timestamps map to epoch 0 so they sort last in a descending history.
pub fn parse_timestamp(value: &str) -> i64 {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|datetime| datetime.and_utc().timestamp_millis())
        .unwrap_or(0)
}
