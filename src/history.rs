//! Remote persistence of conversion records.
//!
//! The backend is a keyed collection behind a REST surface: `POST` to the
//! collection appends under a backend-generated key, `GET` returns the whole
//! key-to-record map. Older records stored their timestamp as raw epoch
//! milliseconds; reads normalize both shapes to the canonical string.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::model::{self, ConversionRecord};

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a record under a freshly generated unique key.
    async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError>;

    /// Reads all records, most recent first. Malformed entries are skipped,
    /// not fatal.
    async fn list(&self) -> Result<Vec<ConversionRecord>, StoreError>;
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredTimestamp {
    Formatted(String),
    EpochMillis(i64),
}

/// Wire shape of one stored entry, tolerating the timestamp schema drift.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    timestamp: StoredTimestamp,
    source: String,
    target: String,
    amount: f64,
    result: f64,
}

impl From<StoredRecord> for ConversionRecord {
    fn from(raw: StoredRecord) -> Self {
        let timestamp = match raw.timestamp {
            StoredTimestamp::Formatted(value) => value,
            StoredTimestamp::EpochMillis(epoch_ms) => model::format_timestamp(epoch_ms),
        };
        ConversionRecord {
            timestamp,
            source: raw.source,
            target: raw.target,
            amount: raw.amount,
            result: raw.result,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: Option<String>,
}

pub struct RestHistoryStore {
    base_url: String,
    collection: String,
    client: reqwest::Client,
}

impl RestHistoryStore {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        RestHistoryStore {
            base_url: base_url.trim_end_matches('/').to_string(),
            collection: "conversions".to_string(),
            client,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}.json", self.base_url, self.collection)
    }
}

#[async_trait]
impl HistoryStore for RestHistoryStore {
    async fn save(&self, record: &ConversionRecord) -> Result<(), StoreError> {
        let url = self.collection_url();
        debug!("Saving conversion record to {}", url);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Remote(format!("backend returned HTTP {status}")));
        }

        let push: PushResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;
        match push.name {
            Some(key) if !key.is_empty() => {
                debug!("Stored conversion under key {}", key);
                Ok(())
            }
            _ => Err(StoreError::KeyGenerationFailed),
        }
    }

    async fn list(&self) -> Result<Vec<ConversionRecord>, StoreError> {
        let url = self.collection_url();
        debug!("Loading conversion history from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Remote(format!("backend returned HTTP {status}")));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Remote(e.to_string()))?;

        // An empty collection comes back as JSON null.
        let mut records: Vec<ConversionRecord> = match body {
            Value::Null => Vec::new(),
            Value::Object(entries) => entries
                .into_iter()
                .filter_map(|(key, value)| {
                    match serde_json::from_value::<StoredRecord>(value) {
                        Ok(raw) => Some(raw.into()),
                        Err(e) => {
                            warn!("Skipping malformed history entry {}: {}", key, e);
                            None
                        }
                    }
                })
                .collect(),
            other => {
                return Err(StoreError::Remote(format!(
                    "unexpected history payload: {other}"
                )));
            }
        };

        records.sort_by_key(|record| std::cmp::Reverse(model::parse_timestamp(&record.timestamp)));
        Ok(records)
    }
}
