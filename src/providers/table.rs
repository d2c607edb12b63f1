//! Table-mode provider: fetches the full rate table for the base currency
//! and computes the converted amount locally.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::FetchError;
use crate::rate_source::{RateQuote, RateSource};

#[derive(Debug, Deserialize)]
struct TableResponse {
    #[serde(default)]
    date: String,
    rates: HashMap<String, f64>,
}

pub struct TableRateSource {
    base_url: String,
    client: reqwest::Client,
}

impl TableRateSource {
    pub fn new(base_url: &str, client: reqwest::Client) -> Self {
        TableRateSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl RateSource for TableRateSource {
    async fn fetch(&self, from: &str, to: &str, amount: f64) -> Result<RateQuote, FetchError> {
        let url = format!("{}/{}", self.base_url, from);
        debug!("Requesting rate table from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status));
        }

        let body = response.text().await.map_err(FetchError::transport)?;
        let table: TableResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse rate table response");
            FetchError::Decode(e.to_string())
        })?;

        let rate = *table
            .rates
            .get(to)
            .ok_or_else(|| FetchError::CurrencyNotFound(to.to_string()))?;
        if rate <= 0.0 {
            return Err(FetchError::ProviderRejected(format!(
                "non-positive rate {rate} for {to}"
            )));
        }

        Ok(RateQuote {
            rate,
            result: amount * rate,
            date: table.date,
        })
    }
}
