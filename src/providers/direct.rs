//! Direct-mode provider: asks the provider's `/convert` endpoint for a
//! computed result, authenticated by an access key query parameter.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

use crate::error::FetchError;
use crate::rate_source::{RateQuote, RateSource};

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    date: String,
    #[serde(default)]
    result: f64,
    info: Option<ConvertInfo>,
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ConvertInfo {
    #[serde(default)]
    rate: f64,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    info: String,
}

pub struct DirectRateSource {
    base_url: String,
    access_key: String,
    client: reqwest::Client,
}

impl DirectRateSource {
    pub fn new(base_url: &str, access_key: &str, client: reqwest::Client) -> Self {
        DirectRateSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key: access_key.to_string(),
            client,
        }
    }
}

#[async_trait]
impl RateSource for DirectRateSource {
    async fn fetch(&self, from: &str, to: &str, amount: f64) -> Result<RateQuote, FetchError> {
        let url = format!("{}/convert", self.base_url);
        debug!("Requesting conversion of {} {} to {} from {}", amount, from, to, url);

        let amount_text = amount.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("from", from),
                ("to", to),
                ("amount", amount_text.as_str()),
                ("access_key", self.access_key.as_str()),
            ])
            .send()
            .await
            .map_err(FetchError::transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status));
        }

        let body = response.text().await.map_err(FetchError::transport)?;
        let payload: ConvertResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = ?e, response = %body, "Failed to parse conversion response");
            FetchError::Decode(e.to_string())
        })?;

        if !payload.success || payload.result <= 0.0 {
            let detail = payload
                .error
                .map(|e| e.info)
                .filter(|info| !info.is_empty())
                .unwrap_or_else(|| "invalid conversion result".to_string());
            return Err(FetchError::ProviderRejected(detail));
        }

        Ok(RateQuote {
            rate: payload.info.map(|info| info.rate).unwrap_or_default(),
            result: payload.result,
            date: payload.date,
        })
    }
}
