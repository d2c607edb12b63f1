//! Rate provider implementations. A deployment runs exactly one of the two
//! variants, selected at configuration time.

pub mod direct;
pub mod table;

use anyhow::{Context, Result};

use crate::config::{ProviderConfig, ProviderMode};
use crate::rate_source::RateSource;
use direct::DirectRateSource;
use table::TableRateSource;

/// Builds the configured provider variant with the injected HTTP client.
pub fn from_config(
    config: &ProviderConfig,
    client: reqwest::Client,
) -> Result<Box<dyn RateSource>> {
    match config.mode {
        ProviderMode::Table => Ok(Box::new(TableRateSource::new(&config.base_url, client))),
        ProviderMode::Direct => {
            let access_key = config
                .access_key
                .as_deref()
                .context("direct provider mode requires an access_key")?;
            Ok(Box::new(DirectRateSource::new(
                &config.base_url,
                access_key,
                client,
            )))
        }
    }
}
