//! Currency conversion core: input validation, pluggable rate providers and
//! a remote conversion history.
//!
//! The UI layer is an external collaborator; it calls
//! [`ConversionWorkflow::convert`] and [`ConversionWorkflow::load_history`]
//! and renders the returned [`WorkflowState`].

pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod log;
pub mod model;
pub mod providers;
pub mod rate_source;
pub mod workflow;

use anyhow::{Context, Result};

pub use engine::ConversionEngine;
pub use error::{ConvertError, FetchError, StoreError, ValidationError};
pub use history::{HistoryStore, RestHistoryStore};
pub use model::{ConversionOutcome, ConversionRecord, ConversionRequest};
pub use rate_source::{RateQuote, RateSource};
pub use workflow::{ConversionWorkflow, WorkflowState};

/// Assembles a ready-to-use workflow from configuration. One HTTP client is
/// built here and handed to the provider and the history store.
pub fn workflow_from_config(
    config: &config::AppConfig,
) -> Result<ConversionWorkflow<Box<dyn RateSource>, RestHistoryStore>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("kurrency/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let source = providers::from_config(&config.provider, client.clone())?;
    let engine = ConversionEngine::new(source);
    let store = RestHistoryStore::new(&config.history.base_url, client);

    Ok(ConversionWorkflow::new(engine, store))
}
