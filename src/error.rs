//! Error taxonomy for the conversion workflow.
//!
//! Validation failures are user-correctable and surface verbatim. Fetch and
//! store failures are terminal for the triggering call; nothing here is
//! retried.

use thiserror::Error;

/// Input validation failures, checked in order: presence, numeric parse,
/// positivity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("all fields are required")]
    MissingField,
    #[error("amount is not a number")]
    NotANumber,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}

/// Failures while fetching a rate quote from the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure or non-2xx status. `code` is the HTTP status when
    /// one was received.
    #[error("network failure: {message}")]
    Network { code: Option<u16>, message: String },
    #[error("could not decode provider response: {0}")]
    Decode(String),
    #[error("provider rejected conversion: {0}")]
    ProviderRejected(String),
    #[error("no rate for {0} in provider table")]
    CurrencyNotFound(String),
}

impl FetchError {
    pub(crate) fn transport(err: reqwest::Error) -> Self {
        FetchError::Network {
            code: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }

    pub(crate) fn status(status: reqwest::StatusCode) -> Self {
        FetchError::Network {
            code: Some(status.as_u16()),
            message: format!("provider returned HTTP {status}"),
        }
    }
}

/// Failures while persisting or reading conversion history.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history backend did not return a key")]
    KeyGenerationFailed,
    #[error("history backend failure: {0}")]
    Remote(String),
}

/// Engine-level failure: either the input never made it past validation or
/// the provider call went wrong. Fetch errors carry an "error:" prefix in
/// their display form; validation messages pass through untouched.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("error: {0}")]
    Fetch(#[from] FetchError),
}
