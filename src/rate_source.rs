//! Rate provider abstraction for the conversion engine.

use async_trait::async_trait;

use crate::error::FetchError;

/// One provider quote: the unit rate, the converted amount and the
/// provider's quote date.
#[derive(Debug, Clone, PartialEq)]
pub struct RateQuote {
    pub rate: f64,
    pub result: f64,
    pub date: String,
}

/// A source of conversion quotes. Implementations make exactly one outbound
/// request per call and never retry.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch(&self, from: &str, to: &str, amount: f64) -> Result<RateQuote, FetchError>;
}

#[async_trait]
impl RateSource for Box<dyn RateSource> {
    async fn fetch(&self, from: &str, to: &str, amount: f64) -> Result<RateQuote, FetchError> {
        (**self).fetch(from, to, amount).await
    }
}
