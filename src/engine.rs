//! Conversion engine: input validation and provider delegation.

use tracing::debug;

use crate::error::{ConvertError, FetchError, ValidationError};
use crate::model::{ConversionOutcome, ConversionRequest};
use crate::rate_source::RateSource;

pub struct ConversionEngine<S> {
    source: S,
}

impl<S: RateSource> ConversionEngine<S> {
    pub fn new(source: S) -> Self {
        ConversionEngine { source }
    }

    /// Validates the raw inputs, fetches a quote and normalizes it into an
    /// outcome. Validation fails fast; no network call happens for invalid
    /// input.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount_text: &str,
    ) -> Result<ConversionOutcome, ConvertError> {
        let request = validate(from, to, amount_text)?;
        debug!(
            "Converting {} {} to {}",
            request.amount, request.from, request.to
        );

        let quote = self
            .source
            .fetch(&request.from, &request.to, request.amount)
            .await?;

        // A non-positive result is a failure regardless of the provider's
        // own success flag.
        if quote.result <= 0.0 {
            return Err(FetchError::ProviderRejected(format!(
                "non-positive conversion result {}",
                quote.result
            ))
            .into());
        }

        Ok(ConversionOutcome {
            rate: quote.rate,
            amount: request.amount,
            result: quote.result,
            date: quote.date,
        })
    }
}

fn validate(from: &str, to: &str, amount_text: &str) -> Result<ConversionRequest, ValidationError> {
    if from.trim().is_empty() || to.trim().is_empty() || amount_text.trim().is_empty() {
        return Err(ValidationError::MissingField);
    }

    let amount: f64 = amount_text
        .trim()
        .parse()
        .map_err(|_| ValidationError::NotANumber)?;
    if !amount.is_finite() {
        return Err(ValidationError::NotANumber);
    }
    if amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }

    Ok(ConversionRequest {
        from: from.to_string(),
        to: to.to_string(),
        amount,
    })
}
