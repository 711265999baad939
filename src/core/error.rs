//! Error types for rate resolution and conversion

use crate::core::currency::{CurrencyCode, RatePair};
use std::time::Duration;
use thiserror::Error;

/// Errors that cross the currency component boundary.
#[derive(Debug, Error)]
pub enum FxError {
    /// No live rate could be fetched and no fallback rate exists for the pair.
    #[error("Unable to get exchange rate for {from} to {to}")]
    RateUnavailable { from: CurrencyCode, to: CurrencyCode },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FxError {
    pub fn rate_unavailable(pair: RatePair) -> Self {
        FxError::RateUnavailable {
            from: pair.from,
            to: pair.to,
        }
    }

    /// The pair that could not be resolved, if that is what failed.
    pub fn pair(&self) -> Option<RatePair> {
        match self {
            FxError::RateUnavailable { from, to } => Some(RatePair::new(from.clone(), to.clone())),
            FxError::InvalidInput(_) => None,
        }
    }
}

/// Failures talking to a rate provider.
///
/// These never leave the resolver; they are absorbed into a fallback rate or
/// turned into [`FxError::RateUnavailable`].
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP error: {status} for currency pair: {pair}")]
    Status {
        status: reqwest::StatusCode,
        pair: RatePair,
    },

    #[error("Failed to parse JSON response for {pair}: {source}")]
    Parse {
        pair: RatePair,
        #[source]
        source: serde_json::Error,
    },

    #[error("Exchange rate not found for currency pair: {pair}")]
    MissingRate { pair: RatePair },

    #[error("Invalid rate '{value}' for currency pair: {pair}")]
    InvalidRate { pair: RatePair, value: String },

    #[error("Invalid provider URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Rate request for {pair} timed out after {elapsed:?}")]
    Timeout { pair: RatePair, elapsed: Duration },
}
