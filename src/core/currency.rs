//! Currency codes, rate pairs and the rate provider abstraction

use crate::core::error::{FxError, ProviderError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Three letter currency code, always stored in uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses a user supplied code. Surrounding whitespace is ignored and the
    /// code is normalized to uppercase, so `"ils"` and `"ILS"` are the same.
    pub fn parse(code: &str) -> Result<Self, FxError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(FxError::InvalidInput(
                "Currency code is required".to_string(),
            ));
        }
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(FxError::InvalidInput(format!(
                "Invalid currency code: {trimmed}"
            )));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Builds a code from a literal already known to be well formed.
    pub(crate) fn known(code: &str) -> Self {
        debug_assert!(code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()));
        Self(code.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = FxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl AsRef<str> for CurrencyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Directional currency pair. `USD_ILS` and `ILS_USD` are unrelated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RatePair {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl RatePair {
    pub fn new(from: CurrencyCode, to: CurrencyCode) -> Self {
        Self { from, to }
    }

    pub fn is_identity(&self) -> bool {
        self.from == self.to
    }
}

impl Display for RatePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.from, self.to)
    }
}

/// Source of live exchange rates.
///
/// Implementations return the amount of `to` bought by one unit of `from`.
#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let code = CurrencyCode::parse(" ils ").unwrap();
        assert_eq!(code.as_str(), "ILS");
        assert_eq!(code, CurrencyCode::parse("ILS").unwrap());
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        for input in ["", "   ", "US", "USDX", "U$D", "12A"] {
            let result = CurrencyCode::parse(input);
            assert!(
                matches!(result, Err(FxError::InvalidInput(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_rate_pair_is_directional() {
        let usd = CurrencyCode::parse("USD").unwrap();
        let ils = CurrencyCode::parse("ILS").unwrap();
        let forward = RatePair::new(usd.clone(), ils.clone());
        let backward = RatePair::new(ils, usd);

        assert_ne!(forward, backward);
        assert_eq!(forward.to_string(), "USD_ILS");
        assert_eq!(backward.to_string(), "ILS_USD");
        assert!(!forward.is_identity());
    }

    #[test]
    fn test_code_deserializes_through_parse() {
        let code: CurrencyCode = serde_json::from_str(r#""eur""#).unwrap();
        assert_eq!(code.as_str(), "EUR");
        assert!(serde_json::from_str::<CurrencyCode>(r#""euro""#).is_err());
    }
}
