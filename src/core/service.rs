//! Entry points used by the ledger and the command line

use crate::core::catalog::{SupportedCurrency, supported_currencies};
use crate::core::converter::{ConversionResult, Converter};
use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use crate::core::resolver::RateResolver;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Answer to a rate query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateQuote {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Answer to a conversion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReceipt {
    pub original_amount: f64,
    pub converted_amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub exchange_rate: f64,
    pub timestamp: DateTime<Utc>,
}

pub struct CurrencyService {
    resolver: Arc<RateResolver>,
    converter: Converter,
}

impl CurrencyService {
    pub fn new(resolver: RateResolver) -> Self {
        let resolver = Arc::new(resolver);
        Self {
            converter: Converter::new(Arc::clone(&resolver)),
            resolver,
        }
    }

    pub fn supported_currencies(&self) -> &'static [SupportedCurrency] {
        supported_currencies()
    }

    pub async fn get_exchange_rate(&self, from: &str, to: &str) -> Result<f64, FxError> {
        let from = CurrencyCode::parse(from)?;
        let to = CurrencyCode::parse(to)?;
        self.resolver.resolve(&from, &to).await
    }

    pub async fn convert_currency(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<ConversionResult, FxError> {
        validate_amount(amount)?;
        let from = CurrencyCode::parse(from)?;
        let to = CurrencyCode::parse(to)?;
        self.converter.convert(amount, &from, &to).await
    }

    pub async fn quote(&self, from: &str, to: &str) -> Result<RateQuote, FxError> {
        let from = CurrencyCode::parse(from)?;
        let to = CurrencyCode::parse(to)?;
        let rate = self.resolver.resolve(&from, &to).await?;
        Ok(RateQuote {
            from,
            to,
            rate,
            timestamp: Utc::now(),
        })
    }

    pub async fn receipt(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<ConversionReceipt, FxError> {
        validate_amount(amount)?;
        let from = CurrencyCode::parse(from)?;
        let to = CurrencyCode::parse(to)?;
        let result = self.converter.convert(amount, &from, &to).await?;
        Ok(ConversionReceipt {
            original_amount: amount,
            converted_amount: result.converted_amount,
            from,
            to,
            exchange_rate: result.exchange_rate,
            timestamp: Utc::now(),
        })
    }

    pub async fn clear_cache(&self) {
        self.resolver.clear_cache().await;
    }
}

fn validate_amount(amount: f64) -> Result<(), FxError> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(FxError::InvalidInput(format!(
            "Amount must be a number, got {amount}"
        )))
    }
}
