use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use crate::core::resolver::RateResolver;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decimal places kept in converted amounts, whatever the currency.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub converted_amount: f64,
    pub exchange_rate: f64,
}

#[derive(Clone)]
pub struct Converter {
    resolver: Arc<RateResolver>,
}

impl Converter {
    pub fn new(resolver: Arc<RateResolver>) -> Self {
        Self { resolver }
    }

    pub async fn convert(
        &self,
        amount: f64,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ConversionResult, FxError> {
        let exchange_rate = self.resolver.resolve(from, to).await?;
        let converted_amount = apply_rate(amount, exchange_rate)?;
        Ok(ConversionResult {
            converted_amount,
            exchange_rate,
        })
    }
}

/// Multiplies in decimal arithmetic and rounds half-up (away from zero) to
/// two places. Values `Decimal` cannot hold exactly, such as very large
/// amounts or very small rates, are rounded in `f64` instead.
pub fn apply_rate(amount: f64, rate: f64) -> Result<f64, FxError> {
    if !amount.is_finite() || !rate.is_finite() {
        return Err(FxError::InvalidInput(format!(
            "Cannot convert {amount} at rate {rate}"
        )));
    }

    let converted = match (as_decimal(amount), as_decimal(rate)) {
        (Some(amount_dec), Some(rate_dec)) => amount_dec
            .checked_mul(rate_dec)
            .map(|v| {
                v.round_dp_with_strategy(
                    AMOUNT_DECIMAL_PLACES,
                    RoundingStrategy::MidpointAwayFromZero,
                )
            })
            .and_then(|v| v.to_f64()),
        _ => None,
    }
    .unwrap_or_else(|| round_f64(amount * rate));

    if converted.is_finite() {
        Ok(converted)
    } else {
        Err(FxError::InvalidInput(format!(
            "Converting {amount} at {rate} overflows"
        )))
    }
}

/// `None` when the decimal form loses more than rounding noise.
fn as_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).filter(|d| {
        d.to_f64()
            .is_some_and(|back| (back - value).abs() <= value.abs() * 1e-12)
    })
}

fn round_f64(value: f64) -> f64 {
    let scale = 10f64.powi(AMOUNT_DECIMAL_PLACES as i32);
    let scaled = value * scale;
    if scaled.is_finite() {
        scaled.round() / scale
    } else {
        value
    }
}
