//! Normalization of income and expense entries into the base currency

use crate::core::currency::CurrencyCode;
use crate::core::error::FxError;
use crate::core::service::CurrencyService;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Income => write!(f, "income"),
            EntryKind::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for EntryKind {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(EntryKind::Income),
            "expense" => Ok(EntryKind::Expense),
            _ => Err(FxError::InvalidInput(format!("Invalid entry kind: {s}"))),
        }
    }
}

/// Entry as submitted by a user, in whatever currency they paid or earned.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub kind: EntryKind,
    /// Income source or expense category.
    pub label: String,
    pub icon: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub date: NaiveDate,
}

/// Entry ready for storage: `amount` is in the base currency, the original
/// amount and the rate used are kept alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub kind: EntryKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub amount: f64,
    pub original_amount: f64,
    pub original_currency: CurrencyCode,
    pub base_currency: CurrencyCode,
    pub exchange_rate: f64,
    pub date: NaiveDate,
}

pub const DEFAULT_ENTRY_CURRENCY: &str = "USD";

/// Converts a draft into the base currency.
///
/// A failed conversion aborts the whole entry; the original amount is never
/// stored unconverted.
pub async fn normalize_entry(
    service: &CurrencyService,
    draft: EntryDraft,
    base_currency: &CurrencyCode,
) -> Result<LedgerEntry, FxError> {
    if draft.label.trim().is_empty() || !draft.amount.is_finite() || draft.amount == 0.0 {
        return Err(FxError::InvalidInput(
            "Please fill all the fields".to_string(),
        ));
    }

    let original_currency =
        CurrencyCode::parse(draft.currency.as_deref().unwrap_or(DEFAULT_ENTRY_CURRENCY))?;

    let (amount, exchange_rate) = if &original_currency == base_currency {
        (draft.amount, 1.0)
    } else {
        let conversion = service
            .convert_currency(
                draft.amount,
                original_currency.as_str(),
                base_currency.as_str(),
            )
            .await
            .inspect_err(|e| warn!(kind = %draft.kind, error = %e, "Currency conversion failed"))?;
        (conversion.converted_amount, conversion.exchange_rate)
    };

    debug!(
        kind = %draft.kind,
        %original_currency,
        %base_currency,
        amount,
        "Normalized ledger entry"
    );

    Ok(LedgerEntry {
        kind: draft.kind,
        label: draft.label,
        icon: draft.icon,
        amount,
        original_amount: draft.amount,
        original_currency,
        base_currency: base_currency.clone(),
        exchange_rate,
        date: draft.date,
    })
}
