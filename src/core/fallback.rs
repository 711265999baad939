//! Static approximate rates used while the live provider is unavailable

use crate::core::currency::{CurrencyCode, RatePair};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct FallbackTable {
    rates: HashMap<RatePair, f64>,
}

impl FallbackTable {
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
        }
    }

    /// Builds a table from explicit rates. Entries that are not positive
    /// finite numbers are dropped.
    pub fn from_rates(rates: impl IntoIterator<Item = (RatePair, f64)>) -> Self {
        let rates = rates
            .into_iter()
            .filter(|(pair, rate)| {
                let usable = rate.is_finite() && *rate > 0.0;
                if !usable {
                    warn!(%pair, rate, "Ignoring unusable fallback rate");
                }
                usable
            })
            .collect();
        Self { rates }
    }

    /// Exact pair lookup, no inversion.
    pub fn get(&self, pair: &RatePair) -> Option<f64> {
        self.rates.get(pair).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for FallbackTable {
    fn default() -> Self {
        let usd = CurrencyCode::known("USD");
        let ils = CurrencyCode::known("ILS");
        Self::from_rates([
            (RatePair::new(usd.clone(), ils.clone()), 3.7),
            (RatePair::new(ils, usd), 0.27),
        ])
    }
}
