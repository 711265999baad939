use crate::core::currency::{CurrencyCode, CurrencyRateProvider, RatePair};
use crate::core::error::ProviderError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

const USER_AGENT: &str = concat!("fxledger/", env!("CARGO_PKG_VERSION"));

/// Client for the CurrencyFreaks "latest rates" endpoint.
pub struct CurrencyFreaksProvider {
    base_url: String,
    api_key: Option<String>,
}

impl CurrencyFreaksProvider {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        CurrencyFreaksProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn latest_url(&self, pair: &RatePair) -> Result<reqwest::Url, ProviderError> {
        let mut params = vec![("symbols", pair.to.as_str()), ("base", pair.from.as_str())];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.as_str()));
        }
        let endpoint = format!("{}/latest", self.base_url);
        reqwest::Url::parse_with_params(&endpoint, &params).map_err(|e| {
            ProviderError::InvalidUrl {
                url: endpoint.clone(),
                reason: e.to_string(),
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    rates: Option<HashMap<String, RateValue>>,
}

/// Rates arrive as numeric strings; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RateValue {
    Text(String),
    Number(f64),
}

impl RateValue {
    fn parse(&self) -> Option<f64> {
        let value = match self {
            RateValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RateValue::Number(n) => *n,
        };
        (value.is_finite() && value > 0.0).then_some(value)
    }

    fn raw(&self) -> String {
        match self {
            RateValue::Text(s) => s.clone(),
            RateValue::Number(n) => n.to_string(),
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for CurrencyFreaksProvider {
    #[instrument(name = "CurrencyFreaksFetch", skip(self), fields(from = %from, to = %to))]
    async fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<f64, ProviderError> {
        let pair = RatePair::new(from.clone(), to.clone());
        let url = self.latest_url(&pair)?;
        debug!("Requesting currency rate for {}", pair);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status(),
                pair,
            });
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|source| ProviderError::Parse {
                pair: pair.clone(),
                source,
            })?;

        let value = data
            .rates
            .as_ref()
            .and_then(|rates| rates.get(to.as_str()))
            .ok_or_else(|| ProviderError::MissingRate { pair: pair.clone() })?;

        value.parse().ok_or_else(|| ProviderError::InvalidRate {
            value: value.raw(),
            pair,
        })
    }
}
