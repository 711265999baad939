use crate::core::currency::{CurrencyCode, RatePair};
use crate::core::fallback::FallbackTable;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "CURRENCY_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CurrencyFreaksConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for CurrencyFreaksConfig {
    fn default() -> Self {
        CurrencyFreaksConfig {
            base_url: "https://api.currencyfreaks.com".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub currencyfreaks: CurrencyFreaksConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FallbackRate {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_base_currency")]
    pub base_currency: CurrencyCode,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Replaces the built-in USD/ILS table when present.
    #[serde(default)]
    pub fallback_rates: Option<Vec<FallbackRate>>,
}

fn default_base_currency() -> CurrencyCode {
    CurrencyCode::known("USD")
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

fn default_request_timeout_secs() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            providers: ProvidersConfig::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            fallback_rates: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or the defaults when no
    /// file has been set up yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default().with_api_key_override(std::env::var(API_KEY_ENV).ok()));
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxledger", "fxledger")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// The request timeout must be non-zero and fallback rates positive.
    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than zero");
        }
        for fallback in self.fallback_rates.iter().flatten() {
            if !fallback.rate.is_finite() || fallback.rate <= 0.0 {
                bail!(
                    "Fallback rate for {}_{} must be a positive number, got {}",
                    fallback.from,
                    fallback.to,
                    fallback.rate
                );
            }
        }
        Ok(())
    }

    /// A non-empty key from the environment wins over the configured one.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.providers.currencyfreaks.api_key = Some(key);
        }
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn fallback_table(&self) -> FallbackTable {
        match &self.fallback_rates {
            Some(rates) => FallbackTable::from_rates(rates.iter().map(|r| {
                (RatePair::new(r.from.clone(), r.to.clone()), r.rate)
            })),
            None => FallbackTable::default(),
        }
    }
}
