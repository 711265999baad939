pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::ledger::{self, EntryDraft};
use crate::core::{CurrencyService, RateCache, RateResolver};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Currencies,
    Rate { from: String, to: Vec<String> },
    Convert { amount: f64, from: String, to: String },
    Entry(EntryDraft),
}

/// Wires the live provider, a fresh cache and the fallback table from config.
pub fn build_service(config: &config::AppConfig) -> CurrencyService {
    let provider = providers::CurrencyFreaksProvider::new(
        &config.providers.currencyfreaks.base_url,
        config.providers.currencyfreaks.api_key.clone(),
    );
    let resolver = RateResolver::new(
        Arc::new(provider),
        RateCache::new(config.cache_ttl()),
        config.fallback_table(),
    )
    .with_timeout(config.request_timeout());
    CurrencyService::new(resolver)
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    info!("fxledger starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!(
        base_currency = %config.base_currency,
        provider = %config.providers.currencyfreaks.base_url,
        "Loaded config"
    );

    let service = build_service(&config);

    match command {
        AppCommand::Currencies => {
            let output = cli::currencies::render(service.supported_currencies(), format)?;
            println!("{output}");
        }
        AppCommand::Rate { from, to } => {
            cli::rates::run(&service, &from, &to, format).await?;
        }
        AppCommand::Convert { amount, from, to } => {
            let receipt = service.receipt(amount, &from, &to).await?;
            println!("{}", cli::convert::render(&receipt, format)?);
        }
        AppCommand::Entry(draft) => {
            let entry = ledger::normalize_entry(&service, draft, &config.base_currency).await?;
            println!("{}", cli::entry::render(&entry, format)?);
        }
    }
    Ok(())
}
