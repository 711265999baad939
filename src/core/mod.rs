//! Core currency logic: codes, rate cache, resolution policy and conversion

pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod fallback;
pub mod ledger;
pub mod log;
pub mod resolver;
pub mod service;

// Re-export main types for cleaner imports
pub use cache::{CachedRate, RateCache};
pub use catalog::{SupportedCurrency, supported_currencies};
pub use converter::{ConversionResult, Converter};
pub use currency::{CurrencyCode, CurrencyRateProvider, RatePair};
pub use error::{FxError, ProviderError};
pub use fallback::FallbackTable;
pub use resolver::RateResolver;
pub use service::{ConversionReceipt, CurrencyService, RateQuote};
