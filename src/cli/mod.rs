pub mod convert;
pub mod currencies;
pub mod entry;
pub mod rates;
pub mod setup;
pub mod ui;
