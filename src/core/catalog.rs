use serde::Serialize;

/// Display metadata for a currency offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedCurrency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
}

const SUPPORTED: [SupportedCurrency; 2] = [
    SupportedCurrency {
        code: "USD",
        name: "US Dollar",
        symbol: "$",
    },
    SupportedCurrency {
        code: "ILS",
        name: "Israeli Shekel",
        symbol: "₪",
    },
];

/// Currencies users can pick from. Purely descriptive: the resolver accepts
/// codes outside this list.
pub fn supported_currencies() -> &'static [SupportedCurrency] {
    &SUPPORTED
}
