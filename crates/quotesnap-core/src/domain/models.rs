use serde::{Deserialize, Serialize};

/// Coarse instrument category reported in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    #[default]
    Stock,
    Index,
    Futures,
    Forex,
    Crypto,
}

impl AssetClass {
    /// Classifies a provider quote-type string.
    ///
    /// Case-insensitive substring match, checked in order: index, futures
    /// (`future`/`commodity`), forex (`currency`/`forex`), crypto. Anything
    /// else, including an empty string, is a stock.
    pub fn from_quote_type(quote_type: &str) -> Self {
        let lowered = quote_type.to_lowercase();
        if lowered.contains("index") {
            Self::Index
        } else if lowered.contains("future") || lowered.contains("commodity") {
            Self::Futures
        } else if lowered.contains("currency") || lowered.contains("forex") {
            Self::Forex
        } else if lowered.contains("crypto") {
            Self::Crypto
        } else {
            Self::Stock
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Index => "index",
            Self::Futures => "futures",
            Self::Forex => "forex",
            Self::Crypto => "crypto",
        }
    }
}

/// Normalized quote snapshot, one per resolved symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub price: f64,
    pub change: f64,
    pub change_pct: f64,
    /// Capture time in milliseconds since the Unix epoch.
    pub time: i64,
}

/// Quotes for every symbol that resolved, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBatch {
    pub quotes: Vec<Quote>,
}

impl QuoteBatch {
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }
}

/// Raw provider fields for one symbol. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInfo {
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub regular_market_previous_close: Option<f64>,
    #[serde(default)]
    pub regular_market_change: Option<f64>,
    #[serde(default)]
    pub regular_market_change_percent: Option<f64>,
    #[serde(default)]
    pub quote_type: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
}

impl QuoteInfo {
    /// First usable of current, regular-market and previous-close price, else 0.
    ///
    /// A zero price counts as missing, so a genuine zero falls through to the
    /// next field. The quote endpoint reports the previous close as
    /// `regularMarketPreviousClose`; either spelling is accepted.
    pub fn price(&self) -> f64 {
        [
            self.current_price,
            self.regular_market_price,
            self.previous_close,
            self.regular_market_previous_close,
        ]
        .into_iter()
        .find_map(usable)
        .unwrap_or(0.0)
    }

    pub fn change(&self) -> f64 {
        usable(self.regular_market_change).unwrap_or(0.0)
    }

    pub fn change_pct(&self) -> f64 {
        usable(self.regular_market_change_percent).unwrap_or(0.0)
    }

    pub fn asset_class(&self) -> AssetClass {
        AssetClass::from_quote_type(self.quote_type.as_deref().unwrap_or_default())
    }

    /// Short display name, or `fallback` when the provider has none.
    ///
    /// A present but blank `shortName` (empty or whitespace) also yields
    /// `fallback`, so the output never carries an empty name.
    pub fn display_name(&self, fallback: &str) -> String {
        match self.short_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_owned(),
            _ => fallback.to_owned(),
        }
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}
