use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::SymbolError;

const MAX_SYMBOL_LEN: usize = 32;

/// Ticker symbol exactly as the caller supplied it.
///
/// Provider tickers use `^`, `=`, `-` and `.` freely (`^GSPC`, `EURUSD=X`,
/// `BTC-USD`, `BRK.B`), so only blank input, whitespace and control
/// characters are rejected. The text is never trimmed or re-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn parse(input: &str) -> Result<Self, SymbolError> {
        if input.is_empty() {
            return Err(SymbolError::Empty);
        }

        let len = input.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(SymbolError::TooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        for (index, ch) in input.chars().enumerate() {
            if ch.is_whitespace() || ch.is_control() {
                return Err(SymbolError::InvalidChar { ch, index });
            }
        }

        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Symbol {
    type Error = SymbolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = SymbolError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Symbol> for String {
    fn from(value: Symbol) -> Self {
        value.0
    }
}
