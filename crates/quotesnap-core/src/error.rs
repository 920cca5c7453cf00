use thiserror::Error;

use crate::http_client::HttpError;

/// Symbol validation errors raised before any provider call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("symbol cannot be empty")]
    Empty,
    #[error("symbol length {len} exceeds max {max}")]
    TooLong { len: usize, max: usize },
    #[error("symbol contains invalid character {ch:?} at index {index}")]
    InvalidChar { ch: char, index: usize },
}

/// Failure to resolve a single symbol.
///
/// The fetcher drops the symbol on any variant; the distinction only matters
/// for logging and tests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error(transparent)]
    InvalidSymbol(#[from] SymbolError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("provider returned status {status}")]
    Status { status: u16 },

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("no quote data for '{symbol}'")]
    NotFound { symbol: String },

    #[error("provider error: {0}")]
    Provider(String),
}

impl LookupError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidSymbol(_) => "lookup.invalid_symbol",
            Self::Transport(_) => "lookup.transport",
            Self::Timeout(_) => "lookup.timeout",
            Self::Status { .. } => "lookup.status",
            Self::Auth(_) => "lookup.auth",
            Self::Decode(_) => "lookup.decode",
            Self::NotFound { .. } => "lookup.not_found",
            Self::Provider(_) => "lookup.provider",
        }
    }
}

impl From<HttpError> for LookupError {
    fn from(error: HttpError) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.message().to_owned())
        } else {
            Self::Transport(error.message().to_owned())
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}
