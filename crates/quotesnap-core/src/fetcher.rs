//! Batch quote lookup.
//!
//! Each symbol is resolved on its own into a `Result<Quote, LookupError>`;
//! the batch keeps the successes in input order and drops everything else.

use std::sync::Arc;

use crate::provider::QuoteProvider;
use crate::{Clock, LookupError, Quote, QuoteBatch, QuoteInfo, Symbol, SystemClock, UtcDateTime};

/// Resolves symbols against a borrowed provider handle.
pub struct QuoteFetcher<'a> {
    provider: &'a dyn QuoteProvider,
    clock: Arc<dyn Clock>,
}

impl<'a> QuoteFetcher<'a> {
    pub fn new(provider: &'a dyn QuoteProvider) -> Self {
        Self::with_clock(provider, Arc::new(SystemClock))
    }

    pub fn with_clock(provider: &'a dyn QuoteProvider, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    /// Looks up one symbol. The capture time is taken once the provider answers.
    pub async fn lookup(&self, symbol: &Symbol) -> Result<Quote, LookupError> {
        let info = self.provider.lookup(symbol).await?;
        Ok(normalize_quote(symbol, info, self.clock.now()))
    }

    /// Looks up every symbol sequentially, in input order.
    ///
    /// Symbols that fail validation or lookup are skipped without leaving a
    /// placeholder. This never fails; the worst case is an empty batch.
    pub async fn fetch<S: AsRef<str>>(&self, symbols: &[S]) -> QuoteBatch {
        let mut quotes = Vec::with_capacity(symbols.len());

        for raw in symbols {
            let raw = raw.as_ref();
            let result = match Symbol::parse(raw) {
                Ok(symbol) => self.lookup(&symbol).await,
                Err(error) => Err(error.into()),
            };

            match result {
                Ok(quote) => quotes.push(quote),
                Err(error) => {
                    tracing::debug!(
                        provider = %self.provider.id(),
                        symbol = raw,
                        code = error.code(),
                        %error,
                        "skipping symbol"
                    );
                }
            }
        }

        tracing::info!(
            provider = %self.provider.id(),
            requested = symbols.len(),
            resolved = quotes.len(),
            "quote batch complete"
        );

        QuoteBatch { quotes }
    }
}

/// Builds the output record from raw provider fields.
pub fn normalize_quote(symbol: &Symbol, info: QuoteInfo, captured_at: UtcDateTime) -> Quote {
    Quote {
        symbol: symbol.as_str().to_owned(),
        name: info.display_name(symbol.as_str()),
        asset_class: info.asset_class(),
        price: info.price(),
        change: info.change(),
        change_pct: info.change_pct(),
        time: captured_at.unix_millis(),
    }
}
