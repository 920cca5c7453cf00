mod quote;

use std::sync::Arc;

use quotesnap_core::{QuoteBatch, ReqwestHttpClient, YahooConfig, YahooProvider};

/// Resolves the requested symbols against Yahoo Finance.
///
/// The HTTP client and provider live only for this call. With no symbols,
/// nothing is built and no request is made. If the client cannot be built,
/// every symbol counts as failed.
pub async fn run(symbols: &[String], config: YahooConfig) -> QuoteBatch {
    if symbols.is_empty() {
        return QuoteBatch::default();
    }

    let http_client = match ReqwestHttpClient::new(&config.user_agent) {
        Ok(client) => Arc::new(client),
        Err(error) => {
            tracing::error!(%error, requested = symbols.len(), "cannot build http client");
            return QuoteBatch::default();
        }
    };
    let provider = YahooProvider::with_config(http_client, config);

    quote::run(symbols, &provider).await
}
