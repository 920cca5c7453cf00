use quotesnap_core::{QuoteBatch, QuoteFetcher, QuoteProvider};

pub async fn run(symbols: &[String], provider: &dyn QuoteProvider) -> QuoteBatch {
    QuoteFetcher::new(provider).fetch(symbols).await
}
