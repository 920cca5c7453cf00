use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use quotesnap_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, LookupError, ProviderId, QuoteProvider,
    Symbol, YahooProvider,
};

/// Serves a valid handshake and one canned quote body for every symbol.
struct CannedHttpClient {
    quote_body: &'static str,
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = if request.url.contains("fc.yahoo.com") {
            HttpResponse::new(404, "")
        } else if request.url.contains("getcrumb") {
            HttpResponse::ok_json("contract-crumb")
        } else {
            HttpResponse::ok_json(self.quote_body)
        };
        Box::pin(async move { Ok(response) })
    }
}

#[derive(Clone)]
struct ProviderCase {
    id: ProviderId,
    source: Arc<dyn QuoteProvider>,
}

fn provider_cases(quote_body: &'static str) -> Vec<ProviderCase> {
    vec![ProviderCase {
        id: ProviderId::Yahoo,
        source: Arc::new(YahooProvider::new(Arc::new(CannedHttpClient { quote_body }))),
    }]
}

#[tokio::test]
async fn lookup_returns_field_mapping_for_all_providers() {
    let symbol = Symbol::parse("AAPL").expect("valid symbol");
    let body = r#"{"quoteResponse":{"result":[{"symbol":"AAPL","regularMarketPrice":150.0,"quoteType":"EQUITY","shortName":"Apple Inc."}]}}"#;

    for case in provider_cases(body) {
        assert_eq!(case.source.id(), case.id);
        let info = case.source.lookup(&symbol).await.unwrap_or_else(|error| {
            panic!("provider '{}' lookup failed: {error}", case.id.as_str())
        });
        assert_eq!(info.price(), 150.0, "provider '{}': price", case.id);
        assert_eq!(
            info.display_name(symbol.as_str()),
            "Apple Inc.",
            "provider '{}': name",
            case.id
        );
    }
}

#[tokio::test]
async fn lookup_reports_missing_symbols_as_errors_for_all_providers() {
    let symbol = Symbol::parse("ZZZZ").expect("valid symbol");
    let body = r#"{"quoteResponse":{"result":[],"error":null}}"#;

    for case in provider_cases(body) {
        let error = case.source.lookup(&symbol).await.expect_err("must fail");
        assert!(
            matches!(error, LookupError::NotFound { .. }),
            "provider '{}': unexpected error {error}",
            case.id
        );
    }
}

#[tokio::test]
async fn lookup_reports_garbage_bodies_as_decode_errors_for_all_providers() {
    let symbol = Symbol::parse("AAPL").expect("valid symbol");

    for case in provider_cases("Service Unavailable") {
        let error = case.source.lookup(&symbol).await.expect_err("must fail");
        assert_eq!(error.code(), "lookup.decode", "provider '{}'", case.id);
    }
}
