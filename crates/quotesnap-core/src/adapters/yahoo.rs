use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::Mutex;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::provider::{ProviderId, QuoteProvider};
use crate::{LookupError, QuoteInfo, Symbol};

const REFERER: &str = "https://finance.yahoo.com/";

// ============================================================================
// Configuration
// ============================================================================

/// Endpoints and limits for the Yahoo Finance adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YahooConfig {
    /// Base URL of the quote API, without a trailing slash.
    pub quote_base_url: String,
    /// Page visited to obtain the session cookie.
    pub cookie_url: String,
    /// Crumb endpoints, tried in order.
    pub crumb_urls: Vec<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
    pub crumb_ttl: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            quote_base_url: String::from("https://query1.finance.yahoo.com"),
            cookie_url: String::from("https://fc.yahoo.com"),
            crumb_urls: vec![
                String::from("https://query1.finance.yahoo.com/v1/test/getcrumb"),
                String::from("https://query2.finance.yahoo.com/v1/test/getcrumb"),
            ],
            timeout_ms: 10_000,
            user_agent: format!(
                "Mozilla/5.0 (compatible; quotesnap/{})",
                env!("CARGO_PKG_VERSION")
            ),
            crumb_ttl: Duration::from_secs(3600),
        }
    }
}

impl YahooConfig {
    fn quote_url(&self, symbol: &Symbol, crumb: &str) -> String {
        format!(
            "{}/v7/finance/quote?symbols={}&crumb={}",
            self.quote_base_url,
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(crumb)
        )
    }
}

// ============================================================================
// Crumb authentication
// ============================================================================

#[derive(Debug, Clone)]
struct CachedCrumb {
    value: String,
    fetched_at: Instant,
}

/// Yahoo cookie/crumb session.
///
/// The quote API wants a session cookie from `fc.yahoo.com` (kept in the
/// client's cookie jar) plus a crumb token passed as a query parameter. The
/// lock is held across the refresh so only one handshake runs at a time.
#[derive(Debug, Default)]
pub struct YahooAuthManager {
    crumb: Mutex<Option<CachedCrumb>>,
}

impl YahooAuthManager {
    /// Returns the cached crumb, refreshing it when missing or expired.
    pub async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        config: &YahooConfig,
    ) -> Result<String, LookupError> {
        let mut cached = self.crumb.lock().await;

        if let Some(crumb) = cached.as_ref() {
            if crumb.fetched_at.elapsed() < config.crumb_ttl {
                return Ok(crumb.value.clone());
            }
        }

        let value = Self::refresh(http_client, config).await?;
        *cached = Some(CachedCrumb {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    /// Drops the cached crumb so the next lookup re-authenticates.
    pub async fn invalidate(&self) {
        *self.crumb.lock().await = None;
    }

    async fn refresh(
        http_client: &dyn HttpClient,
        config: &YahooConfig,
    ) -> Result<String, LookupError> {
        tracing::debug!(url = %config.cookie_url, "refreshing yahoo session");

        // fc.yahoo.com answers 404 but still sets the session cookie.
        let cookie_request = HttpRequest::get(config.cookie_url.as_str())
            .with_header("referer", REFERER)
            .with_timeout_ms(config.timeout_ms);
        http_client
            .execute(cookie_request)
            .await
            .map_err(|e| LookupError::Auth(format!("failed to fetch session cookie: {e}")))?;

        for endpoint in &config.crumb_urls {
            let crumb_request = HttpRequest::get(endpoint.as_str())
                .with_header("referer", REFERER)
                .with_timeout_ms(config.timeout_ms);

            match http_client.execute(crumb_request).await {
                Ok(response) if response.is_success() => {
                    if let Some(crumb) = parse_crumb(&response.body)? {
                        tracing::debug!(endpoint = %endpoint, "obtained yahoo crumb");
                        return Ok(crumb);
                    }
                }
                Ok(response) => {
                    tracing::debug!(endpoint = %endpoint, status = response.status, "crumb endpoint rejected request");
                }
                Err(error) => {
                    tracing::debug!(endpoint = %endpoint, %error, "crumb endpoint unreachable");
                }
            }
        }

        Err(LookupError::Auth(String::from(
            "failed to fetch yahoo crumb from all endpoints",
        )))
    }
}

/// Extracts a crumb from a getcrumb body.
///
/// `Ok(None)` means the body is not a crumb (HTML error page, empty, junk) and
/// the next endpoint should be tried.
fn parse_crumb(body: &str) -> Result<Option<String>, LookupError> {
    let body = body.trim();

    if body.to_lowercase().contains("too many requests") {
        return Err(LookupError::Auth(String::from(
            "yahoo rate limited while fetching crumb",
        )));
    }

    if body.is_empty()
        || body.len() >= 100
        || body.contains(char::is_whitespace)
        || body.contains("<html")
        || body.contains("<!DOCTYPE")
    {
        return Ok(None);
    }

    Ok(Some(body.to_owned()))
}

// ============================================================================
// Yahoo provider
// ============================================================================

/// Yahoo Finance quote provider backed by the v7 quote endpoint.
pub struct YahooProvider {
    http_client: Arc<dyn HttpClient>,
    config: YahooConfig,
    auth: YahooAuthManager,
}

impl YahooProvider {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_config(http_client, YahooConfig::default())
    }

    pub fn with_config(http_client: Arc<dyn HttpClient>, config: YahooConfig) -> Self {
        Self {
            http_client,
            config,
            auth: YahooAuthManager::default(),
        }
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<QuoteInfo, LookupError> {
        let crumb = self
            .auth
            .crumb(self.http_client.as_ref(), &self.config)
            .await?;

        let request = HttpRequest::get(self.config.quote_url(symbol, &crumb))
            .with_header("referer", REFERER)
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http_client.execute(request).await?;
        self.check_status(&response).await?;

        parse_quote_response(symbol, &response.body)
    }

    async fn check_status(&self, response: &HttpResponse) -> Result<(), LookupError> {
        match response.status {
            401 | 403 => {
                self.auth.invalidate().await;
                Err(LookupError::Auth(format!(
                    "yahoo rejected crumb with status {}",
                    response.status
                )))
            }
            _ if !response.is_success() => Err(LookupError::Status {
                status: response.status,
            }),
            _ => Ok(()),
        }
    }
}

impl QuoteProvider for YahooProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn lookup<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, LookupError>> + Send + 'a>> {
        Box::pin(self.fetch_quote(symbol))
    }
}

/// Picks the entry for `symbol` out of a v7 quote response.
///
/// Yahoo echoes symbols upper-cased and writes share-class dots as dashes
/// (`BRK.B` comes back as `BRK-B`). An entry for any other instrument is not
/// an answer for `symbol`, so the lookup fails with `NotFound`.
fn parse_quote_response(symbol: &Symbol, body: &str) -> Result<QuoteInfo, LookupError> {
    let response: YahooQuoteResponse = serde_json::from_str(body)?;
    let data = response.quote_response;

    if let Some(error) = data.error {
        return Err(LookupError::Provider(error.to_string()));
    }

    let mut results = data.result.unwrap_or_default();
    let requested = symbol.as_str();
    let position = results
        .iter()
        .position(|r| r.symbol == requested)
        .or_else(|| {
            results
                .iter()
                .position(|r| r.symbol.eq_ignore_ascii_case(requested))
        })
        .or_else(|| {
            let dashed = requested.replace('.', "-");
            results
                .iter()
                .position(|r| r.symbol.eq_ignore_ascii_case(&dashed))
        });

    match position {
        Some(index) => Ok(results.swap_remove(index).info),
        None => Err(LookupError::NotFound {
            symbol: requested.to_owned(),
        }),
    }
}

// ============================================================================
// Yahoo API Response Structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResult {
    symbol: String,
    #[serde(flatten)]
    info: QuoteInfo,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl std::fmt::Display for YahooApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.description) {
            (Some(code), Some(description)) => write!(f, "{code}: {description}"),
            (Some(code), None) => f.write_str(code),
            (None, Some(description)) => f.write_str(description),
            (None, None) => f.write_str("unknown yahoo error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::HttpError;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    /// Replays scripted responses in order and records every request.
    #[derive(Debug, Default)]
    struct ScriptedHttpClient {
        responses: StdMutex<VecDeque<Result<HttpResponse, HttpError>>>,
        requests: StdMutex<Vec<HttpRequest>>,
    }

    impl ScriptedHttpClient {
        fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
            Self {
                responses: StdMutex::new(responses.into()),
                requests: StdMutex::new(Vec::new()),
            }
        }

        fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|r| r.url.clone())
                .collect()
        }
    }

    impl HttpClient for ScriptedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self
                .responses
                .lock()
                .expect("response queue should not be poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(HttpError::new("no scripted response left")));
            Box::pin(async move { response })
        }
    }

    fn cookie() -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::new(404, "<html>not found</html>"))
    }

    fn crumb(value: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::ok_json(value))
    }

    fn quote(body: &str) -> Result<HttpResponse, HttpError> {
        Ok(HttpResponse::ok_json(body))
    }

    const AAPL_BODY: &str = r#"{"quoteResponse":{"result":[{"symbol":"AAPL","quoteType":"EQUITY","shortName":"Apple Inc.","regularMarketPrice":150.0,"regularMarketChange":1.5,"regularMarketChangePercent":1.0}],"error":null}}"#;

    fn provider(client: Arc<ScriptedHttpClient>) -> YahooProvider {
        YahooProvider::new(client)
    }

    #[tokio::test]
    async fn lookup_performs_handshake_then_quote_call() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("abc/def"),
            quote(AAPL_BODY),
        ]));
        let yahoo = provider(client.clone());
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        let info = yahoo.lookup(&symbol).await.expect("lookup should succeed");

        assert_eq!(info.regular_market_price, Some(150.0));
        assert_eq!(info.short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(
            client.urls(),
            vec![
                String::from("https://fc.yahoo.com"),
                String::from("https://query1.finance.yahoo.com/v1/test/getcrumb"),
                String::from(
                    "https://query1.finance.yahoo.com/v7/finance/quote?symbols=AAPL&crumb=abc%2Fdef"
                ),
            ]
        );
    }

    #[tokio::test]
    async fn crumb_is_reused_across_lookups() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("crumb1"),
            quote(AAPL_BODY),
            quote(AAPL_BODY),
        ]));
        let yahoo = provider(client.clone());
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        yahoo.lookup(&symbol).await.expect("first lookup");
        yahoo.lookup(&symbol).await.expect("second lookup");

        assert_eq!(client.urls().len(), 4);
    }

    #[tokio::test]
    async fn html_crumb_falls_back_to_second_endpoint() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("<!DOCTYPE html><html></html>"),
            crumb("crumb2"),
            quote(AAPL_BODY),
        ]));
        let yahoo = provider(client.clone());
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        yahoo.lookup(&symbol).await.expect("lookup should succeed");

        let urls = client.urls();
        assert_eq!(urls[2], "https://query2.finance.yahoo.com/v1/test/getcrumb");
        assert!(urls[3].ends_with("&crumb=crumb2"));
    }

    #[tokio::test]
    async fn unauthorized_quote_invalidates_crumb_without_retrying() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("stale"),
            Ok(HttpResponse::new(401, r#"{"finance":{"error":{"code":"Unauthorized"}}}"#)),
            cookie(),
            crumb("fresh"),
            quote(AAPL_BODY),
        ]));
        let yahoo = provider(client.clone());
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        let error = yahoo.lookup(&symbol).await.expect_err("401 should fail");
        assert_eq!(error.code(), "lookup.auth");
        assert_eq!(client.urls().len(), 3, "failed symbol is not retried");

        yahoo.lookup(&symbol).await.expect("next lookup re-authenticates");
        assert!(client.urls()[5].ends_with("&crumb=fresh"));
    }

    #[tokio::test]
    async fn server_errors_map_to_status() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("c"),
            Ok(HttpResponse::new(503, "")),
        ]));
        let yahoo = provider(client);
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        let error = yahoo.lookup(&symbol).await.expect_err("503 should fail");
        assert_eq!(error, LookupError::Status { status: 503 });
    }

    #[tokio::test]
    async fn quote_call_timeout_is_reported_as_timeout() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("c"),
            Err(HttpError::timeout("request timeout")),
        ]));
        let yahoo = provider(client);
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        let error = yahoo.lookup(&symbol).await.expect_err("must fail");
        assert_eq!(error, LookupError::Timeout(String::from("request timeout")));
    }

    #[tokio::test]
    async fn rate_limited_crumb_is_an_auth_error() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("Too Many Requests"),
        ]));
        let yahoo = provider(client);
        let symbol = Symbol::parse("AAPL").expect("valid symbol");

        let error = yahoo.lookup(&symbol).await.expect_err("must fail");
        assert!(matches!(error, LookupError::Auth(message) if message.contains("rate limited")));
    }

    #[tokio::test]
    async fn special_characters_are_url_encoded() {
        let client = Arc::new(ScriptedHttpClient::new(vec![
            cookie(),
            crumb("c"),
            quote(r#"{"quoteResponse":{"result":[{"symbol":"^GSPC","quoteType":"INDEX"}]}}"#),
        ]));
        let yahoo = provider(client.clone());
        let symbol = Symbol::parse("^GSPC").expect("valid symbol");

        let info = yahoo.lookup(&symbol).await.expect("lookup should succeed");

        assert_eq!(info.quote_type.as_deref(), Some("INDEX"));
        assert!(client.urls()[2].contains("symbols=%5EGSPC&"));
    }

    #[test]
    fn empty_result_is_not_found() {
        let symbol = Symbol::parse("NOPE").expect("valid symbol");
        let error = parse_quote_response(&symbol, r#"{"quoteResponse":{"result":[],"error":null}}"#)
            .expect_err("must fail");
        assert_eq!(
            error,
            LookupError::NotFound {
                symbol: String::from("NOPE")
            }
        );
    }

    #[test]
    fn api_error_object_is_provider_error() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let error = parse_quote_response(
            &symbol,
            r#"{"quoteResponse":{"result":null,"error":{"code":"Bad Request","description":"Missing value for the \"symbols\" argument"}}}"#,
        )
        .expect_err("must fail");
        assert!(matches!(error, LookupError::Provider(message) if message.starts_with("Bad Request")));
    }

    #[test]
    fn malformed_body_is_decode_error() {
        let symbol = Symbol::parse("AAPL").expect("valid symbol");
        let error = parse_quote_response(&symbol, "<html>oops</html>").expect_err("must fail");
        assert_eq!(error.code(), "lookup.decode");
    }

    #[test]
    fn matching_prefers_requested_symbol() {
        let symbol = Symbol::parse("msft").expect("valid symbol");
        let info = parse_quote_response(
            &symbol,
            r#"{"quoteResponse":{"result":[
                {"symbol":"AAPL","shortName":"Apple"},
                {"symbol":"MSFT","shortName":"Microsoft"}
            ]}}"#,
        )
        .expect("must parse");
        assert_eq!(info.short_name.as_deref(), Some("Microsoft"));
    }

    #[test]
    fn other_instruments_are_not_an_answer() {
        let symbol = Symbol::parse("XYZQ").expect("valid symbol");
        let error = parse_quote_response(
            &symbol,
            r#"{"quoteResponse":{"result":[{"symbol":"SPY","shortName":"SPDR","regularMarketPrice":500.0}]}}"#,
        )
        .expect_err("must fail");
        assert_eq!(
            error,
            LookupError::NotFound {
                symbol: String::from("XYZQ")
            }
        );
    }

    #[test]
    fn comma_joined_input_does_not_borrow_a_listed_entry() {
        let symbol = Symbol::parse("AAPL,MSFT").expect("valid symbol");
        let error = parse_quote_response(
            &symbol,
            r#"{"quoteResponse":{"result":[
                {"symbol":"AAPL","shortName":"Apple Inc.","regularMarketPrice":150.0},
                {"symbol":"MSFT","shortName":"Microsoft","regularMarketPrice":400.0}
            ]}}"#,
        )
        .expect_err("must fail");
        assert_eq!(error.code(), "lookup.not_found");
    }

    #[test]
    fn share_class_dot_matches_dashed_entry() {
        let symbol = Symbol::parse("brk.b").expect("valid symbol");
        let info = parse_quote_response(
            &symbol,
            r#"{"quoteResponse":{"result":[{"symbol":"BRK-B","shortName":"Berkshire Hathaway Inc. New","regularMarketPrice":410.0}]}}"#,
        )
        .expect("must parse");
        assert_eq!(info.regular_market_price, Some(410.0));
    }

    #[test]
    fn integer_prices_decode_as_floats() {
        let symbol = Symbol::parse("BTC-USD").expect("valid symbol");
        let info = parse_quote_response(
            &symbol,
            r#"{"quoteResponse":{"result":[{"symbol":"BTC-USD","regularMarketPrice":65000,"quoteType":"CRYPTOCURRENCY"}]}}"#,
        )
        .expect("must parse");
        assert_eq!(info.regular_market_price, Some(65000.0));
    }
}
