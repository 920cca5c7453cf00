//! # Quotesnap Core
//!
//! One-shot quote lookups for a list of ticker symbols.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance) |
//! | [`domain`] | Symbol, quote and timestamp types |
//! | [`error`] | Symbol and lookup errors |
//! | [`fetcher`] | Sequential batch lookup and normalization |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`provider`] | Provider trait |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quotesnap_core::{QuoteFetcher, ReqwestHttpClient, YahooConfig, YahooProvider};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), quotesnap_core::HttpError> {
//!     let config = YahooConfig::default();
//!     let client = Arc::new(ReqwestHttpClient::new(&config.user_agent)?);
//!     let provider = YahooProvider::with_config(client, config);
//!
//!     let batch = QuoteFetcher::new(&provider).fetch(&["AAPL", "^GSPC"]).await;
//!     for quote in &batch.quotes {
//!         println!("{} {:.2}", quote.symbol, quote.price);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI arguments  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  QuoteFetcher   │────▶│ Clock            │
//! └────────┬────────┘     └──────────────────┘
//!          │ one symbol at a time
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ QuoteProvider   │────▶│ HTTP Client      │
//! │ (YahooProvider) │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │ QuoteInfo
//!          ▼
//! ┌─────────────────┐
//! │ Quote / Batch   │
//! └─────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Every per-symbol failure is a [`LookupError`]. The fetcher drops failed
//! symbols from the batch; [`QuoteFetcher::lookup`] exposes the error for
//! callers that want it.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod provider;

pub use adapters::{YahooAuthManager, YahooConfig, YahooProvider};

pub use domain::{AssetClass, Clock, Quote, QuoteBatch, QuoteInfo, Symbol, SystemClock, UtcDateTime};

pub use error::{LookupError, SymbolError};

pub use fetcher::{normalize_quote, QuoteFetcher};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use provider::{ProviderId, QuoteProvider};
