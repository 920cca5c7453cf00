//! # Domain Models
//!
//! Types that flow through a quote lookup.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Ticker as supplied on the command line |
//! | [`QuoteInfo`] | Raw provider fields for one symbol |
//! | [`Quote`] | Normalized output record |
//! | [`QuoteBatch`] | Ordered quotes for one invocation |
//! | [`AssetClass`] | stock, index, futures, forex or crypto |
//! | [`UtcDateTime`] | Capture timestamp |
//! | [`Clock`] | Timestamp source |

mod models;
mod symbol;
mod timestamp;

pub use models::{AssetClass, Quote, QuoteBatch, QuoteInfo};
pub use symbol::Symbol;
pub use timestamp::{Clock, SystemClock, UtcDateTime};
