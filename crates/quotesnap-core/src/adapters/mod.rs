//! Provider adapters.

pub mod yahoo;

pub use yahoo::{YahooAuthManager, YahooConfig, YahooProvider};
