//! Quote provider contract.
//!
//! A provider resolves one [`Symbol`] into the raw [`QuoteInfo`] field mapping.
//! Normalization into a [`Quote`](crate::Quote) happens in the fetcher, so
//! adapters only deal with their own wire format.
//!
//! # Example
//!
//! ```rust,ignore
//! use quotesnap_core::{QuoteProvider, Symbol, LookupError};
//!
//! async fn show(provider: &dyn QuoteProvider) -> Result<(), LookupError> {
//!     let symbol = Symbol::parse("AAPL")?;
//!     let info = provider.lookup(&symbol).await?;
//!     println!("{symbol}: {}", info.price());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{LookupError, QuoteInfo, Symbol};

/// Provider identifier used in log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Yahoo,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote quote lookup, addressed by symbol.
///
/// Implementations must be `Send + Sync`; the fetcher only ever borrows them
/// for the duration of one batch.
pub trait QuoteProvider: Send + Sync {
    /// Returns the provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the field mapping for a single symbol.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] when the provider is unreachable, rejects the
    /// request, has no data for the symbol or answers with a body that cannot
    /// be decoded.
    fn lookup<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<QuoteInfo, LookupError>> + Send + 'a>>;
}
