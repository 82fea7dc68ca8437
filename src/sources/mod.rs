//! Market data collaborators.
//!
//! The scan engine only sees the two traits here; the Yahoo client and the
//! static NSE list are the production implementations.

pub mod rate_limit;
pub mod universe;
pub mod yahoo;

pub use rate_limit::RateLimiter;
pub use universe::StaticUniverse;
pub use yahoo::YahooFinanceClient;

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;
use crate::types::{Granularity, Series};

/// Future returned by [`DataProvider::fetch`].
///
/// `Ok(None)` means the provider answered but had no bars for the symbol.
pub type ProviderFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<Series>>> + Send + 'a>>;

/// Source of historical OHLCV series.
pub trait DataProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch roughly `lookback_days` of history at `granularity`.
    fn fetch<'a>(
        &'a self,
        symbol: &'a str,
        lookback_days: u32,
        granularity: Granularity,
    ) -> ProviderFuture<'a>;
}

/// The set of symbols a scan walks, in scan order.
pub trait SymbolUniverse: Send + Sync {
    fn list_symbols(&self) -> Vec<String>;
}
