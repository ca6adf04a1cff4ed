//! Bar data sources.

pub mod yahoo;

pub use yahoo::YahooFinanceClient;

use crate::error::AppError;
use crate::types::{FetchWindow, OhlcPoint};
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`BarSource::fetch_bars`].
pub type BarFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<OhlcPoint>, AppError>> + Send + 'a>>;

/// Anything that can return historical bars for a symbol.
pub trait BarSource: Send + Sync {
    /// Source name for logs.
    fn name(&self) -> &str;

    /// Fetch bars for `symbol` over `window`, oldest first.
    fn fetch_bars<'a>(&'a self, symbol: &'a str, window: FetchWindow) -> BarFuture<'a>;
}
