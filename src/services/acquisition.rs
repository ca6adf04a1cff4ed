//! Bar acquisition with a single fallback to daily bars.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::sources::BarSource;
use crate::types::{BarSeries, FetchWindow, TradingStyle};

/// Fewer bars than this and the primary window counts as empty.
pub const MIN_VIABLE_BARS: usize = 5;

/// Bars fetched for a request and whether the fallback window was used.
#[derive(Debug, Clone)]
pub struct Acquired {
    pub series: BarSeries,
    pub used_fallback: bool,
}

/// Fetches bars for a style, retrying once on the fallback window.
#[derive(Clone)]
pub struct AcquisitionService {
    source: Arc<dyn BarSource>,
    timeout: Duration,
}

impl AcquisitionService {
    pub fn new(source: Arc<dyn BarSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Fetch bars for an already-resolved symbol.
    ///
    /// Returns `None` when neither the primary nor the fallback window yields
    /// anything; callers treat that as "no signal", not as a reason to retry.
    pub async fn fetch(&self, symbol: &str, style: TradingStyle) -> Option<Acquired> {
        let primary = style.primary_window();

        if let Some(series) = self.try_window(symbol, primary).await {
            if series.len() >= MIN_VIABLE_BARS {
                return Some(Acquired {
                    series,
                    used_fallback: false,
                });
            }
            debug!(
                "{}: only {} bars on {}/{}",
                symbol,
                series.len(),
                primary.range,
                primary.interval
            );
        }

        info!(
            "{}: primary window {}/{} insufficient, falling back to {}/{}",
            symbol,
            primary.range,
            primary.interval,
            FetchWindow::FALLBACK.range,
            FetchWindow::FALLBACK.interval
        );

        match self.try_window(symbol, FetchWindow::FALLBACK).await {
            Some(series) if !series.is_empty() => Some(Acquired {
                series,
                used_fallback: true,
            }),
            _ => {
                warn!("{}: no data after fallback", symbol);
                None
            }
        }
    }

    async fn try_window(&self, symbol: &str, window: FetchWindow) -> Option<BarSeries> {
        let fetch = self.source.fetch_bars(symbol, window);
        match tokio::time::timeout(self.timeout, fetch).await {
            Ok(Ok(bars)) => Some(BarSeries::new(symbol, window, bars)),
            Ok(Err(e)) => {
                warn!("{} fetch failed for {}: {}", self.source.name(), symbol, e);
                None
            }
            Err(_) => {
                warn!(
                    "{} fetch timed out for {} after {:?}",
                    self.source.name(),
                    symbol,
                    self.timeout
                );
                None
            }
        }
    }
}
