//! Yahoo Finance chart API client.
//!
//! Serves intraday and daily OHLC bars for stocks, ETFs, FX pairs and crypto
//! through the unofficial v8 chart endpoint.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{BarFuture, BarSource};
use crate::error::{AppError, Result};
use crate::types::{FetchWindow, OhlcPoint};

/// Yahoo Finance chart response.
#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<u64>>>,
}

/// Normalize symbol for the Yahoo Finance API.
/// US share classes use hyphens (BRK-B not BRK.B); exchange suffixes such as
/// `.CN` or `.L` are left alone.
fn normalize_yahoo_symbol(symbol: &str) -> String {
    let upper = symbol.trim().to_uppercase();
    match upper.rsplit_once('.') {
        Some((base, class)) if class.len() == 1 && !base.is_empty() => {
            format!("{}-{}", base, class)
        }
        _ => upper,
    }
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    base_url: String,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch historical bars for a symbol.
    ///
    /// Gaps reported by Yahoo as `null` are kept as NaN prices so the bar
    /// count and timestamps stay intact; feature derivation fills them.
    pub async fn get_historical_data(
        &self,
        symbol: &str,
        window: FetchWindow,
    ) -> Result<Vec<OhlcPoint>> {
        let yahoo_symbol = normalize_yahoo_symbol(symbol);
        let url = format!(
            "{}/v8/finance/chart/{}?range={}&interval={}&includePrePost=false",
            self.base_url, yahoo_symbol, window.range, window.interval
        );

        debug!("Fetching Yahoo Finance data: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "Yahoo returned {} for {}",
                response.status(),
                yahoo_symbol
            )));
        }

        let data: YahooChartResponse = response.json().await?;
        parse_chart(data)
    }
}

/// Missing prices become NaN rather than shifting the columns.
fn value_at(column: &[Option<f64>], i: usize) -> f64 {
    column.get(i).copied().flatten().unwrap_or(f64::NAN)
}

fn parse_chart(data: YahooChartResponse) -> Result<Vec<OhlcPoint>> {
    if let Some(error) = data.chart.error {
        return Err(AppError::ExternalApi(format!(
            "Yahoo API error: {} - {}",
            error.code, error.description
        )));
    }

    let Some(result) = data.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(Vec::new());
    };

    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let points = timestamps
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| OhlcPoint {
            time: timestamp * 1000,
            open: value_at(&opens, i),
            high: value_at(&highs, i),
            low: value_at(&lows, i),
            close: value_at(&closes, i),
            volume: volumes.get(i).copied().flatten().map(|v| v as f64),
        })
        .collect();

    Ok(points)
}

impl BarSource for YahooFinanceClient {
    fn name(&self) -> &str {
        "yahoo"
    }

    fn fetch_bars<'a>(&'a self, symbol: &'a str, window: FetchWindow) -> BarFuture<'a> {
        Box::pin(self.get_historical_data(symbol, window))
    }
}
