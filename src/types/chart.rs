use serde::{Deserialize, Serialize};

/// Range/interval pair requested from a bar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FetchWindow {
    /// Lookback range, e.g. "5d", "6mo", "1y".
    pub range: &'static str,
    /// Bar granularity, e.g. "15m", "1d".
    pub interval: &'static str,
}

impl FetchWindow {
    /// Daily bars over a long lookback, used when the primary window is thin.
    pub const FALLBACK: FetchWindow = FetchWindow {
        range: "1y",
        interval: "1d",
    };

    pub const fn new(range: &'static str, interval: &'static str) -> Self {
        Self { range, interval }
    }
}

/// OHLC (Open, High, Low, Close) data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl OhlcPoint {
    /// Widen high/low so they bound open and close.
    pub fn repaired(mut self) -> Self {
        let top = self.open.max(self.close);
        let bottom = self.open.min(self.close);
        if self.high < top {
            self.high = top;
        }
        if self.low > bottom {
            self.low = bottom;
        }
        self
    }
}

/// Ordered, timestamp-unique bars for one instrument at one granularity.
#[derive(Debug, Clone, Serialize)]
pub struct BarSeries {
    pub symbol: String,
    pub window: FetchWindow,
    bars: Vec<OhlcPoint>,
}

impl BarSeries {
    /// Build a series, sorting by time. Duplicate timestamps keep the last bar.
    pub fn new(symbol: impl Into<String>, window: FetchWindow, mut bars: Vec<OhlcPoint>) -> Self {
        bars.sort_by_key(|b| b.time);

        let mut unique: Vec<OhlcPoint> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(prev) if prev.time == bar.time => *prev = bar.repaired(),
                _ => unique.push(bar.repaired()),
            }
        }

        Self {
            symbol: symbol.into(),
            window,
            bars: unique,
        }
    }

    pub fn bars(&self) -> &[OhlcPoint] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
