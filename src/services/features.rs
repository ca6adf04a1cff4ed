//! Feature derivation: cleaned bars to an indicator table with labels.

use tracing::{debug, warn};

use crate::services::indicators::{Atr, Ema, Indicator, Macd, Rsi, Sma, StdDev};
use crate::types::{BarSeries, OhlcPoint};

/// Columns fed to the classifier, in order.
pub const MODEL_FEATURES: [&str; 5] = ["rsi", "macd", "macd_signal", "sma_medium", "std_dev"];

/// Bars kept for stop placement: the last bar plus the three before it.
const RECENT_BARS: usize = 4;

/// Indicator snapshot for one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub time: i64,
    pub close: f64,
    pub rsi: f64,
    pub ema9: f64,
    pub ema21: f64,
    pub ema12: f64,
    pub ema26: f64,
    pub macd: f64,
    pub macd_signal: f64,
    /// ATR, `None` when the history is shorter than its window.
    pub atr: Option<f64>,
    pub sma_long: f64,
    pub sma_medium: f64,
    pub std_dev: f64,
    /// 1 if the next close is higher, 0 otherwise. `None` on the final row.
    pub label: Option<u8>,
}

impl FeatureRow {
    /// Classifier inputs, ordered as [`MODEL_FEATURES`].
    pub fn model_inputs(&self) -> Vec<f64> {
        vec![
            self.rsi,
            self.macd,
            self.macd_signal,
            self.sma_medium,
            self.std_dev,
        ]
    }

    /// ATR, or 1% of the close when ATR is undefined, non-finite or zero.
    pub fn volatility(&self) -> f64 {
        match self.atr {
            Some(atr) if atr.is_finite() && atr > 0.0 => atr,
            _ => self.close * 0.01,
        }
    }
}

/// Training rows plus the row the classifier scores.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    pub training: Vec<FeatureRow>,
    pub latest: Option<FeatureRow>,
    /// Last bars of the cleaned series, oldest first.
    pub recent: Vec<OhlcPoint>,
}

impl FeatureTable {
    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }

    /// Training inputs and labels for the classifier.
    pub fn training_set(&self) -> (Vec<Vec<f64>>, Vec<u8>) {
        self.training
            .iter()
            .filter_map(|row| row.label.map(|label| (row.model_inputs(), label)))
            .unzip()
    }

    /// Bars strictly before the last one, at most three.
    pub fn prior_bars(&self) -> &[OhlcPoint] {
        match self.recent.len() {
            0 => &[],
            n => &self.recent[..n - 1],
        }
    }
}

fn is_valid_price(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Forward-fill gaps in one price column, back-filling leading gaps.
fn fill_column(values: &mut [f64]) -> bool {
    let Some(first_valid) = values.iter().copied().find(|v| is_valid_price(*v)) else {
        return false;
    };

    let mut last = first_valid;
    for value in values.iter_mut() {
        if is_valid_price(*value) {
            last = *value;
        } else {
            *value = last;
        }
    }
    true
}

/// Replace gaps in every price column. `None` when no close is usable.
pub fn clean_bars(bars: &[OhlcPoint]) -> Option<Vec<OhlcPoint>> {
    let mut closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    if !fill_column(&mut closes) {
        return None;
    }

    let mut opens: Vec<f64> = bars.iter().map(|b| b.open).collect();
    let mut highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let mut lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    for column in [&mut opens, &mut highs, &mut lows] {
        if !fill_column(column) {
            column.copy_from_slice(&closes);
        }
    }

    let cleaned = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            OhlcPoint {
                time: bar.time,
                open: opens[i],
                high: highs[i],
                low: lows[i],
                close: closes[i],
                volume: bar.volume,
            }
            .repaired()
        })
        .collect();

    Some(cleaned)
}

/// Derive the feature table for a bar series.
///
/// The table is empty when no close is usable or the series is too short
/// to seed RSI.
pub fn derive(series: &BarSeries) -> FeatureTable {
    let Some(bars) = clean_bars(series.bars()) else {
        warn!("{}: no usable closes in {} bars", series.symbol, series.len());
        return FeatureTable::default();
    };

    let rsi_indicator = Rsi::default();
    if bars.len() < rsi_indicator.min_periods() {
        debug!(
            "{}: {} bars is too short to seed RSI",
            series.symbol,
            bars.len()
        );
        return FeatureTable::default();
    }

    let rsi = rsi_indicator.series(&bars);
    let ema9 = Ema::new(9).series(&bars);
    let ema21 = Ema::new(21).series(&bars);
    let ema12 = Ema::new(12).series(&bars);
    let ema26 = Ema::new(26).series(&bars);
    let macd = Macd::default().lines(&bars);
    let atr = Atr::default().series(&bars);
    let sma_long = Sma::long_horizon(bars.len()).series(&bars);
    let sma_medium = Sma::new(50).series(&bars);
    let std_dev = StdDev::default().series(&bars);

    let last = bars.len() - 1;
    let row_at = |i: usize| -> FeatureRow {
        let close = bars[i].close;
        FeatureRow {
            time: bars[i].time,
            close,
            rsi: rsi[i].unwrap_or(50.0),
            ema9: ema9[i].unwrap_or(close),
            ema21: ema21[i].unwrap_or(close),
            ema12: ema12[i].unwrap_or(close),
            ema26: ema26[i].unwrap_or(close),
            macd: macd.macd[i],
            macd_signal: macd.signal[i],
            atr: atr[i],
            sma_long: sma_long[i].unwrap_or(close),
            sma_medium: sma_medium[i].unwrap_or(close),
            std_dev: std_dev[i].unwrap_or(0.0),
            label: (i < last).then(|| u8::from(bars[i + 1].close > close)),
        }
    };

    let training: Vec<FeatureRow> = (0..last)
        .filter(|&i| rsi[i].is_some() && sma_medium[i].is_some())
        .map(&row_at)
        .collect();

    let latest = row_at(last);
    let recent = bars[bars.len().saturating_sub(RECENT_BARS)..].to_vec();

    debug!(
        "{}: {} bars, {} training rows, latest close {}",
        series.symbol,
        bars.len(),
        training.len(),
        latest.close
    );

    FeatureTable {
        training,
        latest: Some(latest),
        recent,
    }
}
