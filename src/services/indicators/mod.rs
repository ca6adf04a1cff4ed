//! Technical indicator implementations.
//!
//! Every indicator yields one value per input bar. Values whose lookback
//! window is not yet filled are `None`.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod std_dev;

pub use atr::Atr;
pub use ema::Ema;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;
pub use std_dev::StdDev;

use crate::types::OhlcPoint;

/// Trait for per-bar technical indicators.
pub trait Indicator: Send + Sync {
    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Number of bars needed before the first defined value.
    fn min_periods(&self) -> usize;

    /// Calculate the indicator for every bar.
    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>>;
}

/// Simple moving average over `window` values, `None` until filled.
pub(crate) fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        out.push(if i + 1 >= window {
            Some(sum / window as f64)
        } else {
            None
        });
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::OhlcPoint;

    pub fn candles_from_closes(closes: &[f64]) -> Vec<OhlcPoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcPoint {
                time: 1_000_000 + i as i64 * 60_000,
                open: if i == 0 { close } else { closes[i - 1] },
                high: close.max(if i == 0 { close } else { closes[i - 1] }) + 0.5,
                low: close.min(if i == 0 { close } else { closes[i - 1] }) - 0.5,
                close,
                volume: Some(1000.0),
            })
            .collect()
    }

    pub fn create_uptrend_candles(count: usize) -> Vec<OhlcPoint> {
        let closes: Vec<f64> = (0..count).map(|i| 100.0 + i as f64 * 1.5).collect();
        candles_from_closes(&closes)
    }

    pub fn create_downtrend_candles(count: usize) -> Vec<OhlcPoint> {
        let closes: Vec<f64> = (0..count).map(|i| 200.0 - i as f64 * 1.5).collect();
        candles_from_closes(&closes)
    }
}
