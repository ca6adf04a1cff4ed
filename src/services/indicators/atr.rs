//! Average True Range (ATR) indicator.

use super::{rolling_mean, Indicator};
use crate::types::OhlcPoint;

/// ATR (Average True Range) indicator.
///
/// Rolling mean of the true range:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// Leading rows without a full window are back-filled with the first
/// defined value, so the series is only undefined when the history is
/// shorter than the period.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    /// Calculate True Range. The first bar has no previous close.
    fn true_range(current: &OhlcPoint, previous: Option<&OhlcPoint>) -> f64 {
        let hl = current.high - current.low;
        match previous {
            Some(prev) => {
                let hc = (current.high - prev.close).abs();
                let lc = (current.low - prev.close).abs();
                hl.max(hc).max(lc)
            }
            None => hl,
        }
    }
}

impl Indicator for Atr {
    fn id(&self) -> &str {
        "atr"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>> {
        let ranges: Vec<f64> = candles
            .iter()
            .enumerate()
            .map(|(i, c)| Self::true_range(c, i.checked_sub(1).map(|p| &candles[p])))
            .collect();

        let mut out = rolling_mean(&ranges, self.period);
        if let Some(first) = out.iter().flatten().next().copied() {
            for value in out.iter_mut().take_while(|v| v.is_none()) {
                *value = Some(first);
            }
        }
        out
    }
}
