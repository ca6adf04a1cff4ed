//! MACD (Moving Average Convergence Divergence) indicator.

use super::{Ema, Indicator};
use crate::types::OhlcPoint;

/// MACD line and its signal line, one value per bar.
#[derive(Debug, Clone, Default)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// MACD indicator.
///
/// - MACD Line = EMA(12) - EMA(26)
/// - Signal Line = EMA(9) of MACD Line
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    /// Calculate both lines.
    pub fn lines(&self, candles: &[OhlcPoint]) -> MacdLines {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        let fast = Ema::smooth(&closes, self.fast_period);
        let slow = Ema::smooth(&closes, self.slow_period);

        let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal = Ema::smooth(&macd, self.signal_period);

        MacdLines { macd, signal }
    }
}

impl Indicator for Macd {
    fn id(&self) -> &str {
        "macd"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>> {
        self.lines(candles).macd.into_iter().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::*;

    #[test]
    fn test_macd_lengths_match_input() {
        let candles = create_uptrend_candles(60);
        let lines = Macd::default().lines(&candles);
        assert_eq!(lines.macd.len(), 60);
        assert_eq!(lines.signal.len(), 60);
        assert_eq!(lines.macd[0], 0.0);
    }

    #[test]
    fn test_macd_positive_in_uptrend() {
        let lines = Macd::default().lines(&create_uptrend_candles(80));
        assert!(*lines.macd.last().unwrap() > 0.0);
        assert!(*lines.signal.last().unwrap() > 0.0);
    }

    #[test]
    fn test_macd_negative_in_downtrend() {
        let lines = Macd::default().lines(&create_downtrend_candles(80));
        assert!(*lines.macd.last().unwrap() < 0.0);
    }

    #[test]
    fn test_macd_empty_input() {
        let macd = Macd::default();
        assert!(macd.series(&[]).is_empty());
        assert_eq!(macd.id(), "macd");
    }
}
