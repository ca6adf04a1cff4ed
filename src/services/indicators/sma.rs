//! Simple Moving Average (SMA) indicator.

use super::{rolling_mean, Indicator};
use crate::types::OhlcPoint;

/// SMA (Simple Moving Average) indicator.
///
/// Calculates the average close over a period.
pub struct Sma {
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Long-horizon average: 200 bars when available, otherwise half the
    /// history so short series still get a (less reliable) trend reference.
    pub fn long_horizon(history_len: usize) -> Self {
        if history_len >= 200 {
            Self::new(200)
        } else {
            Self::new((history_len / 2).max(1))
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Sma {
    fn id(&self) -> &str {
        match self.period {
            50 => "sma50",
            200 => "sma200",
            _ => "sma",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        rolling_mean(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::indicators::test_support::*;

    #[test]
    fn test_sma_ids() {
        assert_eq!(Sma::new(50).id(), "sma50");
        assert_eq!(Sma::new(200).id(), "sma200");
    }

    #[test]
    fn test_long_horizon_window() {
        assert_eq!(Sma::long_horizon(300).period(), 200);
        assert_eq!(Sma::long_horizon(200).period(), 200);
        assert_eq!(Sma::long_horizon(150).period(), 75);
        assert_eq!(Sma::long_horizon(1).period(), 1);
    }

    #[test]
    fn test_sma_values() {
        let candles = candles_from_closes(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let out = Sma::new(5).series(&candles);
        assert_eq!(out[3], None);
        assert_eq!(out[4], Some(3.0));
    }

    #[test]
    fn test_sma_undefined_first_rows() {
        let out = Sma::new(50).series(&create_uptrend_candles(60));
        assert!(out[..49].iter().all(|v| v.is_none()));
        assert!(out[49].is_some());
    }
}
