//! Rolling standard deviation of closes.

use super::Indicator;
use crate::types::OhlcPoint;

/// Rolling sample standard deviation (n - 1 denominator) of closes.
pub struct StdDev {
    period: usize,
}

impl Default for StdDev {
    fn default() -> Self {
        Self { period: 20 }
    }
}

impl StdDev {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Sample standard deviation.
    fn std_dev(values: &[f64]) -> f64 {
        if values.len() < 2 {
            return 0.0;
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let variance: f64 =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
        variance.sqrt()
    }
}

impl Indicator for StdDev {
    fn id(&self) -> &str {
        "std_dev"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>> {
        if self.period < 2 {
            return vec![None; candles.len()];
        }

        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        (0..closes.len())
            .map(|i| {
                (i + 1 >= self.period).then(|| Self::std_dev(&closes[i + 1 - self.period..=i]))
            })
            .collect()
    }
}
