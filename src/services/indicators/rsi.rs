//! Relative Strength Index (RSI) indicator.

use super::Indicator;
use crate::types::OhlcPoint;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses
/// using Wilder's smoothing. Values range from 0-100:
/// - Below 30: Oversold
/// - Above 70: Overbought
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period: period.max(1) }
    }

    /// RSI from smoothed averages. Both zero (no movement at all) is undefined.
    fn from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
        if avg_loss == 0.0 {
            return if avg_gain == 0.0 { None } else { Some(100.0) };
        }
        let rs = avg_gain / avg_loss;
        Some(100.0 - (100.0 / (1.0 + rs)))
    }
}

impl Indicator for Rsi {
    fn id(&self) -> &str {
        "rsi"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>> {
        let mut out = vec![None; candles.len()];
        if candles.len() < self.min_periods() {
            return out;
        }

        let period = self.period as f64;
        let mut gains = Vec::with_capacity(candles.len() - 1);
        let mut losses = Vec::with_capacity(candles.len() - 1);
        for pair in candles.windows(2) {
            let change = pair[1].close - pair[0].close;
            gains.push(change.max(0.0));
            losses.push((-change).max(0.0));
        }

        // Seed with simple averages of the first `period` changes
        let mut avg_gain = gains[..self.period].iter().sum::<f64>() / period;
        let mut avg_loss = losses[..self.period].iter().sum::<f64>() / period;
        out[self.period] = Self::from_averages(avg_gain, avg_loss);

        for i in self.period..gains.len() {
            avg_gain = (avg_gain * (period - 1.0) + gains[i]) / period;
            avg_loss = (avg_loss * (period - 1.0) + losses[i]) / period;
            out[i + 1] = Self::from_averages(avg_gain, avg_loss);
        }

        out
    }
}
