//! Exponential Moving Average (EMA) indicator.

use super::Indicator;
use crate::types::OhlcPoint;

/// EMA (Exponential Moving Average) indicator.
///
/// Like SMA but gives more weight to recent prices. Seeded with the first
/// close, so it is defined from the first bar onwards.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        Self { span: span.max(1) }
    }

    /// Exponentially smooth a value series with `alpha = 2 / (span + 1)`.
    pub fn smooth(values: &[f64], span: usize) -> Vec<f64> {
        let alpha = 2.0 / (span.max(1) as f64 + 1.0);
        let mut out = Vec::with_capacity(values.len());
        let mut prev: Option<f64> = None;
        for &value in values {
            // prev + alpha * (value - prev) keeps a constant input exactly constant
            let next = match prev {
                Some(p) => p + alpha * (value - p),
                None => value,
            };
            out.push(next);
            prev = Some(next);
        }
        out
    }
}

impl Indicator for Ema {
    fn id(&self) -> &str {
        match self.span {
            9 => "ema9",
            12 => "ema12",
            21 => "ema21",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn series(&self, candles: &[OhlcPoint]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
        Self::smooth(&closes, self.span).into_iter().map(Some).collect()
    }
}
