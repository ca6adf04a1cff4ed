//! Decision policy: classifier probability plus trend filters to a trade state.

use crate::services::features::FeatureRow;
use crate::types::{InstrumentCategory, OhlcPoint, Operation, SignalStrength, TradingStyle};

/// Minimum fast-style risk distance as a fraction of price.
const MIN_RISK_FRACTION: f64 = 0.0005;
/// Fast-style reward to risk ratio.
const FAST_REWARD_RATIO: f64 = 1.5;
/// Slow-style stop and target distances in units of volatility.
const SLOW_STOP_VOL: f64 = 2.0;
const SLOW_TARGET_VOL: f64 = 4.0;
/// Neutral levels as a fraction of price.
const NEUTRAL_BAND: f64 = 0.01;

/// Outcome of the policy for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub operation: Operation,
    pub price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Raw classifier probability that the next close is higher.
    pub probability: f64,
    pub rsi: f64,
    pub rationale: String,
}

impl Decision {
    /// Displayed probability: strength of the chosen direction.
    pub fn confidence(&self) -> f64 {
        match self.operation {
            Operation::Short => 1.0 - self.probability,
            Operation::Long | Operation::Neutral => self.probability,
        }
    }

    pub fn strength(&self) -> SignalStrength {
        SignalStrength::from_operation(self.operation)
    }

    /// Action text. Shorts on categories that cannot be shorted become an
    /// advisory against buying; state and levels are untouched.
    pub fn verdict(&self, category: InstrumentCategory) -> &'static str {
        match self.operation {
            Operation::Long => "OPEN LONG",
            Operation::Short if category.supports_short() => "OPEN SHORT",
            Operation::Short => "AVOID BUYING",
            Operation::Neutral => "WAIT",
        }
    }
}

/// Evaluate the policy for the latest row.
///
/// `prior_bars` are the bars before the last one, used for fast-style stops.
pub fn decide(
    style: TradingStyle,
    latest: &FeatureRow,
    prior_bars: &[OhlcPoint],
    probability: f64,
) -> Decision {
    match style {
        TradingStyle::Fast => decide_fast(latest, prior_bars, probability),
        TradingStyle::Slow => decide_slow(latest, probability),
    }
}

fn decide_fast(row: &FeatureRow, prior_bars: &[OhlcPoint], p: f64) -> Decision {
    let price = row.close;
    let uptrend = row.ema9 > row.ema21 && price > row.ema9;
    let downtrend = row.ema9 < row.ema21 && price < row.ema9;
    let min_risk = price * MIN_RISK_FRACTION;

    let (operation, stop_loss, take_profit) = if p > 0.55 && uptrend && row.rsi < 70.0 {
        let swing_low = prior_bars
            .iter()
            .map(|b| b.low)
            .fold(f64::INFINITY, f64::min);
        let risk = if swing_low.is_finite() {
            (price - swing_low).max(min_risk)
        } else {
            min_risk
        };
        (
            Operation::Long,
            price - risk,
            price + FAST_REWARD_RATIO * risk,
        )
    } else if p < 0.45 && downtrend && row.rsi > 30.0 {
        let swing_high = prior_bars
            .iter()
            .map(|b| b.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let risk = if swing_high.is_finite() {
            (swing_high - price).max(min_risk)
        } else {
            min_risk
        };
        (
            Operation::Short,
            price + risk,
            price - FAST_REWARD_RATIO * risk,
        )
    } else {
        neutral_levels(price)
    };

    let trend = if uptrend {
        "EMA9 above EMA21 with price above EMA9"
    } else if downtrend {
        "EMA9 below EMA21 with price below EMA9"
    } else {
        "no clean EMA alignment"
    };

    Decision {
        operation,
        price,
        stop_loss,
        take_profit,
        probability: p,
        rsi: row.rsi,
        rationale: rationale(p, trend, row.rsi),
    }
}

fn decide_slow(row: &FeatureRow, p: f64) -> Decision {
    let price = row.close;
    let vol = row.volatility();
    let bullish = price > row.sma_long && price > row.ema21;
    let bearish = price < row.sma_long && price < row.ema21;

    let (operation, stop_loss, take_profit) = if p > 0.65 && bullish && row.rsi < 65.0 {
        (
            Operation::Long,
            price - SLOW_STOP_VOL * vol,
            price + SLOW_TARGET_VOL * vol,
        )
    } else if p < 0.35 && bearish && row.rsi > 35.0 {
        (
            Operation::Short,
            price + SLOW_STOP_VOL * vol,
            price - SLOW_TARGET_VOL * vol,
        )
    } else {
        neutral_levels(price)
    };

    let trend = if bullish {
        "price above long SMA and EMA21"
    } else if bearish {
        "price below long SMA and EMA21"
    } else {
        "price between long SMA and EMA21"
    };

    Decision {
        operation,
        price,
        stop_loss,
        take_profit,
        probability: p,
        rsi: row.rsi,
        rationale: rationale(p, trend, row.rsi),
    }
}

fn neutral_levels(price: f64) -> (Operation, f64, f64) {
    (
        Operation::Neutral,
        price * (1.0 - NEUTRAL_BAND),
        price * (1.0 + NEUTRAL_BAND),
    )
}

fn rationale(p: f64, trend: &str, rsi: f64) -> String {
    format!("P(up) {:.1}%; {}; RSI {:.1}", p * 100.0, trend, rsi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(close: f64) -> FeatureRow {
        FeatureRow {
            time: 0,
            close,
            rsi: 55.0,
            ema9: close,
            ema21: close,
            ema12: close,
            ema26: close,
            macd: 0.0,
            macd_signal: 0.0,
            atr: Some(2.0),
            sma_long: close,
            sma_medium: close,
            std_dev: 0.0,
            label: None,
        }
    }

    fn bar(low: f64, high: f64) -> OhlcPoint {
        OhlcPoint {
            time: 0,
            open: (low + high) / 2.0,
            high,
            low,
            close: (low + high) / 2.0,
            volume: None,
        }
    }

    fn bullish_fast() -> FeatureRow {
        FeatureRow {
            ema9: 99.0,
            ema21: 98.0,
            ..row(100.0)
        }
    }

    fn bearish_fast() -> FeatureRow {
        FeatureRow {
            ema9: 101.0,
            ema21: 102.0,
            ..row(100.0)
        }
    }

    #[test]
    fn test_fast_long_uses_prior_lows() {
        let bars = [bar(97.0, 101.0), bar(96.0, 100.0), bar(98.0, 101.0)];
        let d = decide(TradingStyle::Fast, &bullish_fast(), &bars, 0.7);

        assert_eq!(d.operation, Operation::Long);
        assert_eq!(d.stop_loss, 96.0);
        assert_eq!(d.take_profit, 106.0);
        assert!(d.stop_loss < d.price && d.price < d.take_profit);
        assert_eq!(d.verdict(InstrumentCategory::Crypto), "OPEN LONG");
    }

    #[test]
    fn test_fast_long_risk_floor() {
        // Prior lows above price would give negative risk
        let bars = [bar(100.5, 101.0)];
        let d = decide(TradingStyle::Fast, &bullish_fast(), &bars, 0.7);

        assert_eq!(d.operation, Operation::Long);
        assert!((d.price - d.stop_loss - 0.05).abs() < 1e-9);
        assert!((d.take_profit - d.price - 0.075).abs() < 1e-9);
    }

    #[test]
    fn test_fast_short_uses_prior_highs() {
        let bars = [bar(99.0, 102.0), bar(99.0, 103.0), bar(98.0, 101.0)];
        let d = decide(TradingStyle::Fast, &bearish_fast(), &bars, 0.3);

        assert_eq!(d.operation, Operation::Short);
        assert_eq!(d.stop_loss, 103.0);
        assert_eq!(d.take_profit, 95.5);
        assert!(d.take_profit < d.price && d.price < d.stop_loss);
        assert!((d.confidence() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_fast_overbought_blocks_long() {
        let hot = FeatureRow {
            rsi: 75.0,
            ..bullish_fast()
        };
        let d = decide(TradingStyle::Fast, &hot, &[], 0.9);
        assert_eq!(d.operation, Operation::Neutral);
    }

    #[test]
    fn test_fast_probability_gate() {
        let d = decide(TradingStyle::Fast, &bullish_fast(), &[], 0.55);
        assert_eq!(d.operation, Operation::Neutral);
        assert!((d.stop_loss - 99.0).abs() < 1e-9);
        assert!((d.take_profit - 101.0).abs() < 1e-9);
        assert_eq!(d.confidence(), 0.55);
        assert_eq!(d.verdict(InstrumentCategory::General), "WAIT");
    }

    #[test]
    fn test_slow_long_uses_volatility() {
        let r = FeatureRow {
            sma_long: 90.0,
            ema21: 95.0,
            ..row(100.0)
        };
        let d = decide(TradingStyle::Slow, &r, &[], 0.8);

        assert_eq!(d.operation, Operation::Long);
        assert_eq!(d.stop_loss, 96.0);
        assert_eq!(d.take_profit, 108.0);
    }

    #[test]
    fn test_slow_short_with_volatility_fallback() {
        let r = FeatureRow {
            sma_long: 110.0,
            ema21: 105.0,
            rsi: 40.0,
            atr: None,
            ..row(100.0)
        };
        let d = decide(TradingStyle::Slow, &r, &[], 0.2);

        assert_eq!(d.operation, Operation::Short);
        // 1% fallback volatility
        assert!((d.stop_loss - 102.0).abs() < 1e-9);
        assert!((d.take_profit - 96.0).abs() < 1e-9);
    }

    #[test]
    fn test_slow_long_with_zero_atr_keeps_distinct_levels() {
        let r = FeatureRow {
            sma_long: 90.0,
            ema21: 95.0,
            atr: Some(0.0),
            ..row(100.0)
        };
        let d = decide(TradingStyle::Slow, &r, &[], 0.8);

        assert_eq!(d.operation, Operation::Long);
        assert!(d.stop_loss < d.price && d.price < d.take_profit);
        assert!((d.stop_loss - 98.0).abs() < 1e-9);
        assert!((d.take_profit - 104.0).abs() < 1e-9);
    }

    #[test]
    fn test_slow_thresholds_stricter_than_fast() {
        let r = FeatureRow {
            sma_long: 90.0,
            ema21: 95.0,
            ema9: 97.0,
            ..row(100.0)
        };
        assert_eq!(decide(TradingStyle::Slow, &r, &[], 0.6).operation, Operation::Neutral);
        assert_eq!(decide(TradingStyle::Fast, &r, &[], 0.6).operation, Operation::Long);
    }

    #[test]
    fn test_equity_short_is_advisory() {
        let d = decide(TradingStyle::Fast, &bearish_fast(), &[bar(99.0, 102.0)], 0.2);
        assert_eq!(d.operation, Operation::Short);
        assert_eq!(d.verdict(InstrumentCategory::Equity), "AVOID BUYING");
        assert_eq!(d.verdict(InstrumentCategory::Forex), "OPEN SHORT");
        assert_eq!(d.strength().tag(), "STRONG BEARISH");
    }

    #[test]
    fn test_rationale_is_deterministic() {
        let a = decide(TradingStyle::Fast, &bullish_fast(), &[], 0.62);
        let b = decide(TradingStyle::Fast, &bullish_fast(), &[], 0.62);
        assert_eq!(a.rationale, b.rationale);
        assert!(a.rationale.starts_with("P(up) 62.0%"));
        assert!(a.rationale.contains("RSI 55.0"));
    }
}
