use serde::{Deserialize, Serialize};

use super::FetchWindow;

/// Trading style, which picks the bar granularity and the policy variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TradingStyle {
    /// Scalping: minutes to hours, momentum driven.
    #[default]
    Fast,
    /// Swing: days to weeks, macro trend aligned.
    Slow,
}

impl TradingStyle {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fast" | "scalping" | "scalp" => Some(Self::Fast),
            "slow" | "swing" | "swing_trading" => Some(Self::Slow),
            _ => None,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fast => "Scalping",
            Self::Slow => "Swing",
        }
    }

    /// Window requested first for this style.
    pub fn primary_window(&self) -> FetchWindow {
        match self {
            Self::Fast => FetchWindow::new("5d", "15m"),
            Self::Slow => FetchWindow::new("6mo", "1d"),
        }
    }

    /// Minimum training rows before the classifier is trusted.
    /// Intraday bars are noisier per row but far more plentiful.
    pub fn min_training_rows(&self) -> usize {
        match self {
            Self::Fast => 20,
            Self::Slow => 50,
        }
    }
}

/// Instrument category, used for display grouping and execution rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    Forex,
    Crypto,
    Equity,
    #[default]
    General,
}

impl InstrumentCategory {
    /// Parse from string. Accepts the Spanish labels the chat front end emits.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "forex" | "fx" => Some(Self::Forex),
            "crypto" | "cripto" => Some(Self::Crypto),
            "equity" | "equities" | "stocks" | "acciones" => Some(Self::Equity),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    /// Short tag attached to descriptors.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Forex => "FX",
            Self::Crypto => "CRYPTO",
            Self::Equity => "EQUITY",
            Self::General => "GENERAL",
        }
    }

    /// Whether short positions can be executed for this category.
    pub fn supports_short(&self) -> bool {
        !matches!(self, Self::Equity)
    }
}

/// Discrete trade state produced by the decision policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operation {
    Long,
    Short,
    Neutral,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Long => "LONG",
            Self::Short => "SHORT",
            Self::Neutral => "NEUTRAL",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

/// Display strength of a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStrength {
    StrongBullish,
    StrongBearish,
    Range,
}

impl SignalStrength {
    pub fn from_operation(operation: Operation) -> Self {
        match operation {
            Operation::Long => Self::StrongBullish,
            Operation::Short => Self::StrongBearish,
            Operation::Neutral => Self::Range,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::StrongBullish => "STRONG BULLISH",
            Self::StrongBearish => "STRONG BEARISH",
            Self::Range => "RANGE",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::StrongBullish => "\u{1F7E2}",
            Self::StrongBearish => "\u{1F534}",
            Self::Range => "\u{26AA}",
        }
    }
}

/// Rendered trading signal handed to presentation collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDescriptor {
    /// Canonical instrument symbol the bars were fetched for.
    pub instrument: String,
    pub category_tag: String,
    pub style: TradingStyle,
    /// Entry price, precision-adjusted.
    pub price: String,
    pub stop_loss: String,
    pub take_profit: String,
    /// RSI snapshot with one decimal.
    pub rsi: String,
    pub strength_tag: String,
    pub icon: String,
    pub verdict: String,
    pub operation_type: Operation,
    /// Displayed probability: P(up) for LONG/NEUTRAL, 1 - P(up) for SHORT.
    pub confidence: f64,
    pub rationale: String,
    /// True when the primary window was thin and daily bars were used.
    pub used_fallback: bool,
    /// RFC 3339 time of the last bar.
    pub as_of: String,
}
