//! Descriptor rendering: price precision, separators and category tags.

use chrono::{TimeZone, Utc};

use crate::error::SignalError;
use crate::services::policy::Decision;
use crate::types::{InstrumentCategory, SignalDescriptor, TradingStyle};

/// Decimal places for an instrument's prices. First matching rule wins.
/// Currency rules only apply to FX pairs (`=X` symbols), so equities such as
/// `ECOPETROL.CN` keep price-based precision.
pub fn decimals_for(instrument: &str, price: f64) -> usize {
    let upper = instrument.to_uppercase();
    let fx = upper.ends_with("=X");
    if fx && (upper.contains("COP") || upper.contains("CLP")) {
        0
    } else if fx && upper.contains("JPY") {
        3
    } else if price < 0.01 {
        8
    } else if price < 50.0 {
        4
    } else {
        2
    }
}

/// Format with fixed decimals and comma thousands separators.
pub fn format_price(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    let negative = value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let mut out = String::with_capacity(grouped.len() + decimals + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn ensure_finite(instrument: &str, name: &str, value: f64) -> Result<f64, SignalError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SignalError::ComputationFault(format!(
            "{instrument}: non-finite {name} ({value})"
        )))
    }
}

/// Render a decision into the descriptor handed to presentation.
pub fn build_descriptor(
    instrument: &str,
    category: InstrumentCategory,
    style: TradingStyle,
    decision: &Decision,
    used_fallback: bool,
    last_bar_time: i64,
) -> Result<SignalDescriptor, SignalError> {
    let price = ensure_finite(instrument, "price", decision.price)?;
    let stop_loss = ensure_finite(instrument, "stop-loss", decision.stop_loss)?;
    let take_profit = ensure_finite(instrument, "take-profit", decision.take_profit)?;
    let confidence = ensure_finite(instrument, "probability", decision.confidence())?;

    let decimals = decimals_for(instrument, price);
    let strength = decision.strength();
    let as_of = Utc
        .timestamp_millis_opt(last_bar_time)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    Ok(SignalDescriptor {
        instrument: instrument.to_string(),
        category_tag: category.tag().to_string(),
        style,
        price: format_price(price, decimals),
        stop_loss: format_price(stop_loss, decimals),
        take_profit: format_price(take_profit, decimals),
        rsi: format!("{:.1}", decision.rsi),
        strength_tag: strength.tag().to_string(),
        icon: strength.icon().to_string(),
        verdict: decision.verdict(category).to_string(),
        operation_type: decision.operation,
        confidence,
        rationale: decision.rationale.clone(),
        used_fallback,
        as_of,
    })
}
