//! Free-text and shorthand instrument names to canonical Yahoo symbols.

use crate::error::SignalError;

/// Static alias table. Keys are lowercase, single-spaced.
const ALIASES: &[(&str, &str)] = &[
    // Crypto
    ("bitcoin", "BTC-USD"),
    ("btc", "BTC-USD"),
    ("ethereum", "ETH-USD"),
    ("ether", "ETH-USD"),
    ("eth", "ETH-USD"),
    ("solana", "SOL-USD"),
    ("ripple", "XRP-USD"),
    ("xrp", "XRP-USD"),
    ("dogecoin", "DOGE-USD"),
    ("doge", "DOGE-USD"),
    ("cardano", "ADA-USD"),
    ("litecoin", "LTC-USD"),
    ("binance coin", "BNB-USD"),
    // FX
    ("euro", "EURUSD=X"),
    ("eur usd", "EURUSD=X"),
    ("pound", "GBPUSD=X"),
    ("libra esterlina", "GBPUSD=X"),
    ("yen", "JPY=X"),
    ("peso colombiano", "COP=X"),
    ("peso chileno", "CLP=X"),
    ("peso mexicano", "MXN=X"),
    ("real brasileno", "BRL=X"),
    // Commodities via ETFs
    ("gold", "GLD"),
    ("oro", "GLD"),
    ("silver", "SLV"),
    ("plata", "SLV"),
    ("oil", "USO"),
    ("petroleo", "USO"),
    // Equities
    ("apple", "AAPL"),
    ("microsoft", "MSFT"),
    ("google", "GOOGL"),
    ("alphabet", "GOOGL"),
    ("amazon", "AMZN"),
    ("nvidia", "NVDA"),
    ("tesla", "TSLA"),
    ("meta", "META"),
    ("facebook", "META"),
    ("netflix", "NFLX"),
    ("nubank", "NU"),
    ("mercadolibre", "MELI"),
    ("ecopetrol", "ECOPETROL.CN"),
    ("s&p 500", "SPY"),
    ("nasdaq", "QQQ"),
];

/// Trim and collapse internal whitespace.
fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `needle` occurs in `haystack` as a run of whole words.
fn contains_words(haystack: &[&str], needle: &str) -> bool {
    let needle: Vec<&str> = needle.split(' ').collect();
    haystack.windows(needle.len()).any(|w| w == needle.as_slice())
}

/// Resolve an instrument name to a canonical symbol.
///
/// Exact alias matches win. Otherwise every alias appearing as whole words in
/// the input is a candidate; more than one distinct symbol is an error.
/// Unknown inputs pass through trimmed and uppercased.
pub fn resolve(input: &str) -> Result<String, SignalError> {
    let normalized = collapse_whitespace(input);
    let lookup = normalized.to_lowercase();

    if let Some((_, symbol)) = ALIASES.iter().find(|(alias, _)| *alias == lookup) {
        return Ok((*symbol).to_string());
    }

    let words: Vec<&str> = lookup
        .split(|c: char| c.is_whitespace() || matches!(c, ',' | '?' | '!' | '.' | ';'))
        .filter(|w| !w.is_empty())
        .collect();

    let mut candidates: Vec<String> = ALIASES
        .iter()
        .filter(|(alias, _)| contains_words(&words, alias))
        .map(|(_, symbol)| (*symbol).to_string())
        .collect();
    candidates.sort();
    candidates.dedup();

    match candidates.len() {
        0 => Ok(normalized.to_uppercase()),
        1 => Ok(candidates.remove(0)),
        _ => Err(SignalError::AmbiguousInstrument {
            input: input.to_string(),
            candidates,
        }),
    }
}
