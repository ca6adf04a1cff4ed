//! Instrument universes per category, used by compare/recommend flows.

use crate::types::InstrumentCategory;

const FOREX: &[&str] = &[
    // Majors
    "EURUSD=X", "GBPUSD=X", "JPY=X", "AUDUSD=X", "NZDUSD=X", "USDCAD=X", "USDCHF=X",
    // Crosses
    "EURGBP=X", "EURJPY=X", "GBPJPY=X", "AUDJPY=X", "CHFJPY=X", "EURAUD=X",
    // Latin America
    "COP=X", "MXN=X", "BRL=X", "CLP=X", "PEN=X",
];

const CRYPTO: &[&str] = &[
    "BTC-USD", "ETH-USD", "BNB-USD", "SOL-USD", "XRP-USD", "ADA-USD", "DOGE-USD",
    "AVAX-USD", "TRX-USD", "DOT-USD", "LINK-USD", "MATIC-USD", "SHIB-USD", "LTC-USD",
    "UNI-USD", "ATOM-USD", "XLM-USD", "NEAR-USD", "ALGO-USD", "APE-USD", "SAND-USD",
];

const EQUITY: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "TSLA", "META",
    "NFLX", "AMD", "INTC", "PYPL", "COIN", "UBER", "ABNB", "SHOP", "SQ", "ROKU",
    "SQQQ", "TQQQ", "SOXL", "SOXS", "LABU", "LABD",
    "NU", "MELI", "ECOPETROL.CN",
];

const GENERAL: &[&str] = &[
    "BTC-USD", "ETH-USD", "EURUSD=X", "GBPUSD=X", "AAPL", "NVDA", "TSLA", "COP=X", "XRP-USD",
];

/// Instruments scanned for a category.
pub fn universe(category: InstrumentCategory) -> &'static [&'static str] {
    match category {
        InstrumentCategory::Forex => FOREX,
        InstrumentCategory::Crypto => CRYPTO,
        InstrumentCategory::Equity => EQUITY,
        InstrumentCategory::General => GENERAL,
    }
}
