//! Augur - directional trading signals from OHLC history

pub mod config;
pub mod error;
pub mod services;
pub mod sources;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, SignalError};
pub use services::SignalAnalyzer;
pub use types::*;
