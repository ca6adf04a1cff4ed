use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Why the pipeline produced no signal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("No data for {instrument} after fallback")]
    NoData { instrument: String },

    #[error("Insufficient history for {instrument}: {bars} bars")]
    InsufficientHistory { instrument: String, bars: usize },

    #[error("Computation fault: {0}")]
    ComputationFault(String),

    #[error("Ambiguous instrument '{input}': matches {}", .candidates.join(", "))]
    AmbiguousInstrument {
        input: String,
        candidates: Vec<String>,
    },
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        match err {
            SignalError::NoData { .. } | SignalError::InsufficientHistory { .. } => {
                AppError::NotFound(err.to_string())
            }
            SignalError::AmbiguousInstrument { .. } => AppError::BadRequest(err.to_string()),
            SignalError::ComputationFault(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Reqwest(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
