//! Signal API endpoints.

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ApiResponse;
use crate::AppState;
use augur::error::{AppError, Result};
use augur::types::{InstrumentCategory, SignalDescriptor, TradingStyle};

/// Most instruments accepted by one compare request.
const MAX_COMPARE_SYMBOLS: usize = 20;

/// Query parameters for the single-instrument endpoint.
#[derive(Debug, Deserialize)]
pub struct SignalQuery {
    /// fast (scalping) or slow (swing)
    pub style: Option<String>,
    pub category: Option<String>,
    /// Skip the model cache and retrain.
    #[serde(default)]
    pub fresh: bool,
}

/// Query parameters for the compare endpoint.
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated instruments or aliases.
    pub symbols: String,
    pub style: Option<String>,
    pub category: Option<String>,
}

/// Query parameters for the recommend endpoint.
#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub style: Option<String>,
}

/// One compare row: a signal or the reason there is none.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareEntry {
    pub instrument: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<SignalDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn parse_style(raw: Option<&str>) -> Result<TradingStyle> {
    match raw {
        None => Ok(TradingStyle::default()),
        Some(s) => TradingStyle::from_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown style: {}", s))),
    }
}

fn parse_category(raw: Option<&str>) -> Result<InstrumentCategory> {
    match raw {
        None => Ok(InstrumentCategory::default()),
        Some(s) => InstrumentCategory::from_str(s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown category: {}", s))),
    }
}

fn parse_symbols(raw: &str) -> Result<Vec<String>> {
    let symbols: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if symbols.is_empty() {
        return Err(AppError::BadRequest("No symbols given".to_string()));
    }
    if symbols.len() > MAX_COMPARE_SYMBOLS {
        return Err(AppError::BadRequest(format!(
            "At most {} symbols per request",
            MAX_COMPARE_SYMBOLS
        )));
    }
    Ok(symbols)
}

/// Create the signals router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/signals/:instrument", get(get_signal))
        .route("/api/compare", get(compare))
        .route("/api/recommend/:category", get(recommend))
}

/// GET /api/signals/:instrument
async fn get_signal(
    State(state): State<AppState>,
    Path(instrument): Path<String>,
    Query(query): Query<SignalQuery>,
) -> Result<Json<ApiResponse<SignalDescriptor>>> {
    let style = parse_style(query.style.as_deref())?;
    let category = parse_category(query.category.as_deref())?;

    let descriptor = if query.fresh {
        state.analyzer.analyze_fresh(&instrument, style, category).await?
    } else {
        state.analyzer.analyze(&instrument, style, category).await?
    };

    Ok(Json(ApiResponse::new(descriptor, &state)))
}

/// GET /api/compare?symbols=A,B
async fn compare(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<ApiResponse<Vec<CompareEntry>>>> {
    let style = parse_style(query.style.as_deref())?;
    let category = parse_category(query.category.as_deref())?;
    let symbols = parse_symbols(&query.symbols)?;
    debug!("Comparing {} instruments", symbols.len());

    let entries = state
        .analyzer
        .analyze_many(&symbols, style, category)
        .await
        .into_iter()
        .map(|(instrument, result)| match result {
            Ok(signal) => CompareEntry {
                instrument,
                signal: Some(signal),
                error: None,
            },
            Err(e) => CompareEntry {
                instrument,
                signal: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    Ok(Json(ApiResponse::new(entries, &state)))
}

/// GET /api/recommend/:category
async fn recommend(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<ApiResponse<Vec<SignalDescriptor>>>> {
    let category = parse_category(Some(category.as_str()))?;
    let style = parse_style(query.style.as_deref())?;

    let picks = state.analyzer.recommend(category, style).await;
    Ok(Json(ApiResponse::new(picks, &state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{router, test_support::test_state};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let app = router().with_state(test_state());
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_signal_query_parsing() {
        let query: SignalQuery =
            serde_urlencoded::from_str("style=swing&category=cripto&fresh=true").unwrap();
        assert_eq!(parse_style(query.style.as_deref()).unwrap(), TradingStyle::Slow);
        assert_eq!(
            parse_category(query.category.as_deref()).unwrap(),
            InstrumentCategory::Crypto
        );
        assert!(query.fresh);
    }

    #[test]
    fn test_signal_query_defaults() {
        let query: SignalQuery = serde_urlencoded::from_str("").unwrap();
        assert_eq!(parse_style(query.style.as_deref()).unwrap(), TradingStyle::Fast);
        assert_eq!(
            parse_category(query.category.as_deref()).unwrap(),
            InstrumentCategory::General
        );
        assert!(!query.fresh);
    }

    #[test]
    fn test_unknown_style_rejected() {
        assert!(matches!(parse_style(Some("yolo")), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_parse_symbols() {
        let query: CompareQuery = serde_urlencoded::from_str("symbols=BTC-USD,%20aapl%20,,gold").unwrap();
        assert_eq!(parse_symbols(&query.symbols).unwrap(), vec!["BTC-USD", "aapl", "gold"]);
        assert!(parse_symbols(" , ").is_err());

        let many = vec!["X"; MAX_COMPARE_SYMBOLS + 1].join(",");
        assert!(parse_symbols(&many).is_err());
    }

    #[tokio::test]
    async fn test_get_signal_route() {
        let (status, json) = get_json("/api/signals/bitcoin?style=fast&category=crypto").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["instrument"], "BTC-USD");
        assert_eq!(json["data"]["categoryTag"], "CRYPTO");
        assert_eq!(json["data"]["usedFallback"], false);
        assert_eq!(json["meta"]["modelCache"], false);
    }

    #[tokio::test]
    async fn test_missing_data_is_not_found() {
        let (status, json) = get_json("/api/signals/EMPTY").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], 404);
    }

    #[tokio::test]
    async fn test_bad_style_is_bad_request() {
        let (status, json) = get_json("/api/signals/AAPL?style=hodl").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("hodl"));
    }

    #[tokio::test]
    async fn test_compare_route_keeps_failures() {
        let (status, json) = get_json("/api/compare?symbols=AAPL,EMPTY&style=slow").await;
        assert_eq!(status, StatusCode::OK);

        let entries = json["data"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["signal"]["instrument"], "AAPL");
        assert!(entries[1]["signal"].is_null());
        assert!(entries[1]["error"].as_str().unwrap().contains("EMPTY"));
    }

    #[tokio::test]
    async fn test_recommend_route() {
        let (status, json) = get_json("/api/recommend/forex?style=fast").await;
        assert_eq!(status, StatusCode::OK);
        for pick in json["data"].as_array().unwrap() {
            assert_ne!(pick["operationType"], "NEUTRAL");
            assert!(pick["confidence"].as_f64().unwrap() > 0.6);
        }
    }

    #[tokio::test]
    async fn test_recommend_unknown_category() {
        let (status, _) = get_json("/api/recommend/bonds").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
