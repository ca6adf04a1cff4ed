pub mod health;
pub mod signals;

use crate::AppState;
use axum::Router;
use serde::Serialize;

/// API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: ApiMeta,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeta {
    /// Whether trained forests may be reused across requests.
    pub model_cache: bool,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, state: &AppState) -> Self {
        Self {
            data,
            meta: ApiMeta {
                model_cache: state.analyzer.cache_enabled(),
            },
        }
    }
}

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(signals::router())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use augur::config::{ClassifierConfig, Config};
    use augur::error::AppError;
    use augur::sources::{BarFuture, BarSource};
    use augur::types::{FetchWindow, OhlcPoint};
    use augur::SignalAnalyzer;

    use crate::AppState;

    /// Serves the same oscillating series for every symbol except "EMPTY".
    pub struct StaticSource;

    impl BarSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        fn fetch_bars<'a>(&'a self, symbol: &'a str, _window: FetchWindow) -> BarFuture<'a> {
            let bars = if symbol == "EMPTY" {
                Vec::new()
            } else {
                (0..120)
                    .map(|i| {
                        let close = 100.0 + (i as f64 * 0.3).sin() * 4.0;
                        OhlcPoint {
                            time: 1_700_000_000_000 + i as i64 * 900_000,
                            open: close,
                            high: close + 0.5,
                            low: close - 0.5,
                            close,
                            volume: None,
                        }
                    })
                    .collect()
            };
            Box::pin(async move { Ok::<_, AppError>(bars) })
        }
    }

    pub fn test_state() -> AppState {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            yahoo_base_url: "http://localhost".to_string(),
            fetch_timeout: Duration::from_secs(5),
            classifier: ClassifierConfig { trees: 5, seed: 42 },
            model_cache_ttl: Duration::ZERO,
            scan_pacing: Duration::ZERO,
        };
        AppState {
            analyzer: Arc::new(SignalAnalyzer::new(Arc::new(StaticSource), &config)),
            config: Arc::new(config),
        }
    }
}
