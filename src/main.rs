mod api;

use augur::config::Config;
use augur::SignalAnalyzer;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<SignalAnalyzer>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "augur=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Augur server on {}:{}", config.host, config.port);
    info!(
        "Classifier: {} trees, seed {}; model cache {}",
        config.classifier.trees,
        config.classifier.seed,
        if config.model_cache_enabled() {
            format!("ttl {}s", config.model_cache_ttl.as_secs())
        } else {
            "disabled".to_string()
        }
    );

    let analyzer = Arc::new(SignalAnalyzer::from_config(&config)?);

    // Evict expired forests once per TTL
    if let Some(ttl) = analyzer.cache_ttl() {
        let analyzer = analyzer.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(ttl);
            loop {
                ticker.tick().await;
                let removed = analyzer.purge_expired_models();
                if removed > 0 {
                    debug!("Evicted {} expired forests", removed);
                }
            }
        });
    }

    let state = AppState {
        config: config.clone(),
        analyzer,
    };

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Augur server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
