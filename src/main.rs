//! Toxicity & Sentiment Analysis Service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring the analysis pipeline, shared state,
//! and middleware.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use detox_sentiment_analyzer::api::{self, AppState};
use detox_sentiment_analyzer::config::AppConfig;
use detox_sentiment_analyzer::metrics::Metrics;
use detox_sentiment_analyzer::rewrite::{GroqRewriter, RewriteProvider};
use detox_sentiment_analyzer::sentiment::LexiconSentiment;
use detox_sentiment_analyzer::toxicity::RemoteToxicityModel;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - DETOX_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("DETOX_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("detox=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // Initialize dev tracing early (no-op in production).
    enable_dev_tracing();

    let config = AppConfig::from_env();
    let metrics = Metrics::init(config.toxicity_threshold);

    let toxicity = Arc::new(RemoteToxicityModel::new(config.toxicity_api_url.clone()));
    let sentiment = Arc::new(LexiconSentiment::new());
    let remote = Arc::new(GroqRewriter::new(
        config.groq_api_key.clone(),
        config.rewrite_timeout,
    ));

    info!(
        threshold = config.toxicity_threshold,
        prefer_local = config.prefer_local,
        groq_available = remote.is_available(),
        "analyzer starting"
    );

    let state = AppState::new(config, toxicity, sentiment, remote);
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
