// src/api.rs
//! HTTP surface: thin routing glue over the analysis pipeline. Validation
//! errors map to 400, missing collaborators to 503, anything unexpected to
//! a generic 500 with a timestamp (detail stays in the server log).

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::config::{AppConfig, MAX_TEXT_LEN};
use crate::crisis::{self, resources};
use crate::error::AnalyzeError;
use crate::history::History;
use crate::pipeline::{validate_input, AnalysisResult, Analyzer};
use crate::redaction::TOXIC_VOCABULARY;
use crate::rewrite::{remote::DynRewriteProvider, HybridRewriter, RewriteMethod};
use crate::sentiment::DynSentimentModel;
use crate::toxicity::{DynToxicityModel, TOXICITY_CATEGORIES};

#[derive(Clone)]
pub struct AppState {
    analyzer: Arc<Analyzer>,
}

impl AppState {
    /// Wire the collaborators together. Tests pass mock oracles here.
    pub fn new(
        config: AppConfig,
        toxicity: DynToxicityModel,
        sentiment: DynSentimentModel,
        remote_rewrite: DynRewriteProvider,
    ) -> Self {
        let history = Arc::new(History::with_capacity(config.history_capacity));
        let rewriter = HybridRewriter::new(remote_rewrite, config.prefer_local);
        let analyzer = Arc::new(Analyzer::new(
            config, toxicity, sentiment, rewriter, history,
        ));
        Self { analyzer }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .route("/rewrite", post(rewrite))
        .route("/crisis/detect", post(crisis_detect))
        .route("/stats", get(stats))
        .route("/history", get(history_snapshot))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

// ------------------------------------------------------------
// Error mapping
// ------------------------------------------------------------

struct ApiError(AnalyzeError);

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            AnalyzeError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": msg })),
            )
                .into_response(),
            AnalyzeError::OracleUnavailable(which) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "error": format!("{which} model not loaded. Please restart the server.")
                })),
            )
                .into_response(),
            AnalyzeError::Internal(detail) => {
                error!(%detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({
                        "error": "Analysis failed",
                        "timestamp": Utc::now().to_rfc3339(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

// ------------------------------------------------------------
// Handlers
// ------------------------------------------------------------

#[derive(serde::Deserialize)]
struct TextReq {
    #[serde(default)]
    text: String,
}

#[derive(serde::Deserialize)]
struct CrisisReq {
    #[serde(default)]
    text: String,
    /// Optional ISO country code for attached resources; defaults to US.
    country: Option<String>,
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "toxicity_loaded": state.analyzer.toxicity_loaded(),
        "rewriter_loaded": true,
        "groq_available": state.analyzer.remote_rewrite_available(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<TextReq>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let result = state.analyzer.analyze(&body.text).await?;
    Ok(Json(result))
}

#[derive(serde::Serialize)]
struct RewriteResp {
    success: bool,
    original_text: String,
    rewritten_text: String,
    method_used: RewriteMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    timestamp: String,
}

async fn rewrite(
    State(state): State<AppState>,
    Json(body): Json<TextReq>,
) -> Result<Json<RewriteResp>, ApiError> {
    let outcome = state.analyzer.rewrite(&body.text).await?;
    Ok(Json(RewriteResp {
        success: outcome.succeeded,
        original_text: body.text,
        rewritten_text: outcome.rewritten_text,
        method_used: outcome.method_used,
        error: outcome.error,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

#[derive(serde::Serialize)]
struct CrisisResp {
    #[serde(flatten)]
    assessment: crisis::CrisisAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    resources: Option<resources::CrisisResources>,
    timestamp: String,
}

async fn crisis_detect(Json(body): Json<CrisisReq>) -> Result<Json<CrisisResp>, ApiError> {
    validate_input(&body.text)?;
    let assessment = crisis::classify(&body.text);
    let resources = if assessment.requires_escalation {
        Some(resources::for_country(body.country.as_deref().unwrap_or("US")))
    } else {
        None
    };
    Ok(Json(CrisisResp {
        assessment,
        resources,
        timestamp: Utc::now().to_rfc3339(),
    }))
}

async fn stats(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "toxic_words_count": TOXIC_VOCABULARY.len(),
        "supported_categories": TOXICITY_CATEGORIES,
        "max_text_length": MAX_TEXT_LEN,
        "sentiment_labels": ["Positive", "Negative", "Neutral"],
        "toxicity_threshold": state.analyzer.config().toxicity_threshold,
        "rewriter_available": true,
        "groq_available": state.analyzer.remote_rewrite_available(),
    }))
}

async fn history_snapshot(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<serde_json::Value> {
    let n = q
        .get("n")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10);
    let rows = state.analyzer.history().snapshot_last_n(n);
    Json(serde_json::json!({ "count": rows.len(), "records": rows }))
}
