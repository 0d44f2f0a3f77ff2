// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health, GET /stats, GET /history
// - POST /analyze (success, validation, model-unavailable)
// - POST /rewrite
// - POST /crisis/detect (escalation + resources)

use std::sync::Arc;

use serde_json::json;
use serde_json::Value as Json;
use shuttle_axum::axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt as _; // for `oneshot`

use detox_sentiment_analyzer::api::{self, AppState};
use detox_sentiment_analyzer::config::AppConfig;
use detox_sentiment_analyzer::rewrite::remote::UnavailableRewriteProvider;
use detox_sentiment_analyzer::sentiment::LexiconSentiment;
use detox_sentiment_analyzer::toxicity::{
    DisabledToxicityModel, MockToxicityModel, ToxicityScores,
};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

/// Build the same Router the binary uses, with a fixed-score toxicity mock
/// and the remote rewrite path unavailable.
fn test_router(toxicity: f32) -> Router {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(MockToxicityModel {
            fixed: ToxicityScores {
                toxicity,
                obscene: toxicity,
                ..Default::default()
            },
        }),
        Arc::new(LexiconSentiment::new()),
        Arc::new(UnavailableRewriteProvider),
    );
    api::router(state)
}

fn post_json(uri: &str, payload: &Json) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("build request")
}

async fn read_json(resp: shuttle_axum::axum::response::Response) -> Json {
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    serde_json::from_slice(&bytes).expect("parse json")
}

#[tokio::test]
async fn health_reports_component_status() {
    let app = test_router(0.1);

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .expect("build GET /health");

    let resp = app.oneshot(req).await.expect("oneshot /health");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = read_json(resp).await;
    assert_eq!(v["status"], json!("healthy"));
    assert_eq!(v["toxicity_loaded"], json!(true));
    assert_eq!(v["groq_available"], json!(false));
    assert!(v.get("timestamp").is_some());
}

#[tokio::test]
async fn analyze_toxic_text_cleans_and_rewrites() {
    let app = test_router(0.9);

    let payload = json!({ "text": "This is fucking garbage" });
    let resp = app
        .oneshot(post_json("/analyze", &payload))
        .await
        .expect("oneshot /analyze");
    assert!(resp.status().is_success(), "got {}", resp.status());

    let v = read_json(resp).await;
    assert_eq!(v["is_toxic"], json!(true));

    let cleaned = v["cleaned_text"].as_str().unwrap().to_lowercase();
    assert!(!cleaned.contains("fucking"));
    assert!(!cleaned.contains("garbage"));

    // Remote unavailable: the rule-based stage must have answered.
    assert_eq!(v["rewrite_method"], json!("rules"));
    let suggestion = v["rewrite_suggestion"].as_str().unwrap();
    assert!(suggestion.chars().next().unwrap().is_uppercase());
    assert!(matches!(
        suggestion.chars().last().unwrap(),
        '.' | '!' | '?'
    ));

    assert_eq!(v["overall_toxicity"], json!(90.0));
    assert!(v["categories_flagged"]
        .as_array()
        .unwrap()
        .contains(&json!("toxicity")));
    assert_eq!(v["sentiment_improved"], json!(true));
    assert!(v.get("record_id").is_some());
}

#[tokio::test]
async fn analyze_non_toxic_text_passes_through() {
    let app = test_router(0.1);

    let payload = json!({ "text": "What a wonderful day" });
    let resp = app
        .oneshot(post_json("/analyze", &payload))
        .await
        .expect("oneshot /analyze");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    assert_eq!(v["is_toxic"], json!(false));
    assert_eq!(v["cleaned_text"], json!("What a wonderful day"));
    assert_eq!(v["rewrite_suggestion"], Json::Null);
    assert_eq!(v["rewrite_method"], Json::Null);
    assert!(v["categories_flagged"].as_array().unwrap().is_empty());
    assert!(v["toxic_words_found"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_rejects_undersized_input_with_400() {
    let app = test_router(0.1);

    let resp = app
        .oneshot(post_json("/analyze", &json!({ "text": "ab" })))
        .await
        .expect("oneshot /analyze");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let v = read_json(resp).await;
    assert_eq!(
        v["error"],
        json!("Text must be at least 3 characters long")
    );
}

#[tokio::test]
async fn analyze_rejects_whitespace_only_input() {
    let app = test_router(0.1);

    let resp = app
        .oneshot(post_json("/analyze", &json!({ "text": "    " })))
        .await
        .expect("oneshot /analyze");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_returns_503_when_model_not_loaded() {
    let state = AppState::new(
        AppConfig::default(),
        Arc::new(DisabledToxicityModel),
        Arc::new(LexiconSentiment::new()),
        Arc::new(UnavailableRewriteProvider),
    );
    let app = api::router(state);

    let resp = app
        .oneshot(post_json("/analyze", &json!({ "text": "hello there" })))
        .await
        .expect("oneshot /analyze");
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let v = read_json(resp).await;
    assert!(v["error"].as_str().unwrap().contains("not loaded"));
}

#[tokio::test]
async fn rewrite_endpoint_uses_rules_when_remote_unavailable() {
    let app = test_router(0.9);

    let resp = app
        .oneshot(post_json("/rewrite", &json!({ "text": "you stupid idiots made this crap" })))
        .await
        .expect("oneshot /rewrite");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    assert_eq!(v["success"], json!(true));
    assert_eq!(v["method_used"], json!("rules"));
    let rewritten = v["rewritten_text"].as_str().unwrap().to_lowercase();
    assert!(!rewritten.contains("stupid"));
    assert!(!rewritten.contains("crap"));
}

#[tokio::test]
async fn crisis_detect_escalates_imminent_text_with_resources() {
    let app = test_router(0.1);

    let payload = json!({ "text": "I want to kill myself tonight", "country": "UK" });
    let resp = app
        .oneshot(post_json("/crisis/detect", &payload))
        .await
        .expect("oneshot /crisis/detect");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    assert_eq!(v["risk_level"], json!("IMMINENT"));
    assert_eq!(v["requires_escalation"], json!(true));
    assert_eq!(v["recommended_action"], json!("EMERGENCY_CONTACT"));

    let resources = v.get("resources").expect("resources attached");
    assert_eq!(resources["country"], json!("UK"));
    assert_eq!(resources["emergency"]["number"], json!("999"));
}

#[tokio::test]
async fn crisis_detect_low_risk_has_no_resources() {
    let app = test_router(0.1);

    let resp = app
        .oneshot(post_json("/crisis/detect", &json!({ "text": "Feeling a bit sad today" })))
        .await
        .expect("oneshot /crisis/detect");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    assert_eq!(v["risk_level"], json!("LOW"));
    assert_eq!(v["requires_escalation"], json!(false));
    let confidence = v["confidence"].as_f64().unwrap();
    assert!((confidence - 0.55).abs() < 1e-6);
    assert!(v.get("resources").is_none());
}

#[tokio::test]
async fn stats_reports_fixed_tables_and_limits() {
    let app = test_router(0.1);

    let req = Request::builder()
        .method("GET")
        .uri("/stats")
        .body(Body::empty())
        .expect("build GET /stats");
    let resp = app.oneshot(req).await.expect("oneshot /stats");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    assert_eq!(v["max_text_length"], json!(5000));
    assert_eq!(v["supported_categories"].as_array().unwrap().len(), 7);
    assert!(v["toxic_words_count"].as_u64().unwrap() > 0);
    let threshold = v["toxicity_threshold"].as_f64().unwrap();
    assert!((threshold - 0.5).abs() < 1e-6);
}

#[tokio::test]
async fn history_records_completed_analyses() {
    let app = test_router(0.9);

    let resp = app
        .clone()
        .oneshot(post_json("/analyze", &json!({ "text": "This is fucking garbage" })))
        .await
        .expect("oneshot /analyze");
    assert!(resp.status().is_success());

    let req = Request::builder()
        .method("GET")
        .uri("/history?n=5")
        .body(Body::empty())
        .expect("build GET /history");
    let resp = app.oneshot(req).await.expect("oneshot /history");
    assert!(resp.status().is_success());

    let v = read_json(resp).await;
    assert_eq!(v["count"], json!(1));
    let record = &v["records"][0];
    assert_eq!(record["is_toxic"], json!(true));
    assert_eq!(record["risk_level"], json!("LOW"));
    // Raw text never lands in history, only its hash.
    assert!(record.get("original_text").is_none());
    assert!(record["text_hash"].as_str().unwrap().len() == 12);
}
