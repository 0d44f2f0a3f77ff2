// src/toxicity.rs
//! Toxicity oracle contract + remote scoring client.
//!
//! The scoring model itself is an external collaborator (a Detoxify-style
//! service). This module defines the trait the pipeline depends on, a
//! reqwest-backed implementation, and stubs for tests and degraded boots.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The fixed category set every score set carries.
pub const TOXICITY_CATEGORIES: [&str; 7] = [
    "toxicity",
    "severe_toxicity",
    "obscene",
    "threat",
    "insult",
    "identity_attack",
    "sexual_explicit",
];

/// Per-category probabilities in [0,1]. Immutable once produced; the
/// `toxicity` value alone determines the toxic/non-toxic verdict.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToxicityScores {
    pub toxicity: f32,
    pub severe_toxicity: f32,
    pub obscene: f32,
    pub threat: f32,
    pub insult: f32,
    pub identity_attack: f32,
    pub sexual_explicit: f32,
}

impl ToxicityScores {
    pub fn by_category(&self) -> [(&'static str, f32); 7] {
        [
            ("toxicity", self.toxicity),
            ("severe_toxicity", self.severe_toxicity),
            ("obscene", self.obscene),
            ("threat", self.threat),
            ("insult", self.insult),
            ("identity_attack", self.identity_attack),
            ("sexual_explicit", self.sexual_explicit),
        ]
    }

    /// Categories whose score exceeds `threshold`, in the fixed order.
    pub fn flagged(&self, threshold: f32) -> Vec<String> {
        self.by_category()
            .iter()
            .filter(|(_, v)| *v > threshold)
            .map(|(k, _)| (*k).to_string())
            .collect()
    }
}

/// Trait object used by the pipeline and handlers; lets tests substitute
/// deterministic doubles for the real model.
#[async_trait]
pub trait ToxicityModel: Send + Sync {
    /// Score `text` across the fixed category set.
    /// Must not be called with empty text.
    async fn predict(&self, text: &str) -> anyhow::Result<ToxicityScores>;

    /// Whether the collaborator was initialized. The pipeline rejects
    /// requests with a service-unavailable condition when this is false.
    fn is_loaded(&self) -> bool {
        true
    }

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynToxicityModel = Arc<dyn ToxicityModel>;

/// Remote scoring service speaking a JSON predict API.
pub struct RemoteToxicityModel {
    http: reqwest::Client,
    endpoint: String,
}

impl RemoteToxicityModel {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("detox-sentiment-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(10))
            .build()
            .expect("reqwest client");
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ToxicityModel for RemoteToxicityModel {
    async fn predict(&self, text: &str) -> anyhow::Result<ToxicityScores> {
        #[derive(Serialize)]
        struct Req<'a> {
            text: &'a str,
        }

        let resp = self
            .http
            .post(&self.endpoint)
            .json(&Req { text })
            .send()
            .await?
            .error_for_status()?;

        let scores: ToxicityScores = resp.json().await?;
        Ok(scores)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

/// Stand-in for a model that failed to load; `is_loaded()` reports false so
/// the pipeline rejects before calling `predict`.
pub struct DisabledToxicityModel;

#[async_trait]
impl ToxicityModel for DisabledToxicityModel {
    async fn predict(&self, _text: &str) -> anyhow::Result<ToxicityScores> {
        anyhow::bail!("toxicity model disabled")
    }

    fn is_loaded(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

/// Deterministic double for tests/local runs: returns a fixed score set.
#[derive(Clone)]
pub struct MockToxicityModel {
    pub fixed: ToxicityScores,
}

#[async_trait]
impl ToxicityModel for MockToxicityModel {
    async fn predict(&self, _text: &str) -> anyhow::Result<ToxicityScores> {
        Ok(self.fixed)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
