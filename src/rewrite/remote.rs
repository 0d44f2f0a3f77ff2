// src/rewrite/remote.rs
//! Remote rewrite collaborator: a Groq-hosted chat-completions client.
//! Availability is computed once at startup; every call runs under a
//! deadline so a hung upstream can never block a request.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Low-level provider contract; the router only sees this trait so tests
/// can swap in deterministic doubles.
#[async_trait]
pub trait RewriteProvider: Send + Sync {
    async fn rewrite(&self, text: &str) -> anyhow::Result<String>;

    /// Computed once at startup (key presence / connectivity probe result).
    fn is_available(&self) -> bool;

    /// Provider name for diagnostics/headers.
    fn name(&self) -> &'static str;
}

pub type DynRewriteProvider = Arc<dyn RewriteProvider>;

pub struct GroqRewriter {
    http: reqwest::Client,
    api_key: String,
    timeout: Duration,
    available: bool,
}

impl GroqRewriter {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Self {
        let api_key = api_key.unwrap_or_default();
        let available = !api_key.trim().is_empty();
        let http = reqwest::Client::builder()
            .user_agent("detox-sentiment-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            timeout,
            available,
        }
    }

    fn prompt(text: &str) -> String {
        format!(
            "Rewrite this toxic feedback into professional, constructive language \
             while preserving the core message. Remove all profanity, insults, and \
             offensive language.\n\nOriginal: \"{text}\"\n\nProfessional version \
             (output ONLY the rewritten text):"
        )
    }
}

#[async_trait]
impl RewriteProvider for GroqRewriter {
    async fn rewrite(&self, text: &str) -> anyhow::Result<String> {
        if !self.available {
            anyhow::bail!("remote rewrite service not available");
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
            max_tokens: u32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let prompt = Self::prompt(text);
        let req = Req {
            model: GROQ_MODEL,
            messages: vec![Msg {
                role: "user",
                content: &prompt,
            }],
            temperature: 0.5,
            max_tokens: 300,
        };

        let call = async {
            let resp = self
                .http
                .post(GROQ_ENDPOINT)
                .bearer_auth(&self.api_key)
                .json(&req)
                .send()
                .await?
                .error_for_status()?;
            let body: Resp = resp.json().await?;
            anyhow::Ok(body)
        };

        // The reqwest client carries its own timeout; this outer deadline
        // also covers body streaming and deserialization.
        let body = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| anyhow::anyhow!("remote rewrite timed out"))??;

        let content = body
            .choices
            .first()
            .map(|c| c.message.content.trim())
            .unwrap_or("");
        let rewritten = content.trim_matches(&['"', '\''][..]).trim();
        if rewritten.is_empty() {
            anyhow::bail!("remote rewrite returned empty content");
        }
        Ok(rewritten.to_string())
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

/// Fixed-output double for tests and local runs.
#[derive(Clone)]
pub struct MockRewriteProvider {
    pub fixed: String,
}

#[async_trait]
impl RewriteProvider for MockRewriteProvider {
    async fn rewrite(&self, _text: &str) -> anyhow::Result<String> {
        Ok(self.fixed.clone())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Double whose calls always fail; exercises the fallback chain.
pub struct FailingRewriteProvider;

#[async_trait]
impl RewriteProvider for FailingRewriteProvider {
    async fn rewrite(&self, _text: &str) -> anyhow::Result<String> {
        anyhow::bail!("simulated transport error")
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Double that stalls past its deadline, erroring on expiry exactly like a
/// hung upstream under the per-call timeout.
pub struct SlowRewriteProvider {
    pub delay: Duration,
    pub timeout: Duration,
}

#[async_trait]
impl RewriteProvider for SlowRewriteProvider {
    async fn rewrite(&self, _text: &str) -> anyhow::Result<String> {
        tokio::time::timeout(self.timeout, tokio::time::sleep(self.delay))
            .await
            .map_err(|_| anyhow::anyhow!("remote rewrite timed out"))?;
        Ok("finished in time".to_string())
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

/// Double reporting itself unavailable; the router must skip it entirely.
pub struct UnavailableRewriteProvider;

#[async_trait]
impl RewriteProvider for UnavailableRewriteProvider {
    async fn rewrite(&self, _text: &str) -> anyhow::Result<String> {
        anyhow::bail!("remote rewrite service not available")
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
