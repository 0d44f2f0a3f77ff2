// src/rewrite/mod.rs
//! Hybrid rewrite router: remote-LLM-first with a deterministic rule-based
//! fallback. The chain is an explicit ordered list of strategies, each
//! returning a result; no errors cross layer boundaries.

pub mod remote;
pub mod rules;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use remote::{DynRewriteProvider, GroqRewriter, RewriteProvider};
pub use rules::RuleBasedRewriter;

/// Which stage of the fallback chain satisfied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMethod {
    /// Remote call returned without error. Service name retained as an
    /// identifier on the wire.
    Groq,
    Rules,
    None,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct RewriteOutcome {
    pub rewritten_text: String,
    pub method_used: RewriteMethod,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct HybridRewriter {
    remote: DynRewriteProvider,
    rules: RuleBasedRewriter,
    prefer_local: bool,
}

impl HybridRewriter {
    pub fn new(remote: DynRewriteProvider, prefer_local: bool) -> Self {
        Self {
            remote,
            rules: RuleBasedRewriter::new(),
            prefer_local,
        }
    }

    pub fn remote_available(&self) -> bool {
        self.remote.is_available()
    }

    /// Strategy order: remote (unless `prefer_local` or unavailable), then
    /// rules. The rule stage cannot fail, so `method_used = failed` is never
    /// produced here; the variant exists as the wire-level terminal marker.
    pub async fn rewrite(&self, text: &str) -> RewriteOutcome {
        let mut remote_error: Option<String> = None;

        if !self.prefer_local && self.remote.is_available() {
            match self.remote.rewrite(text).await {
                Ok(rewritten) => {
                    return RewriteOutcome {
                        rewritten_text: rewritten,
                        method_used: RewriteMethod::Groq,
                        succeeded: true,
                        error: None,
                    };
                }
                Err(e) => {
                    warn!(provider = self.remote.name(), error = %e, "remote rewrite failed, falling back to rules");
                    remote_error = Some(e.to_string());
                }
            }
        }

        RewriteOutcome {
            rewritten_text: self.rules.rewrite(text),
            method_used: RewriteMethod::Rules,
            succeeded: true,
            error: remote_error,
        }
    }
}
