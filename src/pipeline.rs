// src/pipeline.rs
//! # Analysis Orchestrator
//! Combines the toxicity oracle, sentiment comparison, redaction, hybrid
//! rewriting and crisis classification into one consistent decision per
//! request. Step order is fixed; toxicity and original-text sentiment run
//! concurrently and are joined before redaction.

use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tracing::{debug, error, info};

use crate::config::{AppConfig, MAX_TEXT_LEN, MIN_TEXT_LEN};
use crate::crisis::{self, resources, CrisisAssessment};
use crate::error::AnalyzeError;
use crate::history::{History, HistoryEntry};
use crate::redaction::{self, RedactionResult};
use crate::rewrite::{HybridRewriter, RewriteMethod};
use crate::sentiment::{self, DynSentimentModel, SentimentReading};
use crate::toxicity::{DynToxicityModel, ToxicityScores};

/// The unit returned to the caller; immutable after construction.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AnalysisResult {
    pub success: bool,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<u64>,
    pub original_text: String,
    pub cleaned_text: String,
    pub rewrite_suggestion: Option<String>,
    pub rewrite_method: Option<RewriteMethod>,
    pub text_length: usize,
    pub is_toxic: bool,
    pub toxicity_scores: ToxicityScores,
    pub categories_flagged: Vec<String>,
    pub toxic_words_found: Vec<String>,
    pub toxic_word_count: usize,
    /// toxicity score × 100, rounded to two decimals.
    pub overall_toxicity: f32,
    pub sentiment_original: SentimentReading,
    pub sentiment_cleaned: SentimentReading,
    pub sentiment_improvement: f32,
    pub sentiment_improved: bool,
    pub crisis: CrisisAssessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis_resources: Option<resources::CrisisResources>,
}

/// Reject malformed input before any oracle call.
pub fn validate_input(text: &str) -> Result<(), AnalyzeError> {
    if text.is_empty() {
        return Err(AnalyzeError::validation("Text cannot be empty"));
    }
    if text.trim().is_empty() {
        return Err(AnalyzeError::validation(
            "Text cannot contain only whitespace",
        ));
    }
    let chars = text.chars().count();
    if chars > MAX_TEXT_LEN {
        return Err(AnalyzeError::validation(format!(
            "Text exceeds maximum length of {MAX_TEXT_LEN} characters"
        )));
    }
    if chars < MIN_TEXT_LEN {
        return Err(AnalyzeError::validation(format!(
            "Text must be at least {MIN_TEXT_LEN} characters long"
        )));
    }
    Ok(())
}

pub struct Analyzer {
    config: AppConfig,
    toxicity: DynToxicityModel,
    sentiment: DynSentimentModel,
    rewriter: HybridRewriter,
    history: Arc<History>,
}

impl Analyzer {
    pub fn new(
        config: AppConfig,
        toxicity: DynToxicityModel,
        sentiment: DynSentimentModel,
        rewriter: HybridRewriter,
        history: Arc<History>,
    ) -> Self {
        Self {
            config,
            toxicity,
            sentiment,
            rewriter,
            history,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn toxicity_loaded(&self) -> bool {
        self.toxicity.is_loaded()
    }

    pub fn remote_rewrite_available(&self) -> bool {
        self.rewriter.remote_available()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Rewrite endpoint path: validation + the hybrid router, nothing else.
    pub async fn rewrite(&self, text: &str) -> Result<crate::rewrite::RewriteOutcome, AnalyzeError> {
        validate_input(text)?;
        counter!("rewrite_requests_total").increment(1);
        Ok(self.rewriter.rewrite(text).await)
    }

    /// Full analysis pipeline. Persistence failures never fail the request;
    /// remote rewrite failures are recovered by the router.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalyzeError> {
        validate_input(text)?;

        if !self.toxicity.is_loaded() {
            return Err(AnalyzeError::OracleUnavailable("toxicity"));
        }

        counter!("analyze_requests_total").increment(1);
        let text_id = anon_hash(text);
        debug!(id = %text_id, chars = text.chars().count(), "analyzing text");

        // Steps 2–3: toxicity and original-text sentiment are independent.
        let (tox, sentiment_original) = tokio::join!(
            self.toxicity.predict(text),
            sentiment::read(self.sentiment.as_ref(), text),
        );

        let scores = tox.map_err(|e| {
            error!(id = %text_id, error = %e, "toxicity scoring failed");
            AnalyzeError::internal("toxicity scoring failed")
        })?;

        // Step 4: crisis classification is unconditional and independent of
        // the toxicity verdict.
        let crisis = crisis::classify(text);
        if crisis.requires_escalation {
            counter!("crisis_escalations_total").increment(1);
            info!(id = %text_id, risk = ?crisis.risk_level, "crisis escalation");
        }

        let threshold = self.config.toxicity_threshold;
        let is_toxic = scores.toxicity > threshold;

        // Step 5: redaction only for toxic input.
        let redaction = if is_toxic {
            redaction::redact(text)
        } else {
            RedactionResult::unchanged(text)
        };

        // Step 6: sentiment on the cleaned variant + improvement verdict.
        let sentiment_cleaned =
            sentiment::read(self.sentiment.as_ref(), &redaction.cleaned_text).await;
        let comparison = sentiment::compare(sentiment_original, sentiment_cleaned);

        // Step 7: rewrite suggestion for toxic input. The router recovers
        // remote failures internally; `failed` would only appear if the
        // terminal rule stage were unreachable, in which case the cleaned
        // text stands in as the suggestion.
        let (rewrite_suggestion, rewrite_method) = if is_toxic {
            let outcome = self.rewriter.rewrite(text).await;
            if outcome.succeeded {
                (Some(outcome.rewritten_text), Some(outcome.method_used))
            } else {
                (
                    Some(redaction.cleaned_text.clone()),
                    Some(RewriteMethod::Failed),
                )
            }
        } else {
            (None, None)
        };

        let crisis_resources = if crisis.requires_escalation {
            Some(resources::for_country("US"))
        } else {
            None
        };

        let mut result = AnalysisResult {
            success: true,
            timestamp: Utc::now().to_rfc3339(),
            record_id: None,
            original_text: text.to_string(),
            cleaned_text: redaction.cleaned_text,
            rewrite_suggestion,
            rewrite_method,
            text_length: text.chars().count(),
            is_toxic,
            toxicity_scores: scores,
            categories_flagged: scores.flagged(threshold),
            toxic_word_count: redaction.matched_terms.len(),
            toxic_words_found: redaction.matched_terms,
            overall_toxicity: round2(scores.toxicity * 100.0),
            sentiment_original: comparison.original,
            sentiment_cleaned: comparison.cleaned,
            sentiment_improvement: comparison.improvement,
            sentiment_improved: comparison.improved,
            crisis,
            crisis_resources,
        };

        // Step 9: best-effort persistence; a dropped record only costs the id.
        result.record_id = self.history.push(HistoryEntry {
            id: 0,
            ts_unix: 0,
            text_hash: text_id.clone(),
            text_length: result.text_length,
            is_toxic: result.is_toxic,
            overall_toxicity: result.overall_toxicity,
            sentiment_label: result.sentiment_cleaned.label,
            sentiment_improved: result.sentiment_improved,
            risk_level: result.crisis.risk_level,
            rewrite_method: result.rewrite_method,
        });

        info!(
            id = %text_id,
            toxic = result.is_toxic,
            risk = ?result.crisis.risk_level,
            method = ?result.rewrite_method,
            "analysis complete"
        );
        Ok(result)
    }
}

/// Short hashed identifier for log/history lines; raw text is never logged.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}
