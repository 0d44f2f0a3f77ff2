// src/error.rs
//! Error taxonomy for the analysis pipeline.
//!
//! Only conditions that reject a request live here. Remote-rewrite failures
//! and history-store failures are recovered inside the pipeline (fallback
//! rewriter / omitted record id) and never reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// Malformed, undersized or oversized input. Surfaced verbatim, and
    /// rejected before any oracle call.
    #[error("{0}")]
    Validation(String),

    /// A required collaborator (toxicity or sentiment model) is not
    /// initialized; the request cannot be served.
    #[error("{0} model not loaded")]
    OracleUnavailable(&'static str),

    /// Anything unexpected. Full detail is logged server-side; callers only
    /// see a generic message.
    #[error("analysis failed: {0}")]
    Internal(String),
}

impl AnalyzeError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
