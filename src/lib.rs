// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod crisis;
pub mod error;
pub mod history;
pub mod metrics;
pub mod pipeline;
pub mod redaction;
pub mod rewrite;
pub mod sentiment;
pub mod toxicity;

// ---- Re-exports for stable public API ----
// Router construction: `crate_root::api::router` as well as `crate_root::api::AppState`
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::AnalyzeError;
pub use crate::pipeline::{AnalysisResult, Analyzer};
