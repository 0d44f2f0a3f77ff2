// src/config.rs
//! Runtime configuration: an immutable value object built once at startup
//! from environment variables, then passed down read-only.

use std::time::Duration;

// --- env names & defaults ---
pub const ENV_TOXICITY_THRESHOLD: &str = "TOXICITY_THRESHOLD";
pub const ENV_PREFER_LOCAL: &str = "PREFER_LOCAL";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_REWRITE_TIMEOUT_SECS: &str = "REWRITE_TIMEOUT_SECS";
pub const ENV_HISTORY_CAPACITY: &str = "HISTORY_CAPACITY";
pub const ENV_TOXICITY_API_URL: &str = "TOXICITY_API_URL";

/// 0.5 is the flagging threshold of the current revision; the earlier
/// revision shipped 0.7. Override via `TOXICITY_THRESHOLD`.
pub const DEFAULT_TOXICITY_THRESHOLD: f32 = 0.5;
pub const DEFAULT_REWRITE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_HISTORY_CAPACITY: usize = 2000;
pub const DEFAULT_TOXICITY_API_URL: &str = "http://127.0.0.1:8081/predict";

/// Input validation bounds (characters).
pub const MIN_TEXT_LEN: usize = 3;
pub const MAX_TEXT_LEN: usize = 5000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Toxicity verdict threshold: `is_toxic = toxicity score > threshold`.
    /// Also used for per-category flagging.
    pub toxicity_threshold: f32,
    /// When true, the remote rewrite call is skipped entirely and the
    /// rule-based rewriter handles every request.
    pub prefer_local: bool,
    /// Remote rewrite API key. Absence marks the remote path unavailable.
    pub groq_api_key: Option<String>,
    /// Per-call deadline for the remote rewrite; on expiry the fallback
    /// chain triggers exactly as on explicit failure.
    pub rewrite_timeout: Duration,
    /// Bounded capacity of the in-memory analysis history.
    pub history_capacity: usize,
    /// Endpoint of the remote toxicity scoring service.
    pub toxicity_api_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            toxicity_threshold: DEFAULT_TOXICITY_THRESHOLD,
            prefer_local: false,
            groq_api_key: None,
            rewrite_timeout: Duration::from_secs(DEFAULT_REWRITE_TIMEOUT_SECS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            toxicity_api_url: DEFAULT_TOXICITY_API_URL.to_string(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from the process environment. Missing or
    /// malformed variables fall back to documented defaults; the threshold
    /// is clamped to [0, 1].
    pub fn from_env() -> Self {
        let toxicity_threshold = parse_threshold_env(std::env::var(ENV_TOXICITY_THRESHOLD).ok())
            .unwrap_or(DEFAULT_TOXICITY_THRESHOLD);

        let prefer_local = std::env::var(ENV_PREFER_LOCAL)
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        let groq_api_key = std::env::var(ENV_GROQ_API_KEY)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let rewrite_timeout = std::env::var(ENV_REWRITE_TIMEOUT_SECS)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REWRITE_TIMEOUT_SECS));

        let history_capacity = std::env::var(ENV_HISTORY_CAPACITY)
            .ok()
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_HISTORY_CAPACITY);

        let toxicity_api_url = std::env::var(ENV_TOXICITY_API_URL)
            .unwrap_or_else(|_| DEFAULT_TOXICITY_API_URL.to_string());

        Self {
            toxicity_threshold,
            prefer_local,
            groq_api_key,
            rewrite_timeout,
            history_capacity,
            toxicity_api_url,
        }
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f32> {
    raw.and_then(|s| s.trim().parse::<f32>().ok())
        .map(|v| v.clamp(0.0, 1.0))
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_env_is_clamped() {
        assert_eq!(parse_threshold_env(Some("1.7".into())), Some(1.0));
        assert_eq!(parse_threshold_env(Some("-0.3".into())), Some(0.0));
        assert_eq!(parse_threshold_env(Some("0.7".into())), Some(0.7));
        assert_eq!(parse_threshold_env(Some("abc".into())), None);
        assert_eq!(parse_threshold_env(None), None);
    }

    #[test]
    fn bool_env_accepts_common_spellings() {
        assert!(parse_bool("true"));
        assert!(parse_bool(" TRUE "));
        assert!(parse_bool("1"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = AppConfig::default();
        assert!((cfg.toxicity_threshold - 0.5).abs() < f32::EPSILON);
        assert!(!cfg.prefer_local);
        assert_eq!(cfg.rewrite_timeout, Duration::from_secs(8));
        assert_eq!(cfg.history_capacity, 2000);
    }
}
