// src/sentiment.rs
//! Sentiment oracle contract, lexicon-backed scorer, and the before/after
//! comparison used to judge whether redaction improved the text.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Lexicon scores live in [-5, 5]; used to normalize polarity into [-1, 1].
const LEXICON_SCALE: f32 = 5.0;

/// Raw oracle output: polarity in [-1,1], subjectivity in [0,1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSentiment {
    pub polarity: f32,
    pub subjectivity: f32,
}

/// Trait object for the sentiment oracle so tests can substitute doubles.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    async fn score(&self, text: &str) -> anyhow::Result<RawSentiment>;
    fn name(&self) -> &'static str;
}

pub type DynSentimentModel = Arc<dyn SentimentModel>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

/// One reading per text variant (original, cleaned). Derived
/// deterministically from polarity via fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentReading {
    pub label: SentimentLabel,
    pub polarity: f32,
    pub subjectivity: f32,
    /// |polarity| as a percentage.
    pub confidence: f32,
    /// Polarity normalized to [0,1].
    pub score: f32,
}

impl SentimentReading {
    /// Thresholds: p > 0.1 → Positive; p < -0.1 → Negative; else Neutral.
    pub fn from_raw(raw: RawSentiment) -> Self {
        let label = if raw.polarity > 0.1 {
            SentimentLabel::Positive
        } else if raw.polarity < -0.1 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Self {
            label,
            polarity: round4(raw.polarity),
            subjectivity: round4(raw.subjectivity),
            confidence: round2(raw.polarity.abs() * 100.0),
            score: round4((raw.polarity + 1.0) / 2.0),
        }
    }

    /// Degraded reading when the oracle fails; never surfaced as an error.
    pub fn unknown() -> Self {
        Self {
            label: SentimentLabel::Unknown,
            polarity: 0.0,
            subjectivity: 0.0,
            confidence: 0.0,
            score: 0.5,
        }
    }
}

/// Result of comparing sentiment before and after cleaning.
#[derive(Debug, Clone, Serialize)]
pub struct SentimentComparison {
    pub original: SentimentReading,
    pub cleaned: SentimentReading,
    pub improvement: f32,
    pub improved: bool,
}

/// Score one variant; oracle failure degrades to the Unknown reading.
pub async fn read(model: &dyn SentimentModel, text: &str) -> SentimentReading {
    match model.score(text).await {
        Ok(raw) => SentimentReading::from_raw(raw),
        Err(e) => {
            tracing::warn!(provider = model.name(), error = %e, "sentiment scoring failed");
            SentimentReading::unknown()
        }
    }
}

/// `improved` requires both a meaningful polarity gain and a cleaned label
/// that is no longer negative; a lesser negative is not an improvement.
pub fn compare(original: SentimentReading, cleaned: SentimentReading) -> SentimentComparison {
    let improvement = round4(cleaned.polarity - original.polarity);
    let improved = improvement > 0.1
        && matches!(
            cleaned.label,
            SentimentLabel::Positive | SentimentLabel::Neutral
        );
    SentimentComparison {
        original,
        cleaned,
        improvement,
        improved,
    }
}

fn round4(x: f32) -> f32 {
    (x * 10_000.0).round() / 10_000.0
}

fn round2(x: f32) -> f32 {
    (x * 100.0).round() / 100.0
}

// ------------------------------------------------------------
// Lexicon-backed local implementation
// ------------------------------------------------------------

/// Deterministic lexicon scorer. Polarity is the negation-adjusted sum of
/// word scores normalized by the number of scoring words; subjectivity is
/// the fraction of tokens carrying any sentiment at all.
#[derive(Debug, Clone, Default)]
pub struct LexiconSentiment;

impl LexiconSentiment {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Negation: a negator within the previous 1..=3 tokens inverts the
    /// sign of a word's lexicon score.
    pub fn score_text(&self, text: &str) -> RawSentiment {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut sum: i32 = 0;
        let mut hits: usize = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(tokens[i].as_str());
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));
            sum += if negated { -base } else { base };
            hits += 1;
        }

        if hits == 0 || tokens.is_empty() {
            return RawSentiment {
                polarity: 0.0,
                subjectivity: 0.0,
            };
        }

        let polarity = (sum as f32 / (hits as f32 * LEXICON_SCALE)).clamp(-1.0, 1.0);
        let subjectivity = (hits as f32 / tokens.len() as f32).clamp(0.0, 1.0);
        RawSentiment {
            polarity,
            subjectivity,
        }
    }
}

#[async_trait]
impl SentimentModel for LexiconSentiment {
    async fn score(&self, text: &str) -> anyhow::Result<RawSentiment> {
        Ok(self.score_text(text))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Module-level tokenization: alphanumeric tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_ascii_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "without"
    )
}

// ------------------------------------------------------------
// Failing double for degradation tests
// ------------------------------------------------------------

/// Always errors; exercises the Unknown degradation path.
pub struct FailingSentimentModel;

#[async_trait]
impl SentimentModel for FailingSentimentModel {
    async fn score(&self, _text: &str) -> anyhow::Result<RawSentiment> {
        anyhow::bail!("sentiment backend offline")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
