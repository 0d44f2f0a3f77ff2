// src/crisis/mod.rs
//! Mental-health crisis risk classifier: an ordered priority cascade over
//! compiled keyword patterns. Pure and deterministic; never raises. Any
//! ambiguous or empty input classifies as LOW.

pub mod resources;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Acute first-person intent plus method/resolve language. A single match
/// short-circuits the whole cascade.
const IMMINENT_PATTERNS: &[&str] = &[
    r"\b(kill|end|die|suicide|overdose)\s+(myself|me)\b",
    r"\bgoing to (kill|hurt) myself\b",
    r"\bhave a (plan|method) to (kill|hurt|end)\b",
    r"\bgoodbye (forever|world|cruel world)\b",
    r"\bcan'?t (take|go on) (anymore|any longer)\b",
    r"\bno (reason|point) to live\b",
    r"\bwant to (die|end it all)\b",
];

/// Hopelessness, active self-harm references, desire for death.
const HIGH_RISK_PATTERNS: &[&str] = &[
    r"\b(depressed|hopeless|worthless|burden)\b",
    r"\bthoughts? of (death|dying|suicide)\b",
    r"\bwish i (was|were) dead\b",
    r"\bself[ -]?harm\b",
    r"\bcutting (myself|me)\b",
    r"\b(hurting|harming) myself\b",
    r"\bbetter off dead\b",
];

/// Isolation, numbness, sleep/appetite disruption, anhedonia.
const MEDIUM_RISK_PATTERNS: &[&str] = &[
    r"\b(sad|empty|numb|alone|isolated)\b",
    r"\bcan'?t (sleep|eat|concentrate)\b",
    r"\blost (interest|pleasure) in everything\b",
    r"\bfeel like (nothing|a failure)\b",
    r"\bno (one|body) (cares|understands)\b",
];

static IMMINENT: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| compile(IMMINENT_PATTERNS));
static HIGH: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| compile(HIGH_RISK_PATTERNS));
static MEDIUM: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| compile(MEDIUM_RISK_PATTERNS));

fn compile(patterns: &[&'static str]) -> Vec<(&'static str, Regex)> {
    patterns
        .iter()
        .map(|p| (*p, Regex::new(p).expect("crisis pattern regex")))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Imminent,
}

impl RiskLevel {
    pub fn requires_escalation(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Imminent)
    }

    /// Recommended action is a pure function of the risk level.
    pub fn recommended_action(self) -> RecommendedAction {
        match self {
            RiskLevel::Imminent => RecommendedAction::EmergencyContact,
            RiskLevel::High => RecommendedAction::ScheduleHumanContact,
            RiskLevel::Medium => RecommendedAction::ProvideCopingTools,
            RiskLevel::Low => RecommendedAction::ContinueChat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    ContinueChat,
    ProvideCopingTools,
    ScheduleHumanContact,
    EmergencyContact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrisisAssessment {
    pub risk_level: RiskLevel,
    pub confidence: f32,
    /// Identifiers of matched patterns, in tier-table order.
    pub triggers: Vec<String>,
    pub requires_escalation: bool,
    pub recommended_action: RecommendedAction,
}

impl CrisisAssessment {
    fn at(level: RiskLevel, confidence: f32, triggers: Vec<String>) -> Self {
        Self {
            risk_level: level,
            confidence,
            triggers,
            requires_escalation: level.requires_escalation(),
            recommended_action: level.recommended_action(),
        }
    }
}

/// Classify `text` into one of the four tiers. Earlier tiers short-circuit
/// later ones: an imminent match wins regardless of other matches.
pub fn classify(text: &str) -> CrisisAssessment {
    let lowered = text.to_lowercase();

    for (id, re) in IMMINENT.iter() {
        if re.is_match(&lowered) {
            return CrisisAssessment::at(RiskLevel::Imminent, 0.95, vec![(*id).to_string()]);
        }
    }

    let high: Vec<String> = HIGH
        .iter()
        .filter(|(_, re)| re.is_match(&lowered))
        .map(|(id, _)| (*id).to_string())
        .collect();
    if !high.is_empty() {
        return CrisisAssessment::at(RiskLevel::High, 0.85, high);
    }

    let medium: Vec<String> = MEDIUM
        .iter()
        .filter(|(_, re)| re.is_match(&lowered))
        .map(|(id, _)| (*id).to_string())
        .collect();
    match medium.len() {
        0 => CrisisAssessment::at(RiskLevel::Low, 0.50, Vec::new()),
        1 => CrisisAssessment::at(RiskLevel::Low, 0.55, medium),
        _ => CrisisAssessment::at(RiskLevel::Medium, 0.65, medium),
    }
}
