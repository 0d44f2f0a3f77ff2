// src/crisis/resources.rs
//! Locale-appropriate crisis hotlines. Data-only: a fixed table keyed by
//! country code, attached to escalation-worthy assessments. Unknown codes
//! fall back to the US table; the emergency number falls back to 112.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hotline {
    pub kind: &'static str,
    pub name: &'static str,
    pub number: &'static str,
    /// True for text/SMS lines.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub sms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrisisResources {
    pub country: String,
    pub hotlines: Vec<Hotline>,
    pub emergency: Hotline,
}

const fn line(kind: &'static str, name: &'static str, number: &'static str) -> Hotline {
    Hotline {
        kind,
        name,
        number,
        sms: false,
    }
}

const fn sms_line(kind: &'static str, name: &'static str, number: &'static str) -> Hotline {
    Hotline {
        kind,
        name,
        number,
        sms: true,
    }
}

fn hotlines_for(country: &str) -> Vec<Hotline> {
    match country {
        "US" => vec![
            line(
                "suicide_prevention",
                "National Suicide Prevention Lifeline",
                "988",
            ),
            sms_line("crisis_text", "Crisis Text Line", "741741"),
            line("veterans", "Veterans Crisis Line", "988 then press 1"),
        ],
        "IN" => vec![
            line("suicide_prevention", "Vandrevala Foundation", "+91-9152987821"),
            line("mental_health", "Tele MANAS", "+91-8069878680"),
            line("women", "iCall - Women's Helpline", "+91-7827170170"),
        ],
        "UK" => vec![
            line("suicide_prevention", "Samaritans", "116123"),
            sms_line("text", "Shout Crisis Text Line", "85258"),
        ],
        "AU" => vec![
            line("suicide_prevention", "Lifeline Australia", "131114"),
            line("mental_health", "Beyond Blue", "1300224636"),
        ],
        _ => hotlines_for("US"),
    }
}

fn emergency_number(country: &str) -> &'static str {
    match country {
        "US" => "911",
        "IN" => "112",
        "UK" => "999",
        "AU" => "000",
        _ => "112",
    }
}

/// Fetch resources for a country code (case-insensitive, default "US").
pub fn for_country(code: &str) -> CrisisResources {
    let normalized = code.trim().to_ascii_uppercase();
    let country = if normalized.is_empty() {
        "US".to_string()
    } else {
        normalized
    };
    CrisisResources {
        hotlines: hotlines_for(&country),
        emergency: line("emergency", "Emergency Services", emergency_number(&country)),
        country,
    }
}
