// src/redaction.rs
//! Case-insensitive vocabulary redaction.
//!
//! Matching is deliberately substring-based (maximal recall): "asshole" is
//! caught by the earlier "ass" entry. The rule-based rewriter uses
//! whole-word matching instead; the two behaviors serve different purposes
//! and are kept distinct.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const REDACTED_TOKEN: &str = "[REDACTED]";

/// Fixed toxic-term vocabulary, in matching order.
pub const TOXIC_VOCABULARY: [&str; 34] = [
    "bastard", "worthless", "garbage", "stupid", "idiot", "hate", "hurt", "kill", "damn", "hell",
    "ass", "crap", "suck", "ugly", "dumb", "fool", "moron", "loser", "jerk", "screw", "shit",
    "fuck", "bitch", "dick", "piss", "fag", "retard", "slut", "whore", "douche", "asshole",
    "assholes", "dumbass", "fatass",
];

static VOCAB_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    TOXIC_VOCABULARY
        .iter()
        .map(|term| (*term, compile_term(term)))
        .collect()
});

fn compile_term(term: &str) -> Regex {
    Regex::new(&format!("(?i){}", regex::escape(term))).expect("vocabulary regex")
}

/// Output of a redaction pass. `matched_terms` is case-folded and
/// deduplicated; order is not significant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedactionResult {
    pub cleaned_text: String,
    pub matched_terms: Vec<String>,
}

impl RedactionResult {
    /// Pass-through result for non-toxic input.
    pub fn unchanged(text: &str) -> Self {
        Self {
            cleaned_text: text.to_string(),
            matched_terms: Vec::new(),
        }
    }
}

/// Redact every occurrence of the fixed vocabulary. Pure; empty input
/// yields empty output with no matches.
pub fn redact(text: &str) -> RedactionResult {
    let mut cleaned = text.to_string();
    let mut matched = Vec::new();

    for (term, pattern) in VOCAB_PATTERNS.iter() {
        if pattern.is_match(&cleaned) {
            matched.push((*term).to_string());
            cleaned = pattern.replace_all(&cleaned, REDACTED_TOKEN).into_owned();
        }
    }

    RedactionResult {
        cleaned_text: cleaned,
        matched_terms: matched,
    }
}

/// Same pass over a caller-supplied vocabulary (compiled on the fly).
pub fn redact_with(text: &str, vocabulary: &[&str]) -> RedactionResult {
    let mut cleaned = text.to_string();
    let mut matched = Vec::new();

    for term in vocabulary {
        let pattern = compile_term(term);
        if pattern.is_match(&cleaned) {
            let folded = term.to_ascii_lowercase();
            if !matched.contains(&folded) {
                matched.push(folded);
            }
            cleaned = pattern.replace_all(&cleaned, REDACTED_TOKEN).into_owned();
        }
    }

    RedactionResult {
        cleaned_text: cleaned,
        matched_terms: matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaned_text_contains_no_vocabulary_term() {
        let samples = [
            "This is fucking garbage",
            "you STUPID idiot",
            "what an AsShOlE",
            "I hate this, it sucks and it's crap",
        ];
        for text in samples {
            let res = redact(text);
            let lower = res.cleaned_text.to_ascii_lowercase();
            for term in TOXIC_VOCABULARY {
                assert!(
                    !lower.contains(term),
                    "'{term}' survived in '{}'",
                    res.cleaned_text
                );
            }
        }
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let res = redact("GARBAGE in, garbage out");
        assert_eq!(res.cleaned_text, "[REDACTED] in, [REDACTED] out");
        assert_eq!(res.matched_terms, vec!["garbage".to_string()]);
    }

    #[test]
    fn substring_hit_inside_longer_word() {
        // "ass" precedes "asshole" in vocabulary order, so only "ass" matches.
        let res = redact("asshole");
        assert_eq!(res.cleaned_text, "[REDACTED]hole");
        assert_eq!(res.matched_terms, vec!["ass".to_string()]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let res = redact("");
        assert_eq!(res.cleaned_text, "");
        assert!(res.matched_terms.is_empty());
    }

    #[test]
    fn empty_vocabulary_round_trips() {
        let text = "any damn thing at all";
        let res = redact_with(text, &[]);
        assert_eq!(res.cleaned_text, text);
        assert!(res.matched_terms.is_empty());
    }

    #[test]
    fn matched_terms_are_deduplicated() {
        let res = redact_with("Fuck fuck FUCK", &["fuck", "FUCK"]);
        assert_eq!(res.matched_terms, vec!["fuck".to_string()]);
        assert_eq!(res.cleaned_text, "[REDACTED] [REDACTED] [REDACTED]");
    }

    #[test]
    fn clean_text_passes_through() {
        let res = redact("What a lovely morning");
        assert_eq!(res.cleaned_text, "What a lovely morning");
        assert!(res.matched_terms.is_empty());
    }
}
