//! Lexical query preprocessing.
//!
//! Questions are lowercased, domain abbreviations are expanded to their
//! spelled-out forms, and a fixed set of plan-document boilerplate terms is
//! appended. All of it is deterministic so the same question always produces
//! the same provider request.

use once_cell::sync::Lazy;
use regex::Regex;

/// Domain abbreviations expanded before embedding.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("eob", "explanation of benefits"),
    ("preauth", "prior authorization"),
    ("auth", "authorization"),
    ("r&b", "room and board"),
    ("snf", "skilled nursing facility"),
    ("dme", "durable medical equipment"),
    ("oon", "out of network"),
    ("ltc", "long term care"),
];

/// Terms appended to every query to pull in plan-document phrasing.
const BOILERPLATE_TERMS: &str = "plan member coverage policy provision";

static ABBREVIATION_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|&(abbrev, expansion)| {
            let pattern = format!(r"\b{}\b", regex::escape(abbrev));
            (Regex::new(&pattern).unwrap(), expansion)
        })
        .collect()
});

/// Normalize a question for the embedding provider.
pub fn preprocess_question(text: &str) -> String {
    let mut normalized = text.to_lowercase();

    // Longest abbreviations are listed first so "preauth" is not
    // consumed by the "auth" rule.
    for (pattern, expansion) in ABBREVIATION_RULES.iter() {
        normalized = pattern.replace_all(&normalized, *expansion).into_owned();
    }

    format!("{} {}", normalized.trim(), BOILERPLATE_TERMS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_appends_boilerplate() {
        let out = preprocess_question("Does the Plan cover Hospice?");
        assert!(out.starts_with("does the plan cover hospice?"));
        assert!(out.ends_with(BOILERPLATE_TERMS));
    }

    #[test]
    fn test_expands_abbreviations() {
        let out = preprocess_question("Is an EOB sent after an auth denial?");
        assert!(out.contains("explanation of benefits"));
        assert!(out.contains("authorization denial"));
        assert!(!out.contains(" eob "));
    }

    #[test]
    fn test_preauth_beats_auth() {
        let out = preprocess_question("preauth required?");
        assert!(out.contains("prior authorization required"));
    }

    #[test]
    fn test_deterministic() {
        let q = "Are R&B charges covered in an SNF?";
        assert_eq!(preprocess_question(q), preprocess_question(q));
    }
}
