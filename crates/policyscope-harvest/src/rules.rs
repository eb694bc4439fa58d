//! Signal-rule scoring battery.
//!
//! An ordered list of (name, pattern, weight) rules evaluated uniformly —
//! adding a domain signal means adding a row, not touching control flow.
//! Weights and thresholds are named constants to keep tuning in one place.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

pub const W_OBLIGATION: f32 = 2.0;
pub const W_DAY_COUNT: f32 = 2.5;
pub const W_AUTHORIZATION: f32 = 1.5;
pub const W_CARE_SETTING: f32 = 1.8;
pub const W_NOTIFY_CLAIM: f32 = 1.2;
pub const W_EOB: f32 = 1.5;
pub const W_POLICY_GENERIC: f32 = 0.5;

/// Sentences shorter than this lose `PENALTY_SHORT`.
pub const SHORT_SENTENCE_CHARS: usize = 30;
/// Sentences longer than this lose `PENALTY_LONG`.
pub const LONG_SENTENCE_CHARS: usize = 500;
pub const PENALTY_SHORT: f32 = -1.5;
pub const PENALTY_LONG: f32 = -1.0;
/// Bonus when a bare number from the question reappears in the sentence.
pub const NUMBER_ECHO_BONUS: f32 = 2.0;

/// One scoring signal.
pub struct SignalRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub weight: f32,
}

fn rule(name: &'static str, pattern: &str, weight: f32) -> SignalRule {
    SignalRule {
        name,
        pattern: Regex::new(pattern).unwrap(),
        weight,
    }
}

static SIGNAL_RULES: Lazy<Vec<SignalRule>> = Lazy::new(|| {
    vec![
        rule(
            "obligation",
            r"(?i)\b(shall|must|will|ensure[sd]?|require[sd]?)\b",
            W_OBLIGATION,
        ),
        rule(
            "day-count",
            r"(?i)\b(\d{1,3}|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|twenty|thirty|forty[\-\s]five|forty|sixty|ninety)\s*(\(\d{1,3}\))?\s*(calendar|business)\s+days?\b",
            W_DAY_COUNT,
        ),
        rule(
            "authorization",
            r"(?i)\b(prior\s+authorization|pre-?authorization|authoriz(ed|ation))\b",
            W_AUTHORIZATION,
        ),
        rule(
            "care-setting",
            r"(?i)\b(hospice|retrospective(ly)?|direct\s+payment|room\s+and\s+board)\b",
            W_CARE_SETTING,
        ),
        rule(
            "notify-claim-member",
            r"(?i)\b(notif(y|ies|ied|ication)|claims?|members?)\b",
            W_NOTIFY_CLAIM,
        ),
        rule(
            "eob",
            r"(?i)\b(explanation\s+of\s+benefits|eob)\b",
            W_EOB,
        ),
        rule(
            "policy-generic",
            r"(?i)\b(coverage|covered|benefits?|provisions?|plan)\b",
            W_POLICY_GENERIC,
        ),
    ]
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Standalone numbers appearing in a text.
pub fn extract_numbers(text: &str) -> HashSet<String> {
    NUMBER_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Heuristic relevance score for a single (already truncated) sentence.
pub fn score_sentence(sentence: &str, question_numbers: &HashSet<String>) -> f32 {
    let mut score = 0.0;

    for rule in SIGNAL_RULES.iter() {
        if rule.pattern.is_match(sentence) {
            score += rule.weight;
        }
    }

    let length = sentence.chars().count();
    if length < SHORT_SENTENCE_CHARS {
        score += PENALTY_SHORT;
    }
    if length > LONG_SENTENCE_CHARS {
        score += PENALTY_LONG;
    }

    if !question_numbers.is_empty() {
        let sentence_numbers = extract_numbers(sentence);
        if question_numbers.iter().any(|n| sentence_numbers.contains(n)) {
            score += NUMBER_ECHO_BONUS;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_numbers() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_obligation_and_daycount_signals() {
        let sentence =
            "The Plan shall notify the Member within fourteen (14) calendar days of any adverse determination.";
        let score = score_sentence(sentence, &no_numbers());
        // obligation + day-count + notify/member + policy-generic, no penalties
        let expected = W_OBLIGATION + W_DAY_COUNT + W_NOTIFY_CLAIM + W_POLICY_GENERIC;
        assert!((score - expected).abs() < 1e-5, "score was {}", score);
    }

    #[test]
    fn test_number_echo_bonus() {
        let question_numbers = extract_numbers("within 14 calendar days?");
        let sentence = "Notice is issued within fourteen (14) calendar days of receipt of a claim.";
        let with_bonus = score_sentence(sentence, &question_numbers);
        let without = score_sentence(sentence, &no_numbers());
        assert!((with_bonus - without - NUMBER_ECHO_BONUS).abs() < 1e-5);
    }

    #[test]
    fn test_short_sentence_penalty() {
        let short = "The Plan will pay.";
        let score = score_sentence(short, &no_numbers());
        // obligation + policy-generic, minus the short penalty
        let expected = W_OBLIGATION + W_POLICY_GENERIC + PENALTY_SHORT;
        assert!((score - expected).abs() < 1e-5, "score was {}", score);
    }

    #[test]
    fn test_long_sentence_penalty() {
        let long = format!("The member benefit provision {}", "and so forth ".repeat(40));
        assert!(long.chars().count() > LONG_SENTENCE_CHARS);
        let score = score_sentence(&long, &no_numbers());
        let expected = W_NOTIFY_CLAIM + W_POLICY_GENERIC + PENALTY_LONG;
        assert!((score - expected).abs() < 1e-5, "score was {}", score);
    }

    #[test]
    fn test_unrelated_text_scores_nonpositive() {
        let sentence = "This page intentionally left blank for printing purposes only here.";
        assert!(score_sentence(sentence, &no_numbers()) <= 0.0);
    }

    #[test]
    fn test_spelled_out_day_count() {
        let sentence = "Payment occurs within thirty calendar days after the service month ends.";
        let score = score_sentence(sentence, &no_numbers());
        assert!(score >= W_DAY_COUNT);
    }
}
