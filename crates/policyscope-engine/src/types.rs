//! Engine input/output types.

use serde::{Deserialize, Serialize};

/// One compliance question to retrieve evidence for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
}

/// Packed evidence for one question, ready for the downstream decision step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionEvidence {
    pub question_id: String,
    /// Citation-tagged chunks joined by blank lines; empty when no evidence
    /// was found.
    pub packed_context: String,
    pub has_evidence: bool,
}

impl QuestionEvidence {
    /// Terminal "no evidence" outcome for a question.
    pub fn none(question_id: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            packed_context: String::new(),
            has_evidence: false,
        }
    }
}
