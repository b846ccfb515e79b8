use std::io;

use thiserror::Error;

use crate::types::{QuestionId, SourceId};

/// Error type for question bank loading, configuration, and grading failures.
///
/// Sampling itself never fails; an empty pool yields an empty quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A question cannot yield true/false statements.
    #[error("question '{question_id}' is invalid: {reason}")]
    InvalidQuestion {
        /// Offending question.
        question_id: QuestionId,
        /// Human-readable cause.
        reason: String,
    },
    /// A registered candidate source failed to produce candidates.
    #[error("candidate source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Failing source.
        source_id: SourceId,
        /// Human-readable cause.
        reason: String,
    },
    /// Reading a bank or frequency file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A bank or frequency file is not valid JSON for its schema.
    #[error("malformed JSON input: {0}")]
    Parse(#[from] serde_json::Error),
    /// A config value is out of range.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Graded responses do not line up with the quiz items.
    #[error("expected {expected} responses, got {actual}")]
    ResponseMismatch {
        /// Number of quiz items.
        expected: usize,
        /// Number of responses supplied.
        actual: usize,
    },
}
