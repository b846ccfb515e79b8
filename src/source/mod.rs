//! Candidate source interfaces and built-in sources.
//!
//! Ownership model:
//! - `CandidateSource` is the quiz-builder-facing interface that produces
//!   candidate pools for a category.
//! - `InMemorySource` serves prebuilt candidates.
//! - `QuestionBankSource` derives true/false candidates from multiple-choice
//!   questions and weights them by historical topic frequency.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::data::CandidateItem;
use crate::errors::QuizError;
use crate::types::{CategoryId, SourceId};

/// Multiple-choice bank source.
pub mod question_bank;

pub use question_bank::QuestionBankSource;

/// Quiz-builder-facing candidate source.
///
/// For a fixed source state, `candidates` should return the same items in the
/// same order so seeded quizzes are reproducible.
pub trait CandidateSource: Send + Sync {
    /// Stable source identifier used in logs and errors.
    fn id(&self) -> &str;

    /// Categories this source can produce candidates for.
    fn categories(&self) -> Vec<CategoryId>;

    /// Candidate pool for `category`; empty when the category is unknown.
    fn candidates(&self, category: &str) -> Result<Vec<CandidateItem>, QuizError>;
}

/// Simple in-memory candidate source backed by prebuilt items.
pub struct InMemorySource {
    id: SourceId,
    items: Arc<Vec<CandidateItem>>,
}

impl InMemorySource {
    /// Create an in-memory source from prebuilt candidates.
    pub fn new(id: impl Into<SourceId>, items: Vec<CandidateItem>) -> Self {
        Self {
            id: id.into(),
            items: Arc::new(items),
        }
    }
}

impl CandidateSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn categories(&self) -> Vec<CategoryId> {
        self.items
            .iter()
            .map(|item| item.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn candidates(&self, category: &str) -> Result<Vec<CandidateItem>, QuizError> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.category == category)
            .cloned()
            .collect())
    }
}
