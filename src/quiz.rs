use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::QuizConfig;
use crate::data::CandidateItem;
use crate::errors::QuizError;
use crate::metrics::{TopicSkew, topic_skew};
use crate::sampler::{DeterministicRng, WeightedItemSampler};
use crate::source::CandidateSource;
use crate::types::{CategoryId, ItemId};

type DynSource = Box<dyn CandidateSource + 'static>;

/// A fixed-size true/false quiz for one category.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrueFalseQuiz {
    /// Category the quiz was built for.
    pub category: CategoryId,
    /// Sampled items in presentation order.
    pub items: Vec<CandidateItem>,
}

impl TrueFalseQuiz {
    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no question data was available; callers show a
    /// "not enough question data" state rather than an error.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Topic balance of the sampled items; `None` for an empty quiz.
    pub fn topic_skew(&self) -> Option<TopicSkew> {
        topic_skew(&self.items)
    }

    /// Score `responses` positionally against the quiz items.
    ///
    /// `None` marks an unanswered item, which counts as incorrect.
    pub fn grade(&self, responses: &[Option<bool>]) -> Result<QuizScore, QuizError> {
        if responses.len() != self.items.len() {
            return Err(QuizError::ResponseMismatch {
                expected: self.items.len(),
                actual: responses.len(),
            });
        }
        let mut score = QuizScore {
            total: self.items.len(),
            ..QuizScore::default()
        };
        for (item, response) in self.items.iter().zip(responses) {
            if let Some(response) = response {
                score.answered += 1;
                if *response == item.answer {
                    score.correct += 1;
                } else {
                    score.missed.push(item.id.clone());
                }
            } else {
                score.missed.push(item.id.clone());
            }
        }
        Ok(score)
    }
}

/// Outcome of grading a quiz.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuizScore {
    /// Number of quiz items.
    pub total: usize,
    /// Items with a response.
    pub answered: usize,
    /// Items whose response matched the answer.
    pub correct: usize,
    /// Items answered wrongly or left blank, in quiz order.
    pub missed: Vec<ItemId>,
}

impl QuizScore {
    /// Fraction of all items answered correctly (0.0 for an empty quiz).
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64
        }
    }
}

/// Gathers candidate pools from registered sources and samples quizzes.
pub struct QuizBuilder {
    config: QuizConfig,
    sampler: WeightedItemSampler,
    sources: Vec<DynSource>,
    rng: DeterministicRng,
}

impl QuizBuilder {
    /// Validate `config` and create a builder with no sources.
    pub fn new(config: QuizConfig) -> Result<Self, QuizError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => DeterministicRng::new(seed),
            None => DeterministicRng::from_entropy(),
        };
        Ok(Self {
            sampler: WeightedItemSampler::new(config.sampler.clone()),
            config,
            sources: Vec::new(),
            rng,
        })
    }

    /// Validated builder configuration.
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Register a source; earlier sources win when identities repeat.
    pub fn register_source(&mut self, source: DynSource) {
        debug!(source = source.id(), "registered candidate source");
        self.sources.push(source);
    }

    /// Union of categories across sources, in first-seen order.
    pub fn categories(&self) -> Vec<CategoryId> {
        let mut seen: IndexMap<CategoryId, ()> = IndexMap::new();
        for source in &self.sources {
            for category in source.categories() {
                seen.entry(category).or_insert(());
            }
        }
        seen.into_keys().collect()
    }

    /// Deduplicated candidate pool for `category` across all sources.
    pub fn candidate_pool(&self, category: &str) -> Result<Vec<CandidateItem>, QuizError> {
        let mut pool: IndexMap<ItemId, CandidateItem> = IndexMap::new();
        for source in &self.sources {
            for item in source.candidates(category)? {
                if pool.contains_key(&item.id) {
                    debug!(
                        source = source.id(),
                        item = %item.id,
                        "dropping candidate already provided by an earlier source"
                    );
                    continue;
                }
                pool.insert(item.id.clone(), item);
            }
        }
        Ok(pool.into_values().collect())
    }

    /// Build a quiz with the configured item count.
    pub fn build(&mut self, category: &str) -> Result<TrueFalseQuiz, QuizError> {
        self.build_with_count(category, self.config.item_count)
    }

    /// Build a quiz with `count` items (fewer when the pool is smaller).
    pub fn build_with_count(
        &mut self,
        category: &str,
        count: usize,
    ) -> Result<TrueFalseQuiz, QuizError> {
        let pool = self.candidate_pool(category)?;
        let items = self.sampler.sample(&pool, count, &mut self.rng);
        info!(
            category,
            pool = pool.len(),
            requested = count,
            selected = items.len(),
            "built true/false quiz"
        );
        Ok(TrueFalseQuiz {
            category: category.to_string(),
            items,
        })
    }
}
