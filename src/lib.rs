#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

/// Sampler, pool, and quiz configuration types.
pub mod config;
/// Centralized constants used across the sampler, sources, and quiz builder.
pub mod constants;
/// Candidate and question bank types.
pub mod data;
/// Reusable demo runners shared by the demo binaries.
pub mod example_apps;
/// Historical topic frequency tables.
pub mod frequency;
/// Topic mix metrics for built quizzes.
pub mod metrics;
/// Quiz assembly and grading.
pub mod quiz;
/// Weighted item sampler and deterministic RNG.
pub mod sampler;
/// Candidate source traits and built-in sources.
pub mod source;
/// Shared type aliases.
pub mod types;
/// Choice text normalization helpers.
pub mod utils;

mod errors;

pub use config::{PoolConfig, QuizConfig, SamplerConfig, SamplingStrategy};
pub use data::{CandidateItem, MultipleChoiceQuestion, QuestionBank, QuestionPolarity};
pub use errors::QuizError;
pub use frequency::TopicFrequencyTable;
pub use metrics::{TopicShare, TopicSkew, topic_skew};
pub use quiz::{QuizBuilder, QuizScore, TrueFalseQuiz};
pub use sampler::{
    DeterministicRng, WeightedItem, WeightedItemSampler, effective_weight, sample_items,
};
pub use source::{CandidateSource, InMemorySource, QuestionBankSource};
pub use types::{CategoryId, ItemId, QuestionId, SourceId, Statement, TopicId};
