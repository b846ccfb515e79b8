use crate::constants::pool::UNKNOWN_TOPIC_WEIGHT;
use crate::constants::quiz::DEFAULT_ITEM_COUNT;
use crate::constants::sampler::{MAX_REDRAWS, WEIGHT_FLOOR};
use crate::errors::QuizError;

/// Algorithm used to pick weighted items without replacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplingStrategy {
    /// Cumulative-distribution draws. A draw takes the first unselected item
    /// whose slice boundary is at or past the draw; when none is left it is
    /// redrawn, and after the redraw budget a uniform pick among the
    /// remaining items is made.
    #[default]
    RetryWithFallback,
    /// Like `RetryWithFallback`, but a draw landing on an already-selected
    /// slice is discarded and redrawn instead of moving to the next item.
    /// Inclusion rates follow weight order more closely.
    RetryWithRedraw,
    /// Efraimidis-Spirakis weighted reservoir: keep the `count` largest
    /// `u^(1/w)` keys. Single pass, no collisions.
    WeightedReservoir,
}

/// Controls how the weighted item sampler treats weights and collisions.
#[derive(Clone, Debug)]
pub struct SamplerConfig {
    /// Floor applied to every topic weight before sampling (must be > 0).
    pub weight_floor: f64,
    /// Weighted draws attempted per pick before the uniform fallback.
    pub max_redraws: usize,
    /// Selection algorithm.
    pub strategy: SamplingStrategy,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            weight_floor: WEIGHT_FLOOR,
            max_redraws: MAX_REDRAWS,
            strategy: SamplingStrategy::default(),
        }
    }
}

impl SamplerConfig {
    /// Reject floors that would let a candidate drop to zero probability.
    pub fn validate(&self) -> Result<(), QuizError> {
        if !self.weight_floor.is_finite() || self.weight_floor <= 0.0 || self.weight_floor > 1.0 {
            return Err(QuizError::Configuration(format!(
                "weight_floor must be in (0, 1], got {}",
                self.weight_floor
            )));
        }
        Ok(())
    }
}

/// Controls how question banks are turned into candidate pools.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Weight used for topics the frequency table does not know.
    pub unknown_topic_weight: f64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            unknown_topic_weight: UNKNOWN_TOPIC_WEIGHT,
        }
    }
}

impl PoolConfig {
    /// Reject unknown-topic weights outside [0, 1].
    pub fn validate(&self) -> Result<(), QuizError> {
        if !(0.0..=1.0).contains(&self.unknown_topic_weight) {
            return Err(QuizError::Configuration(format!(
                "unknown_topic_weight must be in [0, 1], got {}",
                self.unknown_topic_weight
            )));
        }
        Ok(())
    }
}

/// Top-level quiz assembly configuration.
#[derive(Clone, Debug)]
pub struct QuizConfig {
    /// RNG seed for reproducible quizzes; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Items per quiz when `QuizBuilder::build` is used.
    pub item_count: usize,
    /// Sampler behavior.
    pub sampler: SamplerConfig,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            seed: None,
            item_count: DEFAULT_ITEM_COUNT,
            sampler: SamplerConfig::default(),
        }
    }
}

impl QuizConfig {
    /// Validate nested settings before a builder is created.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.item_count == 0 {
            return Err(QuizError::Configuration(
                "item_count must be positive".to_string(),
            ));
        }
        self.sampler.validate()
    }
}
