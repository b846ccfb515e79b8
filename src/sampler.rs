use rand::prelude::*;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::{SamplerConfig, SamplingStrategy};
use crate::data::CandidateItem;

#[derive(Debug, Clone)]
/// Small deterministic RNG (SplitMix64) used for reproducible quizzes.
pub struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    /// Create a generator whose stream is fully determined by `seed`.
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from OS entropy for production use.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Current internal state; `DeterministicRng::new(state)` resumes the stream.
    pub fn state(&self) -> u64 {
        self.state
    }

    fn next_u64_internal(&mut self) -> u64 {
        let mut z = self.state.wrapping_add(0x9E3779B97F4A7C15);
        self.state = z;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }
}

impl rand::RngCore for DeterministicRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64_internal() as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u64_internal()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut offset = 0;
        while offset < dest.len() {
            let value = self.next_u64_internal();
            let bytes = value.to_le_bytes();
            let remaining = dest.len() - offset;
            let copy_len = remaining.min(bytes.len());
            dest[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
            offset += copy_len;
        }
    }
}

/// Anything the sampler can pick: an identity plus a relevance weight.
pub trait WeightedItem {
    /// Key that must not be selected twice within one sampling call.
    fn identity(&self) -> &str;
    /// Raw weight before the floor is applied.
    fn weight(&self) -> f64;
}

impl WeightedItem for CandidateItem {
    fn identity(&self) -> &str {
        &self.id
    }

    fn weight(&self) -> f64 {
        self.topic_weight
    }
}

/// Weight actually used for sampling.
///
/// Formula: `max(floor, weight)`. Non-finite weights collapse to `floor`.
pub fn effective_weight(weight: f64, floor: f64) -> f64 {
    if weight.is_finite() {
        weight.max(floor)
    } else {
        floor
    }
}

/// Sample `count` items from `pool` with the default sampler configuration.
pub fn sample_items<T, R>(pool: &[T], count: usize, rng: &mut R) -> Vec<T>
where
    T: WeightedItem + Clone,
    R: Rng + ?Sized,
{
    WeightedItemSampler::default().sample(pool, count, rng)
}

/// Picks distinct items from a pool, biased toward higher weights.
///
/// The pool is never mutated; selected items are cloned out and returned in
/// shuffled order so relevance does not leak into item position.
#[derive(Clone, Debug, Default)]
pub struct WeightedItemSampler {
    config: SamplerConfig,
}

impl WeightedItemSampler {
    /// Create a sampler with explicit floor, redraw budget, and strategy.
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Active sampler configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Return `min(count, distinct pool size)` distinct items in random order.
    ///
    /// Only the first occurrence of a repeated identity is eligible.
    pub fn sample<T, R>(&self, pool: &[T], count: usize, rng: &mut R) -> Vec<T>
    where
        T: WeightedItem + Clone,
        R: Rng + ?Sized,
    {
        if count == 0 || pool.is_empty() {
            return Vec::new();
        }
        let eligible = distinct_indices(pool);
        if eligible.len() < pool.len() {
            debug!(
                pool = pool.len(),
                distinct = eligible.len(),
                "ignoring repeated identities in candidate pool"
            );
        }

        let mut chosen = if eligible.len() <= count {
            eligible
        } else {
            let weights: Vec<f64> = eligible
                .iter()
                .map(|&idx| effective_weight(pool[idx].weight(), self.config.weight_floor))
                .collect();
            let max_redraws = self.config.max_redraws;
            let picked = match self.config.strategy {
                SamplingStrategy::RetryWithFallback => {
                    pick_cumulative(&weights, count, max_redraws, Collision::ScanForward, rng)
                        .indices
                }
                SamplingStrategy::RetryWithRedraw => {
                    pick_cumulative(&weights, count, max_redraws, Collision::Redraw, rng).indices
                }
                SamplingStrategy::WeightedReservoir => pick_by_reservoir(&weights, count, rng),
            };
            picked.into_iter().map(|slot| eligible[slot]).collect()
        };

        chosen.shuffle(rng);
        debug!(
            pool = pool.len(),
            requested = count,
            selected = chosen.len(),
            strategy = ?self.config.strategy,
            "sampled weighted items"
        );
        chosen.into_iter().map(|idx| pool[idx].clone()).collect()
    }
}

fn distinct_indices<T: WeightedItem>(pool: &[T]) -> Vec<usize> {
    let mut seen = HashSet::with_capacity(pool.len());
    pool.iter()
        .enumerate()
        .filter(|(_, item)| seen.insert(item.identity()))
        .map(|(idx, _)| idx)
        .collect()
}

/// What a draw does when it lands on an already-selected slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Collision {
    /// Take the next unselected item after the landing slice; redraw only
    /// when every later item is taken.
    ScanForward,
    /// Discard the draw and redraw.
    Redraw,
}

#[derive(Debug)]
struct CumulativePicks {
    indices: Vec<usize>,
    /// Picks that exhausted the redraw budget and were made uniformly.
    fallbacks: usize,
}

/// Cumulative-distribution picks. Requires `count < weights.len()`.
fn pick_cumulative<R: Rng + ?Sized>(
    weights: &[f64],
    count: usize,
    max_redraws: usize,
    collision: Collision,
    rng: &mut R,
) -> CumulativePicks {
    let total: f64 = weights.iter().sum();
    let mut running = 0.0;
    let mut boundaries: Vec<f64> = weights
        .iter()
        .map(|weight| {
            running += weight;
            running / total
        })
        .collect();
    // Guard against rounding leaving the last boundary just under 1.0.
    if let Some(last) = boundaries.last_mut() {
        *last = 1.0;
    }

    let mut selected = vec![false; weights.len()];
    let mut indices = Vec::with_capacity(count);
    let mut fallbacks = 0usize;
    while indices.len() < count {
        let mut hit = None;
        for _ in 0..max_redraws {
            let draw: f64 = rng.random();
            // First slice whose boundary is >= the draw.
            let start = boundaries
                .partition_point(|&boundary| boundary < draw)
                .min(weights.len() - 1);
            hit = match collision {
                Collision::ScanForward => selected[start..]
                    .iter()
                    .position(|taken| !taken)
                    .map(|offset| start + offset),
                Collision::Redraw => (!selected[start]).then_some(start),
            };
            if hit.is_some() {
                break;
            }
        }
        let idx = match hit {
            Some(idx) => idx,
            None => {
                fallbacks += 1;
                let remaining: Vec<usize> =
                    (0..weights.len()).filter(|&i| !selected[i]).collect();
                match remaining.choose(rng) {
                    Some(&idx) => idx,
                    None => {
                        warn!(
                            picked = indices.len(),
                            requested = count,
                            "no unselected items left during weighted sampling"
                        );
                        break;
                    }
                }
            }
        };
        selected[idx] = true;
        indices.push(idx);
    }
    if fallbacks > 0 {
        debug!(fallbacks, "weighted redraws exhausted; used uniform fallback");
    }
    CumulativePicks { indices, fallbacks }
}

/// Efraimidis-Spirakis A-Res: keep the `count` largest `u^(1/w)` keys.
fn pick_by_reservoir<R: Rng + ?Sized>(weights: &[f64], count: usize, rng: &mut R) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = weights
        .iter()
        .enumerate()
        .map(|(idx, &weight)| {
            // `1 - u` keeps the base in (0, 1] so a zero draw cannot tie at the bottom.
            let u = 1.0 - rng.random::<f64>();
            (u.powf(1.0 / weight), idx)
        })
        .collect();
    keyed.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
    keyed.truncate(count);
    keyed.into_iter().map(|(_, idx)| idx).collect()
}
