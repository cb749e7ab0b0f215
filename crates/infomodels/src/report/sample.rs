//! Bounded sampling of a group's error instances for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of examples shown per field-level group.
pub const SAMPLE_SIZE: usize = 5;

/// How examples are drawn once a group has at least `bound` instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Without replacement; examples are distinct and kept in encounter order.
    #[default]
    Distinct,
    /// Independent uniform draw per slot; the same instance may repeat.
    Replacement,
}

impl FromStr for SamplingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "distinct" | "reservoir" => Ok(SamplingStrategy::Distinct),
            "replacement" | "legacy" => Ok(SamplingStrategy::Replacement),
            _ => Err(format!(
                "Unknown sampling strategy: {}. Use distinct or replacement.",
                s
            )),
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingStrategy::Distinct => write!(f, "distinct"),
            SamplingStrategy::Replacement => write!(f, "replacement"),
        }
    }
}

/// Draws bounded samples using an injected random source.
#[derive(Debug, Clone)]
pub struct Sampler {
    rng: fastrand::Rng,
    strategy: SamplingStrategy,
    bound: usize,
}

impl Sampler {
    /// Sampler seeded from the system entropy source.
    pub fn new(strategy: SamplingStrategy) -> Self {
        Self::with_rng(strategy, fastrand::Rng::new())
    }

    /// Deterministic sampler for reproducible reports and tests.
    pub fn with_seed(strategy: SamplingStrategy, seed: u64) -> Self {
        Self::with_rng(strategy, fastrand::Rng::with_seed(seed))
    }

    /// Sampler using the given random source.
    pub fn with_rng(strategy: SamplingStrategy, rng: fastrand::Rng) -> Self {
        Self {
            rng,
            strategy,
            bound: SAMPLE_SIZE,
        }
    }

    /// Change the sample bound.
    pub fn with_bound(mut self, bound: usize) -> Self {
        self.bound = bound;
        self
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Select at most `bound` instances.
    ///
    /// Fewer than `bound` instances are returned unchanged and in order.
    /// Otherwise exactly `bound` are drawn according to the strategy.
    pub fn sample<'a, T>(&mut self, instances: &'a [T]) -> Vec<&'a T> {
        let n = instances.len();

        if n < self.bound {
            return instances.iter().collect();
        }

        match self.strategy {
            SamplingStrategy::Replacement => (0..self.bound)
                .map(|_| &instances[self.rng.usize(0..n)])
                .collect(),
            SamplingStrategy::Distinct => self
                .distinct_indices(n)
                .into_iter()
                .map(|i| &instances[i])
                .collect(),
        }
    }

    /// Reservoir sampling over indices, returned ascending.
    fn distinct_indices(&mut self, n: usize) -> Vec<usize> {
        let mut reservoir: Vec<usize> = (0..self.bound).collect();

        for i in self.bound..n {
            let j = self.rng.usize(0..=i);
            if j < self.bound {
                reservoir[j] = i;
            }
        }

        reservoir.sort_unstable();
        reservoir
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(SamplingStrategy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_input_is_identity() {
        let items = vec![10, 20, 30];
        let mut sampler = Sampler::with_seed(SamplingStrategy::Replacement, 1);
        let sample: Vec<i32> = sampler.sample(&items).into_iter().copied().collect();
        assert_eq!(sample, items);
    }

    #[test]
    fn test_exact_bound_is_sampled_to_bound() {
        let items: Vec<u32> = (0..5).collect();
        let mut sampler = Sampler::with_seed(SamplingStrategy::Distinct, 1);
        let sample = sampler.sample(&items);
        assert_eq!(sample.len(), 5);
        let values: Vec<u32> = sample.into_iter().copied().collect();
        assert_eq!(values, items);
    }

    #[test]
    fn test_distinct_is_unique_and_ordered() {
        let items: Vec<u32> = (0..100).collect();
        let mut sampler = Sampler::with_seed(SamplingStrategy::Distinct, 42);
        let values: Vec<u32> = sampler.sample(&items).into_iter().copied().collect();

        assert_eq!(values.len(), SAMPLE_SIZE);
        let mut sorted = values.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, values);
    }

    #[test]
    fn test_replacement_draws_bound_items() {
        let items: Vec<u32> = (0..12).collect();
        let mut sampler = Sampler::with_seed(SamplingStrategy::Replacement, 3);
        let sample = sampler.sample(&items);
        assert_eq!(sample.len(), SAMPLE_SIZE);
        assert!(sample.iter().all(|v| **v < 12));
    }

    #[test]
    fn test_same_seed_same_sample() {
        let items: Vec<u32> = (0..50).collect();
        let mut a = Sampler::with_seed(SamplingStrategy::Distinct, 9);
        let mut b = Sampler::with_seed(SamplingStrategy::Distinct, 9);
        assert_eq!(a.sample(&items), b.sample(&items));
    }

    #[test]
    fn test_zero_bound() {
        let items = vec![1, 2, 3];
        let mut sampler = Sampler::with_seed(SamplingStrategy::Distinct, 0).with_bound(0);
        assert!(sampler.sample(&items).is_empty());
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Distinct".parse::<SamplingStrategy>(), Ok(SamplingStrategy::Distinct));
        assert_eq!("legacy".parse::<SamplingStrategy>(), Ok(SamplingStrategy::Replacement));
        assert!("weighted".parse::<SamplingStrategy>().is_err());
    }
}
