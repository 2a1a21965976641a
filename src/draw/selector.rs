//! Uniform random index selection

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::utils::errors::{LuckyDrawError, Result};

/// Draws uniform indices into non-empty lists
///
/// Each concurrently running reel owns its own selector; use [`fork`](Self::fork)
/// to derive independent children from a parent.
#[derive(Debug, Clone)]
pub struct RandomIndexSelector {
    rng: StdRng,
}

impl RandomIndexSelector {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Reproducible selector for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Uniform index in `[0, len)`
    pub fn select(&mut self, len: usize) -> Result<usize> {
        if len == 0 {
            return Err(LuckyDrawError::EmptyList { what: "list" });
        }
        Ok(self.rng.gen_range(0..len))
    }

    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.next_u64())
    }
}

impl Default for RandomIndexSelector {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_list_is_rejected() {
        let mut selector = RandomIndexSelector::seeded(1);
        assert!(matches!(selector.select(0), Err(LuckyDrawError::EmptyList { .. })));
    }

    #[test]
    fn test_distribution_is_uniform() {
        let mut selector = RandomIndexSelector::seeded(42);
        let n = 5;
        let trials = 50_000;
        let mut counts = vec![0u32; n];
        for _ in 0..trials {
            counts[selector.select(n).unwrap()] += 1;
        }

        let expected = trials as f64 / n as f64;
        for count in counts {
            let deviation = (count as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "bucket off by {:.3}", deviation);
        }
    }

    #[test]
    fn test_forks_are_independent_but_reproducible() {
        let mut a = RandomIndexSelector::seeded(7);
        let mut b = RandomIndexSelector::seeded(7);
        let mut child_a = a.fork();
        let mut child_b = b.fork();

        let seq_a: Vec<_> = (0..20).map(|_| child_a.select(1000).unwrap()).collect();
        let seq_b: Vec<_> = (0..20).map(|_| child_b.select(1000).unwrap()).collect();
        assert_eq!(seq_a, seq_b);

        let parent: Vec<_> = (0..20).map(|_| a.select(1000).unwrap()).collect();
        assert_ne!(parent, seq_a);
    }

    proptest! {
        #[test]
        fn prop_index_in_range(seed in any::<u64>(), n in 1usize..10_000) {
            let mut selector = RandomIndexSelector::seeded(seed);
            let index = selector.select(n).unwrap();
            prop_assert!(index < n);
        }
    }
}
