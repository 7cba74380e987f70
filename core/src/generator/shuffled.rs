use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Default generator: the pairs of [`build_pool`] in uniformly random order.
#[derive(Clone, Debug)]
pub struct ShuffledPoolGenerator {
    rng: SmallRng,
}

impl ShuffledPoolGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl PoolGenerator for ShuffledPoolGenerator {
    fn generate(
        &mut self,
        available: &[CardId],
        pair_count: usize,
    ) -> core::result::Result<Vec<CardId>, ConfigError> {
        let mut pool = build_pool(available, pair_count)?;
        shuffle(&mut pool, &mut self.rng);
        Ok(pool)
    }
}

/// In-place Fisher-Yates, walking from the last slot down to the second.
pub fn shuffle<T>(items: &mut [T], rng: &mut SmallRng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{counts, ids};
    use super::*;

    #[test]
    fn shuffle_is_a_permutation() {
        let mut generator = ShuffledPoolGenerator::new(7);
        let unshuffled = build_pool(&ids(0..8), 8).unwrap();

        for _ in 0..20 {
            let pool = generator.generate(&ids(0..8), 8).unwrap();
            assert_eq!(pool.len(), 16);
            assert_eq!(counts(&pool), counts(&unshuffled));
        }
    }

    #[test]
    fn shuffle_changes_order_across_rounds() {
        let mut generator = ShuffledPoolGenerator::new(42);
        let unshuffled = build_pool(&ids(0..8), 8).unwrap();

        let reordered = (0..10)
            .map(|_| generator.generate(&ids(0..8), 8).unwrap())
            .filter(|pool| *pool != unshuffled)
            .count();
        assert!(reordered > 0);
    }

    #[test]
    fn same_seed_same_grid() {
        let a = ShuffledPoolGenerator::new(3).generate(&ids(0..6), 6).unwrap();
        let b = ShuffledPoolGenerator::new(3).generate(&ids(0..6), 6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn single_pair_survives_shuffle() {
        let pool = ShuffledPoolGenerator::new(0).generate(&ids(9..10), 1).unwrap();
        assert_eq!(pool, [CardId(9), CardId(9)].to_vec());
    }
}
