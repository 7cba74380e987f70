use alloc::vec::Vec;

use crate::*;
pub use shuffled::*;

mod shuffled;

/// Produces the identities of a grid, in grid order.
pub trait PoolGenerator: core::fmt::Debug {
    fn generate(
        &mut self,
        available: &[CardId],
        pair_count: usize,
    ) -> core::result::Result<Vec<CardId>, ConfigError>;
}

/// Takes `pair_count` identities from `available`, wrapping around when it runs out, and emits each
/// one twice in a row.
pub fn build_pool(
    available: &[CardId],
    pair_count: usize,
) -> core::result::Result<Vec<CardId>, ConfigError> {
    if available.is_empty() {
        return Err(ConfigError::EmptyCardPool);
    }
    if pair_count == 0 {
        return Err(ConfigError::InvalidPairCount);
    }
    if pair_count > available.len() {
        log::debug!(
            "Reusing identities, {} pairs requested from {} available",
            pair_count,
            available.len()
        );
    }

    let mut pool = Vec::with_capacity(pair_count * 2);
    for &id in available.iter().cycle().take(pair_count) {
        pool.push(id);
        pool.push(id);
    }
    Ok(pool)
}

/// Pairs laid out side by side, no shuffling. Handy for tutorials and reproducible rounds.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OrderedPoolGenerator;

impl PoolGenerator for OrderedPoolGenerator {
    fn generate(
        &mut self,
        available: &[CardId],
        pair_count: usize,
    ) -> core::result::Result<Vec<CardId>, ConfigError> {
        build_pool(available, pair_count)
    }
}
