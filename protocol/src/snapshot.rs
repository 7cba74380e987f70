use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::CardId;

/// Mid-round state sufficient to rebuild the exact same round, e.g. after a scene reload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub level: u32,
    /// Identities in grid order.
    pub cards: Vec<CardId>,
    /// Grid indices of matched cards.
    pub matched: Vec<usize>,
    pub moves: u32,
    pub score: u32,
    pub time_remaining: f32,
    pub elapsed: f32,
}
