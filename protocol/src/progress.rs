use alloc::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub high_score: u32,
    /// Fastest winning time in seconds.
    pub best_time: Option<f32>,
}

/// Persisted player progress across levels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressData {
    pub selected_level: u32,
    pub completed: BTreeSet<u32>,
    pub unlocked: BTreeSet<u32>,
    pub records: BTreeMap<u32, LevelRecord>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            selected_level: 1,
            completed: BTreeSet::new(),
            unlocked: BTreeSet::new(),
            records: BTreeMap::new(),
        }
    }
}
