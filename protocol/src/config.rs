use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Identity shared by exactly two cards of a pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl From<u32> for CardId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scoring {
    pub match_points: u32,
    pub mismatch_penalty: u32,
    /// Bonus per whole second left on the clock when a timed round is won.
    pub time_bonus_per_second: u32,
    /// Deducted per move from the final score of a won round.
    pub move_penalty: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_points: 100,
            mismatch_penalty: 10,
            time_bonus_per_second: 10,
            move_penalty: 5,
        }
    }
}

/// Everything a single round needs, read-only to the engine.
///
/// Durations are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    pub level: u32,
    pub columns: u8,
    pub rows: u8,
    pub spacing: f32,
    pub padding: f32,
    pub flip_duration: f32,
    pub mismatch_delay: f32,
    pub use_timer: bool,
    pub game_duration: f32,
    pub show_preview: bool,
    pub preview_duration: f32,
    pub available_cards: Vec<CardId>,
    pub scoring: Scoring,
}

impl RoundConfig {
    pub const fn total_cards(&self) -> u16 {
        (self.columns as u16) * (self.rows as u16)
    }

    pub const fn pair_count(&self) -> u16 {
        self.total_cards() / 2
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            level: 1,
            columns: 4,
            rows: 4,
            spacing: 10.,
            padding: 20.,
            flip_duration: 0.3,
            mismatch_delay: 1.,
            use_timer: true,
            game_duration: 120.,
            show_preview: true,
            preview_duration: 3.,
            available_cards: (0..8).map(CardId).collect(),
            scoring: Scoring::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_falls_back_to_defaults() {
        let config: RoundConfig =
            serde_json::from_str(r#"{"level": 3, "columns": 6, "scoring": {"match_points": 50}}"#)
                .unwrap();

        assert_eq!(config.level, 3);
        assert_eq!(config.columns, 6);
        assert_eq!(config.rows, 4);
        assert_eq!(config.total_cards(), 24);
        assert_eq!(config.pair_count(), 12);
        assert_eq!(config.scoring.match_points, 50);
        assert_eq!(config.scoring.mismatch_penalty, 10);
        assert_eq!(config.available_cards.len(), 8);
    }

    #[test]
    fn card_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&[CardId(4), CardId(7)]).unwrap();
        assert_eq!(json, "[4,7]");
    }
}
