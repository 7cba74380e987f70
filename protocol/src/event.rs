use serde::{Deserialize, Serialize};

use crate::RoundConfig;

/// Final numbers of a won round.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub moves: u32,
    /// Seconds of play, preview excluded.
    pub elapsed: f32,
    pub score: u32,
}

/// Notifications published by the engine. Card positions are grid indices in row-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Event {
    /// Grid (re)built for this configuration
    RoundStarted(RoundConfig),
    CardFlipped(usize),
    Matched { first: usize, second: usize },
    Mismatched { first: usize, second: usize },
    MovesChanged(u32),
    ScoreChanged(u32),
    /// Seconds left on the round timer
    TimerChanged(f32),
    RoundWon(RoundSummary),
    RoundLost,
    GridCleared,
    HighScore { level: u32, score: u32 },
    LevelUnlocked(u32),
}

impl Event {
    /// Whether no further events of the round will follow.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::RoundWon(_) | Self::RoundLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_for_script_consumers() {
        let json = serde_json::to_string(&Event::MovesChanged(3)).unwrap();
        assert_eq!(json, r#"{"type":"movesChanged","data":3}"#);

        let json = serde_json::to_string(&Event::RoundLost).unwrap();
        assert_eq!(json, r#"{"type":"roundLost"}"#);
    }

    #[test]
    fn won_summary_reads_back() {
        let event = Event::RoundWon(RoundSummary {
            moves: 8,
            elapsed: 12.5,
            score: 960,
        });
        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();

        assert_eq!(back, event);
        assert!(back.is_terminal());
        assert!(!Event::GridCleared.is_terminal());
    }
}
