use alloc::string::String;
use thiserror::Error;

use crate::*;

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Malformed progress document")]
    Parse(#[source] serde_json::Error),
    #[error("Could not encode progress")]
    Encode(#[source] serde_json::Error),
}

/// Persistence collaborator, consulted only at round boundaries.
pub trait ProgressStore {
    fn selected_level(&self) -> u32;
    fn set_selected_level(&mut self, level: u32);
    fn is_unlocked(&self, level: u32) -> bool;
    /// Returns whether the level was locked before.
    fn unlock_level(&mut self, level: u32) -> bool;
    fn is_completed(&self, level: u32) -> bool;
    /// Marks `level` completed and unlocks the one after it, returning that one if it was locked.
    fn complete_level(&mut self, level: u32) -> Option<u32>;
    /// Keeps the best score and time of a won round, returns whether the score is a new best.
    fn record_result(&mut self, level: u32, score: u32, elapsed: Seconds) -> bool;
    fn record(&self, level: u32) -> Option<LevelRecord>;
    fn reset(&mut self);
}

/// In-memory [`ProgressStore`]. The host decides when and where the JSON form gets written.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressBook {
    data: ProgressData,
}

impl ProgressBook {
    pub fn open(data: ProgressData) -> Self {
        let mut book = Self { data };
        book.unlock_level(1);
        if !book.is_unlocked(book.data.selected_level) {
            log::warn!(
                "Selected level {} is locked, falling back to level 1",
                book.data.selected_level
            );
            book.data.selected_level = 1;
        }
        book
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, ProgressError> {
        let data = serde_json::from_str(json).map_err(ProgressError::Parse)?;
        Ok(Self::open(data))
    }

    pub fn to_json(&self) -> core::result::Result<String, ProgressError> {
        serde_json::to_string_pretty(&self.data).map_err(ProgressError::Encode)
    }

    pub fn data(&self) -> &ProgressData {
        &self.data
    }

    pub fn into_data(self) -> ProgressData {
        self.data
    }
}

impl Default for ProgressBook {
    fn default() -> Self {
        Self::open(ProgressData::default())
    }
}

impl ProgressStore for ProgressBook {
    fn selected_level(&self) -> u32 {
        self.data.selected_level
    }

    fn set_selected_level(&mut self, level: u32) {
        self.data.selected_level = level;
    }

    fn is_unlocked(&self, level: u32) -> bool {
        self.data.unlocked.contains(&level)
    }

    fn unlock_level(&mut self, level: u32) -> bool {
        self.data.unlocked.insert(level)
    }

    fn is_completed(&self, level: u32) -> bool {
        self.data.completed.contains(&level)
    }

    fn complete_level(&mut self, level: u32) -> Option<u32> {
        self.data.completed.insert(level);
        let next = level.checked_add(1)?;
        self.unlock_level(next).then_some(next)
    }

    fn record_result(&mut self, level: u32, score: u32, elapsed: Seconds) -> bool {
        let record = self.data.records.entry(level).or_default();
        record.best_time = Some(record.best_time.map_or(elapsed, |best| best.min(elapsed)));
        if score > record.high_score {
            record.high_score = score;
            true
        } else {
            false
        }
    }

    fn record(&self, level: u32) -> Option<LevelRecord> {
        self.data.records.get(&level).copied()
    }

    fn reset(&mut self) {
        *self = Self::default();
        log::debug!("Progress reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_level_is_always_unlocked() {
        let book = ProgressBook::default();
        assert!(book.is_unlocked(1));
        assert!(!book.is_unlocked(2));
        assert_eq!(book.selected_level(), 1);
    }

    #[test]
    fn completing_unlocks_the_next_level_once() {
        let mut book = ProgressBook::default();

        assert_eq!(book.complete_level(1), Some(2));
        assert_eq!(book.complete_level(1), None);
        assert!(book.is_completed(1));
        assert!(book.is_unlocked(2));
        assert!(!book.is_completed(2));
    }

    #[test]
    fn keeps_best_score_and_time() {
        let mut book = ProgressBook::default();

        assert!(book.record_result(1, 500, 40.));
        assert!(!book.record_result(1, 300, 30.));
        assert!(book.record_result(1, 650, 50.));

        assert_eq!(
            book.record(1),
            Some(LevelRecord {
                high_score: 650,
                best_time: Some(30.),
            })
        );
        assert_eq!(book.record(2), None);
    }

    #[test]
    fn zero_score_is_not_a_high_score() {
        let mut book = ProgressBook::default();
        assert!(!book.record_result(1, 0, 10.));
    }

    #[test]
    fn json_document_round_trips() {
        let mut book = ProgressBook::default();
        book.complete_level(1);
        book.set_selected_level(2);
        book.record_result(1, 900, 12.5);

        let json = book.to_json().unwrap();
        let back = ProgressBook::from_json(&json).unwrap();

        assert_eq!(back, book);
        let data = back.into_data();
        assert!(data.completed.contains(&1));
        assert_eq!(data.selected_level, 2);
    }

    #[test]
    fn locked_selection_falls_back() {
        let book = ProgressBook::from_json(r#"{"selected_level": 5, "unlocked": [1, 2]}"#).unwrap();
        assert_eq!(book.selected_level(), 1);
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(matches!(
            ProgressBook::from_json("{"),
            Err(ProgressError::Parse(_))
        ));
    }

    #[test]
    fn reset_forgets_everything() {
        let mut book = ProgressBook::default();
        book.complete_level(1);
        book.reset();
        assert_eq!(book, ProgressBook::default());
    }
}
