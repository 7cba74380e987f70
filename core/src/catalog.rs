use alloc::collections::BTreeMap;
use alloc::collections::btree_map::Entry;
use alloc::vec::Vec;
use thiserror::Error;

use crate::*;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Level catalog is empty")]
    Empty,
    #[error("Level numbers start at 1")]
    ZeroLevel,
    #[error("Level {0} is defined more than once")]
    DuplicateLevel(u32),
    #[error("Level {0} is missing")]
    MissingLevel(u32),
    #[error("Level {level} is misconfigured")]
    InvalidLevel {
        level: u32,
        #[source]
        source: ConfigError,
    },
    #[error("Malformed level catalog")]
    Parse(#[source] serde_json::Error),
}

/// All playable levels, keyed by level number and numbered contiguously from 1.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelCatalog {
    levels: BTreeMap<u32, RoundConfig>,
}

impl LevelCatalog {
    pub fn new(
        levels: impl IntoIterator<Item = RoundConfig>,
    ) -> core::result::Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for config in levels {
            let level = config.level;
            if level == 0 {
                return Err(CatalogError::ZeroLevel);
            }
            config
                .validate()
                .map_err(|source| CatalogError::InvalidLevel { level, source })?;
            match map.entry(level) {
                Entry::Occupied(_) => return Err(CatalogError::DuplicateLevel(level)),
                Entry::Vacant(slot) => {
                    slot.insert(config);
                }
            }
        }

        if map.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (expected, &level) in (1..).zip(map.keys()) {
            if level != expected {
                return Err(CatalogError::MissingLevel(expected));
            }
        }

        Ok(Self { levels: map })
    }

    /// Parses a JSON array of level configurations.
    pub fn from_json(json: &str) -> core::result::Result<Self, CatalogError> {
        let levels: Vec<RoundConfig> = serde_json::from_str(json).map_err(CatalogError::Parse)?;
        Self::new(levels)
    }

    pub fn get(&self, level: u32) -> Option<&RoundConfig> {
        self.levels.get(&level)
    }

    pub fn next_after(&self, level: u32) -> Option<&RoundConfig> {
        self.get(level.checked_add(1)?)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoundConfig> + '_ {
        self.levels.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn level(level: u32) -> RoundConfig {
        RoundConfig {
            level,
            ..Default::default()
        }
    }

    #[test]
    fn lookup_by_number() {
        let catalog = LevelCatalog::new([level(2), level(1), level(3)]).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(2).map(|config| config.level), Some(2));
        assert_eq!(catalog.next_after(2).map(|config| config.level), Some(3));
        assert!(catalog.next_after(3).is_none());
        assert_eq!(
            catalog.iter().map(|config| config.level).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn rejects_duplicates_and_gaps() {
        assert!(matches!(
            LevelCatalog::new([level(1), level(1)]),
            Err(CatalogError::DuplicateLevel(1))
        ));
        assert!(matches!(
            LevelCatalog::new([level(1), level(3)]),
            Err(CatalogError::MissingLevel(2))
        ));
        assert!(matches!(
            LevelCatalog::new([level(0)]),
            Err(CatalogError::ZeroLevel)
        ));
        assert!(matches!(
            LevelCatalog::new(Vec::new()),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn rejects_invalid_level_config() {
        let broken = RoundConfig {
            level: 1,
            rows: 3,
            columns: 3,
            ..Default::default()
        };
        assert!(matches!(
            LevelCatalog::new([broken]),
            Err(CatalogError::InvalidLevel {
                level: 1,
                source: ConfigError::OddCellCount { .. }
            })
        ));
    }

    #[test]
    fn loads_from_json() {
        let catalog = LevelCatalog::from_json(
            r#"[
                {"level": 1, "columns": 2, "rows": 2},
                {"level": 2, "columns": 4, "rows": 3, "use_timer": false}
            ]"#,
        )
        .unwrap();

        assert_eq!(catalog.get(1).unwrap().total_cards(), 4);
        assert!(!catalog.get(2).unwrap().use_timer);
        assert!(matches!(
            LevelCatalog::from_json("{}"),
            Err(CatalogError::Parse(_))
        ));
    }
}
