use crate::*;

/// Validation and derived sizes for [`RoundConfig`].
pub trait ConfigExt {
    fn validate(&self) -> core::result::Result<(), ConfigError>;
    fn size(&self) -> (Coord, Coord);
}

impl ConfigExt for RoundConfig {
    fn validate(&self) -> core::result::Result<(), ConfigError> {
        let (columns, rows) = self.size();
        if columns == 0 || rows == 0 {
            return Err(ConfigError::InvalidGridSize { columns, rows });
        }
        if mult(columns, rows) % 2 != 0 {
            return Err(ConfigError::OddCellCount { columns, rows });
        }
        if self.available_cards.is_empty() {
            return Err(ConfigError::EmptyCardPool);
        }

        check_duration("flip_duration", self.flip_duration)?;
        check_duration("mismatch_delay", self.mismatch_delay)?;
        if self.show_preview {
            check_duration("preview_duration", self.preview_duration)?;
        }
        if self.use_timer {
            check_duration("game_duration", self.game_duration)?;
            if self.game_duration == 0. {
                return Err(ConfigError::InvalidDuration("game_duration"));
            }
        }

        Ok(())
    }

    fn size(&self) -> (Coord, Coord) {
        (self.columns, self.rows)
    }
}

fn check_duration(name: &'static str, value: Seconds) -> core::result::Result<(), ConfigError> {
    if value.is_finite() && value >= 0. {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration(name))
    }
}
