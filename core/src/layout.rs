use serde::{Deserialize, Serialize};

use crate::*;

/// Size of the container the grid is drawn into.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Square cells on a fixed column count, with uniform spacing and padding.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellLayout {
    pub columns: Coord,
    pub rows: Coord,
    pub cell_size: f32,
    pub spacing: f32,
    pub padding: f32,
}

impl CellLayout {
    /// Largest square cell such that the grid fits `bounds` on both axes.
    pub fn compute(config: &RoundConfig, bounds: Bounds) -> Result<Self> {
        let (columns, rows) = config.size();
        Self::fit(columns, rows, config.spacing, config.padding, bounds)
    }

    /// Same grid and margins, new container.
    pub fn refit(self, bounds: Bounds) -> Result<Self> {
        Self::fit(self.columns, self.rows, self.spacing, self.padding, bounds)
    }

    fn fit(
        columns: Coord,
        rows: Coord,
        spacing: f32,
        padding: f32,
        bounds: Bounds,
    ) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(ConfigError::InvalidGridSize { columns, rows }.into());
        }

        let available_width = bounds.width - 2. * padding - spacing * f32::from(columns - 1);
        let available_height = bounds.height - 2. * padding - spacing * f32::from(rows - 1);
        let cell_size =
            (available_width / f32::from(columns)).min(available_height / f32::from(rows));

        // also rejects NaN
        if !(cell_size > 0.) {
            return Err(GameError::Layout { cell_size });
        }

        Ok(Self {
            columns,
            rows,
            cell_size,
            spacing,
            padding,
        })
    }

    /// Top-left corner of the cell at `index`, relative to the container.
    pub fn cell_origin(&self, index: usize) -> (f32, f32) {
        let Position { row, column } = Position::from_index(index, self.columns);
        let stride = self.cell_size + self.spacing;
        (
            self.padding + f32::from(column) * stride,
            self.padding + f32::from(row) * stride,
        )
    }
}
