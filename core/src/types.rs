/// Single grid axis, used for column/row counts.
pub type Coord = u8;

/// Count type used for card and pair totals.
pub type CellCount = u16;

/// Durations and timer readings.
pub type Seconds = f32;

/// Absolute position on the engine timeline, in seconds since the engine was created.
pub type Timestamp = f64;

/// Settle delay between a pair being dispatched and its identities being compared, and around
/// the preview reveal.
pub const SETTLE_DELAY: Seconds = 0.5;

/// Row-major grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: Coord,
    pub column: Coord,
}

impl Position {
    pub const fn from_index(index: usize, columns: Coord) -> Self {
        let columns = columns as usize;
        Self {
            row: (index / columns) as Coord,
            column: (index % columns) as Coord,
        }
    }

    pub const fn to_index(self, columns: Coord) -> usize {
        self.row as usize * columns as usize + self.column as usize
    }
}

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Position {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.column.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}
