use serde::{Deserialize, Serialize};

use crate::*;

/// Board dimensions and the number of mines a layout should hold once populated.
///
/// Built through [`GameConfig::new`], so both dimensions are positive. Deserializing goes through
/// the same checks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    size: Coord2,
    mines: CellCount,
}

#[derive(Deserialize)]
struct RawGameConfig {
    size: Coord2,
    mines: CellCount,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = GameError;

    fn try_from(raw: RawGameConfig) -> Result<Self> {
        Self::new(raw.size, raw.mines)
    }
}

impl GameConfig {
    /// Only for sizes already known to be positive, such as those of an existing layout.
    pub(crate) const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Validates that both dimensions are positive and that `mines` stays strictly below a
    /// third of the cells, which leaves room to place them around an excluded start cell.
    pub fn new(size: Coord2, mines: CellCount) -> Result<Self> {
        let (rows, cols) = size;
        if rows == 0 || cols == 0 {
            return Err(GameError::InvalidBoardShape);
        }

        let config = Self::new_unchecked(size, mines);
        if mines > config.max_mines() {
            return Err(GameError::TooManyMines);
        }
        Ok(config)
    }

    pub const fn size(&self) -> Coord2 {
        self.size
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn rows(&self) -> Coord {
        self.size.0
    }

    pub const fn cols(&self) -> Coord {
        self.size.1
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }

    /// Largest mine count accepted by [`GameConfig::new`] for this size.
    pub const fn max_mines(&self) -> CellCount {
        let total = self.total_cells();
        if total == 0 { 0 } else { (total - 1) / 3 }
    }
}
