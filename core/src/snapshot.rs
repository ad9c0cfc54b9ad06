use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Owned copy of what a player can see, detached from the board and its layout.
///
/// Covered tiles carry no hint of what is under them, so a snapshot can be handed to a view or
/// serialized without leaking mine positions before the game ends. Deserialized snapshots are
/// checked with [`BoardSnapshot::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardSnapshot")]
pub struct BoardSnapshot {
    pub size: Coord2,
    pub mines_left: i64,
    pub status: GameStatus,
    pub tiles: Array2<Tile>,
}

#[derive(Deserialize)]
struct RawBoardSnapshot {
    size: Coord2,
    mines_left: i64,
    status: GameStatus,
    tiles: Array2<Tile>,
}

impl TryFrom<RawBoardSnapshot> for BoardSnapshot {
    type Error = GameError;

    fn try_from(raw: RawBoardSnapshot) -> Result<Self> {
        Self::new(raw.size, raw.mines_left, raw.status, raw.tiles)
    }
}

impl BoardSnapshot {
    pub fn new(
        size: Coord2,
        mines_left: i64,
        status: GameStatus,
        tiles: Array2<Tile>,
    ) -> Result<Self> {
        let snapshot = Self {
            size,
            mines_left,
            status,
            tiles,
        };
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn from_board(board: &BoardState<'_>) -> Self {
        Self {
            size: board.size(),
            mines_left: board.mines_left(),
            status: board.status(),
            tiles: board.tiles().to_owned(),
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn validate(&self) -> Result<()> {
        let expected = (usize::from(self.size.0), usize::from(self.size.1));
        if self.tiles.dim() != expected {
            return Err(GameError::InvalidBoardShape);
        }

        if self
            .tiles
            .iter()
            .any(|&tile| matches!(tile, Tile::Revealed(count) if count > 8))
        {
            return Err(GameError::InvalidTile);
        }

        Ok(())
    }
}

impl BoardState<'_> {
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(self)
    }
}
