use alloc::vec;
use core::fmt;
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// What the player currently sees of a [`MineLayout`], plus the actions that change it.
///
/// The board borrows its layout instead of owning it, so the caller decides how long the layout
/// lives and a re-populate through [`BoardState::populate_layout`] is seen by the very next
/// action. The tile grid always has the layout's shape.
#[derive(Debug)]
pub struct BoardState<'a> {
    layout: &'a mut MineLayout,
    tiles: Array2<Tile>,
}

impl<'a> BoardState<'a> {
    pub fn new(layout: &'a mut MineLayout) -> Self {
        let size = layout.size();
        Self {
            layout,
            tiles: Array2::default(size.to_nd_index()),
        }
    }

    pub fn layout(&self) -> &MineLayout {
        &*self.layout
    }

    /// Re-populates the bound layout, keeping `avoid` free of mines. Meant for the first
    /// uncover of a game so the opening click is always safe.
    pub fn populate_layout<R: Rng + ?Sized>(&mut self, avoid: Coord2, rng: &mut R) -> Result<()> {
        self.layout.populate(avoid, rng)
    }

    pub fn populate_layout_seeded(&mut self, avoid: Coord2, seed: u64) -> Result<()> {
        self.layout.populate_seeded(avoid, seed)
    }

    pub fn clear_layout(&mut self) {
        self.layout.reset_empty();
    }

    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    /// Covers every tile again. The layout is left untouched.
    pub fn reset_game_display(&mut self) {
        self.tiles.fill(Tile::Covered);
    }

    pub fn cell_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn tiles(&self) -> ArrayView2<'_, Tile> {
        self.tiles.view()
    }

    pub fn is_uncovered(&self, coords: Coord2) -> bool {
        self.cell_at(coords).is_opened()
    }

    pub fn flagged_count(&self) -> CellCount {
        let flagged = self.tiles.iter().filter(|&&tile| tile == Tile::Flagged).count();
        CellCount::try_from(flagged).unwrap_or(CellCount::MAX)
    }

    /// Target mine count minus the number of flags, whether the flags are right or not. Goes
    /// negative once the player places more flags than there are mines.
    pub fn mines_left(&self) -> i64 {
        i64::from(self.layout.mine_count()) - i64::from(self.flagged_count())
    }

    /// Cycles a covered tile through flagged, questioned and back to covered. Opened tiles are
    /// left alone.
    pub fn cycle_guess(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        let coords = self.layout.validate_coords(coords)?;
        let tile = &mut self.tiles[coords.to_nd_index()];

        Ok(match tile.next_guess() {
            Some(next) => {
                *tile = next;
                MarkOutcome::Changed
            }
            None => MarkOutcome::NoChange,
        })
    }

    /// Uncovers `coords`.
    ///
    /// A mine there turns into [`Tile::ExplodedMine`] whatever the tile showed before, and the
    /// result is [`UncoverOutcome::Exploded`]. Otherwise the connected zero-count region around
    /// `coords` is opened along with its numbered border. The fill never opens or passes through
    /// a flagged tile, including the starting one, while questioned tiles are opened normally.
    ///
    /// This does not decide whether the game is over, call [`BoardState::is_game_over`] after
    /// each action for that.
    pub fn uncover(&mut self, coords: Coord2) -> Result<UncoverOutcome> {
        let coords = self.layout.validate_coords(coords)?;

        if self.layout.has_mine(coords) {
            self.tiles[coords.to_nd_index()] = Tile::ExplodedMine;
            log::debug!("Uncovered mine at {:?}", coords);
            return Ok(UncoverOutcome::Exploded);
        }

        let opened = self.flood_fill(coords);
        log::debug!("Uncovered {:?}, opened {} tiles", coords, opened);

        Ok(if opened == 0 {
            UncoverOutcome::NoChange
        } else {
            UncoverOutcome::Revealed
        })
    }

    /// Explicit-stack flood fill, so large empty boards cannot exhaust the call stack. A tile
    /// is skipped once opened, which is what stops the fill from cycling.
    fn flood_fill(&mut self, start: Coord2) -> CellCount {
        let mut opened = 0;
        let mut to_visit = vec![start];

        while let Some(visit_coords) = to_visit.pop() {
            if !can_flood(self.tiles[visit_coords.to_nd_index()]) {
                log::trace!("Skipping tile at {:?}", visit_coords);
                continue;
            }

            let adjacent_mines = self.layout.adjacent_mine_count(visit_coords);
            self.tiles[visit_coords.to_nd_index()] = Tile::Revealed(adjacent_mines);
            opened += 1;
            log::trace!(
                "Flood opened tile at {:?}, mine count: {}",
                visit_coords,
                adjacent_mines
            );

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| can_flood(self.tiles[pos.to_nd_index()])),
                );
            }
        }

        opened
    }

    /// Classifies the board without touching it.
    ///
    /// Any exploded mine means a loss, and loss wins over a simultaneous win. Otherwise the game
    /// is won once the revealed safe tiles add up to the layout's total minus its target mine
    /// count.
    pub fn status(&self) -> GameStatus {
        let mut revealed_safe: CellCount = 0;

        for (&tile, &is_mine) in self.tiles.iter().zip(self.layout.mine_mask().iter()) {
            match tile {
                Tile::ExplodedMine => return GameStatus::Lost,
                Tile::Revealed(_) if !is_mine => revealed_safe += 1,
                _ => {}
            }
        }

        if revealed_safe == self.layout.safe_cell_count() {
            GameStatus::Won
        } else {
            GameStatus::InProgress
        }
    }

    /// Like [`BoardState::status`], but a finished game also gets its final display.
    ///
    /// On a win every mine is flagged. On a loss, unflagged mines other than the exploded ones
    /// show as [`Tile::Mine`] and flags on safe tiles turn into [`Tile::IncorrectFlag`], while
    /// correct flags stay. This mutates the board the first time the game is seen as finished;
    /// later calls find nothing left to change.
    pub fn evaluate_and_finalize(&mut self) -> GameStatus {
        let status = self.status();
        if status.is_finished() {
            self.finalize(status);
        }
        status
    }

    /// Whether the game is won or lost. Finalizes the display as a side effect, see
    /// [`BoardState::evaluate_and_finalize`].
    pub fn is_game_over(&mut self) -> bool {
        self.evaluate_and_finalize().is_finished()
    }

    /// First exploded mine in row-major order, if the player hit one.
    pub fn exploded_mine(&self) -> Option<Coord2> {
        self.tiles
            .indexed_iter()
            .find(|&(_, &tile)| tile == Tile::ExplodedMine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
    }

    fn finalize(&mut self, status: GameStatus) {
        use Tile::*;

        let won = status == GameStatus::Won;
        let mut changed: CellCount = 0;

        for (tile, &is_mine) in self.tiles.iter_mut().zip(self.layout.mine_mask().iter()) {
            let next = match (*tile, is_mine) {
                (Flagged | ExplodedMine, true) => *tile,
                (_, true) if won => Flagged,
                (_, true) => Mine,
                (Flagged, false) if !won => IncorrectFlag,
                (other, false) => other,
            };
            if next != *tile {
                *tile = next;
                changed += 1;
            }
        }

        if changed > 0 {
            log::info!("Game finished as {:?}, updated {} tiles", status, changed);
        }
    }
}

const fn can_flood(tile: Tile) -> bool {
    matches!(tile, Tile::Covered | Tile::Questioned)
}

impl fmt::Display for BoardState<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.rows() {
            for &tile in row {
                fmt::Write::write_char(f, tile.glyph())?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
