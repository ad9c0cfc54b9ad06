use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use core::str::FromStr;
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::*;

/// Ground truth of where the mines are.
///
/// The grid dimensions never change after construction. `mine_count` is the number of mines the
/// layout is meant to hold: it is exact right after construction from an explicit grid or after
/// [`MineLayout::populate`], and stale after [`MineLayout::new`] or [`MineLayout::reset_empty`]
/// until the next populate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMineLayout")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

#[derive(Deserialize)]
struct RawMineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl TryFrom<RawMineLayout> for MineLayout {
    type Error = GameError;

    /// Keeps the stored target count as is, it may legitimately be stale.
    fn try_from(raw: RawMineLayout) -> Result<Self> {
        check_mask_shape(&raw.mine_mask)?;
        Ok(Self {
            mine_mask: raw.mine_mask,
            mine_count: raw.mine_count,
        })
    }
}

impl MineLayout {
    /// Empty layout that will hold `config.mines` mines once populated.
    pub fn new(config: GameConfig) -> Self {
        Self {
            mine_mask: Array2::default(config.size().to_nd_index()),
            mine_count: config.mines(),
        }
    }

    pub fn empty(size: Coord2, mines: CellCount) -> Result<Self> {
        Ok(Self::new(GameConfig::new(size, mines)?))
    }

    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        check_mask_shape(&mine_mask)?;
        let mine_count = count_mines(&mine_mask);
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    /// Copies an explicit row-major grid where `true` marks a mine.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());
        if rows.iter().any(|row| row.as_ref().len() != cols) {
            return Err(GameError::InvalidBoardShape);
        }

        let cells: Vec<bool> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        let mine_mask = Array2::from_shape_vec((rows.len(), cols), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_mine_mask(mine_mask)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    /// Size and target count of this layout. An explicit grid may hold more mines than
    /// [`GameConfig::new`] accepts, and the config reports them unchanged.
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    /// Removes every mine and places `mine_count()` mines at uniformly random cells, never at
    /// `avoid`.
    pub fn populate<R: Rng + ?Sized>(&mut self, avoid: Coord2, rng: &mut R) -> Result<()> {
        let avoid = self.validate_coords(avoid)?;

        let placed = crate::generator::place_mines(&mut self.mine_mask, self.mine_count, avoid, rng);
        if placed != self.mine_count {
            log::warn!(
                "Populated layout count mismatch, actual: {}, requested: {}",
                placed,
                self.mine_count
            );
            self.mine_count = placed;
        }
        Ok(())
    }

    pub fn populate_seeded(&mut self, avoid: Coord2, seed: u64) -> Result<()> {
        self.populate(avoid, &mut SmallRng::seed_from_u64(seed))
    }

    /// Removes every mine. `mine_count()` keeps the target count, which no longer matches the
    /// grid until the next populate.
    pub fn reset_empty(&mut self) {
        self.mine_mask.fill(false);
    }

    pub fn in_range(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.in_range(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        // dimensions are bounded by Coord::MAX at construction
        (rows as Coord, cols as Coord)
    }

    pub fn num_rows(&self) -> Coord {
        self.size().0
    }

    pub fn num_cols(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    /// Target mine count, see the type-level docs for when it matches the grid.
    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mine_count)
    }

    pub fn has_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Mines among the up to eight neighbours of `coords`, not counting `coords` itself.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most eight neighbours, so the cast cannot truncate
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub(crate) fn mine_mask(&self) -> &Array2<bool> {
        &self.mine_mask
    }
}

fn check_mask_shape(mine_mask: &Array2<bool>) -> Result<()> {
    let (rows, cols) = mine_mask.dim();
    let max = usize::from(Coord::MAX);
    if rows == 0 || cols == 0 || rows > max || cols > max {
        Err(GameError::InvalidBoardShape)
    } else {
        Ok(())
    }
}

fn count_mines(mine_mask: &Array2<bool>) -> CellCount {
    let count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
    CellCount::try_from(count).unwrap_or(CellCount::MAX)
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

impl FromStr for MineLayout {
    type Err = GameError;

    /// Parses one row per line, `*` for a mine and `.` for a safe cell. Surrounding whitespace
    /// on each line is ignored and blank lines are skipped.
    fn from_str(s: &str) -> Result<Self> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        '*' => Ok(true),
                        '.' => Ok(false),
                        other => Err(GameError::InvalidGlyph(other)),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(&rows)
    }
}

impl fmt::Display for MineLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.mine_mask.rows() {
            for &is_mine in row {
                f.write_str(if is_mine { "*" } else { "." })?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn explicit_grid_counts_mines() {
        let layout = MineLayout::from_rows(&[
            [true, false, false],
            [false, false, true],
        ])
        .unwrap();

        assert_eq!(layout.size(), (2, 3));
        assert_eq!(layout.num_rows(), 2);
        assert_eq!(layout.num_cols(), 3);
        assert_eq!(layout.mine_count(), 2);
        assert!(layout.has_mine((0, 0)));
        assert!(layout.has_mine((1, 2)));
        assert!(!layout.has_mine((1, 1)));
    }

    #[test]
    fn explicit_grid_is_copied() {
        let mut rows = vec![vec![false, true], vec![false, false]];
        let layout = MineLayout::from_rows(&rows).unwrap();

        rows[0][0] = true;

        assert!(!layout.has_mine((0, 0)));
        assert_eq!(layout.mine_count(), 1);
    }

    #[test]
    fn ragged_or_empty_grid_is_rejected() {
        let ragged = vec![vec![false, true], vec![false]];
        assert_eq!(
            MineLayout::from_rows(&ragged),
            Err(GameError::InvalidBoardShape)
        );

        let empty: [[bool; 0]; 0] = [];
        assert_eq!(
            MineLayout::from_rows(&empty),
            Err(GameError::InvalidBoardShape)
        );

        let no_cols: [[bool; 0]; 2] = [[], []];
        assert_eq!(
            MineLayout::from_rows(&no_cols),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn empty_layout_keeps_stale_target_count() {
        let layout = MineLayout::empty((4, 5), 6).unwrap();

        assert_eq!(layout.mine_count(), 6);
        assert_eq!(count_mines(&layout.mine_mask), 0);
        assert_eq!(layout.safe_cell_count(), 14);
    }

    #[test]
    fn empty_layout_validates_config() {
        assert_eq!(
            MineLayout::empty((3, 3), 3),
            Err(GameError::TooManyMines)
        );
        assert_eq!(
            MineLayout::empty((0, 3), 0),
            Err(GameError::InvalidBoardShape)
        );
    }

    #[test]
    fn populate_places_target_and_avoids_cell() {
        let mut layout = MineLayout::empty((9, 9), 10).unwrap();

        layout.populate_seeded((4, 4), 1234).unwrap();

        assert_eq!(count_mines(&layout.mine_mask), 10);
        assert_eq!(layout.mine_count(), 10);
        assert!(!layout.has_mine((4, 4)));
    }

    #[test]
    fn populate_replaces_previous_mines() {
        let mut layout: MineLayout = "\
            **.
            ...
            ...
        "
        .parse()
        .unwrap();
        assert_eq!(layout.mine_count(), 2);

        layout.populate_seeded((0, 0), 9).unwrap();

        assert_eq!(count_mines(&layout.mine_mask), 2);
        assert!(!layout.has_mine((0, 0)));
    }

    #[test]
    fn populate_rejects_out_of_range_avoid() {
        let mut layout = MineLayout::empty((3, 3), 1).unwrap();

        assert_eq!(layout.populate_seeded((3, 0), 0), Err(GameError::InvalidCoords));
        assert_eq!(count_mines(&layout.mine_mask), 0);
    }

    #[test]
    fn reset_empty_clears_grid_but_not_target() {
        let mut layout = MineLayout::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        layout.reset_empty();

        assert_eq!(count_mines(&layout.mine_mask), 0);
        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.size(), (3, 3));
    }

    #[test]
    fn adjacent_count_ignores_self_and_out_of_range() {
        let layout: MineLayout = "\
            *..
            .*.
            ...
        "
        .parse()
        .unwrap();

        assert_eq!(layout.adjacent_mine_count((0, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((1, 1)), 1);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 1);
    }

    #[test]
    fn adjacent_count_is_zero_without_neighbors() {
        let layout: MineLayout = "\
            ....*
            .....
            .....
        "
        .parse()
        .unwrap();

        assert_eq!(layout.adjacent_mine_count((2, 0)), 0);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 0);
        assert_eq!(layout.adjacent_mine_count((1, 3)), 1);
    }

    #[test]
    fn fully_surrounded_cell_counts_eight() {
        let layout: MineLayout = "\
            ***
            *.*
            ***
        "
        .parse()
        .unwrap();

        assert_eq!(layout.adjacent_mine_count((1, 1)), 8);
    }

    #[test]
    fn in_range_checks_both_axes() {
        let layout = MineLayout::empty((2, 3), 0).unwrap();

        assert!(layout.in_range((0, 0)));
        assert!(layout.in_range((1, 2)));
        assert!(!layout.in_range((2, 0)));
        assert!(!layout.in_range((0, 3)));
        assert_eq!(layout.validate_coords((1, 3)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn mine_coords_out_of_range_are_rejected() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn parse_rejects_unknown_glyphs() {
        assert_eq!(
            "*.x".parse::<MineLayout>(),
            Err(GameError::InvalidGlyph('x'))
        );
    }

    #[test]
    fn game_config_reports_size_and_target() {
        let layout = MineLayout::empty((4, 6), 5).unwrap();
        assert_eq!(layout.game_config(), GameConfig::new((4, 6), 5).unwrap());

        let dense: MineLayout = "**\n*.".parse().unwrap();
        let config = dense.game_config();
        assert_eq!(config.size(), (2, 2));
        assert_eq!(config.mines(), 3);
    }

    #[test]
    fn transposed_mask_keeps_logical_positions() {
        let mask = Array2::from_shape_vec((2, 3), vec![true, false, false, false, false, true])
            .unwrap()
            .reversed_axes();
        assert!(!mask.is_standard_layout());

        let layout = MineLayout::from_mine_mask(mask).unwrap();

        assert_eq!(layout.size(), (3, 2));
        assert!(layout.has_mine((0, 0)));
        assert!(layout.has_mine((2, 1)));
        assert_eq!(layout.adjacent_mine_count((1, 0)), 2);
        assert_eq!(layout.to_string(), "*.\n..\n.*\n");
    }

    #[test]
    fn deserialize_rejects_empty_grid() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(1, 1)]).unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        assert_eq!(serde_json::from_str::<MineLayout>(&json).unwrap(), layout);

        let empty = r#"{"mine_mask":{"v":1,"dim":[0,0],"data":[]},"mine_count":5}"#;
        assert!(serde_json::from_str::<MineLayout>(empty).is_err());
    }

    #[test]
    fn display_matches_parsed_text() {
        let text = "*..\n..*\n";
        let layout: MineLayout = text.parse().unwrap();

        assert_eq!(layout.to_string(), text);
    }
}
