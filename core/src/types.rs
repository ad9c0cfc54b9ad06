/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u16;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub(crate) const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Row-major walk over the 3x3 block around a cell, clipped to the board and skipping the cell
/// itself.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    cursor: Coord2,
    row_end: Coord,
    col_start: Coord,
    col_end: Coord,
    done: bool,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        let (row, col) = center;
        let (rows, cols) = bounds;

        let row_start = row.saturating_sub(1);
        let col_start = col.saturating_sub(1);
        let row_end = row.saturating_add(1).min(rows.saturating_sub(1));
        let col_end = col.saturating_add(1).min(cols.saturating_sub(1));

        Self {
            center,
            cursor: (row_start, col_start),
            row_end,
            col_start,
            col_end,
            done: rows == 0 || cols == 0 || row_start > row_end || col_start > col_end,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let current = self.cursor;
            let (row, col) = current;

            if col < self.col_end {
                self.cursor = (row, col + 1);
            } else if row < self.row_end {
                self.cursor = (row + 1, self.col_start);
            } else {
                self.done = true;
            }

            if current != self.center {
                return Some(current);
            }
        }
        None
    }
}
