use ndarray::Array2;
use rand::Rng;
use rand::seq::index;

use crate::*;

/// Clears `mine_mask` and places up to `mines` mines uniformly at random over every cell except
/// `avoid`.
///
/// Samples distinct flat indices over the `total - 1` candidate cells and shifts the ones at or
/// past `avoid` by one, so the excluded cell can never be chosen and the loop always terminates.
/// Returns how many mines were actually placed.
pub(crate) fn place_mines<R>(
    mine_mask: &mut Array2<bool>,
    mines: CellCount,
    avoid: Coord2,
    rng: &mut R,
) -> CellCount
where
    R: Rng + ?Sized,
{
    mine_mask.fill(false);

    let (_, cols) = mine_mask.dim();
    let total = mine_mask.len();
    let free_cells = total.saturating_sub(1);
    let avoid_index = usize::from(avoid.0) * cols + usize::from(avoid.1);

    let requested = usize::try_from(mines).unwrap_or(usize::MAX);
    let amount = if requested > free_cells {
        log::warn!(
            "Cannot place {} mines around {:?}, only {} free cells, placing {} instead",
            requested,
            avoid,
            free_cells,
            free_cells
        );
        free_cells
    } else {
        requested
    };

    for sampled in index::sample(rng, free_cells, amount) {
        let flat = if sampled >= avoid_index {
            sampled + 1
        } else {
            sampled
        };
        mine_mask[[flat / cols, flat % cols]] = true;
    }

    // double check mine count
    let placed = mine_mask.iter().filter(|&&is_mine| is_mine).count();
    debug_assert!(!mine_mask[avoid.to_nd_index()]);
    log::debug!("Placed {} mines avoiding {:?}", placed, avoid);

    CellCount::try_from(placed).unwrap_or(CellCount::MAX)
}
