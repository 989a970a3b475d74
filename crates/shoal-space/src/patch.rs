//! Connected ocean patches found by random flood fill.
//!
//! Used once at setup by the random distribution mode: each species gets
//! one patch of a configured size and keeps it for the whole run.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use shoal_core::CellId;

use crate::error::SpaceError;
use crate::grid::OceanGrid;

/// Number of start cells tried before giving up on a fragmented grid.
const MAX_STARTS: usize = 64;

/// Find a connected patch of `size` ocean cells.
///
/// The start cell is drawn uniformly over the whole grid, rejecting land.
/// The patch then grows breadth-first, visiting each cell's ocean
/// neighbours in random order until it holds `size` cells. If the grid has
/// no more than `size` ocean cells, every ocean cell is returned.
///
/// A start whose connected region is too small is abandoned and a new
/// start drawn; after `MAX_STARTS` failures the call returns
/// [`SpaceError::PatchUnreachable`].
pub fn random_patch<R: Rng + ?Sized>(
    grid: &OceanGrid,
    size: usize,
    rng: &mut R,
) -> Result<Vec<CellId>, SpaceError> {
    if size == 0 {
        return Err(SpaceError::EmptyPatch);
    }
    if size >= grid.ocean_cell_count() {
        return Ok(grid.ocean_cells().to_vec());
    }

    let mut largest = 0;
    let mut in_patch = vec![false; grid.cell_count()];
    for _ in 0..MAX_STARTS {
        let start = random_ocean_cell(grid, rng);
        in_patch.iter_mut().for_each(|v| *v = false);

        let mut patch = Vec::with_capacity(size);
        let mut frontier = VecDeque::new();
        in_patch[start.index()] = true;
        patch.push(start);
        frontier.push_back(start);

        while patch.len() < size {
            let Some(cell) = frontier.pop_front() else {
                break;
            };
            let mut next: Vec<CellId> = grid
                .ocean_neighbours(cell)
                .filter(|n| !in_patch[n.index()])
                .collect();
            next.shuffle(rng);
            for n in next {
                if patch.len() == size {
                    break;
                }
                in_patch[n.index()] = true;
                patch.push(n);
                frontier.push_back(n);
            }
        }

        if patch.len() == size {
            return Ok(patch);
        }
        largest = largest.max(patch.len());
    }
    Err(SpaceError::PatchUnreachable {
        requested: size,
        largest,
    })
}

/// Draw a cell uniformly over the grid until it is ocean.
pub fn random_ocean_cell<R: Rng + ?Sized>(grid: &OceanGrid, rng: &mut R) -> CellId {
    // Bounded rejection; falls back to the ocean list on heavily masked grids.
    let n = grid.cell_count();
    for _ in 0..n.saturating_mul(16).max(64) {
        let c = CellId(rng.random_range(0..n) as u32);
        if grid.is_ocean(c) {
            return c;
        }
    }
    let ocean = grid.ocean_cells();
    ocean[rng.random_range(0..ocean.len())]
}
