//! Per-cell lists of the schools currently present.

use shoal_core::CellId;

/// Unordered per-cell occupancy lists of lightweight handles.
///
/// The occupancy does not own what it points to: `H` is a copyable handle
/// into storage owned elsewhere. Callers keep the two consistent, typically
/// by clearing and re-inserting every handle after any change of location
/// or storage layout.
#[derive(Clone, Debug)]
pub struct CellOccupancy<H> {
    cells: Vec<Vec<H>>,
}

impl<H: Copy + PartialEq> CellOccupancy<H> {
    /// Empty occupancy for a grid of `cell_count` cells.
    pub fn new(cell_count: usize) -> Self {
        Self {
            cells: vec![Vec::new(); cell_count],
        }
    }

    /// Number of cells tracked.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Remove every handle from every cell, keeping allocations.
    pub fn clear(&mut self) {
        for c in &mut self.cells {
            c.clear();
        }
    }

    /// Register `handle` in `cell`.
    pub fn insert(&mut self, cell: CellId, handle: H) {
        self.cells[cell.index()].push(handle);
    }

    /// Remove `handle` from `cell`. Returns whether it was present.
    pub fn remove(&mut self, cell: CellId, handle: H) -> bool {
        let list = &mut self.cells[cell.index()];
        match list.iter().position(|h| *h == handle) {
            Some(i) => {
                list.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Handles present in `cell`.
    pub fn schools_in(&self, cell: CellId) -> &[H] {
        &self.cells[cell.index()]
    }

    /// Number of handles in `cell`.
    pub fn count_in(&self, cell: CellId) -> usize {
        self.cells[cell.index()].len()
    }

    /// Total number of handles over all cells.
    pub fn total(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    /// Iterate `(cell, handles)` over non-empty cells in id order.
    pub fn occupied(&self) -> impl Iterator<Item = (CellId, &[H])> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_empty())
            .map(|(i, v)| (CellId(i as u32), v.as_slice()))
    }

    /// Sort every cell's list by a key, ties keeping insertion order.
    pub fn sort_each_by<F>(&mut self, mut key: F)
    where
        F: FnMut(&H) -> f64,
    {
        for list in &mut self.cells {
            list.sort_by(|a, b| key(a).total_cmp(&key(b)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_remove_and_count() {
        let mut occ = CellOccupancy::new(4);
        occ.insert(CellId(1), 10u32);
        occ.insert(CellId(1), 11);
        occ.insert(CellId(3), 12);
        assert_eq!(occ.count_in(CellId(1)), 2);
        assert_eq!(occ.total(), 3);
        assert!(occ.remove(CellId(1), 10));
        assert!(!occ.remove(CellId(1), 10));
        assert_eq!(occ.schools_in(CellId(1)), &[11]);

        let occupied: Vec<_> = occ.occupied().map(|(c, _)| c).collect();
        assert_eq!(occupied, vec![CellId(1), CellId(3)]);

        occ.clear();
        assert_eq!(occ.total(), 0);
    }

    #[test]
    fn sort_is_ascending_and_stable() {
        let mut occ = CellOccupancy::new(1);
        let lengths = [5.0, 1.0, 3.0, 1.0];
        for i in 0..4usize {
            occ.insert(CellId(0), i);
        }
        occ.sort_each_by(|&h| lengths[h]);
        assert_eq!(occ.schools_in(CellId(0)), &[1, 3, 2, 0]);
    }
}
