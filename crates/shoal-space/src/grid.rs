//! Fixed 2D ocean mesh with land mask and 8-connected neighbourhood.

use serde::{Deserialize, Serialize};
use shoal_core::CellId;
use smallvec::SmallVec;

use crate::error::SpaceError;

/// All 8 offsets: N, S, W, E, NW, NE, SW, SE.
const OFFSETS_8: [(i64, i64); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Geographic bounds of the grid, in decimal degrees.
///
/// Row 0 is the northernmost row; column 0 the westernmost column.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    /// Southern edge.
    pub lat_min: f64,
    /// Northern edge.
    pub lat_max: f64,
    /// Western edge.
    pub lon_min: f64,
    /// Eastern edge.
    pub lon_max: f64,
}

/// A rectangular grid of ocean and land cells.
///
/// Cells are addressed by [`CellId`] in row-major order. Neighbours are the
/// 8 surrounding cells clipped at the grid edge: corners have 3, edge
/// cells 5, interior cells 8. Land cells appear in neighbour lists; use
/// [`ocean_neighbours`](OceanGrid::ocean_neighbours) to filter them.
///
/// The grid is immutable after construction.
#[derive(Clone, Debug)]
pub struct OceanGrid {
    rows: u32,
    cols: u32,
    land: Vec<bool>,
    ocean: Vec<CellId>,
    neighbours: Vec<SmallVec<[CellId; 8]>>,
    positions: Vec<(f64, f64)>,
}

impl OceanGrid {
    /// Create a grid with the given land mask (`true` = land), row-major.
    ///
    /// Returns an error for an empty grid, a mask of the wrong length, a
    /// grid too large for [`CellId`], or a grid without any ocean cell.
    pub fn new(rows: u32, cols: u32, land: Vec<bool>) -> Result<Self, SpaceError> {
        if rows == 0 || cols == 0 {
            return Err(SpaceError::EmptyGrid);
        }
        let n = u64::from(rows) * u64::from(cols);
        if n > u64::from(u32::MAX) {
            return Err(SpaceError::DimensionTooLarge { rows, cols });
        }
        let n = n as usize;
        if land.len() != n {
            return Err(SpaceError::MaskLength {
                expected: n,
                got: land.len(),
            });
        }
        let ocean: Vec<CellId> = (0..n)
            .filter(|&i| !land[i])
            .map(|i| CellId(i as u32))
            .collect();
        if ocean.is_empty() {
            return Err(SpaceError::NoOceanCells);
        }

        let mut neighbours = Vec::with_capacity(n);
        for r in 0..i64::from(rows) {
            for c in 0..i64::from(cols) {
                let mut list = SmallVec::new();
                for (dr, dc) in OFFSETS_8 {
                    let (nr, nc) = (r + dr, c + dc);
                    if nr >= 0 && nr < i64::from(rows) && nc >= 0 && nc < i64::from(cols) {
                        list.push(CellId((nr * i64::from(cols) + nc) as u32));
                    }
                }
                neighbours.push(list);
            }
        }

        let mut grid = Self {
            rows,
            cols,
            land,
            ocean,
            neighbours,
            positions: Vec::new(),
        };
        grid.positions = grid.compute_positions(GeoExtent {
            lat_min: 0.0,
            lat_max: f64::from(rows),
            lon_min: 0.0,
            lon_max: f64::from(cols),
        });
        Ok(grid)
    }

    /// Create a grid without land.
    pub fn all_ocean(rows: u32, cols: u32) -> Result<Self, SpaceError> {
        let n = (rows as usize).saturating_mul(cols as usize);
        Self::new(rows, cols, vec![false; n])
    }

    /// Place the grid within geographic bounds; cell positions are centres.
    pub fn with_extent(mut self, extent: GeoExtent) -> Self {
        self.positions = self.compute_positions(extent);
        self
    }

    fn compute_positions(&self, e: GeoExtent) -> Vec<(f64, f64)> {
        let dlat = (e.lat_max - e.lat_min) / f64::from(self.rows);
        let dlon = (e.lon_max - e.lon_min) / f64::from(self.cols);
        let mut out = Vec::with_capacity(self.cell_count());
        for r in 0..self.rows {
            for c in 0..self.cols {
                let lat = e.lat_max - (f64::from(r) + 0.5) * dlat;
                let lon = e.lon_min + (f64::from(c) + 0.5) * dlon;
                out.push((lat, lon));
            }
        }
        out
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Total number of cells, land included.
    pub fn cell_count(&self) -> usize {
        self.land.len()
    }

    /// Number of ocean cells.
    pub fn ocean_cell_count(&self) -> usize {
        self.ocean.len()
    }

    /// All ocean cells in ascending id order.
    pub fn ocean_cells(&self) -> &[CellId] {
        &self.ocean
    }

    /// Whether `cell` belongs to the grid.
    pub fn contains(&self, cell: CellId) -> bool {
        cell.index() < self.land.len()
    }

    /// Check that `cell` belongs to the grid.
    pub fn check(&self, cell: CellId) -> Result<(), SpaceError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(SpaceError::CellOutOfBounds {
                cell,
                cells: self.cell_count(),
            })
        }
    }

    /// The cell at `(row, col)`.
    pub fn cell_at(&self, row: u32, col: u32) -> Result<CellId, SpaceError> {
        if row >= self.rows || col >= self.cols {
            return Err(SpaceError::CoordOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(CellId(row * self.cols + col))
    }

    /// `(row, col)` of `cell`.
    pub fn coords(&self, cell: CellId) -> (u32, u32) {
        (cell.0 / self.cols, cell.0 % self.cols)
    }

    /// `(lat, lon)` of the centre of `cell`.
    pub fn position(&self, cell: CellId) -> (f64, f64) {
        self.positions[cell.index()]
    }

    /// Whether `cell` is land.
    pub fn is_land(&self, cell: CellId) -> bool {
        self.land[cell.index()]
    }

    /// Whether `cell` is ocean.
    pub fn is_ocean(&self, cell: CellId) -> bool {
        !self.land[cell.index()]
    }

    /// The 8-connected, edge-clipped neighbours of `cell`, land included.
    pub fn neighbours(&self, cell: CellId) -> &[CellId] {
        &self.neighbours[cell.index()]
    }

    /// The ocean neighbours of `cell`.
    pub fn ocean_neighbours(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.neighbours(cell)
            .iter()
            .copied()
            .filter(move |&n| !self.land[n.index()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbour_counts_are_clipped_at_edges() {
        let g = OceanGrid::all_ocean(5, 5).unwrap();
        assert_eq!(g.neighbours(g.cell_at(0, 0).unwrap()).len(), 3);
        assert_eq!(g.neighbours(g.cell_at(0, 2).unwrap()).len(), 5);
        assert_eq!(g.neighbours(g.cell_at(4, 4).unwrap()).len(), 3);
        assert_eq!(g.neighbours(g.cell_at(2, 2).unwrap()).len(), 8);
    }

    #[test]
    fn single_cell_grid_has_no_neighbours() {
        let g = OceanGrid::all_ocean(1, 1).unwrap();
        assert!(g.neighbours(CellId(0)).is_empty());
    }

    #[test]
    fn neighbours_are_symmetric() {
        let g = OceanGrid::all_ocean(4, 6).unwrap();
        for i in 0..g.cell_count() as u32 {
            for &n in g.neighbours(CellId(i)) {
                assert!(g.neighbours(n).contains(&CellId(i)));
            }
        }
    }

    #[test]
    fn ocean_neighbours_skip_land() {
        // 3x3 with the centre column as land.
        let land = vec![false, true, false, false, true, false, false, true, false];
        let g = OceanGrid::new(3, 3, land).unwrap();
        let c = g.cell_at(1, 0).unwrap();
        let ocean: Vec<_> = g.ocean_neighbours(c).collect();
        assert_eq!(ocean, vec![g.cell_at(0, 0).unwrap(), g.cell_at(2, 0).unwrap()]);
        assert_eq!(g.ocean_cell_count(), 6);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(OceanGrid::all_ocean(0, 3).unwrap_err(), SpaceError::EmptyGrid);
        assert_eq!(
            OceanGrid::new(2, 2, vec![false; 3]).unwrap_err(),
            SpaceError::MaskLength {
                expected: 4,
                got: 3
            }
        );
        assert_eq!(
            OceanGrid::new(1, 2, vec![true, true]).unwrap_err(),
            SpaceError::NoOceanCells
        );
    }

    #[test]
    fn coords_round_trip_and_bounds() {
        let g = OceanGrid::all_ocean(3, 4).unwrap();
        let c = g.cell_at(2, 1).unwrap();
        assert_eq!(c, CellId(9));
        assert_eq!(g.coords(c), (2, 1));
        assert!(g.cell_at(3, 0).is_err());
        assert!(g.check(CellId(12)).is_err());
    }

    #[test]
    fn positions_are_cell_centres() {
        let g = OceanGrid::all_ocean(2, 2).unwrap().with_extent(GeoExtent {
            lat_min: 40.0,
            lat_max: 42.0,
            lon_min: -10.0,
            lon_max: -6.0,
        });
        assert_eq!(g.position(CellId(0)), (41.5, -9.0));
        assert_eq!(g.position(CellId(3)), (40.5, -7.0));
    }
}
