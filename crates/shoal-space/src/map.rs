//! Presence/probability maps used by map-driven distribution.

use rand::Rng;
use shoal_core::CellId;

use crate::error::SpaceError;
use crate::grid::OceanGrid;

/// Per-cell presence probabilities for one (species, age, season) slot.
///
/// Only cells with strictly positive probability are stored; every stored
/// cell is ocean. Probabilities need not sum to one.
#[derive(Clone, Debug, PartialEq)]
pub struct PresenceMap {
    // Sorted by cell id.
    cells: Vec<(CellId, f64)>,
    max_probability: f64,
}

impl PresenceMap {
    /// Build a map from `(cell, probability)` entries.
    ///
    /// Zero-probability entries are dropped. Returns an error for cells
    /// outside the grid, land cells with positive probability, negative or
    /// non-finite probabilities, or a map with nothing left.
    pub fn new(grid: &OceanGrid, entries: &[(CellId, f64)]) -> Result<Self, SpaceError> {
        let mut cells = Vec::with_capacity(entries.len());
        for &(cell, p) in entries {
            grid.check(cell)?;
            if !p.is_finite() || p < 0.0 {
                return Err(SpaceError::InvalidProbability { cell, value: p });
            }
            if p == 0.0 {
                continue;
            }
            if grid.is_land(cell) {
                return Err(SpaceError::LandCell { cell });
            }
            cells.push((cell, p));
        }
        if cells.is_empty() {
            return Err(SpaceError::EmptyMap);
        }
        cells.sort_by_key(|&(c, _)| c);
        cells.dedup_by_key(|&mut (c, _)| c);
        let max_probability = cells.iter().map(|&(_, p)| p).fold(0.0, f64::max);
        Ok(Self {
            cells,
            max_probability,
        })
    }

    /// Map with the same probability on every listed cell.
    pub fn uniform(grid: &OceanGrid, cells: &[CellId]) -> Result<Self, SpaceError> {
        let entries: Vec<_> = cells.iter().map(|&c| (c, 1.0)).collect();
        Self::new(grid, &entries)
    }

    /// Cells with positive probability, ascending.
    pub fn cells(&self) -> &[(CellId, f64)] {
        &self.cells
    }

    /// Number of cells with positive probability.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: construction rejects empty maps.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Largest probability in the map.
    pub fn max_probability(&self) -> f64 {
        self.max_probability
    }

    /// Probability of `cell`, zero if absent.
    pub fn probability(&self, cell: CellId) -> f64 {
        match self.cells.binary_search_by_key(&cell, |&(c, _)| c) {
            Ok(i) => self.cells[i].1,
            Err(_) => 0.0,
        }
    }

    /// Whether `cell` has positive probability.
    pub fn contains(&self, cell: CellId) -> bool {
        self.cells.binary_search_by_key(&cell, |&(c, _)| c).is_ok()
    }

    /// Draw a cell by rejection sampling.
    ///
    /// Cells are drawn uniformly from the map until one satisfies
    /// `probability >= random() * max_probability`. The most probable cell
    /// always passes, so the loop terminates with probability one.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> CellId {
        loop {
            let (cell, p) = self.cells[rng.random_range(0..self.cells.len())];
            if p >= rng.random::<f64>() * self.max_probability {
                return cell;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn rejects_land_and_bad_values() {
        let grid = OceanGrid::new(1, 3, vec![false, true, false]).unwrap();
        assert_eq!(
            PresenceMap::new(&grid, &[(CellId(1), 0.5)]).unwrap_err(),
            SpaceError::LandCell { cell: CellId(1) }
        );
        assert!(matches!(
            PresenceMap::new(&grid, &[(CellId(0), -0.1)]),
            Err(SpaceError::InvalidProbability { .. })
        ));
        assert_eq!(
            PresenceMap::new(&grid, &[(CellId(0), 0.0)]).unwrap_err(),
            SpaceError::EmptyMap
        );
        assert!(PresenceMap::new(&grid, &[(CellId(5), 1.0)]).is_err());
        // Zero probability on land is harmless.
        let m = PresenceMap::new(&grid, &[(CellId(1), 0.0), (CellId(2), 0.3)]).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.max_probability(), 0.3);
    }

    #[test]
    fn sampling_follows_relative_probability() {
        let grid = OceanGrid::all_ocean(1, 2).unwrap();
        let map = PresenceMap::new(&grid, &[(CellId(0), 0.9), (CellId(1), 0.1)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut hits = [0usize; 2];
        for _ in 0..10_000 {
            hits[map.sample(&mut rng).index()] += 1;
        }
        // Expected ratio 9:1.
        let frac = hits[0] as f64 / 10_000.0;
        assert!((0.86..0.94).contains(&frac), "fraction {frac}");
    }

    #[test]
    fn lookup_of_absent_cell_is_zero() {
        let grid = OceanGrid::all_ocean(2, 2).unwrap();
        let map = PresenceMap::uniform(&grid, &[CellId(3), CellId(1)]).unwrap();
        assert!(map.contains(CellId(1)));
        assert!(!map.contains(CellId(0)));
        assert_eq!(map.probability(CellId(2)), 0.0);
        assert_eq!(map.cells()[0].0, CellId(1));
    }
}
