//! Marine protected areas.

use shoal_core::CellId;

use crate::error::SpaceError;
use crate::grid::OceanGrid;

/// A set of protected ocean cells with an active window of years.
///
/// The area is active for years in `[start_year, end_year]`, both ends
/// included. While active, schools located in a protected cell cannot be
/// caught.
#[derive(Clone, Debug, PartialEq)]
pub struct MarineProtectedArea {
    protected: Vec<bool>,
    cell_count: usize,
    fraction: f64,
    start_year: u32,
    end_year: u32,
}

impl MarineProtectedArea {
    /// Build an MPA over `cells` of `grid`.
    ///
    /// Land cells are rejected. Duplicates are ignored.
    pub fn new(
        grid: &OceanGrid,
        cells: &[CellId],
        start_year: u32,
        end_year: u32,
    ) -> Result<Self, SpaceError> {
        if end_year < start_year {
            return Err(SpaceError::InvalidWindow {
                start: start_year,
                end: end_year,
            });
        }
        let mut protected = vec![false; grid.cell_count()];
        for &c in cells {
            grid.check(c)?;
            if grid.is_land(c) {
                return Err(SpaceError::LandCell { cell: c });
            }
            protected[c.index()] = true;
        }
        let cell_count = protected.iter().filter(|&&p| p).count();
        Ok(Self {
            protected,
            cell_count,
            fraction: cell_count as f64 / grid.cell_count() as f64,
            start_year,
            end_year,
        })
    }

    /// Number of protected cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// First active year.
    pub fn start_year(&self) -> u32 {
        self.start_year
    }

    /// Last active year.
    pub fn end_year(&self) -> u32 {
        self.end_year
    }

    /// Whether the MPA is in force during `year`.
    pub fn is_active(&self, year: u32) -> bool {
        year >= self.start_year && year <= self.end_year
    }

    /// Whether `cell` belongs to the MPA, regardless of the window.
    pub fn contains(&self, cell: CellId) -> bool {
        self.protected.get(cell.index()).copied().unwrap_or(false)
    }

    /// Whether `cell` is protected during `year`.
    pub fn is_protected(&self, cell: CellId, year: u32) -> bool {
        self.is_active(year) && self.contains(cell)
    }

    /// Protected share of the whole grid, land included, while active.
    pub fn grid_fraction(&self) -> f64 {
        self.fraction
    }

    /// Protected share of the grid during `year` (zero outside the window).
    pub fn fraction_at(&self, year: u32) -> f64 {
        if self.is_active(year) {
            self.fraction
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_includes_both_end_years() {
        let grid = OceanGrid::all_ocean(2, 2).unwrap();
        let mpa = MarineProtectedArea::new(&grid, &[CellId(0)], 2, 5).unwrap();
        assert!(!mpa.is_active(1));
        assert!(mpa.is_active(2));
        assert!(mpa.is_active(5));
        assert!(!mpa.is_active(6));
        assert!(mpa.is_protected(CellId(0), 5));
        assert!(!mpa.is_protected(CellId(1), 3));
        assert!(!mpa.is_protected(CellId(0), 6));
        assert_eq!(mpa.fraction_at(5), 0.25);
    }

    #[test]
    fn single_year_window_is_active_that_year() {
        let grid = OceanGrid::all_ocean(1, 1).unwrap();
        let mpa = MarineProtectedArea::new(&grid, &[CellId(0)], 3, 3).unwrap();
        assert!(mpa.is_active(3));
        assert!(!mpa.is_active(4));
    }

    #[test]
    fn fraction_is_taken_over_the_whole_grid() {
        let grid = OceanGrid::new(2, 2, vec![true, false, false, false]).unwrap();
        let mpa = MarineProtectedArea::new(&grid, &[CellId(1), CellId(1)], 0, 10).unwrap();
        assert_eq!(mpa.cell_count(), 1);
        // One protected cell out of four, the land cell counted.
        assert_eq!(mpa.grid_fraction(), 0.25);
        assert_eq!(mpa.fraction_at(10), 0.25);
        assert_eq!(mpa.fraction_at(11), 0.0);
    }

    #[test]
    fn rejects_land_and_inverted_window() {
        let grid = OceanGrid::new(1, 2, vec![true, false]).unwrap();
        assert_eq!(
            MarineProtectedArea::new(&grid, &[CellId(0)], 0, 1).unwrap_err(),
            SpaceError::LandCell { cell: CellId(0) }
        );
        assert!(MarineProtectedArea::new(&grid, &[CellId(1)], 3, 2).is_err());
    }
}
