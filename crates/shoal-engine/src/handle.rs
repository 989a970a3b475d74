//! Lightweight references from cell occupancy back into cohort arenas.

use shoal_core::SpeciesId;

/// Index of one school: species, cohort (age index) and slot in the cohort.
///
/// Handles are only valid until the next purge or age shift; occupancy is
/// rebuilt from the schools' own `cell` after either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchoolHandle {
    /// Owning species.
    pub species: SpeciesId,
    /// Age index of the owning cohort.
    pub cohort: u32,
    /// Position in the cohort's school list.
    pub slot: u32,
}

impl SchoolHandle {
    /// Build a handle from `usize` indices.
    pub fn new(species: SpeciesId, cohort: usize, slot: usize) -> Self {
        Self {
            species,
            cohort: cohort as u32,
            slot: slot as u32,
        }
    }

    /// Cohort index as `usize`.
    pub fn cohort(self) -> usize {
        self.cohort as usize
    }

    /// Slot index as `usize`.
    pub fn slot(self) -> usize {
        self.slot as usize
    }
}
