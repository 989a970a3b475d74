//! Collaborator traits: low-trophic-level forcing and indicator reporting.

use crate::error::ForcingError;
use crate::id::{CellId, PlanktonGroupId, SimTime};
use crate::snapshot::PeriodSnapshot;

/// Source of plankton biomass available to fish predators.
///
/// The engine calls [`advance`](LtlForcing::advance) once per step before
/// predation, then reads accessible biomass and deducts what predators ate
/// while predation runs. Group and cell ids passed in are always valid for
/// the grid and group count the simulation was built with.
pub trait LtlForcing {
    /// Number of plankton groups.
    fn group_count(&self) -> usize;

    /// Biomass (tons) of `group` in `cell` reachable by fish this step.
    fn accessible_biomass(&self, group: PlanktonGroupId, cell: CellId) -> f64;

    /// Trophic level of `group`.
    fn trophic_level(&self, group: PlanktonGroupId) -> f64;

    /// Size range `(min, max)` of `group` organisms, in cm.
    fn size_range(&self, group: PlanktonGroupId) -> (f64, f64);

    /// Remove `amount` tons of `group` biomass from `cell`.
    fn deduct_biomass(&mut self, group: PlanktonGroupId, cell: CellId, amount: f64);

    /// Move the forcing to `time`, refreshing accessible biomass.
    fn advance(&mut self, time: SimTime) -> Result<(), ForcingError>;
}

impl<T: LtlForcing + ?Sized> LtlForcing for Box<T> {
    fn group_count(&self) -> usize {
        (**self).group_count()
    }

    fn accessible_biomass(&self, group: PlanktonGroupId, cell: CellId) -> f64 {
        (**self).accessible_biomass(group, cell)
    }

    fn trophic_level(&self, group: PlanktonGroupId) -> f64 {
        (**self).trophic_level(group)
    }

    fn size_range(&self, group: PlanktonGroupId) -> (f64, f64) {
        (**self).size_range(group)
    }

    fn deduct_biomass(&mut self, group: PlanktonGroupId, cell: CellId, amount: f64) {
        (**self).deduct_biomass(group, cell, amount)
    }

    fn advance(&mut self, time: SimTime) -> Result<(), ForcingError> {
        (**self).advance(time)
    }
}

/// Consumer of per-period indicator snapshots.
///
/// Receives one [`PeriodSnapshot`] at the end of each accounting period.
/// Nothing flows back into the simulation.
pub trait Reporter {
    /// Handle the snapshot of a completed accounting period.
    fn report(&mut self, snapshot: &PeriodSnapshot);
}
