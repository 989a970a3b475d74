//! Time-invariant plankton forcing.

use log::debug;
use shoal_core::{CellId, ForcingError, LtlForcing, PlanktonGroupId, SimTime};

use crate::field::PlanktonField;
use crate::group::PlanktonGroup;

/// Forcing whose biomass field is restored to the same values every step.
///
/// Whatever fish ate during a step is replenished by the next
/// [`advance`](LtlForcing::advance).
#[derive(Clone, Debug)]
pub struct ConstantForcing {
    base: Vec<Vec<f64>>,
    field: PlanktonField,
}

impl ConstantForcing {
    /// Forcing with one biomass field (tons per cell) per group.
    pub fn new(
        groups: Vec<PlanktonGroup>,
        cell_count: usize,
        biomass: Vec<Vec<f64>>,
    ) -> Result<Self, ForcingError> {
        let mut field = PlanktonField::new(groups, cell_count)?;
        field.check_fields(&biomass)?;
        field.load(&biomass);
        Ok(Self { base: biomass, field })
    }

    /// Forcing with the same biomass in every cell for every group.
    pub fn uniform(
        groups: Vec<PlanktonGroup>,
        cell_count: usize,
        per_cell: f64,
    ) -> Result<Self, ForcingError> {
        let biomass = vec![vec![per_cell; cell_count]; groups.len()];
        Self::new(groups, cell_count, biomass)
    }

    /// Current biomass state.
    pub fn field(&self) -> &PlanktonField {
        &self.field
    }
}

impl LtlForcing for ConstantForcing {
    fn group_count(&self) -> usize {
        self.field.groups().len()
    }

    fn accessible_biomass(&self, group: PlanktonGroupId, cell: CellId) -> f64 {
        self.field.accessible(group, cell)
    }

    fn trophic_level(&self, group: PlanktonGroupId) -> f64 {
        self.field.group(group).trophic_level
    }

    fn size_range(&self, group: PlanktonGroupId) -> (f64, f64) {
        let g = self.field.group(group);
        (g.size_min, g.size_max)
    }

    fn deduct_biomass(&mut self, group: PlanktonGroupId, cell: CellId, amount: f64) {
        self.field.deduct(group, cell, amount);
    }

    fn advance(&mut self, time: SimTime) -> Result<(), ForcingError> {
        self.field.load(&self.base);
        debug!("constant forcing refreshed at {time}");
        Ok(())
    }
}
