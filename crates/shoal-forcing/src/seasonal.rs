//! Plankton forcing cycling over the steps of the year.

use log::debug;
use shoal_core::{CellId, ForcingError, LtlForcing, PlanktonGroupId, SimTime};

use crate::field::PlanktonField;
use crate::group::PlanktonGroup;

/// Forcing with one biomass snapshot per step of the year.
///
/// `steps[s][g][cell]` is the biomass of group `g` in `cell` during step
/// `s` of every year.
#[derive(Clone, Debug)]
pub struct SeasonalForcing {
    steps: Vec<Vec<Vec<f64>>>,
    field: PlanktonField,
}

impl SeasonalForcing {
    /// Build from per-step fields; the first step is loaded immediately.
    pub fn new(
        groups: Vec<PlanktonGroup>,
        cell_count: usize,
        steps: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self, ForcingError> {
        let mut field = PlanktonField::new(groups, cell_count)?;
        if steps.is_empty() {
            return Err(ForcingError::MissingStep {
                step: 0,
                available: 0,
            });
        }
        for s in &steps {
            field.check_fields(s)?;
        }
        field.load(&steps[0]);
        Ok(Self { steps, field })
    }

    /// Number of steps per cycle.
    pub fn steps_per_cycle(&self) -> usize {
        self.steps.len()
    }

    /// Current biomass state.
    pub fn field(&self) -> &PlanktonField {
        &self.field
    }
}

impl LtlForcing for SeasonalForcing {
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
        let Some(fields) = self.steps.get(time.step as usize) else {
            return Err(ForcingError::MissingStep {
                step: time.step,
                available: self.steps.len() as u32,
            });
        };
        self.field.load(fields);
        debug!("seasonal forcing loaded step {} at {time}", time.step);
        Ok(())
    }
}
