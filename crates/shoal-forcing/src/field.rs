//! Current plankton biomass per group and cell.

use shoal_core::{CellId, ForcingError, PlanktonGroupId};

use crate::group::PlanktonGroup;

/// Biomass state shared by every forcing variant.
///
/// Values are stored group-major: `values[group * cell_count + cell]`.
#[derive(Clone, Debug)]
pub struct PlanktonField {
    groups: Vec<PlanktonGroup>,
    cell_count: usize,
    biomass: Vec<f64>,
    accessible: Vec<f64>,
    consumed: Vec<f64>,
}

impl PlanktonField {
    /// Zeroed field for `groups` over `cell_count` cells.
    pub fn new(groups: Vec<PlanktonGroup>, cell_count: usize) -> Result<Self, ForcingError> {
        for (i, g) in groups.iter().enumerate() {
            g.validate(PlanktonGroupId(i as u32))?;
        }
        let n = groups.len() * cell_count;
        let consumed = vec![0.0; groups.len()];
        Ok(Self {
            groups,
            cell_count,
            biomass: vec![0.0; n],
            accessible: vec![0.0; n],
            consumed,
        })
    }

    /// Check that `fields` holds one non-negative value per cell for each group.
    pub fn check_fields(&self, fields: &[Vec<f64>]) -> Result<(), ForcingError> {
        if fields.len() != self.groups.len() {
            return Err(ForcingError::GroupCount {
                expected: self.groups.len(),
                got: fields.len(),
            });
        }
        for (g, values) in fields.iter().enumerate() {
            let group = PlanktonGroupId(g as u32);
            if values.len() != self.cell_count {
                return Err(ForcingError::FieldLength {
                    group,
                    expected: self.cell_count,
                    got: values.len(),
                });
            }
            if let Some(&v) = values.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(ForcingError::InvalidValue {
                    group,
                    what: "biomass",
                    value: v,
                });
            }
        }
        Ok(())
    }

    /// Replace the standing biomass; accessible biomass is recomputed.
    ///
    /// `fields` must have passed [`check_fields`](Self::check_fields).
    pub fn load(&mut self, fields: &[Vec<f64>]) {
        for (g, values) in fields.iter().enumerate() {
            let coef = self.groups[g].accessibility_coefficient;
            let start = g * self.cell_count;
            for (i, &v) in values.iter().enumerate() {
                self.biomass[start + i] = v;
                self.accessible[start + i] = coef * v;
            }
        }
    }

    #[inline]
    fn slot(&self, group: PlanktonGroupId, cell: CellId) -> usize {
        group.index() * self.cell_count + cell.index()
    }

    /// Group descriptors.
    pub fn groups(&self) -> &[PlanktonGroup] {
        &self.groups
    }

    /// Descriptor of `group`.
    pub fn group(&self, group: PlanktonGroupId) -> &PlanktonGroup {
        &self.groups[group.index()]
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Standing biomass (tons).
    pub fn biomass(&self, group: PlanktonGroupId, cell: CellId) -> f64 {
        self.biomass[self.slot(group, cell)]
    }

    /// Biomass reachable by fish (tons).
    pub fn accessible(&self, group: PlanktonGroupId, cell: CellId) -> f64 {
        self.accessible[self.slot(group, cell)]
    }

    /// Remove eaten biomass from both standing and accessible stocks.
    pub fn deduct(&mut self, group: PlanktonGroupId, cell: CellId, amount: f64) {
        let i = self.slot(group, cell);
        let eaten = amount.min(self.accessible[i]).max(0.0);
        self.accessible[i] -= eaten;
        self.biomass[i] = (self.biomass[i] - eaten).max(0.0);
        self.consumed[group.index()] += eaten;
    }

    /// Biomass eaten per group since construction or the last reset.
    pub fn consumed(&self) -> &[f64] {
        &self.consumed
    }

    /// Zero the consumption counters.
    pub fn reset_consumption(&mut self) {
        self.consumed.iter_mut().for_each(|v| *v = 0.0);
    }
}
