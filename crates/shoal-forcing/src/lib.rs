//! Low-trophic-level forcing for Shoal simulations.
//!
//! The engine only needs the operations of [`LtlForcing`]. This crate
//! provides two concrete variants and a tagged union selecting between
//! them from configuration:
//!
//! - [`ConstantForcing`]: the same biomass field every step
//! - [`SeasonalForcing`]: one biomass field per step of the year
//! - [`Forcing`]: either of the above behind one type
//!
//! Every variant tracks the biomass eaten by fish per group.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod constant;
pub mod field;
pub mod group;
pub mod seasonal;

pub use constant::ConstantForcing;
pub use field::PlanktonField;
pub use group::PlanktonGroup;
pub use seasonal::SeasonalForcing;

use shoal_core::{CellId, ForcingError, LtlForcing, PlanktonGroupId, SimTime};

/// Forcing variant selected by configuration.
#[derive(Clone, Debug)]
pub enum Forcing {
    /// Time-invariant biomass.
    Constant(ConstantForcing),
    /// Biomass cycling over the steps of the year.
    Seasonal(SeasonalForcing),
}

impl Forcing {
    fn field(&self) -> &PlanktonField {
        match self {
            Self::Constant(f) => f.field(),
            Self::Seasonal(f) => f.field(),
        }
    }

    /// Biomass (tons) of each group eaten since construction or the last reset.
    pub fn consumed(&self) -> &[f64] {
        self.field().consumed()
    }
}

impl From<ConstantForcing> for Forcing {
    fn from(f: ConstantForcing) -> Self {
        Self::Constant(f)
    }
}

impl From<SeasonalForcing> for Forcing {
    fn from(f: SeasonalForcing) -> Self {
        Self::Seasonal(f)
    }
}

impl LtlForcing for Forcing {
    fn group_count(&self) -> usize {
        match self {
            Self::Constant(f) => f.group_count(),
            Self::Seasonal(f) => f.group_count(),
        }
    }

    fn accessible_biomass(&self, group: PlanktonGroupId, cell: CellId) -> f64 {
        match self {
            Self::Constant(f) => f.accessible_biomass(group, cell),
            Self::Seasonal(f) => f.accessible_biomass(group, cell),
        }
    }

    fn trophic_level(&self, group: PlanktonGroupId) -> f64 {
        match self {
            Self::Constant(f) => f.trophic_level(group),
            Self::Seasonal(f) => f.trophic_level(group),
        }
    }

    fn size_range(&self, group: PlanktonGroupId) -> (f64, f64) {
        match self {
            Self::Constant(f) => f.size_range(group),
            Self::Seasonal(f) => f.size_range(group),
        }
    }

    fn deduct_biomass(&mut self, group: PlanktonGroupId, cell: CellId, amount: f64) {
        match self {
            Self::Constant(f) => f.deduct_biomass(group, cell, amount),
            Self::Seasonal(f) => f.deduct_biomass(group, cell, amount),
        }
    }

    fn advance(&mut self, time: SimTime) -> Result<(), ForcingError> {
        match self {
            Self::Constant(f) => f.advance(time),
            Self::Seasonal(f) => f.advance(time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> PlanktonGroup {
        PlanktonGroup {
            name: "meso".into(),
            size_min: 0.02,
            size_max: 0.2,
            trophic_level: 2.0,
            accessibility_coefficient: 0.5,
        }
    }

    #[test]
    fn tagged_union_delegates_to_variant() {
        let mut f: Forcing = ConstantForcing::uniform(vec![group()], 4, 10.0)
            .unwrap()
            .into();
        f.advance(SimTime::default()).unwrap();
        assert_eq!(f.group_count(), 1);
        assert_eq!(f.accessible_biomass(PlanktonGroupId(0), CellId(2)), 5.0);
        f.deduct_biomass(PlanktonGroupId(0), CellId(2), 1.0);
        assert_eq!(f.accessible_biomass(PlanktonGroupId(0), CellId(2)), 4.0);
        assert_eq!(f.consumed(), &[1.0]);
        assert_eq!(f.size_range(PlanktonGroupId(0)), (0.02, 0.2));
    }
}
