//! Plankton group descriptors.

use serde::{Deserialize, Serialize};
use shoal_core::{ForcingError, PlanktonGroupId};

/// Static description of one plankton group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlanktonGroup {
    /// Display name.
    pub name: String,
    /// Smallest organism size (cm).
    pub size_min: f64,
    /// Largest organism size (cm).
    pub size_max: f64,
    /// Trophic level of the group.
    pub trophic_level: f64,
    /// Share of the standing biomass reachable by fish, in `[0, 1]`.
    pub accessibility_coefficient: f64,
}

impl PlanktonGroup {
    /// Check ranges; `id` is used in the error.
    pub fn validate(&self, id: PlanktonGroupId) -> Result<(), ForcingError> {
        if !(self.size_min.is_finite() && self.size_max.is_finite())
            || self.size_min < 0.0
            || self.size_max <= self.size_min
        {
            return Err(ForcingError::InvalidSizeRange {
                group: id,
                min: self.size_min,
                max: self.size_max,
            });
        }
        if !(0.0..=1.0).contains(&self.accessibility_coefficient) {
            return Err(ForcingError::InvalidValue {
                group: id,
                what: "accessibility coefficient",
                value: self.accessibility_coefficient,
            });
        }
        if !self.trophic_level.is_finite() || self.trophic_level < 1.0 {
            return Err(ForcingError::InvalidValue {
                group: id,
                what: "trophic level",
                value: self.trophic_level,
            });
        }
        Ok(())
    }
}
