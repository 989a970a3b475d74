//! Strongly-typed identifiers and the simulation clock.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a fish species.
///
/// `SpeciesId(n)` is the n-th species of the simulation configuration.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    /// The id as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a grid cell by its row-major rank.
///
/// A grid with `cols` columns maps `(row, col)` to `row * cols + col`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl CellId {
    /// The id as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a plankton (low trophic level) group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanktonGroupId(pub u32);

impl PlanktonGroupId {
    /// The id as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlanktonGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a presence/probability map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u32);

impl MapId {
    /// The id as a `usize` index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position of the simulation clock: simulated year and step within it.
///
/// Ordering is chronological.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SimTime {
    /// Simulated year, starting at 0.
    pub year: u32,
    /// Step within the year, in `0..steps_per_year`.
    pub step: u32,
}

impl SimTime {
    /// Construct a time from year and step.
    pub fn new(year: u32, step: u32) -> Self {
        Self { year, step }
    }

    /// Total number of steps elapsed since year 0, step 0.
    pub fn absolute_step(self, steps_per_year: u32) -> u64 {
        u64::from(self.year) * u64::from(steps_per_year) + u64::from(self.step)
    }

    /// The step that follows this one.
    pub fn next(self, steps_per_year: u32) -> Self {
        if self.step + 1 >= steps_per_year {
            Self::new(self.year + 1, 0)
        } else {
            Self::new(self.year, self.step + 1)
        }
    }

    /// Whether this is the last step of its year.
    pub fn is_year_end(self, steps_per_year: u32) -> bool {
        self.step + 1 == steps_per_year
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "y{}s{}", self.year, self.step)
    }
}
