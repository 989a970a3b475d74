//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the input for building a
//! [`Simulation`](crate::simulation::Simulation). It derives serde traits so
//! an external loader can read it from JSON or YAML;
//! [`validate()`](SimulationConfig::validate) checks every structural
//! invariant once at startup and the engine never re-validates afterwards.

use std::error::Error;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use shoal_core::{CellId, ForcingError};
use shoal_space::{OceanGrid, SpaceError};

use crate::accessibility::{AccessibilityConfig, AccessibilityMatrix};
use crate::distribution::DistributionConfig;
use crate::params::SpeciesParams;

// ── FishingMode ────────────────────────────────────────────────────

/// How fishing mortality is turned into catches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishingMode {
    /// One rate `F` for every exploitable cohort, scaled up by the share of
    /// the ocean closed by an active MPA.
    #[default]
    Uniform,
    /// One rate per cohort; catches a cohort cannot supply are reallocated
    /// to the other exploitable cohorts.
    PerCohort,
}

// ── MpaConfig ──────────────────────────────────────────────────────

/// Cells closed to fishing from `start_year` to `end_year`, both included.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MpaConfig {
    /// Protected ocean cells.
    pub cells: Vec<CellId>,
    /// First protected year.
    pub start_year: u32,
    /// Last protected year.
    pub end_year: u32,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating a [`SimulationConfig`].
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Grid, map or MPA geometry is invalid.
    Space(SpaceError),
    /// The forcing does not match the configuration.
    Forcing(ForcingError),
    /// No species configured.
    NoSpecies,
    /// Two species share a name.
    DuplicateSpecies {
        /// The repeated name.
        name: String,
    },
    /// A species parameter is out of range or inconsistent.
    InvalidSpecies {
        /// Species name.
        species: String,
        /// Description of the problem.
        reason: String,
    },
    /// `steps_per_year` is zero.
    ZeroStepsPerYear,
    /// `schools_per_cohort` is zero.
    ZeroSchoolsPerCohort,
    /// `record_frequency` is zero.
    ZeroRecordFrequency,
    /// The accessibility matrix has the wrong shape or values.
    Accessibility {
        /// Description of the problem.
        reason: String,
    },
    /// The distribution settings do not cover the species.
    Distribution {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "space: {e}"),
            Self::Forcing(e) => write!(f, "forcing: {e}"),
            Self::NoSpecies => write!(f, "no species configured"),
            Self::DuplicateSpecies { name } => write!(f, "species name {name:?} is used twice"),
            Self::InvalidSpecies { species, reason } => {
                write!(f, "species {species:?}: {reason}")
            }
            Self::ZeroStepsPerYear => write!(f, "steps_per_year must be at least 1"),
            Self::ZeroSchoolsPerCohort => write!(f, "schools_per_cohort must be at least 1"),
            Self::ZeroRecordFrequency => write!(f, "record_frequency must be at least 1"),
            Self::Accessibility { reason } => write!(f, "accessibility: {reason}"),
            Self::Distribution { reason } => write!(f, "distribution: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Forcing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        Self::Space(e)
    }
}

impl From<ForcingError> for ConfigError {
    fn from(e: ForcingError) -> Self {
        Self::Forcing(e)
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the simulation's random generator.
    pub seed: u64,
    /// Steps per simulated year. Default: 24.
    pub steps_per_year: u32,
    /// Schools created per cohort at spawning and initialisation. Default: 20.
    pub schools_per_cohort: u32,
    /// Steps per accounting period handed to the reporter. Default: 12.
    pub record_frequency: u32,
    /// Years simulated before indicators are recorded. Default: 0.
    pub burn_in_years: u32,
    /// How fishing mortality becomes catches.
    pub fishing_mode: FishingMode,
    /// How schools are placed on the grid.
    pub distribution: DistributionConfig,
    /// Optional marine protected area.
    pub mpa: Option<MpaConfig>,
    /// Species in id order.
    pub species: Vec<SpeciesParams>,
    /// Prey accessibility coefficients.
    pub accessibility: AccessibilityConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            steps_per_year: 24,
            schools_per_cohort: 20,
            record_frequency: 12,
            burn_in_years: 0,
            fishing_mode: FishingMode::default(),
            distribution: DistributionConfig::default(),
            mpa: None,
            species: Vec::new(),
            accessibility: AccessibilityConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Validate the configuration against `grid` and a forcing with
    /// `plankton_groups` groups.
    pub fn validate(&self, grid: &OceanGrid, plankton_groups: usize) -> Result<(), ConfigError> {
        // 1. Scalars.
        if self.steps_per_year == 0 {
            return Err(ConfigError::ZeroStepsPerYear);
        }
        if self.schools_per_cohort == 0 {
            return Err(ConfigError::ZeroSchoolsPerCohort);
        }
        if self.record_frequency == 0 {
            return Err(ConfigError::ZeroRecordFrequency);
        }
        // 2. Species.
        if self.species.is_empty() {
            return Err(ConfigError::NoSpecies);
        }
        let mut names = IndexSet::with_capacity(self.species.len());
        for s in &self.species {
            if !names.insert(s.name.as_str()) {
                return Err(ConfigError::DuplicateSpecies {
                    name: s.name.clone(),
                });
            }
            s.validate(self.steps_per_year)?;
        }
        // 3. Accessibility shape and range.
        AccessibilityMatrix::build(&self.accessibility, &self.species, plankton_groups)?;
        // 4. Distribution coverage.
        self.distribution
            .validate(grid, &self.species, self.steps_per_year)?;
        // 5. MPA geometry.
        if let Some(mpa) = &self.mpa {
            shoal_space::MarineProtectedArea::new(grid, &mpa.cells, mpa.start_year, mpa.end_year)?;
        }
        Ok(())
    }
}
