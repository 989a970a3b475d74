//! Benchmark profiles for the Shoal ecosystem simulator.
//!
//! Provides pre-built simulation setups for benchmarking:
//!
//! - [`reference_profile`]: 40x40 grid, three species, two plankton groups
//! - [`stress_profile`]: 100x100 grid, same community with more schools
//! - [`build`]: turn a [`Profile`] into a ready [`Simulation`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use shoal_core::ForcingError;
use shoal_engine::{
    AccessibilityConfig, ConfigError, DistributionConfig, InitialStock, Simulation,
    SimulationConfig, SpeciesParams,
};
use shoal_forcing::{ConstantForcing, PlanktonGroup};
use shoal_space::{OceanGrid, SpaceError};

/// Everything needed to build one benchmark simulation.
#[derive(Clone, Debug)]
pub struct Profile {
    /// Ocean grid.
    pub grid: OceanGrid,
    /// Plankton groups, each with the same biomass in every ocean cell.
    pub plankton: Vec<(PlanktonGroup, f64)>,
    /// Run configuration.
    pub config: SimulationConfig,
}

/// Errors building a profile.
#[derive(Debug)]
pub enum ProfileError {
    /// Grid construction failed.
    Space(SpaceError),
    /// Plankton setup failed.
    Forcing(ForcingError),
    /// Configuration rejected by the engine.
    Config(ConfigError),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Space(e) => write!(f, "grid: {e}"),
            Self::Forcing(e) => write!(f, "forcing: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            Self::Forcing(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

/// Build a reference profile: 40x40 grid with a land strip to the west.
///
/// Community: anchovy, sardine, hake. 12 steps per year, 10 schools per
/// cohort, about 1,900 schools in total.
pub fn reference_profile(seed: u64) -> Result<Profile, ProfileError> {
    profile(40, 40, 10, seed)
}

/// Build a stress profile: 100x100 grid, 30 schools per cohort.
///
/// Same community as [`reference_profile`], roughly 5,700 schools.
pub fn stress_profile(seed: u64) -> Result<Profile, ProfileError> {
    profile(100, 100, 30, seed)
}

/// Build the simulation described by `profile`.
pub fn build(profile: Profile) -> Result<Simulation, ProfileError> {
    let cells = profile.grid.cell_count();
    let groups = profile.plankton.iter().map(|(g, _)| g.clone()).collect();
    let fields = profile
        .plankton
        .iter()
        .map(|(_, per_cell)| {
            (0..cells)
                .map(|c| {
                    if profile.grid.is_ocean(shoal_core::CellId(c as u32)) {
                        *per_cell
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();
    let forcing = ConstantForcing::new(groups, cells, fields).map_err(ProfileError::Forcing)?;
    Simulation::new(profile.config, profile.grid, Box::new(forcing)).map_err(ProfileError::Config)
}

fn profile(rows: u32, cols: u32, schools: u32, seed: u64) -> Result<Profile, ProfileError> {
    let land = (0..rows * cols).map(|i| i % cols < cols / 10).collect();
    let grid = OceanGrid::new(rows, cols, land).map_err(ProfileError::Space)?;
    let ocean = grid.ocean_cell_count();

    let config = SimulationConfig {
        seed,
        steps_per_year: 12,
        schools_per_cohort: schools,
        record_frequency: 12,
        distribution: DistributionConfig::Random {
            patch_sizes: vec![ocean / 3, ocean / 2, ocean * 2 / 3],
        },
        species: community(),
        accessibility: AccessibilityConfig::Uniform(0.8),
        ..Default::default()
    };
    Ok(Profile {
        grid,
        plankton: plankton(),
        config,
    })
}

fn community() -> Vec<SpeciesParams> {
    vec![
        SpeciesParams {
            name: "anchovy".into(),
            longevity: 3.0,
            fishing_mortality: 0.4,
            pred_prey_size_ratio_max: vec![5000.0],
            pred_prey_size_ratio_min: vec![3.5],
            initial_stock: InitialStock::Biomass(50_000.0),
            ..Default::default()
        },
        SpeciesParams {
            name: "sardine".into(),
            longevity: 5.0,
            l_inf: 24.0,
            k: 0.38,
            maturity_size: 15.0,
            fishing_mortality: 0.3,
            pred_prey_size_ratio_max: vec![5000.0],
            pred_prey_size_ratio_min: vec![3.5],
            initial_stock: InitialStock::Biomass(60_000.0),
            ..Default::default()
        },
        SpeciesParams {
            name: "hake".into(),
            longevity: 8.0,
            l_inf: 70.0,
            k: 0.18,
            maturity_size: 32.0,
            additional_mortality: 0.2,
            fishing_mortality: 0.3,
            predation_rate: 3.0,
            pred_prey_size_ratio_max: vec![30.0],
            pred_prey_size_ratio_min: vec![2.5],
            initial_stock: InitialStock::Biomass(20_000.0),
            ..Default::default()
        },
    ]
}

fn plankton() -> Vec<(PlanktonGroup, f64)> {
    vec![
        (
            PlanktonGroup {
                name: "phyto".into(),
                size_min: 0.0002,
                size_max: 0.02,
                trophic_level: 1.0,
                accessibility_coefficient: 0.3,
            },
            300.0,
        ),
        (
            PlanktonGroup {
                name: "zoo".into(),
                size_min: 0.02,
                size_max: 0.5,
                trophic_level: 2.0,
                accessibility_coefficient: 0.5,
            },
            120.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_profile_builds_and_steps() {
        let mut sim = build(reference_profile(1).unwrap()).unwrap();
        assert_eq!(sim.species().len(), 3);
        assert!(sim.occupancy().total() > 0);
        sim.step().unwrap();
        assert_eq!(sim.steps_taken(), 1);
    }

    #[test]
    fn profiles_keep_land_to_the_west() {
        let p = stress_profile(1).unwrap();
        assert_eq!(p.grid.ocean_cell_count(), 100 * 90);
        assert!(p.grid.is_land(p.grid.cell_at(50, 9).unwrap()));
    }
}
