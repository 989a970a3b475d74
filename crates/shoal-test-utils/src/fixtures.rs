//! Reusable grids, species presets and configurations.
//!
//! - [`open_grid`]: all-ocean grid
//! - [`coastal_grid`]: grid whose first column is land
//! - [`forage_fish`] / [`predator_fish`]: two contrasting species
//! - [`phytoplankton`]: one small plankton group and a constant forcing over it
//! - [`single_species_config`] / [`two_species_config`]: ready-to-run setups

use shoal_engine::{
    AccessibilityConfig, DistributionConfig, InitialStock, SimulationConfig, SpeciesParams,
};
use shoal_forcing::{ConstantForcing, PlanktonGroup};
use shoal_space::OceanGrid;

/// All-ocean `rows × cols` grid.
pub fn open_grid(rows: u32, cols: u32) -> OceanGrid {
    OceanGrid::all_ocean(rows, cols).expect("non-empty grid")
}

/// `rows × cols` grid whose first column is land.
pub fn coastal_grid(rows: u32, cols: u32) -> OceanGrid {
    let land = (0..rows * cols).map(|i| i % cols == 0).collect();
    OceanGrid::new(rows, cols, land).expect("grid with ocean cells")
}

/// Small pelagic species: short-lived, early maturing, eats eggs and plankton.
pub fn forage_fish() -> SpeciesParams {
    SpeciesParams {
        name: "anchovy".into(),
        longevity: 3.0,
        l_inf: 19.5,
        k: 0.45,
        t0: -0.35,
        maturity_size: 12.0,
        additional_mortality: 0.5,
        larval_mortality: 0.3,
        fishing_mortality: 0.0,
        predation_rate: 3.5,
        critical_predation_success: 0.57,
        pred_prey_size_ratio_max: vec![5000.0],
        pred_prey_size_ratio_min: vec![3.5],
        fecundity: 600.0,
        initial_stock: InitialStock::Biomass(2_000.0),
        ..Default::default()
    }
}

/// Larger demersal predator feeding on fish.
pub fn predator_fish() -> SpeciesParams {
    SpeciesParams {
        name: "hake".into(),
        longevity: 5.0,
        l_inf: 60.0,
        k: 0.2,
        t0: -0.2,
        condition_factor: 0.0066,
        allometric_power: 3.03,
        maturity_size: 30.0,
        additional_mortality: 0.2,
        larval_mortality: 0.5,
        fishing_mortality: 0.0,
        predation_rate: 3.0,
        critical_predation_success: 0.57,
        pred_prey_size_ratio_max: vec![30.0],
        pred_prey_size_ratio_min: vec![2.0],
        fecundity: 300.0,
        initial_stock: InitialStock::Biomass(1_000.0),
        ..Default::default()
    }
}

/// One small plankton group.
pub fn phytoplankton() -> PlanktonGroup {
    PlanktonGroup {
        name: "phyto".into(),
        size_min: 0.0002,
        size_max: 0.02,
        trophic_level: 1.0,
        accessibility_coefficient: 0.5,
    }
}

/// Constant forcing of [`phytoplankton`] with `per_cell` tons in every cell.
pub fn phytoplankton_forcing(grid: &OceanGrid, per_cell: f64) -> ConstantForcing {
    ConstantForcing::uniform(vec![phytoplankton()], grid.cell_count(), per_cell)
        .expect("valid plankton group")
}

/// [`forage_fish`] alone on a random patch of `patch` cells, no fishing.
pub fn single_species_config(seed: u64, patch: usize) -> SimulationConfig {
    SimulationConfig {
        seed,
        steps_per_year: 12,
        schools_per_cohort: 4,
        record_frequency: 12,
        distribution: DistributionConfig::Random {
            patch_sizes: vec![patch],
        },
        species: vec![forage_fish()],
        accessibility: AccessibilityConfig::Uniform(0.8),
        ..Default::default()
    }
}

/// [`forage_fish`] and [`predator_fish`] sharing one patch size.
pub fn two_species_config(seed: u64, patch: usize) -> SimulationConfig {
    SimulationConfig {
        species: vec![forage_fish(), predator_fish()],
        distribution: DistributionConfig::Random {
            patch_sizes: vec![patch, patch],
        },
        ..single_species_config(seed, patch)
    }
}
