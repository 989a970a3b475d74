//! Integration test: marine protected areas and fishing.
//!
//! An active MPA closes its cells to fishing: schools inside it (and
//! schools outside the modelled area) are not catchable, and an MPA
//! covering the whole ocean stops catches entirely. Its window includes
//! both the start and the end year; outside it the fishery runs as usual.

use shoal_core::CellId;
use shoal_engine::{FishingMode, MpaConfig, Simulation, SimulationConfig};
use shoal_test_utils::fixtures::{open_grid, phytoplankton_forcing, single_species_config};
use shoal_test_utils::RecordingReporter;

// ── Helpers ─────────────────────────────────────────────────────

fn fished_config(seed: u64, mode: FishingMode, mpa: Option<MpaConfig>) -> SimulationConfig {
    let mut config = single_species_config(seed, 12);
    config.fishing_mode = mode;
    config.species[0].fishing_mortality = 0.8;
    config.mpa = mpa;
    config
}

fn yearly_catches(config: SimulationConfig, years: u32) -> Vec<f64> {
    let grid = open_grid(4, 4);
    let forcing = phytoplankton_forcing(&grid, 40.0);
    let reporter = RecordingReporter::new();
    let mut sim = Simulation::new(config, grid, Box::new(forcing))
        .unwrap()
        .with_reporter(Box::new(reporter.clone()));
    sim.run_years(years).unwrap();
    reporter
        .snapshots()
        .iter()
        .map(|s| s.species[0].catch_biomass)
        .collect()
}

fn whole_ocean(start_year: u32, end_year: u32) -> MpaConfig {
    MpaConfig {
        cells: (0..16).map(CellId).collect(),
        start_year,
        end_year,
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn unprotected_fishery_lands_fish() {
    let catches = yearly_catches(fished_config(2, FishingMode::Uniform, None), 1);
    assert_eq!(catches.len(), 1);
    assert!(catches[0] > 0.0);
}

#[test]
fn ocean_wide_mpa_stops_all_catches_while_active() {
    let catches = yearly_catches(
        fished_config(2, FishingMode::Uniform, Some(whole_ocean(0, 1))),
        3,
    );
    // The end year is still protected; fishing reopens the year after.
    assert_eq!(catches[0], 0.0);
    assert_eq!(catches[1], 0.0);
    assert!(catches[2] > 0.0);
}

#[test]
fn ocean_wide_mpa_stops_per_cohort_catches() {
    let catches = yearly_catches(
        fished_config(6, FishingMode::PerCohort, Some(whole_ocean(0, 2))),
        2,
    );
    assert_eq!(catches, vec![0.0, 0.0]);
}

#[test]
fn schools_in_protected_cells_are_not_catchable() {
    let protected: Vec<CellId> = (0..8).map(CellId).collect();
    let mpa = MpaConfig {
        cells: protected.clone(),
        start_year: 0,
        end_year: 5,
    };
    let grid = open_grid(4, 4);
    let forcing = phytoplankton_forcing(&grid, 40.0);
    let config = fished_config(4, FishingMode::Uniform, Some(mpa));
    let mut sim = Simulation::new(config, grid, Box::new(forcing)).unwrap();

    for _ in 0..6 {
        sim.step().unwrap();
        // Cohorts past 0 were all present, with their current cell, when
        // catchability was last updated.
        let sp = &sim.species()[0];
        for cohort in sp.cohorts().iter().skip(1) {
            for s in cohort.schools() {
                match s.cell() {
                    Some(cell) => assert_eq!(s.catchable(), !protected.contains(&cell)),
                    None => assert!(!s.catchable()),
                }
            }
        }
    }
}
