//! Integration test: where schools end up on the grid.
//!
//! Whatever the seed, grid or patch size, no school is ever placed on
//! land, random-mode schools stay inside their species' patch, map-mode
//! schools stay inside their presence map, and the cell occupancy index
//! lists exactly the located schools.

use proptest::prelude::*;
use shoal_core::CellId;
use shoal_engine::{DistributionConfig, MapConfig, Simulation, SimulationConfig};
use shoal_space::OceanGrid;
use shoal_test_utils::fixtures::{coastal_grid, phytoplankton_forcing, single_species_config};

fn quarterly(mut config: SimulationConfig) -> SimulationConfig {
    config.steps_per_year = 4;
    config.record_frequency = 4;
    config
}

/// Assert every located school sits on an accepted ocean cell and that
/// occupancy matches.
fn check_placement(sim: &Simulation, accept: impl Fn(CellId) -> bool) {
    let mut located = 0;
    for sp in sim.species() {
        for (age, s) in sp.schools() {
            if let Some(cell) = s.cell() {
                assert!(sim.grid().is_ocean(cell), "age {age} school on land {cell}");
                assert!(accept(cell), "age {age} school outside its area at {cell}");
                located += 1;
            } else {
                // Only this step's eggs wait for placement.
                assert_eq!(age, 0);
            }
        }
    }
    assert_eq!(sim.occupancy().total(), located);
    for (cell, handles) in sim.occupancy().occupied() {
        for h in handles {
            let s = sim.species()[h.species.index()].school(h.cohort(), h.slot());
            assert_eq!(s.cell(), Some(cell));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn random_patches_never_touch_land(
        rows in 2u32..7,
        cols in 2u32..7,
        seed in any::<u64>(),
        patch in 1usize..40,
    ) {
        let grid = coastal_grid(rows, cols);
        let patch = patch.min(grid.ocean_cell_count());
        let forcing = phytoplankton_forcing(&grid, 20.0);
        let config = quarterly(single_species_config(seed, patch));
        let mut sim = Simulation::new(config, grid, Box::new(forcing)).unwrap();
        let cells = sim.distribution().patch(0).unwrap().to_vec();
        prop_assert_eq!(cells.len(), patch);

        check_placement(&sim, |c| cells.contains(&c));
        for _ in 0..8 {
            sim.step().unwrap();
            check_placement(&sim, |c| cells.contains(&c));
        }
    }
}

#[test]
fn map_mode_keeps_schools_inside_the_map() {
    let grid: OceanGrid = coastal_grid(4, 4);
    let column: Vec<CellId> = (0..4).map(|r| grid.cell_at(r, 2).unwrap()).collect();
    let forcing = phytoplankton_forcing(&grid, 20.0);
    let mut config = quarterly(single_species_config(31, 1));
    config.distribution = DistributionConfig::Maps(vec![MapConfig {
        species: 0,
        first_age: 0.0,
        last_age: 3.0,
        steps: Vec::new(),
        cells: column.iter().map(|&c| (c, 1.0)).collect(),
    }]);
    let mut sim = Simulation::new(config, grid, Box::new(forcing)).unwrap();

    check_placement(&sim, |c| column.contains(&c));
    for _ in 0..8 {
        sim.step().unwrap();
        check_placement(&sim, |c| column.contains(&c));
    }
}
