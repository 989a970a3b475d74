//! Shoal quickstart: a complete two-species ecosystem from scratch.
//!
//! Demonstrates:
//!   1. Building an ocean grid with a coastline
//!   2. Seasonal plankton forcing with two size classes
//!   3. Describing species and a simulation configuration
//!   4. Receiving yearly indicators through a `Reporter`
//!   5. Stepping, inspecting state and checking reproducibility
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example quickstart

use shoal_core::{PeriodSnapshot, Reporter};
use shoal_engine::{
    AccessibilityConfig, DistributionConfig, FishingMode, InitialStock, MpaConfig, Simulation,
    SimulationConfig, SpeciesParams,
};
use shoal_forcing::{PlanktonGroup, SeasonalForcing};
use shoal_space::OceanGrid;

// ─── Grid parameters ────────────────────────────────────────────

const ROWS: u32 = 12;
const COLS: u32 = 12;
const STEPS_PER_YEAR: u32 = 12;
const YEARS: u32 = 10;

// ─── Reporter: one line per species and year ────────────────────

struct PrintReporter;

impl Reporter for PrintReporter {
    fn report(&mut self, snapshot: &PeriodSnapshot) {
        for ind in &snapshot.species {
            println!(
                "  {:<9} {} biomass {:>9.1} t  catch {:>7.1} t  L {:>5.1} cm  TL {:.2}  recruits {:.2e}",
                ind.name,
                snapshot.start,
                ind.biomass_no_age_zero,
                ind.catch_biomass,
                ind.mean_length,
                ind.mean_trophic_level,
                ind.recruits as f64,
            );
        }
        let eaten: f64 = snapshot.plankton_consumed.iter().sum();
        println!("  plankton eaten: {eaten:.1} t");
    }
}

// ─── Setup helpers ──────────────────────────────────────────────

/// A grid whose two westernmost columns are land.
fn grid() -> OceanGrid {
    let land = (0..ROWS * COLS).map(|i| i % COLS < 2).collect();
    OceanGrid::new(ROWS, COLS, land).expect("grid has ocean")
}

/// Phytoplankton peaking in spring, zooplankton two months later.
fn forcing(grid: &OceanGrid) -> SeasonalForcing {
    let groups = vec![
        PlanktonGroup {
            name: "phyto".into(),
            size_min: 0.0002,
            size_max: 0.02,
            trophic_level: 1.0,
            accessibility_coefficient: 0.3,
        },
        PlanktonGroup {
            name: "zoo".into(),
            size_min: 0.02,
            size_max: 0.5,
            trophic_level: 2.0,
            accessibility_coefficient: 0.5,
        },
    ];
    let bloom = |peak: f64, step: u32| {
        let phase = 2.0 * std::f64::consts::PI * (f64::from(step) - peak) / f64::from(STEPS_PER_YEAR);
        1.0 + 0.8 * phase.cos()
    };
    let cells = grid.cell_count();
    let steps = (0..STEPS_PER_YEAR)
        .map(|s| {
            let ocean = |base: f64| -> Vec<f64> {
                (0..cells)
                    .map(|c| {
                        let cell = shoal_core::CellId(c as u32);
                        if grid.is_ocean(cell) {
                            base
                        } else {
                            0.0
                        }
                    })
                    .collect()
            };
            vec![ocean(400.0 * bloom(3.0, s)), ocean(150.0 * bloom(5.0, s))]
        })
        .collect();
    SeasonalForcing::new(groups, cells, steps).expect("valid forcing")
}

fn species() -> Vec<SpeciesParams> {
    let anchovy = SpeciesParams {
        name: "anchovy".into(),
        longevity: 3.0,
        l_inf: 19.5,
        k: 0.45,
        t0: -0.35,
        maturity_size: 12.0,
        additional_mortality: 0.6,
        larval_mortality: 8.0,
        fishing_mortality: 0.4,
        predation_rate: 3.5,
        pred_prey_size_ratio_max: vec![5000.0],
        pred_prey_size_ratio_min: vec![3.5],
        fecundity: 600.0,
        initial_stock: InitialStock::Biomass(20_000.0),
        ..Default::default()
    };
    let hake = SpeciesParams {
        name: "hake".into(),
        longevity: 8.0,
        l_inf: 70.0,
        k: 0.18,
        t0: -0.3,
        condition_factor: 0.0066,
        allometric_power: 3.03,
        maturity_size: 32.0,
        additional_mortality: 0.2,
        larval_mortality: 7.0,
        fishing_mortality: 0.3,
        predation_rate: 3.0,
        pred_prey_size_ratio_max: vec![30.0],
        pred_prey_size_ratio_min: vec![2.5],
        fecundity: 300.0,
        initial_stock: InitialStock::Biomass(8_000.0),
        ..Default::default()
    };
    vec![anchovy, hake]
}

fn config(grid: &OceanGrid, seed: u64) -> SimulationConfig {
    // Close the north-east corner to fishing from year 5.
    let mpa_cells = (0..3)
        .flat_map(|r| (COLS - 3..COLS).map(move |c| (r, c)))
        .map(|(r, c)| grid.cell_at(r, c).expect("inside grid"))
        .collect();
    SimulationConfig {
        seed,
        steps_per_year: STEPS_PER_YEAR,
        schools_per_cohort: 10,
        record_frequency: STEPS_PER_YEAR,
        burn_in_years: 1,
        fishing_mode: FishingMode::Uniform,
        distribution: DistributionConfig::Random {
            patch_sizes: vec![60, 90],
        },
        mpa: Some(MpaConfig {
            cells: mpa_cells,
            start_year: 5,
            end_year: YEARS - 1,
        }),
        species: species(),
        accessibility: AccessibilityConfig::Uniform(0.8),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ── 1. Build ────────────────────────────────────────────────
    let grid = grid();
    let mut sim = Simulation::new(config(&grid, 2024), grid.clone(), Box::new(forcing(&grid)))
        .expect("valid configuration")
        .with_reporter(Box::new(PrintReporter));
    println!(
        "{} species on {} ocean cells, {} schools placed",
        sim.species().len(),
        sim.grid().ocean_cell_count(),
        sim.occupancy().total()
    );

    // ── 2. Run, one year at a time ──────────────────────────────
    for year in 0..YEARS {
        println!("year {year}");
        if let Err(e) = sim.run_years(1) {
            eprintln!("simulation stopped: {e}");
            return;
        }
        let m = sim.last_metrics();
        println!(
            "  last step: {} schools, {} predators, {} us",
            m.schools, m.predators, m.total_us
        );
    }

    // ── 3. Inspect final state ──────────────────────────────────
    for sp in sim.species() {
        let oldest = sp
            .cohorts()
            .iter()
            .rev()
            .find(|c| !c.is_empty())
            .map_or(0, |c| c.age());
        println!(
            "{}: {} individuals, {:.1} t, oldest cohort {oldest} steps",
            sp.name(),
            sp.abundance(),
            sp.biomass()
        );
    }

    // ── 4. Same seed, same history ──────────────────────────────
    let mut replay = Simulation::new(config(&grid, 2024), grid.clone(), Box::new(forcing(&grid)))
        .expect("valid configuration");
    replay.run_years(YEARS).expect("replay runs");
    assert_eq!(replay.state_hash(), sim.state_hash());
    println!("replay hash matches: {:016x}", sim.state_hash());
}
