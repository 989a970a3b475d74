//! Integration test: reproducibility of whole runs.
//!
//! Two simulations built from the same configuration and seed must agree
//! on their population hash after every step, and their reporters must
//! receive identical snapshots. A different seed must diverge.

use shoal_engine::Simulation;
use shoal_test_utils::fixtures::{
    open_grid, phytoplankton_forcing, single_species_config, two_species_config,
};
use shoal_test_utils::RecordingReporter;

// ── Helpers ─────────────────────────────────────────────────────

fn build(seed: u64, two_species: bool) -> (Simulation, RecordingReporter) {
    let grid = open_grid(5, 5);
    let forcing = phytoplankton_forcing(&grid, 50.0);
    let config = if two_species {
        two_species_config(seed, 10)
    } else {
        single_species_config(seed, 10)
    };
    let reporter = RecordingReporter::new();
    let sim = Simulation::new(config, grid, Box::new(forcing))
        .unwrap()
        .with_reporter(Box::new(reporter.clone()));
    (sim, reporter)
}

/// Step both simulations `steps` times, comparing hashes after each step.
fn run_in_lockstep(a: &mut Simulation, b: &mut Simulation, steps: usize) {
    assert_eq!(a.state_hash(), b.state_hash(), "initial state differs");
    for i in 0..steps {
        let ra = a.step().unwrap();
        let rb = b.step().unwrap();
        assert_eq!(ra.time, rb.time);
        assert_eq!(
            a.state_hash(),
            b.state_hash(),
            "runs diverged at step {i} ({})",
            ra.time
        );
    }
}

// ── Tests ───────────────────────────────────────────────────────

#[test]
fn same_seed_single_species_is_reproducible() {
    let (mut a, ra) = build(42, false);
    let (mut b, rb) = build(42, false);
    run_in_lockstep(&mut a, &mut b, 36);

    assert_eq!(ra.len(), 3);
    assert_eq!(ra.snapshots(), rb.snapshots());
}

#[test]
fn same_seed_two_species_is_reproducible() {
    let (mut a, _) = build(9, true);
    let (mut b, _) = build(9, true);
    run_in_lockstep(&mut a, &mut b, 24);
}

#[test]
fn different_seeds_diverge() {
    let (mut a, _) = build(1, false);
    let (mut b, _) = build(2, false);
    a.run_years(1).unwrap();
    b.run_years(1).unwrap();
    assert_ne!(a.state_hash(), b.state_hash());
}

#[test]
fn unfished_decade_has_one_abundance_trajectory() {
    let trajectory = |seed| {
        let (mut sim, _) = build(seed, false);
        let mut out = Vec::with_capacity(120);
        for _ in 0..10 * 12 {
            sim.step().unwrap();
            out.push(sim.species()[0].abundance());
        }
        out
    };
    let first = trajectory(77);
    assert_eq!(first.len(), 120);
    assert_eq!(first, trajectory(77));
}

#[test]
fn long_run_keeps_accounting_consistent() {
    let (mut sim, reporter) = build(5, true);
    for _ in 0..5 * 12 {
        let report = sim.step().unwrap();
        assert_eq!(report.metrics.schools, sim.last_metrics().schools);
        for sp in sim.species() {
            let cohorts: u64 = sp.cohorts().iter().map(|c| c.abundance()).sum();
            assert_eq!(cohorts, sp.abundance());
            assert!(sp.biomass() >= 0.0);
        }
    }
    assert_eq!(sim.time().year, 5);
    assert_eq!(sim.steps_taken(), 60);

    let snapshots = reporter.snapshots();
    assert_eq!(snapshots.len(), 5);
    for (year, snap) in snapshots.iter().enumerate() {
        assert_eq!(snap.start.year as usize, year);
        assert_eq!(snap.steps, 12);
        assert_eq!(snap.species.len(), 2);
        for ind in &snap.species {
            assert!(ind.biomass >= ind.biomass_no_age_zero);
            assert!(ind.abundance >= ind.abundance_no_age_zero);
        }
    }
}
