//! Spawning, incoming recruitment and the age-class shift.

use crate::cohort::DeathCounters;
use crate::params::years_to_steps;
use crate::school::School;
use crate::species::Species;

/// What one reproduction step did to a species.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReproductionOutcome {
    /// Eggs spawned, or individuals brought in by incoming flux.
    pub recruits: u64,
    /// Schools dropped for being older than the oldest cohort.
    pub senescent_schools: usize,
    /// Individuals in those schools.
    pub senescent_individuals: u64,
}

/// Eggs spawned by `ssb` tons of mature fish.
///
/// `round(sex_ratio * fecundity * season * ssb * 1e6)`, saturating.
pub fn egg_count(sex_ratio: f64, fecundity: f64, season: f64, ssb: f64) -> u64 {
    let eggs = (sex_ratio * fecundity * season * ssb * 1e6).round();
    if eggs >= u64::MAX as f64 {
        log::warn!("egg count {eggs:e} saturates");
        u64::MAX
    } else {
        eggs.max(0.0) as u64
    }
}

/// Split `eggs` into at most `n` schools.
///
/// No eggs, no school. Fewer eggs than `n` make a single school. Otherwise
/// `n` schools of `eggs / n`, with the remainder added to the first.
pub fn split_eggs(eggs: u64, n: usize) -> Vec<u64> {
    let n = n as u64;
    if eggs == 0 || n == 0 {
        return Vec::new();
    }
    if eggs < n {
        return vec![eggs];
    }
    let mut parts = vec![eggs / n; n as usize];
    parts[0] += eggs % n;
    parts
}

/// Split `total` into `n` schools differing by at most one individual.
pub fn split_even(total: u64, n: usize) -> Vec<u64> {
    let n = n as u64;
    if total == 0 || n == 0 {
        return Vec::new();
    }
    let (share, rest) = (total / n, total % n);
    (0..n)
        .map(|i| share + u64::from(i < rest))
        .filter(|&a| a > 0)
        .collect()
}

/// Spawn (or receive incoming recruits) and age every cohort by one step.
///
/// Spawning uses the spawning stock before the shift. The oldest cohort's
/// schools are dropped; every other cohort moves up one age index with its
/// death counters, and cohort 0 is rebuilt from the new eggs. Species with
/// an incoming flux spawn nothing: after the shift their cohorts up to the
/// flux age are emptied and the flux age cohort is filled with incoming
/// individuals.
pub fn reproduce(
    species: &mut Species,
    dt: usize,
    schools_per_cohort: usize,
) -> ReproductionOutcome {
    species.refresh();
    let spy = species.steps_per_year();
    let ages = species.cohort_count();
    let p = species.params();
    let season = p.spawning_fraction(dt, spy);
    let (egg_size, egg_weight, egg_tl) = (p.egg_size, p.egg_weight, p.egg_trophic_level);
    let flux = p.incoming_flux.as_ref().map(|f| {
        let idx = years_to_steps(f.mean_age, spy).min(ages - 1);
        let weight = p.weight_at(f.mean_length);
        let incoming = (f.biomass_per_year * season * 1e6 / weight).round() as u64;
        (idx, f.mean_length, weight, incoming)
    });
    let eggs = if flux.is_some() {
        0
    } else {
        egg_count(p.sex_ratio, p.fecundity, season, species.spawning_stock_biomass())
    };

    // Age shift.
    let cohorts = species.cohorts_mut();
    let (old, _) = cohorts[ages - 1].take_contents();
    let mut outcome = ReproductionOutcome {
        recruits: eggs,
        ..Default::default()
    };
    for s in old.iter().filter(|s| !s.disappears) {
        outcome.senescent_schools += 1;
        outcome.senescent_individuals += s.abundance;
    }
    for age in (1..ages).rev() {
        let (schools, deaths) = cohorts[age - 1].take_contents();
        cohorts[age].set_contents(schools, deaths);
    }
    cohorts[0].set_contents(Vec::new(), DeathCounters::default());
    for n in split_eggs(eggs, schools_per_cohort) {
        cohorts[0].push(School::new(n, egg_size, egg_weight, ages, egg_tl));
    }

    if let Some((idx, length, weight, incoming)) = flux {
        for c in &mut cohorts[..=idx] {
            c.take_contents();
        }
        for n in split_even(incoming, schools_per_cohort) {
            cohorts[idx].push(School::new(n, length, weight, ages, egg_tl));
        }
        outcome.recruits = incoming;
    }

    species.refresh();
    outcome
}
