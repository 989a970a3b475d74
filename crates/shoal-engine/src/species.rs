//! Species: the full age structure of one fish population.

use shoal_core::SpeciesId;

use crate::cohort::Cohort;
use crate::growth::GrowthTable;
use crate::params::{years_to_steps, SpeciesParams, StageMetric};
use crate::school::{School, Stages};

/// Out-of-zone share and extra mortality per (age index, step of year).
#[derive(Clone, Debug, PartialEq)]
struct MigrationTable {
    steps_per_year: usize,
    // [age * steps_per_year + step] -> (fraction out, mortality per year)
    slots: Vec<(f64, f64)>,
}

impl MigrationTable {
    fn new(params: &SpeciesParams, cohorts: usize, steps_per_year: u32) -> Self {
        let spy = steps_per_year as usize;
        let mut slots = vec![(0.0, 0.0); cohorts * spy];
        for rule in &params.migrations {
            let first = years_to_steps(rule.first_age, steps_per_year);
            let last = years_to_steps(rule.last_age, steps_per_year).min(cohorts);
            for age in first..last {
                for &dt in &rule.steps {
                    slots[age * spy + dt as usize] = (rule.fraction_out, rule.mortality);
                }
            }
        }
        Self {
            steps_per_year: spy,
            slots,
        }
    }

    fn get(&self, age: usize, dt: usize) -> (f64, f64) {
        self.slots[age * self.steps_per_year + dt]
    }
}

/// One species: parameters, derived tables and cohorts.
///
/// Holds exactly `round(longevity * steps_per_year)` cohorts for the whole
/// run; cohort `i` always contains the schools aged `i` steps.
#[derive(Clone, Debug)]
pub struct Species {
    id: SpeciesId,
    params: SpeciesParams,
    steps_per_year: u32,
    growth: GrowthTable,
    migration: MigrationTable,
    access_thresholds: Vec<usize>,
    recruitment_age: usize,
    age_class_zero: usize,
    pub(crate) cohorts: Vec<Cohort>,
    abundance: u64,
    biomass: f64,
}

impl Species {
    /// A species with empty cohorts. `params` must already be validated.
    pub fn new(id: SpeciesId, params: SpeciesParams, steps_per_year: u32) -> Self {
        let n = params.cohort_count(steps_per_year);
        let growth = GrowthTable::new(&params, n, steps_per_year);
        let migration = MigrationTable::new(&params, n, steps_per_year);
        let access_thresholds = params
            .accessibility_stage_thresholds
            .iter()
            .map(|&y| years_to_steps(y, steps_per_year))
            .collect();
        let recruitment_age = years_to_steps(params.recruitment_age, steps_per_year);
        let age_class_zero = years_to_steps(params.age_class_zero, steps_per_year);
        Self {
            id,
            steps_per_year,
            growth,
            migration,
            access_thresholds,
            recruitment_age,
            age_class_zero,
            cohorts: (0..n).map(Cohort::new).collect(),
            abundance: 0,
            biomass: 0.0,
            params,
        }
    }

    /// Species id.
    pub fn id(&self) -> SpeciesId {
        self.id
    }

    /// Species name.
    pub fn name(&self) -> &str {
        &self.params.name
    }

    /// Life-history parameters.
    pub fn params(&self) -> &SpeciesParams {
        &self.params
    }

    /// Steps per simulated year.
    pub fn steps_per_year(&self) -> u32 {
        self.steps_per_year
    }

    /// Mean growth table.
    pub fn growth_table(&self) -> &GrowthTable {
        &self.growth
    }

    /// Number of cohorts.
    pub fn cohort_count(&self) -> usize {
        self.cohorts.len()
    }

    /// All cohorts, youngest first.
    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    /// Cohort at age index `age`.
    pub fn cohort(&self, age: usize) -> &Cohort {
        &self.cohorts[age]
    }

    pub(crate) fn cohorts_mut(&mut self) -> &mut [Cohort] {
        &mut self.cohorts
    }

    pub(crate) fn split_mut(&mut self) -> (&SpeciesParams, &GrowthTable, &mut [Cohort]) {
        (&self.params, &self.growth, &mut self.cohorts)
    }

    /// School `slot` of cohort `age`.
    pub fn school(&self, age: usize, slot: usize) -> &School {
        &self.cohorts[age].schools[slot]
    }

    pub(crate) fn school_mut(&mut self, age: usize, slot: usize) -> &mut School {
        &mut self.cohorts[age].schools[slot]
    }

    /// Every school with its age index.
    pub fn schools(&self) -> impl Iterator<Item = (usize, &School)> + '_ {
        self.cohorts
            .iter()
            .flat_map(|c| c.schools.iter().map(move |s| (c.age(), s)))
    }

    /// First exploitable age index.
    pub fn recruitment_age(&self) -> usize {
        self.recruitment_age
    }

    /// First age index included in indicators.
    pub fn age_class_zero(&self) -> usize {
        self.age_class_zero
    }

    /// Out-of-zone fraction and extra yearly mortality for `age` at step `dt`.
    pub fn migration(&self, age: usize, dt: usize) -> (f64, f64) {
        self.migration.get(age, dt)
    }

    /// Cached abundance over all cohorts.
    pub fn abundance(&self) -> u64 {
        self.abundance
    }

    /// Cached biomass over all cohorts (tons).
    pub fn biomass(&self) -> f64 {
        self.biomass
    }

    // ── Stages ─────────────────────────────────────────────────────

    /// Feeding stage of an individual of `length` cm.
    pub fn feeding_stage(&self, length: f64) -> usize {
        self.params
            .feeding_stage_thresholds
            .iter()
            .take_while(|&&t| length >= t)
            .count()
    }

    /// Accessibility stage of age index `age`.
    pub fn accessibility_stage(&self, age: usize) -> usize {
        self.access_thresholds.iter().take_while(|&&t| age >= t).count()
    }

    /// Diet stage of an individual of `length` cm at age index `age`.
    pub fn diet_stage(&self, length: f64, age: usize) -> usize {
        let value = match self.params.diet_stage_metric {
            StageMetric::Length => length,
            StageMetric::Age => age as f64 / f64::from(self.steps_per_year),
        };
        self.params
            .diet_stage_thresholds
            .iter()
            .take_while(|&&t| value >= t)
            .count()
    }

    /// Stage indices of an individual of `length` cm at age index `age`.
    pub fn stages_for(&self, length: f64, age: usize) -> Stages {
        Stages {
            feeding: self.feeding_stage(length),
            accessibility: self.accessibility_stage(age),
            diet: self.diet_stage(length, age),
        }
    }

    /// Recompute stage indices of every school.
    pub fn update_stages(&mut self) {
        let stages: Vec<Vec<Stages>> = self
            .cohorts
            .iter()
            .map(|c| {
                c.schools
                    .iter()
                    .map(|s| self.stages_for(s.length, c.age()))
                    .collect()
            })
            .collect();
        for (cohort, st) in self.cohorts.iter_mut().zip(stages) {
            for (school, s) in cohort.schools.iter_mut().zip(st) {
                school.stages = s;
            }
        }
    }

    // ── Aggregates ─────────────────────────────────────────────────

    /// Recompute cohort and species aggregates.
    pub fn refresh(&mut self) {
        let (mut n, mut b) = (0, 0.0);
        for c in &mut self.cohorts {
            c.refresh();
            n += c.abundance();
            b += c.biomass();
        }
        self.abundance = n;
        self.biomass = b;
    }

    /// Reset every cohort's death counters.
    pub fn reset_deaths(&mut self) {
        for c in &mut self.cohorts {
            c.reset_deaths();
        }
    }

    /// Drop schools marked to disappear. Returns how many were dropped.
    pub fn purge(&mut self) -> usize {
        let dropped = self.cohorts.iter_mut().map(Cohort::purge).sum();
        self.refresh();
        dropped
    }

    /// Biomass (tons) of live schools at least `maturity_size` long.
    pub fn spawning_stock_biomass(&self) -> f64 {
        let mature = self.params.maturity_size;
        self.cohorts
            .iter()
            .flat_map(|c| c.schools.iter())
            .filter(|s| !s.disappears && s.length >= mature)
            .map(|s| s.biomass)
            .sum()
    }

    /// Abundance and biomass of cohorts at or above the age-class-zero age.
    pub fn indicator_stock(&self) -> (u64, f64) {
        self.cohorts[self.age_class_zero.min(self.cohorts.len())..]
            .iter()
            .fold((0, 0.0), |(n, b), c| (n + c.abundance(), b + c.biomass()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Migration;

    fn species(params: SpeciesParams) -> Species {
        Species::new(SpeciesId(0), params, 12)
    }

    #[test]
    fn cohort_count_follows_longevity() {
        let s = species(SpeciesParams {
            longevity: 3.0,
            ..Default::default()
        });
        assert_eq!(s.cohort_count(), 36);
        assert!(s.cohorts().iter().enumerate().all(|(i, c)| c.age() == i));
    }

    #[test]
    fn stages_count_passed_thresholds() {
        let s = species(SpeciesParams {
            feeding_stage_thresholds: vec![5.0, 12.0],
            pred_prey_size_ratio_max: vec![10.0; 3],
            pred_prey_size_ratio_min: vec![2.0; 3],
            accessibility_stage_thresholds: vec![1.0],
            diet_stage_thresholds: vec![0.5, 2.0],
            diet_stage_metric: StageMetric::Age,
            ..Default::default()
        });
        assert_eq!(s.feeding_stage(4.9), 0);
        assert_eq!(s.feeding_stage(5.0), 1);
        assert_eq!(s.feeding_stage(30.0), 2);
        assert_eq!(s.accessibility_stage(11), 0);
        assert_eq!(s.accessibility_stage(12), 1);
        assert_eq!(s.diet_stage(100.0, 5), 0);
        assert_eq!(s.diet_stage(0.0, 6), 1);
        assert_eq!(s.diet_stage(0.0, 30), 2);
    }

    #[test]
    fn stage_update_is_idempotent() {
        let mut s = species(SpeciesParams {
            feeding_stage_thresholds: vec![8.0],
            pred_prey_size_ratio_max: vec![10.0; 2],
            pred_prey_size_ratio_min: vec![2.0; 2],
            accessibility_stage_thresholds: vec![0.5],
            ..Default::default()
        });
        for (age, len) in [(3usize, 4.0), (10, 9.5), (20, 14.0)] {
            s.cohorts[age].push(School::new(100, len, 5.0, 48, 3.0));
        }
        s.update_stages();
        let first: Vec<Stages> = s.schools().map(|(_, sc)| sc.stages()).collect();
        s.update_stages();
        let second: Vec<Stages> = s.schools().map(|(_, sc)| sc.stages()).collect();
        assert_eq!(first, second);
        assert_eq!(first[1].feeding, 1);
        assert_eq!(first[1].accessibility, 1);
    }

    #[test]
    fn migration_table_covers_age_range_and_steps() {
        let s = species(SpeciesParams {
            migrations: vec![Migration {
                first_age: 1.0,
                last_age: 2.0,
                steps: vec![0, 5],
                fraction_out: 0.4,
                mortality: 0.2,
            }],
            ..Default::default()
        });
        assert_eq!(s.migration(12, 5), (0.4, 0.2));
        assert_eq!(s.migration(23, 0), (0.4, 0.2));
        assert_eq!(s.migration(24, 0), (0.0, 0.0));
        assert_eq!(s.migration(12, 1), (0.0, 0.0));
        assert_eq!(s.migration(11, 0), (0.0, 0.0));
    }

    #[test]
    fn spawning_stock_counts_mature_schools_only() {
        let mut s = species(SpeciesParams {
            maturity_size: 10.0,
            ..Default::default()
        });
        s.cohorts[20].push(School::new(1000, 9.9, 1000.0, 48, 3.0));
        s.cohorts[30].push(School::new(2000, 10.0, 1000.0, 48, 3.0));
        s.refresh();
        assert_eq!(s.spawning_stock_biomass(), 2.0);
        assert_eq!(s.biomass(), 3.0);
        assert_eq!(s.abundance(), 3000);
    }
}
