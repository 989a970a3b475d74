//! Per-period indicator accumulation.
//!
//! [`Indicators`] collects state and flow quantities every step and closes
//! an accounting period every `record_frequency` steps, producing the
//! [`PeriodSnapshot`] handed to the reporter. State indicators are averaged
//! over the steps of the period; flows (catches, deaths, recruits, diet)
//! are summed. Nothing is recorded during the burn-in years.

use shoal_core::{DietMatrix, PeriodSnapshot, SimTime, SpeciesId, SpeciesIndicators};

use crate::cohort::DeathCounters;
use crate::fishing::CatchRecord;
use crate::species::Species;

#[derive(Clone, Debug, Default)]
struct SpeciesAccumulator {
    name: String,
    abundance: f64,
    biomass: f64,
    abundance_no_age_zero: f64,
    biomass_no_age_zero: f64,
    catches: CatchRecord,
    // Σ L·N and Σ N over indicator cohorts.
    length_sum: f64,
    length_weight: f64,
    // Σ TL·B and Σ B over indicator cohorts.
    tl_sum: f64,
    tl_weight: f64,
    // Per year of age: (Σ TL·B, Σ B).
    tl_by_age: Vec<(f64, f64)>,
    deaths: DeathCounters,
    recruits: u64,
}

impl SpeciesAccumulator {
    fn clear(&mut self) {
        let years = self.tl_by_age.len();
        *self = Self {
            name: std::mem::take(&mut self.name),
            tl_by_age: vec![(0.0, 0.0); years],
            ..Default::default()
        };
    }

    fn add(&mut self, species: &Species) {
        let spy = species.steps_per_year() as usize;
        let acz = species.age_class_zero();
        for cohort in species.cohorts() {
            let age = cohort.age();
            let n = cohort.abundance() as f64;
            let b = cohort.biomass();
            self.abundance += n;
            self.biomass += b;
            self.deaths += cohort.deaths();
            if age < acz {
                continue;
            }
            self.abundance_no_age_zero += n;
            self.biomass_no_age_zero += b;
            let year = age / spy;
            for s in cohort.schools().iter().filter(|s| !s.disappears()) {
                let tl = s.trophic_level(age);
                self.length_sum += s.length() * s.abundance() as f64;
                self.length_weight += s.abundance() as f64;
                self.tl_sum += tl * s.biomass();
                self.tl_weight += s.biomass();
                let slot = &mut self.tl_by_age[year];
                slot.0 += tl * s.biomass();
                slot.1 += s.biomass();
            }
        }
    }

    fn snapshot(&self, id: SpeciesId, steps: u32) -> SpeciesIndicators {
        let steps = f64::from(steps.max(1));
        let ratio = |num: f64, den: f64| if den > 0.0 { num / den } else { 0.0 };
        SpeciesIndicators {
            species: id,
            name: self.name.clone(),
            abundance: self.abundance / steps,
            biomass: self.biomass / steps,
            abundance_no_age_zero: self.abundance_no_age_zero / steps,
            biomass_no_age_zero: self.biomass_no_age_zero / steps,
            catch_biomass: self.catches.biomass,
            catch_count: self.catches.count as f64,
            catch_mean_length: self.catches.mean_length(),
            catch_mean_trophic_level: self.catches.mean_trophic_level(),
            mean_length: ratio(self.length_sum, self.length_weight),
            mean_trophic_level: ratio(self.tl_sum, self.tl_weight),
            trophic_level_by_age: self.tl_by_age.iter().map(|&(s, w)| ratio(s, w)).collect(),
            dead_predation: self.deaths.predation,
            dead_starvation: self.deaths.starvation,
            dead_additional: self.deaths.additional,
            dead_fishing: self.deaths.fishing,
            recruits: self.recruits,
        }
    }
}

/// Running indicator accumulators of a simulation.
#[derive(Clone, Debug)]
pub struct Indicators {
    record_frequency: u32,
    burn_in_years: u32,
    species: Vec<SpeciesAccumulator>,
    pressure: DietMatrix,
    plankton_consumed: Vec<f64>,
    start: Option<SimTime>,
    steps: u32,
}

impl Indicators {
    /// Empty accumulators for `species` and `plankton_groups` groups.
    pub fn new(
        species: &[Species],
        plankton_groups: usize,
        record_frequency: u32,
        burn_in_years: u32,
    ) -> Self {
        let stages: Vec<usize> = species
            .iter()
            .map(|s| s.params().diet_stage_count())
            .collect();
        let accumulators = species
            .iter()
            .map(|s| {
                let spy = s.steps_per_year() as usize;
                let years = s.cohort_count().div_ceil(spy);
                SpeciesAccumulator {
                    name: s.name().to_string(),
                    tl_by_age: vec![(0.0, 0.0); years],
                    ..Default::default()
                }
            })
            .collect();
        Self {
            record_frequency: record_frequency.max(1),
            burn_in_years,
            species: accumulators,
            pressure: DietMatrix::new(&stages, plankton_groups),
            plankton_consumed: vec![0.0; plankton_groups],
            start: None,
            steps: 0,
        }
    }

    /// Buffers predation writes into: eaten biomass per predator stage and
    /// prey, and eaten plankton per group.
    pub fn diet_buffers(&mut self) -> (&mut DietMatrix, &mut [f64]) {
        (&mut self.pressure, &mut self.plankton_consumed)
    }

    /// Add one step's catches of `species`.
    pub fn record_catch(&mut self, species: SpeciesId, catches: &CatchRecord) {
        self.species[species.index()].catches.merge(catches);
    }

    /// Add one step's recruits of `species`.
    pub fn record_recruits(&mut self, species: SpeciesId, recruits: u64) {
        let acc = &mut self.species[species.index()];
        acc.recruits = acc.recruits.saturating_add(recruits);
    }

    /// Add the state of every species at `time`. Call once per step.
    pub fn accumulate(&mut self, time: SimTime, species: &[Species]) {
        self.start.get_or_insert(time);
        self.steps += 1;
        for sp in species {
            self.species[sp.id().index()].add(sp);
        }
    }

    /// Finish step `time`.
    ///
    /// During burn-in everything accumulated is discarded. Otherwise, when
    /// `time` ends an accounting period, returns its snapshot and starts a
    /// new period.
    pub fn end_step(&mut self, time: SimTime, steps_per_year: u32) -> Option<PeriodSnapshot> {
        if time.year < self.burn_in_years {
            self.reset();
            return None;
        }
        let step = time.absolute_step(steps_per_year);
        if (step + 1) % u64::from(self.record_frequency) != 0 {
            return None;
        }
        let snapshot = PeriodSnapshot {
            start: self.start.unwrap_or(time),
            end: time,
            steps: self.steps,
            species: self
                .species
                .iter()
                .enumerate()
                .map(|(i, acc)| acc.snapshot(SpeciesId(i as u32), self.steps))
                .collect(),
            predation_pressure: self.pressure.clone(),
            diet_composition: self.pressure.row_normalized(),
            plankton_consumed: self.plankton_consumed.clone(),
        };
        self.reset();
        Some(snapshot)
    }

    /// Discard everything accumulated since the last period closed.
    pub fn reset(&mut self) {
        for acc in &mut self.species {
            acc.clear();
        }
        self.pressure.clear();
        self.plankton_consumed.iter_mut().for_each(|v| *v = 0.0);
        self.start = None;
        self.steps = 0;
    }
}
