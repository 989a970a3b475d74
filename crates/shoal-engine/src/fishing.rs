//! Fishing mortality, MPA-aware catchability and catch accounting.

use shoal_space::MarineProtectedArea;

use crate::cohort::Cohort;
use crate::config::FishingMode;
use crate::school::biomass_of;
use crate::species::Species;

/// Catches of one species over one or more steps.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CatchRecord {
    /// Landed biomass (tons).
    pub biomass: f64,
    /// Landed individuals.
    pub count: u64,
    /// Sum of `individuals * length`.
    pub length_sum: f64,
    /// Sum of `biomass * trophic level`.
    pub trophic_level_sum: f64,
}

impl CatchRecord {
    /// Add another record.
    pub fn merge(&mut self, other: &CatchRecord) {
        self.biomass += other.biomass;
        self.count += other.count;
        self.length_sum += other.length_sum;
        self.trophic_level_sum += other.trophic_level_sum;
    }

    /// Mean length of landed individuals, zero when nothing was caught.
    pub fn mean_length(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.length_sum / self.count as f64
        }
    }

    /// Biomass-weighted mean trophic level, zero when nothing was caught.
    pub fn mean_trophic_level(&self) -> f64 {
        if self.biomass <= 0.0 {
            0.0
        } else {
            self.trophic_level_sum / self.biomass
        }
    }
}

/// Recompute the `catchable` flag of every school.
///
/// While `mpa` is active in `year`, only located schools outside its cells
/// are catchable. Otherwise every school is.
pub fn update_catchability(species: &mut Species, mpa: Option<&MarineProtectedArea>, year: u32) {
    let active = mpa.filter(|m| m.is_active(year));
    for cohort in species.cohorts_mut() {
        for school in &mut cohort.schools {
            school.catchable = match (active, school.cell) {
                (None, _) => true,
                (Some(m), Some(cell)) => !m.contains(cell),
                (Some(_), None) => false,
            };
        }
    }
}

/// Apply one step of fishing to `species`.
///
/// `season` is the seasonal fishing fraction of the step and
/// `protected_fraction` the share of ocean cells closed by an active MPA.
pub fn fish(
    species: &mut Species,
    mode: FishingMode,
    season: f64,
    protected_fraction: f64,
) -> CatchRecord {
    let mut record = CatchRecord::default();
    species.refresh();
    if species.abundance() == 0 || season <= 0.0 {
        return record;
    }
    let first = species.recruitment_age();
    let f = species.params().fishing_mortality;
    let rates: Vec<f64> = (0..species.cohort_count())
        .map(|age| species.params().cohort_fishing_rate(age))
        .collect();

    let cohorts = &mut species.cohorts_mut()[first.min(rates.len())..];
    match mode {
        FishingMode::Uniform => {
            if f <= 0.0 || protected_fraction >= 1.0 {
                return record;
            }
            let rate = f * season / (1.0 - protected_fraction);
            for cohort in cohorts.iter_mut() {
                let catchable = cohort.catchable_abundance();
                if catchable == 0 {
                    continue;
                }
                let dead = (catchable as f64 * (1.0 - (-rate).exp())).round() as u64;
                catch_from(cohort, dead, &mut record);
            }
        }
        FishingMode::PerCohort => {
            let mut planned = Vec::with_capacity(cohorts.len());
            let mut surplus = 0u64;
            let mut room = 0u64;
            for cohort in cohorts.iter() {
                let rate = rates[cohort.age()];
                let catchable = cohort.catchable_abundance();
                let wanted =
                    (cohort.abundance() as f64 * (1.0 - (-rate * season).exp())).round() as u64;
                let dead = wanted.min(catchable);
                surplus += wanted - dead;
                room += catchable - dead;
                planned.push(dead);
            }
            if surplus > 0 && surplus >= room {
                // Not enough left anywhere: take everything catchable.
                for (cohort, dead) in cohorts.iter().zip(planned.iter_mut()) {
                    *dead = cohort.catchable_abundance();
                }
            } else if surplus > 0 {
                // Rounded shares can overshoot; the running total caps them.
                let mut moved = 0u64;
                for (cohort, dead) in cohorts.iter().zip(planned.iter_mut()) {
                    let left = cohort.catchable_abundance() - *dead;
                    let share = (surplus as f64 * left as f64 / room as f64).round() as u64;
                    let extra = share.min(left).min(surplus - moved);
                    *dead += extra;
                    moved += extra;
                }
            }
            for (cohort, dead) in cohorts.iter_mut().zip(planned) {
                catch_from(cohort, dead, &mut record);
            }
        }
    }
    species.refresh();
    record
}

/// Spread `dead` over the catchable schools of `cohort` and record the catch.
fn catch_from(cohort: &mut Cohort, dead: u64, record: &mut CatchRecord) {
    if dead == 0 {
        return;
    }
    let before: Vec<u64> = cohort.schools.iter().map(|s| s.abundance).collect();
    cohort.spread_deaths(dead, |s| s.catchable);
    let age = cohort.age();
    let mut caught = 0;
    for (school, &was) in cohort.schools.iter().zip(&before) {
        let n = was - school.abundance;
        if n == 0 {
            continue;
        }
        let b = biomass_of(n, school.weight);
        record.biomass += b;
        record.count += n;
        record.length_sum += n as f64 * school.length;
        record.trophic_level_sum += b * school.trophic_level[age];
        caught += n;
    }
    cohort.deaths.fishing += caught;
    cohort.refresh();
}
