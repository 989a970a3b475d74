//! Additional (natural) and starvation mortality.

use crate::species::Species;

/// Apply one step of additional mortality to every cohort of `species`.
///
/// Age-0 cohorts use the per-step larval rate; older cohorts use
/// `D / steps_per_year`. The yearly out-of-zone mortality of the cohort's
/// migration rule at step `dt`, divided by steps per year, is added to
/// both. Returns the number of individuals removed.
pub fn additional_mortality(species: &mut Species, dt: usize) -> u64 {
    let spy = f64::from(species.steps_per_year());
    let larval = species.params().larval_mortality;
    let d = species.params().additional_mortality;
    let out_of_zone: Vec<f64> = (0..species.cohort_count())
        .map(|age| species.migration(age, dt).1)
        .collect();

    let mut removed = 0;
    for cohort in species.cohorts_mut() {
        let age = cohort.age();
        let rate = if age == 0 {
            larval + out_of_zone[age] / spy
        } else {
            (d + out_of_zone[age]) / spy
        };
        removed += cohort.apply_additional_mortality(rate);
    }
    species.refresh();
    removed
}

/// Starvation rate (per year) at predation success `success`.
///
/// Zero at or above `critical`, rising linearly to `max_rate` at zero success.
pub fn starvation_rate(success: f64, critical: f64, max_rate: f64) -> f64 {
    if success >= critical {
        0.0
    } else {
        (max_rate * (1.0 - success / critical)).max(0.0)
    }
}

/// Apply one step of starvation to every feeding school of `species`.
///
/// Eggs and out-of-zone schools do not feed and cannot starve. Each school
/// loses `round(abundance * (1 - exp(-rate / steps_per_year)))`.
/// Returns the number of individuals removed.
pub fn starvation(species: &mut Species) -> u64 {
    let spy = f64::from(species.steps_per_year());
    let crit = species.params().critical_predation_success;
    let max_rate = species.params().max_starvation_rate;

    let mut removed = 0;
    for cohort in species.cohorts_mut().iter_mut().skip(1) {
        let mut dead_in_cohort = 0;
        for school in cohort
            .schools
            .iter_mut()
            .filter(|s| !s.disappears && !s.out_of_zone)
        {
            let rate = starvation_rate(school.predation_success, crit, max_rate);
            if rate <= 0.0 {
                continue;
            }
            let dead = (school.abundance as f64 * (1.0 - (-rate / spy).exp())).round() as u64;
            dead_in_cohort += school.remove_individuals(dead);
        }
        cohort.deaths.starvation += dead_in_cohort;
        removed += dead_in_cohort;
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{Migration, SpeciesParams};
    use crate::school::School;
    use shoal_core::SpeciesId;

    fn species(params: SpeciesParams) -> Species {
        let mut s = Species::new(SpeciesId(0), params, 10);
        for age in [0, 5] {
            s.cohorts[age].push(School::new(10_000, 5.0, 2.0, 20, 3.0));
        }
        s.refresh();
        s
    }

    #[test]
    fn larval_rate_applies_to_age_zero_only() {
        let mut s = species(SpeciesParams {
            longevity: 2.0,
            larval_mortality: 1.0,
            additional_mortality: 1.0,
            ..Default::default()
        });
        let removed = additional_mortality(&mut s, 0);
        // round(10000 * exp(-1)) = 3679; round(10000 * exp(-0.1)) = 9048.
        assert_eq!(s.cohort(0).abundance(), 3679);
        assert_eq!(s.cohort(5).abundance(), 9048);
        assert_eq!(removed, 6321 + 952);
        assert_eq!(s.abundance(), 3679 + 9048);
    }

    #[test]
    fn out_of_zone_mortality_adds_to_the_cohort_rate() {
        let mut s = species(SpeciesParams {
            longevity: 2.0,
            additional_mortality: 1.0,
            migrations: vec![Migration {
                first_age: 0.5,
                last_age: 1.0,
                steps: vec![3],
                fraction_out: 0.5,
                mortality: 1.0,
            }],
            ..Default::default()
        });
        additional_mortality(&mut s, 3);
        // round(10000 * exp(-0.2)) = 8187.
        assert_eq!(s.cohort(5).abundance(), 8187);
    }

    #[test]
    fn starvation_rate_is_linear_below_critical() {
        assert_eq!(starvation_rate(0.6, 0.5, 0.3), 0.0);
        assert_eq!(starvation_rate(0.5, 0.5, 0.3), 0.0);
        assert!((starvation_rate(0.25, 0.5, 0.3) - 0.15).abs() < 1e-12);
        assert_eq!(starvation_rate(0.0, 0.5, 0.3), 0.3);
    }

    #[test]
    fn starvation_skips_eggs_and_fed_schools() {
        let mut s = species(SpeciesParams {
            longevity: 2.0,
            critical_predation_success: 0.5,
            max_starvation_rate: 2.0,
            ..Default::default()
        });
        s.cohorts[5].push(School::new(10_000, 5.0, 2.0, 20, 3.0));
        s.cohorts[5].schools[1].predation_success = 0.9;
        let removed = starvation(&mut s);
        // Rate 2.0 per year over 10 steps: round(10000 * (1 - exp(-0.2))) = 1813.
        assert_eq!(removed, 1813);
        assert_eq!(s.cohort(0).schools()[0].abundance(), 10_000);
        assert_eq!(s.cohort(5).schools()[0].abundance(), 8187);
        assert_eq!(s.cohort(5).schools()[1].abundance(), 10_000);
        assert_eq!(s.cohort(5).deaths().starvation, 1813);
    }
}
