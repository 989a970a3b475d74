//! Initial populations.

use crate::params::InitialStock;
use crate::reproduction::split_even;
use crate::school::School;
use crate::species::Species;

/// Abundance per cohort for the species' initial stock.
///
/// For a target biomass, relative abundances follow an exponential
/// survival series (larval survival into age 1, then `D + F + 0.5` per
/// year) and are scaled so that cohorts at or above the age-class-zero
/// index weigh the target. Cohort 0 starts empty either way; eggs come
/// from the first spawning.
pub fn initial_abundances(species: &Species) -> Vec<u64> {
    let p = species.params();
    let n = species.cohort_count();
    let table = species.growth_table();
    match &p.initial_stock {
        InitialStock::CohortAbundance(a) => (0..n)
            .map(|age| match age {
                0 => 0,
                _ => a.get(age).copied().unwrap_or(0),
            })
            .collect(),
        InitialStock::Biomass(target) => {
            let spy = f64::from(species.steps_per_year());
            let rate = p.additional_mortality + p.fishing_mortality + 0.5;
            let step_survival = (-rate / spy).exp();
            let mut relative = vec![0.0; n];
            if n > 1 {
                relative[1] = (-p.larval_mortality).exp();
                for age in 2..n {
                    relative[age] = relative[age - 1] * step_survival;
                }
            }
            let first = species.age_class_zero().max(1);
            let weight: f64 = (first..n)
                .map(|age| relative[age] * table.mean_weight(age) / 1e6)
                .sum();
            if weight <= 0.0 || *target <= 0.0 {
                return vec![0; n];
            }
            let scale = target / weight;
            relative.iter().map(|r| (r * scale).round() as u64).collect()
        }
    }
}

/// Fill the cohorts of `species` with schools at the mean size of their age.
///
/// Each cohort is split into up to `schools_per_cohort` schools whose
/// abundances differ by at most one individual. Existing schools are
/// replaced. Schools start unlocated.
pub fn populate(species: &mut Species, schools_per_cohort: usize) {
    let abundances = initial_abundances(species);
    let table = species.growth_table().clone();
    let tl = species.params().egg_trophic_level;
    let ages = species.cohort_count();
    for (cohort, total) in species.cohorts_mut().iter_mut().zip(abundances) {
        let age = cohort.age();
        let (l, w) = (table.mean_length(age), table.mean_weight(age));
        let schools = split_even(total, schools_per_cohort)
            .into_iter()
            .map(|n| School::new(n, l, w, ages, tl))
            .collect();
        cohort.set_contents(schools, Default::default());
    }
    species.refresh();
    log::debug!(
        "species {} initialised: {} individuals, {:.3} t",
        species.name(),
        species.abundance(),
        species.biomass()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SpeciesParams;
    use shoal_core::SpeciesId;

    #[test]
    fn fewer_individuals_than_schools_gives_one_school_each() {
        let mut s = Species::new(
            SpeciesId(0),
            SpeciesParams {
                initial_stock: InitialStock::CohortAbundance(vec![0, 3]),
                ..Default::default()
            },
            12,
        );
        populate(&mut s, 10);
        assert_eq!(s.cohort(1).len(), 3);
        assert_eq!(s.cohort(1).abundance(), 3);
    }

    #[test]
    fn biomass_target_is_met_for_indicator_cohorts() {
        let mut s = Species::new(
            SpeciesId(0),
            SpeciesParams {
                initial_stock: InitialStock::Biomass(5_000.0),
                ..Default::default()
            },
            12,
        );
        populate(&mut s, 10);
        let (_, b) = s.indicator_stock();
        assert!((b - 5_000.0).abs() / 5_000.0 < 1e-3, "biomass {b}");
        assert!(s.cohort(0).is_empty());
        assert_eq!(s.cohort(5).len(), 10);
        // Survival series decreases with age.
        assert!(s.cohort(5).abundance() > s.cohort(30).abundance());
    }

    #[test]
    fn explicit_abundances_fill_listed_cohorts() {
        let mut s = Species::new(
            SpeciesId(0),
            SpeciesParams {
                initial_stock: InitialStock::CohortAbundance(vec![99, 0, 7, 1000]),
                ..Default::default()
            },
            12,
        );
        populate(&mut s, 4);
        assert!(s.cohort(0).is_empty());
        assert!(s.cohort(1).is_empty());
        let small: Vec<u64> = s.cohort(2).schools().iter().map(|x| x.abundance()).collect();
        assert_eq!(small, vec![2, 2, 2, 1]);
        assert_eq!(s.cohort(3).len(), 4);
        assert!(s.cohort(3).schools().iter().all(|x| x.abundance() == 250));
        assert_eq!(s.abundance(), 1007);
        let school = &s.cohort(3).schools()[0];
        assert_eq!(school.length(), s.growth_table().mean_length(3));
        assert!(school.cell().is_none());
    }
}
