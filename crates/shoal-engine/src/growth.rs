//! Mean growth curve and per-step somatic growth.

use crate::params::SpeciesParams;
use crate::species::Species;

/// Mean length, weight and length increment per age index.
///
/// Growth is linear from egg size at age 0 to the von Bertalanffy length
/// at `growth_age_threshold`, and von Bertalanffy afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct GrowthTable {
    mean_length: Vec<f64>,
    mean_weight: Vec<f64>,
    delta_length: Vec<f64>,
}

impl GrowthTable {
    /// Compute the table for `cohorts` age indices.
    pub fn new(params: &SpeciesParams, cohorts: usize, steps_per_year: u32) -> Self {
        let spy = f64::from(steps_per_year);
        let thr = params.growth_age_threshold;
        let von_bertalanffy = |age: f64| params.l_inf * (1.0 - (-params.k * (age - params.t0)).exp());
        let length_at_threshold = von_bertalanffy(thr).max(params.egg_size);

        let mut mean_length = Vec::with_capacity(cohorts);
        let mut mean_weight = Vec::with_capacity(cohorts);
        mean_length.push(params.egg_size);
        mean_weight.push(params.egg_weight);
        for i in 1..cohorts {
            let age = i as f64 / spy;
            let l = if age < thr {
                params.egg_size + (length_at_threshold - params.egg_size) * age / thr
            } else {
                von_bertalanffy(age)
            };
            mean_length.push(l);
            mean_weight.push(params.weight_at(l));
        }
        let mut delta_length: Vec<f64> = mean_length.windows(2).map(|w| w[1] - w[0]).collect();
        delta_length.push(0.0);

        Self {
            mean_length,
            mean_weight,
            delta_length,
        }
    }

    /// Mean length at age index `age` (cm).
    pub fn mean_length(&self, age: usize) -> f64 {
        self.mean_length[age]
    }

    /// Mean weight at age index `age` (g).
    pub fn mean_weight(&self, age: usize) -> f64 {
        self.mean_weight[age]
    }

    /// Mean length gained between age `age` and `age + 1` (cm).
    pub fn delta_length(&self, age: usize) -> f64 {
        self.delta_length[age]
    }

    /// Number of age indices.
    pub fn len(&self) -> usize {
        self.mean_length.len()
    }

    /// Always `false`: a species has at least one cohort.
    pub fn is_empty(&self) -> bool {
        self.mean_length.is_empty()
    }
}

/// Grow every live school of `species` by one step.
///
/// Feeding schools gain between zero and twice the mean increment of their
/// age, scaled by how far their predation success exceeds the critical
/// value; below it they do not grow. Their trophic level is then smoothed
/// over the last four steps, weighted by predation success. Eggs and
/// out-of-zone schools follow the mean growth curve instead.
pub fn grow(species: &mut Species) {
    let (params, table, cohorts) = species.split_mut();
    let crit = params.critical_predation_success;

    for cohort in cohorts {
        let age = cohort.age();
        let delta = table.delta_length(age);
        for school in cohort.schools.iter_mut().filter(|s| !s.disappears) {
            if age == 0 || school.out_of_zone {
                let l = school.length + delta;
                school.set_size(l, params.weight_at(l));
                if age > 0 {
                    school.trophic_level[age] = school.trophic_level[age - 1];
                }
                continue;
            }

            let psr = school.predation_success;
            if psr >= crit {
                let max_delta = 2.0 * delta;
                let l = school.length + max_delta * (psr - crit) / (1.0 - crit);
                school.set_size(l, params.weight_at(l));
            }
            let tl = school.trophic_level[age];
            school.window.push(psr, tl);
            school.trophic_level[age] = school
                .window
                .mean()
                .unwrap_or(school.trophic_level[age - 1]);
        }
        cohort.refresh();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SpeciesParams {
        SpeciesParams {
            longevity: 3.0,
            l_inf: 20.0,
            k: 0.5,
            t0: -0.2,
            egg_size: 0.1,
            growth_age_threshold: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn table_starts_at_egg_and_is_monotonic() {
        let p = params();
        let t = GrowthTable::new(&p, 12, 4);
        assert_eq!(t.len(), 12);
        assert_eq!(t.mean_length(0), p.egg_size);
        assert_eq!(t.mean_weight(0), p.egg_weight);
        for a in 1..12 {
            assert!(t.mean_length(a) > t.mean_length(a - 1));
        }
        assert_eq!(t.delta_length(11), 0.0);
        assert!((t.delta_length(3) - (t.mean_length(4) - t.mean_length(3))).abs() < 1e-12);
    }

    #[test]
    fn linear_segment_reaches_von_bertalanffy_at_threshold() {
        let p = params();
        let t = GrowthTable::new(&p, 12, 4);
        let vb = |age: f64| p.l_inf * (1.0 - (-p.k * (age - p.t0)).exp());
        // Age index 2 is half a year: halfway between egg and L(1).
        let expected = p.egg_size + (vb(1.0) - p.egg_size) * 0.5;
        assert!((t.mean_length(2) - expected).abs() < 1e-12);
        assert!((t.mean_length(4) - vb(1.0)).abs() < 1e-12);
        assert!((t.mean_length(8) - vb(2.0)).abs() < 1e-12);
    }
}
