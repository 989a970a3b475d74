//! Predation: matching predator schools with prey in their cell.
//!
//! Every located, in-zone school older than age 0 is a predator. Predators
//! feed one at a time in a random order drawn once per step, so prey eaten
//! by an early predator is no longer available to later ones. A predator
//! eats fish schools of its cell whose length falls in its size window and
//! plankton groups whose size range overlaps that window, each weighted by
//! the accessibility matrix.

use rand::seq::SliceRandom;
use rand::Rng;
use shoal_core::{CellId, DietMatrix, DietPrey, LtlForcing, PlanktonGroupId};
use shoal_space::CellOccupancy;
use smallvec::SmallVec;

use crate::accessibility::AccessibilityMatrix;
use crate::handle::SchoolHandle;
use crate::school::School;
use crate::species::Species;

/// Totals of one predation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PredationSummary {
    /// Predator schools that fed.
    pub predators: usize,
    /// Fish biomass eaten (tons).
    pub fish_eaten: f64,
    /// Plankton biomass eaten (tons).
    pub plankton_eaten: f64,
}

/// Everything one predation pass reads or writes besides the species.
pub struct PredationPass<'a, F: LtlForcing + ?Sized> {
    /// Prey accessibility coefficients.
    pub accessibility: &'a AccessibilityMatrix,
    /// Schools per cell, each list sorted by ascending length.
    pub occupancy: &'a CellOccupancy<SchoolHandle>,
    /// Plankton source; eaten biomass is deducted from it.
    pub forcing: &'a mut F,
    /// Biomass eaten per predator diet stage and prey.
    pub diet: &'a mut DietMatrix,
    /// Plankton biomass eaten per group.
    pub plankton_eaten: &'a mut [f64],
    /// Steps per simulated year.
    pub steps_per_year: u32,
}

struct Meal {
    fish: Vec<(SchoolHandle, f64)>,
    plankton: SmallVec<[(PlanktonGroupId, f64); 4]>,
}

impl<F: LtlForcing + ?Sized> PredationPass<'_, F> {
    /// Run predation for every predator school of `species`.
    pub fn run<R: Rng + ?Sized>(
        mut self,
        species: &mut [Species],
        rng: &mut R,
    ) -> PredationSummary {
        for sp in species.iter_mut() {
            for cohort in sp.cohorts_mut() {
                for s in &mut cohort.schools {
                    s.predation_success = 0.0;
                }
            }
        }

        let mut predators = Vec::new();
        for sp in species.iter() {
            for cohort in sp.cohorts().iter().skip(1) {
                for (slot, s) in cohort.schools().iter().enumerate() {
                    if !s.disappears && !s.out_of_zone && s.cell.is_some() {
                        predators.push(SchoolHandle::new(sp.id(), cohort.age(), slot));
                    }
                }
            }
        }
        predators.shuffle(rng);

        let mut summary = PredationSummary::default();
        let mut candidates = Vec::new();
        let mut meal = Meal {
            fish: Vec::new(),
            plankton: SmallVec::new(),
        };
        for h in predators {
            let pred = school(species, h);
            // Eaten to nothing by an earlier predator.
            if pred.disappears {
                continue;
            }
            let Some(cell) = pred.cell else { continue };
            self.feed(species, h, cell, &mut candidates, &mut meal, &mut summary, rng);
        }
        summary
    }

    #[allow(clippy::too_many_arguments)]
    fn feed<R: Rng + ?Sized>(
        &mut self,
        species: &mut [Species],
        h: SchoolHandle,
        cell: CellId,
        candidates: &mut Vec<SchoolHandle>,
        meal: &mut Meal,
        summary: &mut PredationSummary,
        rng: &mut R,
    ) {
        let age = h.cohort();
        let sp = &species[h.species.index()];
        let params = sp.params();
        let pred = sp.school(age, h.slot());
        let stages = pred.stages;
        let demand = pred.biomass * params.predation_rate / f64::from(self.steps_per_year);
        let previous_tl = pred.trophic_level[age - 1];
        let lo = pred.length / params.pred_prey_size_ratio_max[stages.feeding];
        let hi = pred.length / params.pred_prey_size_ratio_min[stages.feeding];

        // 1. Candidate fish: closed length window in the sorted cell list.
        let list = self.occupancy.schools_in(cell);
        let start = list.partition_point(|&x| school(species, x).length < lo);
        let end = list.partition_point(|&x| school(species, x).length <= hi);
        candidates.clear();
        candidates.extend(
            list[start.min(end)..end]
                .iter()
                .copied()
                .filter(|&x| x != h && !school(species, x).disappears),
        );
        candidates.shuffle(rng);

        // 2. Accessible biomass.
        meal.fish.clear();
        meal.plankton.clear();
        let mut accessible = 0.0;
        for &x in candidates.iter() {
            let prey = school(species, x);
            let coef = self.accessibility.fish(
                x.species,
                prey.stages.accessibility,
                h.species,
                stages.accessibility,
            );
            let c = prey.biomass * coef;
            if c > 0.0 {
                meal.fish.push((x, c));
                accessible += c;
            }
        }
        for g in 0..self.forcing.group_count() {
            let group = PlanktonGroupId(g as u32);
            let (min, max) = self.forcing.size_range(group);
            let overlap = size_overlap(lo, hi, min, max);
            if overlap <= 0.0 {
                continue;
            }
            let coef = self
                .accessibility
                .plankton(group, h.species, stages.accessibility);
            let c = overlap * coef * self.forcing.accessible_biomass(group, cell);
            if c > 0.0 {
                meal.plankton.push((group, c));
                accessible += c;
            }
        }

        // 3. Split.
        if demand <= 0.0 || accessible <= 0.0 {
            let pred = species[h.species.index()].school_mut(age, h.slot());
            pred.predation_success = if demand <= 0.0 { 1.0 } else { 0.0 };
            pred.trophic_level[age] = previous_tl;
            return;
        }
        let (factor, success) = if accessible <= demand {
            (1.0, accessible / demand)
        } else {
            (demand / accessible, 1.0)
        };

        let mut tl = 0.0;
        for &(x, c) in &meal.fish {
            let eaten = c * factor;
            tl += prey_trophic_level(species, x) * c;
            let prey_stage = school(species, x).stages.diet;
            self.diet.add(
                h.species,
                stages.diet,
                DietPrey::Fish {
                    species: x.species,
                    stage: prey_stage,
                },
                eaten,
            );
            let prey_sp = &mut species[x.species.index()];
            let cohort = &mut prey_sp.cohorts_mut()[x.cohort()];
            let prey = &mut cohort.schools[x.slot()];
            let dead = (eaten * 1e6 / prey.weight).round() as u64;
            let removed = prey.remove_individuals(dead);
            cohort.deaths.predation += removed;
            summary.fish_eaten += eaten;
        }
        for &(group, c) in &meal.plankton {
            let eaten = c * factor;
            tl += self.forcing.trophic_level(group) * c;
            self.forcing.deduct_biomass(group, cell, eaten);
            self.diet
                .add(h.species, stages.diet, DietPrey::Plankton(group), eaten);
            self.plankton_eaten[group.index()] += eaten;
            summary.plankton_eaten += eaten;
        }

        let pred = species[h.species.index()].school_mut(age, h.slot());
        pred.predation_success = success;
        pred.trophic_level[age] = tl / accessible + 1.0;
        summary.predators += 1;
    }
}

fn school(species: &[Species], h: SchoolHandle) -> &School {
    species[h.species.index()].school(h.cohort(), h.slot())
}

/// Trophic level a predator gains from eating `h`: the prey's level at
/// its previous age, or its species' egg level for ages 0 and 1.
fn prey_trophic_level(species: &[Species], h: SchoolHandle) -> f64 {
    let sp = &species[h.species.index()];
    let age = h.cohort();
    if age <= 1 {
        sp.params().egg_trophic_level
    } else {
        sp.school(age, h.slot()).trophic_level[age - 1]
    }
}

/// Share of the plankton size range `[min, max]` inside `[lo, hi]`.
pub fn size_overlap(lo: f64, hi: f64, min: f64, max: f64) -> f64 {
    if max < lo || min > hi {
        return 0.0;
    }
    if max <= min {
        return 1.0;
    }
    (max.min(hi) - min.max(lo)) / (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessibility::AccessibilityConfig;
    use crate::params::SpeciesParams;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoal_core::{ForcingError, SimTime, SpeciesId};

    struct NoPlankton;

    impl LtlForcing for NoPlankton {
        fn group_count(&self) -> usize {
            0
        }
        fn accessible_biomass(&self, _: PlanktonGroupId, _: CellId) -> f64 {
            0.0
        }
        fn trophic_level(&self, _: PlanktonGroupId) -> f64 {
            1.0
        }
        fn size_range(&self, _: PlanktonGroupId) -> (f64, f64) {
            (0.0, 0.0)
        }
        fn deduct_biomass(&mut self, _: PlanktonGroupId, _: CellId, _: f64) {}
        fn advance(&mut self, _: SimTime) -> Result<(), ForcingError> {
            Ok(())
        }
    }

    fn params() -> SpeciesParams {
        SpeciesParams {
            longevity: 1.0,
            pred_prey_size_ratio_max: vec![10.0],
            pred_prey_size_ratio_min: vec![2.0],
            egg_trophic_level: 2.0,
            ..Default::default()
        }
    }

    /// One predator of 1 t at age 3 plus egg-stage prey schools, all in
    /// cell 0. Eggs do not feed, so only the predator eats.
    fn scene(prey: &[(u64, f64)], rate: f64) -> (Vec<Species>, CellOccupancy<SchoolHandle>) {
        let mut sp = Species::new(
            SpeciesId(0),
            SpeciesParams {
                predation_rate: rate,
                ..params()
            },
            4,
        );
        let mut pred = School::new(1000, 20.0, 1000.0, 4, 3.0);
        pred.set_cell(Some(CellId(0)));
        sp.cohorts[3].push(pred);
        for &(abundance, length) in prey {
            let mut s = School::new(abundance, length, 1000.0, 4, 3.0);
            s.set_cell(Some(CellId(0)));
            sp.cohorts[0].push(s);
        }
        let species = vec![sp];
        let mut occ = CellOccupancy::new(1);
        for (age, cohort) in species[0].cohorts().iter().enumerate() {
            for slot in 0..cohort.len() {
                occ.insert(CellId(0), SchoolHandle::new(SpeciesId(0), age, slot));
            }
        }
        occ.sort_each_by(|h| species[0].school(h.cohort(), h.slot()).length());
        (species, occ)
    }

    fn run(species: &mut [Species], occ: &CellOccupancy<SchoolHandle>) -> PredationSummary {
        let acc = AccessibilityMatrix::build(
            &AccessibilityConfig::Uniform(0.8),
            &[species[0].params().clone()],
            0,
        )
        .unwrap();
        let mut diet = DietMatrix::new(&[1], 0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        PredationPass {
            accessibility: &acc,
            occupancy: occ,
            forcing: &mut NoPlankton,
            diet: &mut diet,
            plankton_eaten: &mut [],
            steps_per_year: 4,
        }
        .run(species, &mut rng)
    }

    #[test]
    fn not_enough_prey_takes_every_accessible_share() {
        // Demand: 1 t * 8 / 4 = 2 t. Accessible: 2 * 1 t * 0.8 = 1.6 t.
        let (mut species, occ) = scene(&[(1000, 5.0), (1000, 6.0)], 8.0);
        let summary = run(&mut species, &occ);
        assert!((summary.fish_eaten - 1.6).abs() < 1e-12);
        for prey in species[0].cohort(0).schools() {
            assert_eq!(prey.abundance(), 200);
            assert!((prey.biomass() - 1.0 * (1.0 - 0.8)).abs() < 1e-12);
        }
        let pred = species[0].school(3, 0);
        assert!((pred.predation_success() - 0.8).abs() < 1e-12);
        // Egg prey carry the egg trophic level.
        assert!((pred.trophic_level(3) - 3.0).abs() < 1e-12);
        assert_eq!(species[0].cohort(0).deaths().predation, 1600);
    }

    #[test]
    fn enough_prey_is_shared_proportionally() {
        // Demand: 1 t * 2 / 4 = 0.5 t. Accessible: 1.6 t.
        let (mut species, occ) = scene(&[(1000, 5.0), (1000, 6.0)], 2.0);
        run(&mut species, &occ);
        // Each prey loses 0.8 * 0.5 / 1.6 = 0.25 t, i.e. 250 individuals.
        for prey in species[0].cohort(0).schools() {
            assert_eq!(prey.abundance(), 750);
            assert!((prey.biomass() - 1.0 * (1.0 - 0.8 * 0.5 / 1.6)).abs() < 1e-12);
        }
        assert_eq!(species[0].school(3, 0).predation_success(), 1.0);
    }

    #[test]
    fn prey_outside_size_window_is_ignored() {
        // Window for a 20 cm predator: [2, 10] cm.
        let (mut species, occ) = scene(&[(1000, 1.9), (1000, 10.0), (1000, 10.1)], 2.0);
        run(&mut species, &occ);
        let a: Vec<u64> = species[0]
            .cohort(0)
            .schools()
            .iter()
            .map(School::abundance)
            .collect();
        assert_eq!(a[0], 1000);
        assert!(a[1] < 1000);
        assert_eq!(a[2], 1000);
    }

    #[test]
    fn no_accessible_prey_keeps_previous_trophic_level() {
        let (mut species, occ) = scene(&[], 2.0);
        species[0].cohorts[3].schools[0].trophic_level[2] = 3.7;
        let summary = run(&mut species, &occ);
        assert_eq!(summary.predators, 0);
        let pred = species[0].school(3, 0);
        assert_eq!(pred.predation_success(), 0.0);
        assert_eq!(pred.trophic_level(3), 3.7);
    }

    #[test]
    fn overlap_is_share_of_plankton_range() {
        assert_eq!(size_overlap(1.0, 2.0, 0.0, 4.0), 0.25);
        assert_eq!(size_overlap(1.0, 2.0, 3.0, 4.0), 0.0);
        assert_eq!(size_overlap(0.0, 10.0, 1.0, 2.0), 1.0);
        assert_eq!(size_overlap(0.0, 10.0, 0.5, 0.5), 1.0);
    }
}
