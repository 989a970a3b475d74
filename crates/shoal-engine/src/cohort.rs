//! Cohorts: the schools of one species sharing an age in steps.

use crate::school::School;

/// Individuals removed during the current step, by cause.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeathCounters {
    /// Eaten by predators.
    pub predation: u64,
    /// Starved.
    pub starvation: u64,
    /// Additional (natural) mortality, larval mortality included.
    pub additional: u64,
    /// Caught.
    pub fishing: u64,
}

impl DeathCounters {
    /// Sum over all causes.
    pub fn total(&self) -> u64 {
        self.predation + self.starvation + self.additional + self.fishing
    }
}

impl std::ops::AddAssign for DeathCounters {
    fn add_assign(&mut self, other: Self) {
        self.predation += other.predation;
        self.starvation += other.starvation;
        self.additional += other.additional;
        self.fishing += other.fishing;
    }
}

/// All schools of one species with the same age index.
///
/// `abundance` and `biomass` are cached; [`refresh`](Cohort::refresh)
/// recomputes them from the schools that are not marked to disappear.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cohort {
    age: usize,
    pub(crate) schools: Vec<School>,
    abundance: u64,
    biomass: f64,
    pub(crate) deaths: DeathCounters,
}

impl Cohort {
    /// Empty cohort at age index `age`.
    pub fn new(age: usize) -> Self {
        Self {
            age,
            ..Default::default()
        }
    }

    /// Cohort at age index `age` holding `schools`.
    pub fn with_schools(age: usize, schools: Vec<School>) -> Self {
        let mut c = Self {
            age,
            schools,
            ..Default::default()
        };
        c.refresh();
        c
    }

    /// Age index, in steps.
    pub fn age(&self) -> usize {
        self.age
    }

    /// Member schools, including any marked to disappear.
    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Number of member schools.
    pub fn len(&self) -> usize {
        self.schools.len()
    }

    /// Whether the cohort has no school.
    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    /// Cached abundance.
    pub fn abundance(&self) -> u64 {
        self.abundance
    }

    /// Cached biomass (tons).
    pub fn biomass(&self) -> f64 {
        self.biomass
    }

    /// Deaths recorded this step.
    pub fn deaths(&self) -> DeathCounters {
        self.deaths
    }

    /// Recompute cached aggregates from live schools.
    pub fn refresh(&mut self) {
        let (mut n, mut b) = (0u64, 0.0);
        for s in self.schools.iter().filter(|s| !s.disappears) {
            n += s.abundance;
            b += s.biomass;
        }
        self.abundance = n;
        self.biomass = b;
    }

    /// Zero the per-step death counters.
    pub fn reset_deaths(&mut self) {
        self.deaths = DeathCounters::default();
    }

    /// Abundance-weighted mean length of live schools, zero when empty.
    pub fn mean_length(&self) -> f64 {
        let (mut sum, mut n) = (0.0, 0u64);
        for s in self.schools.iter().filter(|s| !s.disappears) {
            sum += s.length * s.abundance as f64;
            n += s.abundance;
        }
        if n == 0 {
            0.0
        } else {
            sum / n as f64
        }
    }

    /// Abundance of live, catchable schools.
    pub fn catchable_abundance(&self) -> u64 {
        self.schools
            .iter()
            .filter(|s| !s.disappears && s.catchable)
            .map(|s| s.abundance)
            .sum()
    }

    /// Number of live, catchable schools.
    pub fn catchable_count(&self) -> usize {
        self.schools
            .iter()
            .filter(|s| !s.disappears && s.catchable)
            .count()
    }

    /// Distribute `dead` individuals over the live schools accepted by
    /// `eligible`. Returns the deaths that could not be assigned because
    /// every eligible school ran out of individuals.
    ///
    /// Each eligible school first loses `dead / n`; a school holding fewer
    /// is emptied and the shortfall joins the `dead % n` remainder. The
    /// remainder is then taken from eligible schools in order until
    /// exhausted. Emptied schools are marked to disappear.
    pub fn spread_deaths<F>(&mut self, dead: u64, eligible: F) -> u64
    where
        F: Fn(&School) -> bool,
    {
        let idx: Vec<usize> = self
            .schools
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.disappears && eligible(s))
            .map(|(i, _)| i)
            .collect();
        if dead == 0 || idx.is_empty() {
            return dead;
        }
        let n = idx.len() as u64;
        let share = dead / n;
        let mut surplus = dead % n;

        if share > 0 {
            for &i in &idx {
                let s = &mut self.schools[i];
                let removed = s.remove_individuals(share);
                surplus += share - removed;
            }
        }
        for &i in &idx {
            if surplus == 0 {
                break;
            }
            surplus -= self.schools[i].remove_individuals(surplus);
        }
        surplus
    }

    /// Apply a mortality rate for one step to the whole cohort.
    ///
    /// `survivors = round(abundance * exp(-rate))`; the dead are spread
    /// with [`spread_deaths`](Cohort::spread_deaths) and counted as
    /// additional mortality. Returns the number removed.
    pub fn apply_additional_mortality(&mut self, rate: f64) -> u64 {
        self.refresh();
        let old = self.abundance;
        if old == 0 || rate <= 0.0 {
            return 0;
        }
        let survivors = ((old as f64) * (-rate).exp()).round() as u64;
        let dead = old - survivors.min(old);
        let unassigned = self.spread_deaths(dead, |_| true);
        let removed = dead - unassigned;
        self.deaths.additional += removed;
        self.refresh();
        removed
    }

    /// Drop schools marked to disappear. Returns how many were dropped.
    pub fn purge(&mut self) -> usize {
        let before = self.schools.len();
        self.schools.retain(|s| !s.disappears);
        self.refresh();
        before - self.schools.len()
    }

    /// Take this cohort's schools and counters, leaving it empty.
    pub(crate) fn take_contents(&mut self) -> (Vec<School>, DeathCounters) {
        let schools = std::mem::take(&mut self.schools);
        let deaths = std::mem::take(&mut self.deaths);
        self.refresh();
        (schools, deaths)
    }

    /// Replace this cohort's schools and counters.
    pub(crate) fn set_contents(&mut self, schools: Vec<School>, deaths: DeathCounters) {
        self.schools = schools;
        self.deaths = deaths;
        self.refresh();
    }

    /// Append a school, updating the cached aggregates.
    pub(crate) fn push(&mut self, school: School) {
        if !school.disappears {
            self.abundance += school.abundance;
            self.biomass += school.biomass;
        }
        self.schools.push(school);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cohort(abundances: &[u64]) -> Cohort {
        let schools = abundances
            .iter()
            .map(|&a| School::new(a, 10.0, 10.0, 2, 3.0))
            .collect();
        Cohort::with_schools(1, schools)
    }

    #[test]
    fn uniform_share_then_remainder() {
        let mut c = cohort(&[100, 100, 100]);
        assert_eq!(c.spread_deaths(31, |_| true), 0);
        let a: Vec<_> = c.schools().iter().map(School::abundance).collect();
        assert_eq!(a, vec![89, 90, 90]);
        c.refresh();
        assert_eq!(c.abundance(), 269);
    }

    #[test]
    fn small_school_shortfall_moves_to_others() {
        let mut c = cohort(&[2, 100, 100]);
        assert_eq!(c.spread_deaths(30, |_| true), 0);
        let a: Vec<_> = c.schools().iter().map(School::abundance).collect();
        // 10 each; the first only had 2, so 8 more come from the next school.
        assert_eq!(a, vec![0, 82, 90]);
        assert!(c.schools()[0].disappears());
    }

    #[test]
    fn overkill_is_reported_back() {
        let mut c = cohort(&[5, 5]);
        assert_eq!(c.spread_deaths(13, |_| true), 3);
        assert!(c.schools().iter().all(School::disappears));
    }

    #[test]
    fn ineligible_schools_are_untouched() {
        let mut c = cohort(&[50, 50]);
        c.schools[1].catchable = false;
        assert_eq!(c.spread_deaths(20, |s| s.catchable), 0);
        assert_eq!(c.schools()[0].abundance(), 30);
        assert_eq!(c.schools()[1].abundance(), 50);
    }

    #[test]
    fn additional_mortality_rounds_survivors() {
        let mut c = cohort(&[500, 500]);
        let removed = c.apply_additional_mortality(0.1);
        // round(1000 * exp(-0.1)) = 905
        assert_eq!(removed, 95);
        assert_eq!(c.abundance(), 905);
        assert_eq!(c.deaths().additional, 95);
    }

    #[test]
    fn push_keeps_aggregates_current() {
        let mut c = Cohort::new(0);
        c.push(School::new(40, 1.0, 2.0, 2, 3.0));
        c.push(School::new(60, 1.0, 2.0, 2, 3.0));
        assert_eq!(c.len(), 2);
        assert_eq!(c.abundance(), 100);
        let cached = c.biomass();
        c.refresh();
        assert_eq!(c.biomass(), cached);
    }

    #[test]
    fn purge_drops_disappeared() {
        let mut c = cohort(&[1, 10]);
        c.spread_deaths(2, |_| true);
        assert_eq!(c.purge(), 1);
        assert_eq!(c.len(), 1);
        assert_eq!(c.abundance(), 9);
    }

    proptest! {
        #[test]
        fn deaths_are_conserved(
            abundances in prop::collection::vec(0u64..10_000, 1..12),
            dead in 0u64..60_000,
        ) {
            let mut c = cohort(&abundances);
            let before: u64 = abundances.iter().sum();
            let unassigned = c.spread_deaths(dead, |_| true);
            c.refresh();
            let removed = dead - unassigned;
            prop_assert!(removed <= before);
            prop_assert_eq!(c.abundance(), before - removed);
            prop_assert_eq!(unassigned, dead.saturating_sub(before));
            let live: u64 = c.schools().iter().filter(|s| !s.disappears()).map(School::abundance).sum();
            prop_assert_eq!(c.abundance(), live);
        }

        #[test]
        fn additional_mortality_never_exceeds_abundance(
            abundances in prop::collection::vec(0u64..100_000, 1..8),
            rate in 0.0f64..5.0,
        ) {
            let mut c = cohort(&abundances);
            let before: u64 = abundances.iter().sum();
            let removed = c.apply_additional_mortality(rate);
            prop_assert!(removed <= before);
            prop_assert_eq!(c.abundance() + removed, before);
            for s in c.schools() {
                let expected = s.abundance() as f64 * s.weight() / 1e6;
                prop_assert!((s.biomass() - expected).abs() <= 1e-12 * expected.max(1.0));
            }
        }
    }
}
