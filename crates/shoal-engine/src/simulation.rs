//! The simulation context and its per-step scheduler.
//!
//! [`Simulation`] owns every piece of run state: species, grid, occupancy,
//! forcing, random generator, indicators and the clock. Each
//! [`step()`](Simulation::step) runs the phases of one time step in a
//! fixed order:
//!
//! 1. reset death counters and recompute stages
//! 2. place schools (skipped on the very first step) and rebuild occupancy
//! 3. additional mortality
//! 4. advance the plankton forcing
//! 5. sort occupancy by length and run predation
//! 6. starvation, then purge
//! 7. growth
//! 8. catchability and fishing, then purge
//! 9. indicator accumulation
//! 10. reproduction and the age-class shift
//! 11. invariant checks, period close, clock advance
//!
//! A failed step halts the simulation: every later call returns
//! [`StepError::Halted`].

use std::error::Error;
use std::fmt;
use std::time::Instant;

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shoal_core::{ForcingError, LtlForcing, PeriodSnapshot, Reporter, SimTime, SpeciesId};
use shoal_space::{CellOccupancy, MarineProtectedArea, OceanGrid};

use crate::accessibility::AccessibilityMatrix;
use crate::config::{ConfigError, SimulationConfig};
use crate::distribution::Distribution;
use crate::fishing::{fish, update_catchability};
use crate::growth::grow;
use crate::handle::SchoolHandle;
use crate::hash::population_hash;
use crate::indicators::Indicators;
use crate::init::populate;
use crate::metrics::StepMetrics;
use crate::mortality::{additional_mortality, starvation};
use crate::predation::PredationPass;
use crate::reproduction::reproduce;
use crate::school::biomass_of;
use crate::species::Species;

// ── StepError ──────────────────────────────────────────────────────

/// Fatal failure of a simulation step.
#[derive(Debug, PartialEq)]
pub enum StepError {
    /// The plankton forcing could not advance.
    Forcing(ForcingError),
    /// Population bookkeeping went inconsistent.
    InvariantViolation {
        /// Species whose state is inconsistent.
        species: SpeciesId,
        /// What was found.
        reason: String,
    },
    /// Located schools and cell occupancy disagree.
    OccupancyMismatch {
        /// Live schools holding a cell.
        located: usize,
        /// Handles registered in cells.
        registered: usize,
    },
    /// An earlier step failed; the simulation no longer advances.
    Halted,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forcing(e) => write!(f, "forcing: {e}"),
            Self::InvariantViolation { species, reason } => {
                write!(f, "invariant violated for species {species}: {reason}")
            }
            Self::OccupancyMismatch {
                located,
                registered,
            } => write!(
                f,
                "{located} located schools but {registered} occupancy entries"
            ),
            Self::Halted => write!(f, "simulation halted by an earlier failure"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Forcing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ForcingError> for StepError {
    fn from(e: ForcingError) -> Self {
        Self::Forcing(e)
    }
}

// ── StepReport ─────────────────────────────────────────────────────

/// Result of a successful [`Simulation::step()`] call.
#[derive(Clone, Debug)]
pub struct StepReport {
    /// The step that ran.
    pub time: SimTime,
    /// Timing and counters for the step.
    pub metrics: StepMetrics,
    /// Snapshot of the accounting period this step closed, if any.
    pub period: Option<PeriodSnapshot>,
}

// ── Simulation ─────────────────────────────────────────────────────

/// A running ecosystem simulation.
pub struct Simulation {
    config: SimulationConfig,
    grid: OceanGrid,
    forcing: Box<dyn LtlForcing>,
    reporter: Option<Box<dyn Reporter>>,
    species: Vec<Species>,
    names: IndexMap<String, SpeciesId>,
    accessibility: AccessibilityMatrix,
    distribution: Distribution,
    mpa: Option<MarineProtectedArea>,
    occupancy: CellOccupancy<SchoolHandle>,
    indicators: Indicators,
    rng: ChaCha8Rng,
    time: SimTime,
    steps_taken: u64,
    extinct: Vec<bool>,
    halted: bool,
    last_metrics: StepMetrics,
}

impl Simulation {
    /// Validate `config` and build the initial state.
    ///
    /// Species are populated from their initial stock and placed for the
    /// first step of year 0.
    pub fn new(
        config: SimulationConfig,
        grid: OceanGrid,
        forcing: Box<dyn LtlForcing>,
    ) -> Result<Self, ConfigError> {
        // 1. Validate against the grid and the forcing's groups.
        let groups = forcing.group_count();
        config.validate(&grid, groups)?;
        let spy = config.steps_per_year;
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        // 2. Derived tables.
        let accessibility =
            AccessibilityMatrix::build(&config.accessibility, &config.species, groups)?;
        let distribution =
            Distribution::build(&config.distribution, &grid, &config.species, spy, &mut rng)?;
        let mpa = config
            .mpa
            .as_ref()
            .map(|m| MarineProtectedArea::new(&grid, &m.cells, m.start_year, m.end_year))
            .transpose()?;

        // 3. Initial stock and first placement.
        let schools_per_cohort = config.schools_per_cohort as usize;
        let mut species: Vec<Species> = config
            .species
            .iter()
            .enumerate()
            .map(|(i, p)| Species::new(SpeciesId(i as u32), p.clone(), spy))
            .collect();
        for sp in &mut species {
            populate(sp, schools_per_cohort);
            sp.update_stages();
            distribution.distribute(sp, &grid, 0, true, &mut rng);
        }
        let mut occupancy = CellOccupancy::new(grid.cell_count());
        rebuild_occupancy(&mut occupancy, &species);

        let indicators = Indicators::new(
            &species,
            groups,
            config.record_frequency,
            config.burn_in_years,
        );
        log::info!(
            "simulation ready: {} species, {} ocean cells, {} schools placed, seed {}",
            species.len(),
            grid.ocean_cell_count(),
            occupancy.total(),
            config.seed
        );

        let names = species
            .iter()
            .map(|sp| (sp.name().to_owned(), sp.id()))
            .collect();

        Ok(Self {
            extinct: vec![false; species.len()],
            config,
            grid,
            forcing,
            reporter: None,
            species,
            names,
            accessibility,
            distribution,
            mpa,
            occupancy,
            indicators,
            rng,
            time: SimTime::default(),
            steps_taken: 0,
            halted: false,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Hand every closed accounting period to `reporter`.
    pub fn with_reporter(mut self, reporter: Box<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Run one time step.
    ///
    /// # Errors
    ///
    /// Returns [`StepError`] if the forcing fails or population state goes
    /// inconsistent. The simulation is then halted.
    pub fn step(&mut self) -> Result<StepReport, StepError> {
        if self.halted {
            return Err(StepError::Halted);
        }
        let result = self.run_step();
        if let Err(e) = &result {
            log::error!("step {} failed: {e}", self.time);
            self.halted = true;
        }
        result
    }

    /// Run `years` whole years from the current time.
    pub fn run_years(&mut self, years: u32) -> Result<(), StepError> {
        let steps = u64::from(years) * u64::from(self.config.steps_per_year);
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    fn run_step(&mut self) -> Result<StepReport, StepError> {
        let step_start = Instant::now();
        let time = self.time;
        let spy = self.config.steps_per_year;
        let dt = time.step as usize;
        let mut metrics = StepMetrics::default();

        // 1. Counters and stages.
        let t = Instant::now();
        for sp in &mut self.species {
            sp.reset_deaths();
            sp.update_stages();
        }

        // 2. Placement. The initial placement stands for the first step.
        if self.steps_taken > 0 {
            for sp in &mut self.species {
                self.distribution
                    .distribute(sp, &self.grid, dt, false, &mut self.rng);
            }
        }
        rebuild_occupancy(&mut self.occupancy, &self.species);
        metrics.distribution_us = elapsed_us(t);

        // 3. Additional mortality.
        let t = Instant::now();
        let mut natural = 0;
        for sp in &mut self.species {
            natural += additional_mortality(sp, dt);
        }
        metrics.mortality_us = elapsed_us(t);

        // 4. Forcing.
        let t = Instant::now();
        self.forcing.advance(time)?;

        // 5. Predation over length-sorted cells.
        {
            let species = &self.species;
            self.occupancy
                .sort_each_by(|h| species[h.species.index()].school(h.cohort(), h.slot()).length());
        }
        let (diet, plankton_eaten) = self.indicators.diet_buffers();
        let summary = PredationPass {
            accessibility: &self.accessibility,
            occupancy: &self.occupancy,
            forcing: self.forcing.as_mut(),
            diet,
            plankton_eaten,
            steps_per_year: spy,
        }
        .run(&mut self.species, &mut self.rng);
        metrics.predators = summary.predators;
        metrics.predation_us = elapsed_us(t);

        // 6. Starvation and cleanup.
        let t = Instant::now();
        let mut starved = 0;
        for sp in &mut self.species {
            starved += starvation(sp);
            sp.purge();
        }
        rebuild_occupancy(&mut self.occupancy, &self.species);
        metrics.mortality_us += elapsed_us(t);

        // 7. Growth.
        let t = Instant::now();
        for sp in &mut self.species {
            grow(sp);
            sp.refresh();
        }
        metrics.growth_us = elapsed_us(t);

        // 8. Fishing.
        let t = Instant::now();
        let year = time.year;
        let protected = self.mpa.as_ref().map_or(0.0, |m| m.fraction_at(year));
        let mut landed = 0.0;
        for sp in &mut self.species {
            update_catchability(sp, self.mpa.as_ref(), year);
            let season = sp.params().fishing_fraction(dt, spy);
            let record = fish(sp, self.config.fishing_mode, season, protected);
            landed += record.biomass;
            self.indicators.record_catch(sp.id(), &record);
            sp.purge();
        }
        rebuild_occupancy(&mut self.occupancy, &self.species);
        metrics.fishing_us = elapsed_us(t);
        self.note_extinctions();

        // 9. Indicators.
        let t = Instant::now();
        self.indicators.accumulate(time, &self.species);
        metrics.indicators_us = elapsed_us(t);

        // 10. Reproduction and ageing.
        let t = Instant::now();
        let mut recruits = 0u64;
        for sp in &mut self.species {
            let outcome = reproduce(sp, dt, self.config.schools_per_cohort as usize);
            self.indicators.record_recruits(sp.id(), outcome.recruits);
            recruits = recruits.saturating_add(outcome.recruits);
            metrics.senescent_schools += outcome.senescent_schools;
        }
        rebuild_occupancy(&mut self.occupancy, &self.species);
        metrics.reproduction_us = elapsed_us(t);

        // 11. Checks, period close, clock.
        self.check_invariants()?;
        let t = Instant::now();
        let period = self.indicators.end_step(time, spy);
        if let (Some(snapshot), Some(reporter)) = (&period, self.reporter.as_mut()) {
            reporter.report(snapshot);
        }
        metrics.indicators_us += elapsed_us(t);

        metrics.schools = self
            .species
            .iter()
            .map(|sp| sp.cohorts().iter().map(|c| c.len()).sum::<usize>())
            .sum();
        metrics.total_us = elapsed_us(step_start);

        log::debug!(
            "{time}: {natural} natural deaths, {} predators, {starved} starved, \
             {landed:.3} t landed, {recruits} recruits, {} schools",
            summary.predators,
            metrics.schools
        );
        if time.is_year_end(spy) {
            log::info!(
                "year {} done: {} individuals, {:.1} t",
                time.year,
                self.species.iter().map(Species::abundance).sum::<u64>(),
                self.species.iter().map(Species::biomass).sum::<f64>()
            );
        }

        self.time = time.next(spy);
        self.steps_taken += 1;
        self.last_metrics = metrics.clone();
        Ok(StepReport {
            time,
            metrics,
            period,
        })
    }

    fn note_extinctions(&mut self) {
        for (sp, extinct) in self.species.iter().zip(&mut self.extinct) {
            let gone = sp.abundance() == 0;
            if gone && !*extinct {
                log::warn!("species {} went extinct at {}", sp.name(), self.time);
            }
            *extinct = gone;
        }
    }

    fn check_invariants(&self) -> Result<(), StepError> {
        let mut located = 0;
        for sp in &self.species {
            let fail = |reason: String| StepError::InvariantViolation {
                species: sp.id(),
                reason,
            };
            let mut total = 0u64;
            for cohort in sp.cohorts() {
                let mut n = 0u64;
                for s in cohort.schools().iter().filter(|s| !s.disappears()) {
                    n += s.abundance();
                    let expected = biomass_of(s.abundance(), s.weight());
                    if (s.biomass() - expected).abs() > 1e-9 * expected.max(1.0) {
                        return Err(fail(format!(
                            "cohort {}: school biomass {} for {} fish of {} g",
                            cohort.age(),
                            s.biomass(),
                            s.abundance(),
                            s.weight()
                        )));
                    }
                    if let Some(cell) = s.cell() {
                        if !self.grid.is_ocean(cell) {
                            return Err(fail(format!("school placed on land cell {cell}")));
                        }
                        located += 1;
                    }
                }
                if n != cohort.abundance() {
                    return Err(fail(format!(
                        "cohort {} caches {} individuals, its schools hold {n}",
                        cohort.age(),
                        cohort.abundance()
                    )));
                }
                total += n;
            }
            if total != sp.abundance() {
                return Err(fail(format!(
                    "species caches {} individuals, its cohorts hold {total}",
                    sp.abundance()
                )));
            }
        }
        let registered = self.occupancy.total();
        if located != registered {
            return Err(StepError::OccupancyMismatch {
                located,
                registered,
            });
        }
        Ok(())
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// Time of the next step to run.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Steps run so far.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The ocean grid.
    pub fn grid(&self) -> &OceanGrid {
        &self.grid
    }

    /// All species in id order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Species named `name`.
    pub fn species_by_name(&self, name: &str) -> Option<&Species> {
        self.names.get(name).map(|id| &self.species[id.index()])
    }

    /// Schools registered per cell.
    pub fn occupancy(&self) -> &CellOccupancy<SchoolHandle> {
        &self.occupancy
    }

    /// Placement state.
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// The plankton forcing.
    pub fn forcing(&self) -> &dyn LtlForcing {
        self.forcing.as_ref()
    }

    /// Metrics of the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Whether a failed step halted the simulation.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// FNV-1a hash of every school's state.
    pub fn state_hash(&self) -> u64 {
        population_hash(&self.species)
    }
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("time", &self.time)
            .field("species", &self.species.len())
            .field("schools", &self.occupancy.total())
            .field("halted", &self.halted)
            .finish_non_exhaustive()
    }
}

/// Clear `occupancy` and register every live, located school.
fn rebuild_occupancy(occupancy: &mut CellOccupancy<SchoolHandle>, species: &[Species]) {
    occupancy.clear();
    for sp in species {
        for cohort in sp.cohorts() {
            for (slot, s) in cohort.schools().iter().enumerate() {
                if s.disappears() {
                    continue;
                }
                if let Some(cell) = s.cell() {
                    occupancy.insert(cell, SchoolHandle::new(sp.id(), cohort.age(), slot));
                }
            }
        }
    }
}

fn elapsed_us(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX)
}
