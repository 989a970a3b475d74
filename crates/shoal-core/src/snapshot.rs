//! Plain numeric snapshots handed to a [`Reporter`](crate::Reporter).

use serde::{Deserialize, Serialize};

use crate::id::{PlanktonGroupId, SimTime, SpeciesId};

// ── SpeciesIndicators ─────────────────────────────────────────────

/// Aggregated indicators for one species over one accounting period.
///
/// State indicators (abundance, biomass, mean length, trophic levels) are
/// averaged over the steps of the period. Flow indicators (catches, deaths)
/// are summed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesIndicators {
    /// Species id.
    pub species: SpeciesId,
    /// Species name.
    pub name: String,
    /// Mean abundance over all cohorts (individuals).
    pub abundance: f64,
    /// Mean biomass over all cohorts (tons).
    pub biomass: f64,
    /// Mean abundance excluding cohorts younger than the age-class-zero age.
    pub abundance_no_age_zero: f64,
    /// Mean biomass excluding cohorts younger than the age-class-zero age.
    pub biomass_no_age_zero: f64,
    /// Total landed biomass (tons).
    pub catch_biomass: f64,
    /// Total landed individuals.
    pub catch_count: f64,
    /// Abundance-weighted mean length of landed individuals (cm).
    pub catch_mean_length: f64,
    /// Biomass-weighted mean trophic level of landed individuals.
    pub catch_mean_trophic_level: f64,
    /// Abundance-weighted mean length (cm), age-class-zero excluded.
    pub mean_length: f64,
    /// Biomass-weighted mean trophic level, age-class-zero excluded.
    pub mean_trophic_level: f64,
    /// Biomass-weighted mean trophic level per year of age.
    pub trophic_level_by_age: Vec<f64>,
    /// Individuals removed by predation.
    pub dead_predation: u64,
    /// Individuals removed by starvation.
    pub dead_starvation: u64,
    /// Individuals removed by additional (natural) mortality.
    pub dead_additional: u64,
    /// Individuals removed by fishing.
    pub dead_fishing: u64,
    /// Eggs spawned (or individuals recruited by incoming flux).
    pub recruits: u64,
}

// ── DietMatrix ────────────────────────────────────────────────────

/// A prey column of a [`DietMatrix`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietPrey {
    /// A fish species at one of its diet stages.
    Fish {
        /// Prey species.
        species: SpeciesId,
        /// Diet stage of the prey.
        stage: usize,
    },
    /// A plankton group.
    Plankton(PlanktonGroupId),
}

/// Dense predator × prey matrix keyed by species diet stages.
///
/// Rows are `(predator species, predator diet stage)`. Columns are every
/// `(prey species, prey diet stage)` followed by one column per plankton
/// group.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DietMatrix {
    stage_offsets: Vec<usize>,
    plankton_groups: usize,
    values: Vec<f64>,
}

impl DietMatrix {
    /// Build a zeroed matrix for species with `stages[s]` diet stages each.
    pub fn new(stages: &[usize], plankton_groups: usize) -> Self {
        let mut stage_offsets = Vec::with_capacity(stages.len() + 1);
        let mut acc = 0;
        stage_offsets.push(0);
        for &n in stages {
            acc += n;
            stage_offsets.push(acc);
        }
        let n = acc * (acc + plankton_groups);
        Self {
            stage_offsets,
            plankton_groups,
            values: vec![0.0; n],
        }
    }

    fn fish_rows(&self) -> usize {
        self.stage_offsets.last().copied().unwrap_or(0)
    }

    fn cols(&self) -> usize {
        self.fish_rows() + self.plankton_groups
    }

    fn row(&self, predator: SpeciesId, stage: usize) -> usize {
        let start = self.stage_offsets[predator.index()];
        debug_assert!(start + stage < self.stage_offsets[predator.index() + 1]);
        start + stage
    }

    fn col(&self, prey: DietPrey) -> usize {
        match prey {
            DietPrey::Fish { species, stage } => self.stage_offsets[species.index()] + stage,
            DietPrey::Plankton(g) => self.fish_rows() + g.index(),
        }
    }

    /// Number of species rows.
    pub fn species_count(&self) -> usize {
        self.stage_offsets.len().saturating_sub(1)
    }

    /// Number of diet stages of `species`.
    pub fn stage_count(&self, species: SpeciesId) -> usize {
        self.stage_offsets[species.index() + 1] - self.stage_offsets[species.index()]
    }

    /// Add `value` to the `(predator, stage) × prey` entry.
    pub fn add(&mut self, predator: SpeciesId, stage: usize, prey: DietPrey, value: f64) {
        let idx = self.row(predator, stage) * self.cols() + self.col(prey);
        self.values[idx] += value;
    }

    /// Read the `(predator, stage) × prey` entry.
    pub fn get(&self, predator: SpeciesId, stage: usize, prey: DietPrey) -> f64 {
        self.values[self.row(predator, stage) * self.cols() + self.col(prey)]
    }

    /// Sum of a predator row.
    pub fn predator_total(&self, predator: SpeciesId, stage: usize) -> f64 {
        let cols = self.cols();
        let start = self.row(predator, stage) * cols;
        self.values[start..start + cols].iter().sum()
    }

    /// Sum of a prey column.
    pub fn prey_total(&self, prey: DietPrey) -> f64 {
        let cols = self.cols();
        let c = self.col(prey);
        (0..self.fish_rows()).map(|r| self.values[r * cols + c]).sum()
    }

    /// Sum of every entry.
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Copy of the matrix with every non-empty row scaled to sum to one.
    pub fn row_normalized(&self) -> Self {
        let mut out = self.clone();
        let cols = self.cols();
        if cols == 0 {
            return out;
        }
        for row in out.values.chunks_mut(cols) {
            let total: f64 = row.iter().sum();
            if total > 0.0 {
                row.iter_mut().for_each(|v| *v /= total);
            }
        }
        out
    }

    /// Reset every entry to zero.
    pub fn clear(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.0);
    }
}

// ── PeriodSnapshot ────────────────────────────────────────────────

/// Everything a reporter receives at the end of an accounting period.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    /// First step of the period.
    pub start: SimTime,
    /// Last step of the period (inclusive).
    pub end: SimTime,
    /// Number of steps accumulated.
    pub steps: u32,
    /// Per-species indicators, in species order.
    pub species: Vec<SpeciesIndicators>,
    /// Biomass (tons) eaten per predator stage and prey.
    pub predation_pressure: DietMatrix,
    /// Share of each prey in the biomass eaten by each predator stage.
    pub diet_composition: DietMatrix,
    /// Biomass (tons) of each plankton group eaten by fish.
    pub plankton_consumed: Vec<f64>,
}
