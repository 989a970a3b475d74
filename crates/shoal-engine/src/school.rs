//! Schools: super-individuals of identical fish.

use shoal_core::CellId;

/// Biomass in tons of `abundance` individuals weighing `weight` grams.
#[inline]
pub fn biomass_of(abundance: u64, weight: f64) -> f64 {
    abundance as f64 * weight / 1e6
}

/// Stage indices derived from a school's length and age.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stages {
    /// Selects the predator:prey size ratios.
    pub feeding: usize,
    /// Selects accessibility matrix rows and columns.
    pub accessibility: usize,
    /// Selects diet matrix rows and columns.
    pub diet: usize,
}

/// Four most recent `(weight, trophic level)` samples used to smooth a
/// school's trophic level from step to step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrophicWindow {
    weights: [f64; 4],
    levels: [f64; 4],
    len: usize,
}

impl TrophicWindow {
    /// Add a sample, evicting the oldest once four are held.
    pub fn push(&mut self, weight: f64, level: f64) {
        self.weights.copy_within(0..3, 1);
        self.levels.copy_within(0..3, 1);
        self.weights[0] = weight;
        self.levels[0] = level;
        self.len = (self.len + 1).min(4);
    }

    /// Weighted mean of the held samples, `None` when the weights sum to zero.
    pub fn mean(&self) -> Option<f64> {
        let w: f64 = self.weights[..self.len].iter().sum();
        if w == 0.0 {
            return None;
        }
        let s: f64 = self.weights[..self.len]
            .iter()
            .zip(&self.levels[..self.len])
            .map(|(w, l)| w * l)
            .sum();
        Some(s / w)
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no sample is held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A group of identical individuals of one species and age.
///
/// Owned by exactly one [`Cohort`](crate::cohort::Cohort). Its location is
/// `cell`; the cell occupancy only holds handles derived from it. Biomass
/// is recomputed from abundance and weight after every mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct School {
    pub(crate) abundance: u64,
    pub(crate) length: f64,
    pub(crate) weight: f64,
    pub(crate) biomass: f64,
    pub(crate) trophic_level: Vec<f64>,
    pub(crate) window: TrophicWindow,
    pub(crate) cell: Option<CellId>,
    pub(crate) stages: Stages,
    pub(crate) predation_success: f64,
    pub(crate) disappears: bool,
    pub(crate) catchable: bool,
    pub(crate) out_of_zone: bool,
}

impl School {
    /// A new unlocated school with a flat trophic-level history.
    ///
    /// `ages` is the species' cohort count; `trophic_level` fills every age.
    pub fn new(abundance: u64, length: f64, weight: f64, ages: usize, trophic_level: f64) -> Self {
        Self {
            abundance,
            length,
            weight,
            biomass: biomass_of(abundance, weight),
            trophic_level: vec![trophic_level; ages],
            window: TrophicWindow::default(),
            cell: None,
            stages: Stages::default(),
            predation_success: 0.0,
            disappears: abundance == 0,
            catchable: true,
            out_of_zone: false,
        }
    }

    /// Number of individuals.
    pub fn abundance(&self) -> u64 {
        self.abundance
    }

    /// Length of each individual (cm).
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Weight of each individual (g).
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Total biomass (tons).
    pub fn biomass(&self) -> f64 {
        self.biomass
    }

    /// Trophic level reached at age index `age`.
    pub fn trophic_level(&self, age: usize) -> f64 {
        self.trophic_level[age]
    }

    /// Trophic-level history, one entry per age index.
    pub fn trophic_levels(&self) -> &[f64] {
        &self.trophic_level
    }

    /// Current cell, `None` when unlocated or out of zone.
    pub fn cell(&self) -> Option<CellId> {
        self.cell
    }

    /// Stage indices computed this step.
    pub fn stages(&self) -> Stages {
        self.stages
    }

    /// Share of this step's food demand that was met.
    pub fn predation_success(&self) -> f64 {
        self.predation_success
    }

    /// Whether the school is marked for removal.
    pub fn disappears(&self) -> bool {
        self.disappears
    }

    /// Whether fishing may remove individuals this step.
    pub fn catchable(&self) -> bool {
        self.catchable
    }

    /// Whether the school is outside the modelled area this step.
    pub fn out_of_zone(&self) -> bool {
        self.out_of_zone
    }

    /// Remove up to `n` individuals; returns how many were removed.
    ///
    /// A school emptied this way is marked to disappear.
    pub fn remove_individuals(&mut self, n: u64) -> u64 {
        let removed = n.min(self.abundance);
        self.abundance -= removed;
        self.biomass = biomass_of(self.abundance, self.weight);
        if self.abundance == 0 {
            self.disappears = true;
        }
        removed
    }

    /// Set length and weight together; biomass follows.
    pub(crate) fn set_size(&mut self, length: f64, weight: f64) {
        self.length = length;
        self.weight = weight;
        self.biomass = biomass_of(self.abundance, self.weight);
    }

    /// Place the school in `cell`, or unlocate it.
    pub(crate) fn set_cell(&mut self, cell: Option<CellId>) {
        self.cell = cell;
    }
}
