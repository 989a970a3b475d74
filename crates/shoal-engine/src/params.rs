//! Per-species life-history parameters.
//!
//! Rates are per year unless stated otherwise; ages are in years and
//! converted to steps with `round(age * steps_per_year)`. Lengths are in
//! cm, weights in g, biomasses in tons.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Whether a stage threshold list compares against length or age.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageMetric {
    /// Thresholds are lengths (cm).
    #[default]
    Length,
    /// Thresholds are ages (years).
    Age,
}

/// Recruitment from outside the modelled area, replacing local spawning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IncomingFlux {
    /// Biomass entering per year (tons), split over the year by the
    /// seasonal spawning fractions.
    pub biomass_per_year: f64,
    /// Length of incoming individuals (cm).
    pub mean_length: f64,
    /// Age of incoming individuals (years).
    pub mean_age: f64,
}

/// Part of a cohort leaving the modelled area during some steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Migration {
    /// First age concerned (years, inclusive).
    pub first_age: f64,
    /// Last age concerned (years, exclusive).
    pub last_age: f64,
    /// Steps of the year during which the rule applies.
    pub steps: Vec<u32>,
    /// Fraction of the cohort's schools outside the area, in `[0, 1]`.
    pub fraction_out: f64,
    /// Additional mortality rate while outside (per year).
    pub mortality: f64,
}

/// How a species' cohorts are filled at the start of the run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialStock {
    /// Build an exponential age structure matching a target biomass (tons)
    /// of cohorts at or above the age-class-zero age.
    Biomass(f64),
    /// Explicit abundance per cohort; missing cohorts start empty.
    CohortAbundance(Vec<u64>),
}

impl Default for InitialStock {
    fn default() -> Self {
        Self::Biomass(10_000.0)
    }
}

/// Every scalar and vector describing one species.
///
/// Seasonal vectors hold one fraction per step of the year. An empty
/// seasonal vector means an even split (`1 / steps_per_year` each step).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesParams {
    /// Species name, unique within a configuration.
    pub name: String,
    /// Maximum age (years).
    pub longevity: f64,
    /// Von Bertalanffy asymptotic length (cm).
    pub l_inf: f64,
    /// Von Bertalanffy growth coefficient (per year).
    pub k: f64,
    /// Von Bertalanffy theoretical age at length zero (years).
    pub t0: f64,
    /// Length-weight condition factor `c` in `W = c * L^b`.
    pub condition_factor: f64,
    /// Length-weight allometric power `b` in `W = c * L^b`.
    pub allometric_power: f64,
    /// Age below which growth is linear from egg size (years).
    pub growth_age_threshold: f64,
    /// Length at sexual maturity (cm).
    pub maturity_size: f64,
    /// Egg length (cm).
    pub egg_size: f64,
    /// Egg weight (g); also the floor for any individual weight.
    pub egg_weight: f64,
    /// Trophic level of eggs and newly hatched larvae.
    pub egg_trophic_level: f64,
    /// Additional (natural) mortality rate `D`.
    pub additional_mortality: f64,
    /// Mortality rate of age-0 cohorts, per step.
    pub larval_mortality: f64,
    /// Fishing mortality rate `F`.
    pub fishing_mortality: f64,
    /// Per-cohort `F`, used by per-cohort fishing; empty means `F` everywhere.
    pub cohort_fishing_mortality: Vec<f64>,
    /// Age at which cohorts become exploitable (years).
    pub recruitment_age: f64,
    /// Seasonal distribution of fishing effort.
    pub seasonal_fishing: Vec<f64>,
    /// Maximum biomass eaten per unit of predator biomass per year.
    pub predation_rate: f64,
    /// Predation success below which starvation starts, in `(0, 1)`.
    pub critical_predation_success: f64,
    /// Starvation mortality rate at zero predation success.
    pub max_starvation_rate: f64,
    /// Lengths (cm) separating feeding stages, ascending.
    pub feeding_stage_thresholds: Vec<f64>,
    /// Largest predator:prey length ratio per feeding stage.
    pub pred_prey_size_ratio_max: Vec<f64>,
    /// Smallest predator:prey length ratio per feeding stage.
    pub pred_prey_size_ratio_min: Vec<f64>,
    /// Ages (years) separating accessibility stages, ascending.
    pub accessibility_stage_thresholds: Vec<f64>,
    /// Values separating diet stages, ascending.
    pub diet_stage_thresholds: Vec<f64>,
    /// Whether diet thresholds are lengths or ages.
    pub diet_stage_metric: StageMetric,
    /// Share of females in the spawning stock.
    pub sex_ratio: f64,
    /// Eggs per gram of mature female per year.
    pub fecundity: f64,
    /// Seasonal distribution of spawning (or incoming flux).
    pub seasonal_spawning: Vec<f64>,
    /// Recruitment from outside the area instead of local spawning.
    pub incoming_flux: Option<IncomingFlux>,
    /// Age (years) below which cohorts are left out of indicators.
    pub age_class_zero: f64,
    /// Out-of-zone rules.
    pub migrations: Vec<Migration>,
    /// Initial age structure.
    pub initial_stock: InitialStock,
}

impl Default for SpeciesParams {
    fn default() -> Self {
        Self {
            name: "species".into(),
            longevity: 4.0,
            l_inf: 19.5,
            k: 0.45,
            t0: -0.35,
            condition_factor: 0.0062,
            allometric_power: 3.14,
            growth_age_threshold: 1.0,
            maturity_size: 12.0,
            egg_size: 0.1,
            egg_weight: 0.000_538_6,
            egg_trophic_level: 3.0,
            additional_mortality: 0.3,
            larval_mortality: 0.5,
            fishing_mortality: 0.3,
            cohort_fishing_mortality: Vec::new(),
            recruitment_age: 1.0,
            seasonal_fishing: Vec::new(),
            predation_rate: 3.5,
            critical_predation_success: 0.57,
            max_starvation_rate: 0.3,
            feeding_stage_thresholds: Vec::new(),
            pred_prey_size_ratio_max: vec![100.0],
            pred_prey_size_ratio_min: vec![3.5],
            accessibility_stage_thresholds: Vec::new(),
            diet_stage_thresholds: Vec::new(),
            diet_stage_metric: StageMetric::Length,
            sex_ratio: 0.5,
            fecundity: 600.0,
            seasonal_spawning: Vec::new(),
            incoming_flux: None,
            age_class_zero: 1.0,
            migrations: Vec::new(),
            initial_stock: InitialStock::default(),
        }
    }
}

/// Convert an age in years to a whole number of steps.
pub fn years_to_steps(years: f64, steps_per_year: u32) -> usize {
    (years * f64::from(steps_per_year)).round().max(0.0) as usize
}

impl SpeciesParams {
    /// Number of cohorts: `round(longevity * steps_per_year)`, at least 1.
    pub fn cohort_count(&self, steps_per_year: u32) -> usize {
        years_to_steps(self.longevity, steps_per_year).max(1)
    }

    /// Weight (g) of an individual of `length` cm, floored at egg weight.
    pub fn weight_at(&self, length: f64) -> f64 {
        (self.condition_factor * length.powf(self.allometric_power)).max(self.egg_weight)
    }

    /// Seasonal spawning fraction for step `dt`.
    pub fn spawning_fraction(&self, dt: usize, steps_per_year: u32) -> f64 {
        seasonal(&self.seasonal_spawning, dt, steps_per_year)
    }

    /// Seasonal fishing fraction for step `dt`.
    pub fn fishing_fraction(&self, dt: usize, steps_per_year: u32) -> f64 {
        seasonal(&self.seasonal_fishing, dt, steps_per_year)
    }

    /// Fishing rate of cohort `age` under per-cohort fishing.
    pub fn cohort_fishing_rate(&self, age: usize) -> f64 {
        self.cohort_fishing_mortality
            .get(age)
            .copied()
            .unwrap_or(self.fishing_mortality)
    }

    /// Number of feeding stages.
    pub fn feeding_stage_count(&self) -> usize {
        self.feeding_stage_thresholds.len() + 1
    }

    /// Number of accessibility stages.
    pub fn accessibility_stage_count(&self) -> usize {
        self.accessibility_stage_thresholds.len() + 1
    }

    /// Number of diet stages.
    pub fn diet_stage_count(&self) -> usize {
        self.diet_stage_thresholds.len() + 1
    }

    /// Check numeric ranges and vector lengths.
    pub fn validate(&self, steps_per_year: u32) -> Result<(), ConfigError> {
        let bad = |reason: String| ConfigError::InvalidSpecies {
            species: self.name.clone(),
            reason,
        };
        let positive = [
            ("longevity", self.longevity),
            ("l_inf", self.l_inf),
            ("k", self.k),
            ("condition_factor", self.condition_factor),
            ("allometric_power", self.allometric_power),
            ("growth_age_threshold", self.growth_age_threshold),
            ("egg_size", self.egg_size),
            ("egg_weight", self.egg_weight),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(bad(format!("{name} must be positive, got {v}")));
            }
        }
        let non_negative = [
            ("additional_mortality", self.additional_mortality),
            ("larval_mortality", self.larval_mortality),
            ("fishing_mortality", self.fishing_mortality),
            ("recruitment_age", self.recruitment_age),
            ("predation_rate", self.predation_rate),
            ("max_starvation_rate", self.max_starvation_rate),
            ("maturity_size", self.maturity_size),
            ("fecundity", self.fecundity),
            ("age_class_zero", self.age_class_zero),
            ("egg_trophic_level", self.egg_trophic_level),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(bad(format!("{name} must be non-negative, got {v}")));
            }
        }
        if !self.t0.is_finite() {
            return Err(bad(format!("t0 must be finite, got {}", self.t0)));
        }
        if !(self.critical_predation_success > 0.0 && self.critical_predation_success < 1.0) {
            return Err(bad(format!(
                "critical_predation_success must be in (0, 1), got {}",
                self.critical_predation_success
            )));
        }
        if !(0.0..=1.0).contains(&self.sex_ratio) {
            return Err(bad(format!("sex_ratio must be in [0, 1], got {}", self.sex_ratio)));
        }
        if let Some(&f) = self
            .cohort_fishing_mortality
            .iter()
            .find(|f| !f.is_finite() || **f < 0.0)
        {
            return Err(bad(format!("cohort fishing mortality {f} is negative")));
        }

        let spy = steps_per_year as usize;
        for (name, v) in [
            ("seasonal_fishing", &self.seasonal_fishing),
            ("seasonal_spawning", &self.seasonal_spawning),
        ] {
            if !v.is_empty() && v.len() != spy {
                return Err(bad(format!(
                    "{name} has {} values, expected {spy}",
                    v.len()
                )));
            }
            if v.iter().any(|x| !x.is_finite() || *x < 0.0) {
                return Err(bad(format!("{name} has a negative value")));
            }
        }

        let stages = self.feeding_stage_count();
        if self.pred_prey_size_ratio_max.len() != stages
            || self.pred_prey_size_ratio_min.len() != stages
        {
            return Err(bad(format!(
                "size ratio vectors need {stages} values (one per feeding stage)"
            )));
        }
        for (max, min) in self
            .pred_prey_size_ratio_max
            .iter()
            .zip(&self.pred_prey_size_ratio_min)
        {
            if !(*min > 0.0 && max >= min) {
                return Err(bad(format!(
                    "predator:prey size ratios must satisfy 0 < min <= max, got [{min}, {max}]"
                )));
            }
        }
        for (name, t) in [
            ("feeding_stage_thresholds", &self.feeding_stage_thresholds),
            (
                "accessibility_stage_thresholds",
                &self.accessibility_stage_thresholds,
            ),
            ("diet_stage_thresholds", &self.diet_stage_thresholds),
        ] {
            if t.windows(2).any(|w| w[0] > w[1]) {
                return Err(bad(format!("{name} must be ascending")));
            }
        }

        if let Some(flux) = &self.incoming_flux {
            if !(flux.biomass_per_year >= 0.0 && flux.mean_length > 0.0 && flux.mean_age >= 0.0) {
                return Err(bad("incoming flux values must be non-negative".into()));
            }
            if years_to_steps(flux.mean_age, steps_per_year) >= self.cohort_count(steps_per_year) {
                return Err(bad(format!(
                    "incoming flux age {} exceeds longevity {}",
                    flux.mean_age, self.longevity
                )));
            }
        }

        for m in &self.migrations {
            if !(0.0..=1.0).contains(&m.fraction_out) || m.mortality < 0.0 {
                return Err(bad(
                    "migration fraction must be in [0, 1] and mortality non-negative".into(),
                ));
            }
            if m.last_age < m.first_age {
                return Err(bad("migration age range is inverted".into()));
            }
            if let Some(s) = m.steps.iter().find(|s| **s >= steps_per_year) {
                return Err(bad(format!("migration step {s} outside the year")));
            }
        }

        match &self.initial_stock {
            InitialStock::Biomass(b) if !b.is_finite() || *b < 0.0 => {
                Err(bad(format!("initial biomass must be non-negative, got {b}")))
            }
            InitialStock::CohortAbundance(a) if a.len() > self.cohort_count(steps_per_year) => {
                Err(bad(format!(
                    "{} initial cohort abundances for {} cohorts",
                    a.len(),
                    self.cohort_count(steps_per_year)
                )))
            }
            _ => Ok(()),
        }
    }
}

fn seasonal(values: &[f64], dt: usize, steps_per_year: u32) -> f64 {
    if values.is_empty() {
        1.0 / f64::from(steps_per_year)
    } else {
        values[dt]
    }
}
