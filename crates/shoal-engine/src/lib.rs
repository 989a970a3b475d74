//! Population dynamics and trophic interaction engine for Shoal.
//!
//! Fish populations are modelled as [`Species`](species::Species), each
//! holding one [`Cohort`](cohort::Cohort) per age in steps, each holding
//! [`School`](school::School) super-individuals. Schools are placed on an
//! [`OceanGrid`](shoal_space::OceanGrid), eat each other and plankton from
//! an [`LtlForcing`](shoal_core::LtlForcing), die of natural causes,
//! starvation and fishing, grow and spawn.
//!
//! [`Simulation`](simulation::Simulation) owns the whole run state and
//! drives the per-step schedule; [`SimulationConfig`](config::SimulationConfig)
//! describes a run and is validated once at construction.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accessibility;
pub mod cohort;
pub mod config;
pub mod distribution;
pub mod fishing;
pub mod growth;
pub mod handle;
pub mod hash;
pub mod indicators;
pub mod init;
pub mod metrics;
pub mod mortality;
pub mod params;
pub mod predation;
pub mod reproduction;
pub mod school;
pub mod simulation;
pub mod species;

pub use accessibility::{AccessibilityConfig, AccessibilityMatrix};
pub use cohort::{Cohort, DeathCounters};
pub use config::{ConfigError, FishingMode, MpaConfig, SimulationConfig};
pub use distribution::{Distribution, DistributionConfig, MapConfig};
pub use fishing::CatchRecord;
pub use handle::SchoolHandle;
pub use metrics::StepMetrics;
pub use params::{IncomingFlux, InitialStock, Migration, SpeciesParams, StageMetric};
pub use school::School;
pub use simulation::{Simulation, StepError, StepReport};
pub use species::Species;
