//! Shoal: a school-based, multi-species marine ecosystem simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Shoal sub-crates. For most users, adding `shoal` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use shoal::prelude::*;
//! use shoal::forcing::{ConstantForcing, PlanktonGroup};
//!
//! // A 6×6 all-ocean grid with one plankton group.
//! let grid = OceanGrid::all_ocean(6, 6).unwrap();
//! let phyto = PlanktonGroup {
//!     name: "phyto".into(),
//!     size_min: 0.0002,
//!     size_max: 0.02,
//!     trophic_level: 1.0,
//!     accessibility_coefficient: 0.5,
//! };
//! let forcing = ConstantForcing::uniform(vec![phyto], grid.cell_count(), 50.0).unwrap();
//!
//! // One species on a random patch of 10 cells.
//! let config = SimulationConfig {
//!     seed: 42,
//!     steps_per_year: 12,
//!     schools_per_cohort: 5,
//!     distribution: DistributionConfig::Random { patch_sizes: vec![10] },
//!     species: vec![SpeciesParams {
//!         name: "anchovy".into(),
//!         longevity: 3.0,
//!         pred_prey_size_ratio_max: vec![5000.0],
//!         pred_prey_size_ratio_min: vec![3.5],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config, grid, Box::new(forcing)).unwrap();
//! sim.run_years(1).unwrap();
//! assert_eq!(sim.time(), SimTime::new(1, 0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `shoal-core` | IDs, simulation time, snapshots, collaborator traits |
//! | [`space`] | `shoal-space` | Ocean grid, presence maps, patches, MPAs, occupancy |
//! | [`forcing`] | `shoal-forcing` | Plankton forcing variants |
//! | [`engine`] | `shoal-engine` | Species, cohorts, processes and the simulation driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`shoal-core`).
///
/// Contains the identifiers, [`types::SimTime`], the indicator snapshots
/// and the two collaborator traits ([`types::LtlForcing`],
/// [`types::Reporter`]).
pub use shoal_core as types;

/// Ocean grid and spatial helpers (`shoal-space`).
///
/// Provides [`space::OceanGrid`], [`space::PresenceMap`],
/// [`space::MarineProtectedArea`] and [`space::CellOccupancy`].
pub use shoal_space as space;

/// Plankton forcing (`shoal-forcing`).
///
/// [`forcing::ConstantForcing`] and [`forcing::SeasonalForcing`], or
/// [`forcing::Forcing`] to pick one from configuration.
pub use shoal_forcing as forcing;

/// Population dynamics engine (`shoal-engine`).
///
/// [`engine::Simulation`] owns a run; [`engine::SimulationConfig`]
/// describes it.
pub use shoal_engine as engine;

/// Common imports for typical Shoal usage.
///
/// ```rust
/// use shoal::prelude::*;
/// ```
///
/// This imports the most frequently used types: the simulation and its
/// configuration, the grid, core IDs and the collaborator traits.
pub mod prelude {
    // Core types and traits
    pub use shoal_core::{
        CellId, LtlForcing, PeriodSnapshot, PlanktonGroupId, Reporter, SimTime, SpeciesId,
        SpeciesIndicators,
    };

    // Errors
    pub use shoal_core::ForcingError;
    pub use shoal_engine::{ConfigError, StepError};
    pub use shoal_space::SpaceError;

    // Space
    pub use shoal_space::OceanGrid;

    // Engine
    pub use shoal_engine::{
        AccessibilityConfig, DistributionConfig, FishingMode, InitialStock, MpaConfig,
        Simulation, SimulationConfig, SpeciesParams, StepMetrics, StepReport,
    };
}
