//! Core types and traits for the Shoal ecosystem simulator.
//!
//! This is the leaf crate of the workspace. It defines the identifiers
//! shared by every other crate, the simulation clock, the two collaborator
//! traits the engine talks to ([`LtlForcing`] and [`Reporter`]) and the
//! plain numeric snapshots handed to reporters once per accounting period.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod snapshot;
pub mod traits;

pub use error::ForcingError;
pub use id::{CellId, MapId, PlanktonGroupId, SimTime, SpeciesId};
pub use snapshot::{DietMatrix, DietPrey, PeriodSnapshot, SpeciesIndicators};
pub use traits::{LtlForcing, Reporter};
