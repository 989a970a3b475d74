//! Spatial data structures for Shoal simulations.
//!
//! - [`OceanGrid`]: fixed 2D mesh of cells with a land mask, geographic
//!   positions and an 8-connected, edge-clipped neighbourhood
//! - [`CellOccupancy`]: per-cell lists of the schools currently present
//! - [`random_patch`]: connected patch of ocean cells found by random flood fill
//! - [`PresenceMap`]: per-cell presence probabilities with rejection sampling
//! - [`MarineProtectedArea`]: protected cells plus an active window in years

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod map;
pub mod mpa;
pub mod occupancy;
pub mod patch;

pub use error::SpaceError;
pub use grid::{GeoExtent, OceanGrid};
pub use map::PresenceMap;
pub use mpa::MarineProtectedArea;
pub use occupancy::CellOccupancy;
pub use patch::{random_ocean_cell, random_patch};
