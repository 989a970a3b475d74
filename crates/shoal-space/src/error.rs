//! Error types for grid construction and spatial setup.

use shoal_core::CellId;
use std::fmt;

/// Errors arising from grid construction or spatial setup utilities.
#[derive(Clone, Debug, PartialEq)]
pub enum SpaceError {
    /// Attempted to construct a grid with zero cells.
    EmptyGrid,
    /// `rows * cols` does not fit a [`CellId`].
    DimensionTooLarge {
        /// Requested rows.
        rows: u32,
        /// Requested columns.
        cols: u32,
    },
    /// The land mask length differs from `rows * cols`.
    MaskLength {
        /// Expected mask length.
        expected: usize,
        /// Supplied mask length.
        got: usize,
    },
    /// Every cell of the grid is land.
    NoOceanCells,
    /// A `(row, col)` pair is outside the grid.
    CoordOutOfBounds {
        /// Requested row.
        row: u32,
        /// Requested column.
        col: u32,
        /// Grid rows.
        rows: u32,
        /// Grid columns.
        cols: u32,
    },
    /// A cell id is outside the grid.
    CellOutOfBounds {
        /// The offending cell.
        cell: CellId,
        /// Number of cells in the grid.
        cells: usize,
    },
    /// A land cell was used where an ocean cell is required.
    LandCell {
        /// The offending cell.
        cell: CellId,
    },
    /// A patch size of zero was requested.
    EmptyPatch,
    /// No connected ocean region is large enough for the requested patch.
    PatchUnreachable {
        /// Requested patch size.
        requested: usize,
        /// Largest connected patch found.
        largest: usize,
    },
    /// A presence probability is negative or not finite.
    InvalidProbability {
        /// Cell carrying the value.
        cell: CellId,
        /// The rejected value.
        value: f64,
    },
    /// A presence map has no cell with positive probability.
    EmptyMap,
    /// A year window whose end precedes its start.
    InvalidWindow {
        /// First active year.
        start: u32,
        /// First inactive year.
        end: u32,
    },
}

impl fmt::Display for SpaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { rows, cols } => {
                write!(f, "grid of {rows}x{cols} cells is too large")
            }
            Self::MaskLength { expected, got } => {
                write!(f, "land mask has {got} entries, expected {expected}")
            }
            Self::NoOceanCells => write!(f, "grid has no ocean cell"),
            Self::CoordOutOfBounds {
                row,
                col,
                rows,
                cols,
            } => write!(f, "cell ({row}, {col}) outside {rows}x{cols} grid"),
            Self::CellOutOfBounds { cell, cells } => {
                write!(f, "cell {cell} outside grid of {cells} cells")
            }
            Self::LandCell { cell } => write!(f, "cell {cell} is land"),
            Self::EmptyPatch => write!(f, "patch size must be at least 1"),
            Self::PatchUnreachable { requested, largest } => write!(
                f,
                "no connected ocean patch of {requested} cells (largest found: {largest})"
            ),
            Self::InvalidProbability { cell, value } => {
                write!(f, "invalid presence probability {value} in cell {cell}")
            }
            Self::EmptyMap => write!(f, "presence map has no cell with positive probability"),
            Self::InvalidWindow { start, end } => {
                write!(f, "year window [{start}, {end}) ends before it starts")
            }
        }
    }
}

impl std::error::Error for SpaceError {}
