//! Error types shared across crates.

use std::error::Error;
use std::fmt;

use crate::id::PlanktonGroupId;

/// Errors raised by an [`LtlForcing`](crate::LtlForcing) collaborator.
///
/// Construction-time variants surface as configuration errors; a failure
/// in [`advance`](crate::LtlForcing::advance) halts the running simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum ForcingError {
    /// A plankton group id is outside the configured groups.
    UnknownGroup {
        /// The offending group.
        group: PlanktonGroupId,
    },
    /// The number of biomass fields differs from the number of groups.
    GroupCount {
        /// Configured groups.
        expected: usize,
        /// Fields supplied.
        got: usize,
    },
    /// A biomass field has the wrong number of cells.
    FieldLength {
        /// Group owning the field.
        group: PlanktonGroupId,
        /// Expected number of values.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },
    /// A group's size range is empty, inverted or not finite.
    InvalidSizeRange {
        /// Group with the bad range.
        group: PlanktonGroupId,
        /// Lower bound (cm).
        min: f64,
        /// Upper bound (cm).
        max: f64,
    },
    /// A biomass value or coefficient is negative or not finite.
    InvalidValue {
        /// Group with the bad value.
        group: PlanktonGroupId,
        /// Which quantity was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// No forcing data exists for the requested step of the year.
    MissingStep {
        /// Requested step of the year.
        step: u32,
        /// Number of steps the forcing provides.
        available: u32,
    },
}

impl fmt::Display for ForcingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroup { group } => write!(f, "unknown plankton group {group}"),
            Self::GroupCount { expected, got } => {
                write!(f, "{got} biomass fields supplied for {expected} plankton groups")
            }
            Self::FieldLength {
                group,
                expected,
                got,
            } => write!(
                f,
                "plankton group {group}: field has {got} values, expected {expected}"
            ),
            Self::InvalidSizeRange { group, min, max } => {
                write!(f, "plankton group {group}: invalid size range [{min}, {max}]")
            }
            Self::InvalidValue { group, what, value } => {
                write!(f, "plankton group {group}: invalid {what} {value}")
            }
            Self::MissingStep { step, available } => {
                write!(f, "no forcing for step {step} ({available} steps available)")
            }
        }
    }
}

impl Error for ForcingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_group() {
        let e = ForcingError::FieldLength {
            group: PlanktonGroupId(2),
            expected: 25,
            got: 24,
        };
        assert_eq!(
            e.to_string(),
            "plankton group 2: field has 24 values, expected 25"
        );
    }
}
