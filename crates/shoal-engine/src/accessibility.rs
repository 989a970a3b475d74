//! Prey accessibility coefficients by predator and prey stage.

use serde::{Deserialize, Serialize};
use shoal_core::{PlanktonGroupId, SpeciesId};

use crate::config::ConfigError;
use crate::params::SpeciesParams;

/// How the accessibility matrix is supplied.
///
/// A table has one row per prey entry and one column per predator entry.
/// Prey rows list every species' accessibility stages in species order,
/// followed by one row per plankton group. Predator columns list every
/// species' accessibility stages in species order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityConfig {
    /// The same coefficient for every predator and prey pair.
    Uniform(f64),
    /// Explicit coefficients, `table[prey_row][predator_col]`.
    Table(Vec<Vec<f64>>),
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self::Uniform(0.8)
    }
}

/// Dense accessibility coefficients in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct AccessibilityMatrix {
    // First row/column of each species; the last entry is the total.
    offsets: Vec<usize>,
    plankton_groups: usize,
    values: Vec<f64>,
}

impl AccessibilityMatrix {
    /// Build the matrix for `species` and `plankton_groups` groups.
    pub fn build(
        config: &AccessibilityConfig,
        species: &[SpeciesParams],
        plankton_groups: usize,
    ) -> Result<Self, ConfigError> {
        let mut offsets = Vec::with_capacity(species.len() + 1);
        offsets.push(0);
        for p in species {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + p.accessibility_stage_count());
        }
        let cols = offsets[species.len()];
        let rows = cols + plankton_groups;

        let values = match config {
            AccessibilityConfig::Uniform(v) => {
                check_coefficient(*v, 0, 0)?;
                vec![*v; rows * cols]
            }
            AccessibilityConfig::Table(table) => {
                if table.len() != rows {
                    return Err(ConfigError::Accessibility {
                        reason: format!("{} prey rows, expected {rows}", table.len()),
                    });
                }
                let mut values = Vec::with_capacity(rows * cols);
                for (r, row) in table.iter().enumerate() {
                    if row.len() != cols {
                        return Err(ConfigError::Accessibility {
                            reason: format!(
                                "row {r} has {} predator columns, expected {cols}",
                                row.len()
                            ),
                        });
                    }
                    for (c, &v) in row.iter().enumerate() {
                        check_coefficient(v, r, c)?;
                        values.push(v);
                    }
                }
                values
            }
        };

        Ok(Self {
            offsets,
            plankton_groups,
            values,
        })
    }

    fn cols(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    fn column(&self, predator: SpeciesId, stage: usize) -> usize {
        self.offsets[predator.index()] + stage
    }

    /// Coefficient for a fish prey at `prey_stage` eaten by a predator at
    /// `pred_stage`.
    pub fn fish(
        &self,
        prey: SpeciesId,
        prey_stage: usize,
        predator: SpeciesId,
        pred_stage: usize,
    ) -> f64 {
        let row = self.offsets[prey.index()] + prey_stage;
        self.values[row * self.cols() + self.column(predator, pred_stage)]
    }

    /// Coefficient for plankton `group` eaten by a predator at `pred_stage`.
    pub fn plankton(&self, group: PlanktonGroupId, predator: SpeciesId, pred_stage: usize) -> f64 {
        let row = self.cols() + group.index();
        self.values[row * self.cols() + self.column(predator, pred_stage)]
    }

    /// Number of plankton rows.
    pub fn plankton_groups(&self) -> usize {
        self.plankton_groups
    }
}

fn check_coefficient(v: f64, row: usize, col: usize) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(ConfigError::Accessibility {
            reason: format!("coefficient {v} at [{row}][{col}] outside [0, 1]"),
        })
    }
}
