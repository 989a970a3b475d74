//! Spatial distribution: assigning every school a cell each step.
//!
//! Two modes are supported:
//!
//! - **Random**: each species draws one connected patch of ocean cells at
//!   setup. Unlocated schools land on a uniformly drawn patch cell; located
//!   schools walk to a patch cell among their current cell and its ocean
//!   neighbours.
//! - **Maps**: presence maps keyed by (species, age, step of year). Age-0
//!   schools and schools whose governing map changed since the previous
//!   step are resampled from the map; the others walk to a neighbouring
//!   cell of the same map.
//!
//! In both modes the cohort's out-of-zone share is decided first: schools
//! from slot `round(n * (1 - fraction_out))` onward leave the grid.

use rand::Rng;
use serde::{Deserialize, Serialize};
use shoal_core::{CellId, MapId};
use shoal_space::{random_patch, OceanGrid, PresenceMap};
use smallvec::SmallVec;

use crate::config::ConfigError;
use crate::params::{years_to_steps, SpeciesParams};
use crate::school::School;
use crate::species::Species;

// ── Configuration ──────────────────────────────────────────────────

/// One presence map and the (species, ages, steps) slots it governs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Species index.
    pub species: u32,
    /// First age covered (years, inclusive).
    pub first_age: f64,
    /// Last age covered (years, exclusive).
    pub last_age: f64,
    /// Steps of the year covered; empty means every step.
    pub steps: Vec<u32>,
    /// `(cell, probability)` entries.
    pub cells: Vec<(CellId, f64)>,
}

/// How schools are placed on the grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionConfig {
    /// One random connected patch per species.
    Random {
        /// Patch size in cells, one per species.
        patch_sizes: Vec<usize>,
    },
    /// Presence maps. Every (species, cohort, step) slot whose cohort is not
    /// entirely out of zone needs a map.
    Maps(Vec<MapConfig>),
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self::Random {
            patch_sizes: Vec::new(),
        }
    }
}

impl DistributionConfig {
    /// Check the settings against the grid and species.
    pub fn validate(
        &self,
        grid: &OceanGrid,
        species: &[SpeciesParams],
        steps_per_year: u32,
    ) -> Result<(), ConfigError> {
        match self {
            Self::Random { patch_sizes } => {
                if patch_sizes.len() != species.len() {
                    return Err(ConfigError::Distribution {
                        reason: format!(
                            "{} patch sizes for {} species",
                            patch_sizes.len(),
                            species.len()
                        ),
                    });
                }
                if let Some(i) = patch_sizes.iter().position(|&n| n == 0) {
                    return Err(ConfigError::Distribution {
                        reason: format!("patch size of species {i} is zero"),
                    });
                }
                Ok(())
            }
            Self::Maps(maps) => {
                for m in maps {
                    PresenceMap::new(grid, &m.cells)?;
                }
                map_index(maps, species, steps_per_year).map(|_| ())
            }
        }
    }
}

/// Build the per-species `[age * steps_per_year + step]` map index.
fn map_index(
    maps: &[MapConfig],
    species: &[SpeciesParams],
    steps_per_year: u32,
) -> Result<Vec<Vec<Option<MapId>>>, ConfigError> {
    let spy = steps_per_year as usize;
    let mut index: Vec<Vec<Option<MapId>>> = species
        .iter()
        .map(|p| vec![None; p.cohort_count(steps_per_year) * spy])
        .collect();

    for (id, m) in maps.iter().enumerate() {
        let slots = index
            .get_mut(m.species as usize)
            .ok_or_else(|| ConfigError::Distribution {
                reason: format!("map {id} refers to unknown species {}", m.species),
            })?;
        let cohorts = slots.len() / spy;
        let first = years_to_steps(m.first_age, steps_per_year);
        let last = years_to_steps(m.last_age, steps_per_year).min(cohorts);
        if let Some(s) = m.steps.iter().find(|s| **s >= steps_per_year) {
            return Err(ConfigError::Distribution {
                reason: format!("map {id} covers step {s} outside the year"),
            });
        }
        let steps: Vec<usize> = if m.steps.is_empty() {
            (0..spy).collect()
        } else {
            m.steps.iter().map(|&s| s as usize).collect()
        };
        for age in first..last {
            for &dt in &steps {
                slots[age * spy + dt] = Some(MapId(id as u32));
            }
        }
    }

    // Every slot with schools on the grid needs a map.
    for (s, p) in species.iter().enumerate() {
        let template = Species::new(shoal_core::SpeciesId(s as u32), p.clone(), steps_per_year);
        for age in 0..template.cohort_count() {
            for dt in 0..spy {
                let (out, _) = template.migration(age, dt);
                if out < 1.0 && index[s][age * spy + dt].is_none() {
                    return Err(ConfigError::Distribution {
                        reason: format!(
                            "no map for species {:?} at age index {age}, step {dt}",
                            p.name
                        ),
                    });
                }
            }
        }
    }
    Ok(index)
}

// ── Runtime ────────────────────────────────────────────────────────

/// Distribution state built once at setup.
#[derive(Clone, Debug)]
pub enum Distribution {
    /// Random-patch mode.
    Random {
        /// Patch cells per species.
        patches: Vec<Vec<CellId>>,
        /// Patch membership per species, indexed by cell.
        members: Vec<Vec<bool>>,
    },
    /// Map mode.
    Maps {
        /// Presence maps by [`MapId`].
        maps: Vec<PresenceMap>,
        /// Per species, `[age * steps_per_year + step]` map index.
        index: Vec<Vec<Option<MapId>>>,
        /// Steps per year, for index arithmetic.
        steps_per_year: usize,
    },
}

impl Distribution {
    /// Build the runtime state. Random mode draws its patches from `rng`.
    pub fn build<R: Rng + ?Sized>(
        config: &DistributionConfig,
        grid: &OceanGrid,
        species: &[SpeciesParams],
        steps_per_year: u32,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        match config {
            DistributionConfig::Random { patch_sizes } => {
                let mut patches = Vec::with_capacity(patch_sizes.len());
                let mut members = Vec::with_capacity(patch_sizes.len());
                for &size in patch_sizes {
                    let patch = random_patch(grid, size, rng)?;
                    let mut m = vec![false; grid.cell_count()];
                    for c in &patch {
                        m[c.index()] = true;
                    }
                    patches.push(patch);
                    members.push(m);
                }
                Ok(Self::Random { patches, members })
            }
            DistributionConfig::Maps(configs) => {
                let maps = configs
                    .iter()
                    .map(|m| PresenceMap::new(grid, &m.cells))
                    .collect::<Result<Vec<_>, _>>()?;
                let index = map_index(configs, species, steps_per_year)?;
                Ok(Self::Maps {
                    maps,
                    index,
                    steps_per_year: steps_per_year as usize,
                })
            }
        }
    }

    /// Place every school of `species` for step-of-year `dt`.
    ///
    /// With `resample` set, every in-zone school is drawn afresh (used at
    /// initialisation); otherwise located schools walk where the mode
    /// allows it.
    pub fn distribute<R: Rng + ?Sized>(
        &self,
        species: &mut Species,
        grid: &OceanGrid,
        dt: usize,
        resample: bool,
        rng: &mut R,
    ) {
        let sp = species.id().index();
        let migration: Vec<f64> = (0..species.cohort_count())
            .map(|age| species.migration(age, dt).0)
            .collect();

        for cohort in species.cohorts_mut() {
            let age = cohort.age();
            let n = cohort.schools.len();
            let in_zone = ((n as f64) * (1.0 - migration[age])).round() as usize;
            for (slot, school) in cohort.schools.iter_mut().enumerate() {
                if slot >= in_zone {
                    school.out_of_zone = true;
                    school.set_cell(None);
                    continue;
                }
                school.out_of_zone = false;
                let cell = match self {
                    Self::Random { patches, members } => {
                        random_mode(school, &patches[sp], &members[sp], grid, resample, rng)
                    }
                    Self::Maps {
                        maps,
                        index,
                        steps_per_year,
                    } => {
                        let spy = *steps_per_year;
                        let current = index[sp][age * spy + dt];
                        let previous = (age > 0)
                            .then(|| index[sp][(age - 1) * spy + (dt + spy - 1) % spy])
                            .flatten();
                        current.and_then(|id| {
                            let map = &maps[id.index()];
                            let walk = !resample && age > 0 && previous == Some(id);
                            map_mode(school, map, grid, walk, rng)
                        })
                    }
                };
                school.set_cell(cell);
            }
        }
    }

    /// Patch cells of `species` in random mode.
    pub fn patch(&self, species: usize) -> Option<&[CellId]> {
        match self {
            Self::Random { patches, .. } => patches.get(species).map(Vec::as_slice),
            Self::Maps { .. } => None,
        }
    }
}

fn random_mode<R: Rng + ?Sized>(
    school: &School,
    patch: &[CellId],
    members: &[bool],
    grid: &OceanGrid,
    resample: bool,
    rng: &mut R,
) -> Option<CellId> {
    match school.cell {
        Some(cell) if !resample && members[cell.index()] => {
            Some(walk(grid, cell, |c| members[c.index()], rng))
        }
        _ => Some(patch[rng.random_range(0..patch.len())]),
    }
}

fn map_mode<R: Rng + ?Sized>(
    school: &School,
    map: &PresenceMap,
    grid: &OceanGrid,
    walk_allowed: bool,
    rng: &mut R,
) -> Option<CellId> {
    match school.cell {
        Some(cell) if walk_allowed && map.contains(cell) => {
            Some(walk(grid, cell, |c| map.contains(c), rng))
        }
        _ => Some(map.sample(rng)),
    }
}

/// One random-walk move: stay or move to an accepted ocean neighbour.
fn walk<R, F>(grid: &OceanGrid, cell: CellId, accept: F, rng: &mut R) -> CellId
where
    R: Rng + ?Sized,
    F: Fn(CellId) -> bool,
{
    let mut options: SmallVec<[CellId; 9]> = SmallVec::new();
    options.push(cell);
    options.extend(grid.ocean_neighbours(cell).filter(|&c| accept(c)));
    options[rng.random_range(0..options.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Migration;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use shoal_core::SpeciesId;

    fn populated(params: SpeciesParams) -> Species {
        let mut s = Species::new(SpeciesId(0), params, 4);
        for age in 0..s.cohort_count() {
            for _ in 0..5 {
                s.cohorts[age].push(School::new(10, 1.0, 1.0, 16, 3.0));
            }
        }
        s
    }

    #[test]
    fn random_mode_keeps_schools_in_patch() {
        let grid = OceanGrid::all_ocean(6, 6).unwrap();
        let params = vec![SpeciesParams::default()];
        let cfg = DistributionConfig::Random {
            patch_sizes: vec![5],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let dist = Distribution::build(&cfg, &grid, &params, 4, &mut rng).unwrap();
        let patch = dist.patch(0).unwrap().to_vec();
        let mut s = populated(params[0].clone());
        dist.distribute(&mut s, &grid, 0, true, &mut rng);
        for dt in 1..40 {
            dist.distribute(&mut s, &grid, dt % 4, false, &mut rng);
            for (_, school) in s.schools() {
                assert!(patch.contains(&school.cell().unwrap()));
            }
        }
    }

    #[test]
    fn walk_moves_at_most_one_cell() {
        let grid = OceanGrid::all_ocean(5, 5).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let start = grid.cell_at(2, 2).unwrap();
        for _ in 0..200 {
            let next = walk(&grid, start, |_| true, &mut rng);
            let (r, c) = grid.coords(next);
            assert!(r.abs_diff(2) <= 1 && c.abs_diff(2) <= 1);
        }
    }

    #[test]
    fn out_of_zone_share_is_unlocated() {
        let grid = OceanGrid::all_ocean(4, 4).unwrap();
        let params = SpeciesParams {
            migrations: vec![Migration {
                first_age: 1.0,
                last_age: 2.0,
                steps: vec![2],
                fraction_out: 0.4,
                mortality: 0.0,
            }],
            ..Default::default()
        };
        let cfg = DistributionConfig::Random {
            patch_sizes: vec![16],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let dist = Distribution::build(&cfg, &grid, &[params.clone()], 4, &mut rng).unwrap();
        let mut s = populated(params);
        dist.distribute(&mut s, &grid, 2, true, &mut rng);
        let cohort = s.cohort(4);
        // round(5 * 0.6) = 3 stay.
        let out: Vec<bool> = cohort.schools().iter().map(School::out_of_zone).collect();
        assert_eq!(out, vec![false, false, false, true, true]);
        assert!(cohort.schools()[4].cell().is_none());
        assert!(s.cohort(3).schools().iter().all(|sc| !sc.out_of_zone()));

        // The next step the rule no longer applies and they come back.
        dist.distribute(&mut s, &grid, 3, false, &mut rng);
        assert!(s.schools().all(|(_, sc)| sc.cell().is_some()));
    }

    #[test]
    fn map_change_resamples_and_age_zero_always_resamples() {
        let grid = OceanGrid::all_ocean(1, 10).unwrap();
        let params = SpeciesParams {
            longevity: 1.0,
            ..Default::default()
        };
        // Ages 0..2 steps live on cell 0, older ones on cell 9.
        let maps = vec![
            MapConfig {
                species: 0,
                first_age: 0.0,
                last_age: 0.5,
                steps: Vec::new(),
                cells: vec![(CellId(0), 1.0)],
            },
            MapConfig {
                species: 0,
                first_age: 0.5,
                last_age: 1.0,
                steps: Vec::new(),
                cells: vec![(CellId(9), 1.0)],
            },
        ];
        let cfg = DistributionConfig::Maps(maps);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let dist = Distribution::build(&cfg, &grid, &[params.clone()], 4, &mut rng).unwrap();
        let mut s = populated(params);
        dist.distribute(&mut s, &grid, 0, true, &mut rng);
        assert!(s.cohort(1).schools().iter().all(|sc| sc.cell() == Some(CellId(0))));
        assert!(s.cohort(2).schools().iter().all(|sc| sc.cell() == Some(CellId(9))));
        // Age 2 at step 1 came from age 1 at step 0 under another map.
        dist.distribute(&mut s, &grid, 1, false, &mut rng);
        assert!(s.cohort(2).schools().iter().all(|sc| sc.cell() == Some(CellId(9))));
        assert!(s.cohort(0).schools().iter().all(|sc| sc.cell() == Some(CellId(0))));
    }

    #[test]
    fn map_coverage_gaps_are_rejected_unless_fully_out() {
        let grid = OceanGrid::all_ocean(2, 2).unwrap();
        let full = MapConfig {
            species: 0,
            first_age: 0.0,
            last_age: 1.0,
            steps: Vec::new(),
            cells: vec![(CellId(1), 1.0)],
        };
        let params = SpeciesParams {
            longevity: 2.0,
            ..Default::default()
        };
        let cfg = DistributionConfig::Maps(vec![full.clone()]);
        assert!(cfg.validate(&grid, &[params.clone()], 4).is_err());

        let away = SpeciesParams {
            migrations: vec![Migration {
                first_age: 1.0,
                last_age: 2.0,
                steps: vec![0, 1, 2, 3],
                fraction_out: 1.0,
                mortality: 0.1,
            }],
            ..params
        };
        assert!(cfg.validate(&grid, &[away], 4).is_ok());
    }

    #[test]
    fn unknown_species_in_map_is_rejected() {
        let grid = OceanGrid::all_ocean(2, 2).unwrap();
        let cfg = DistributionConfig::Maps(vec![MapConfig {
            species: 3,
            first_age: 0.0,
            last_age: 1.0,
            steps: Vec::new(),
            cells: vec![(CellId(0), 1.0)],
        }]);
        assert!(matches!(
            cfg.validate(&grid, &[SpeciesParams::default()], 4),
            Err(ConfigError::Distribution { .. })
        ));
    }
}
