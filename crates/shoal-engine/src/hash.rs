//! Hashing of population state for reproducibility checks.
//!
//! Uses FNV-1a for fast, deterministic hashing. These hashes are not
//! cryptographically secure; they only detect divergence between runs.

use crate::species::Species;

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_byte(hash: u64, byte: u8) -> u64 {
    (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
}

#[inline]
fn fnv1a_u32(mut hash: u64, v: u32) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

#[inline]
fn fnv1a_u64(mut hash: u64, v: u64) -> u64 {
    for &b in &v.to_le_bytes() {
        hash = fnv1a_byte(hash, b);
    }
    hash
}

/// Hash every school of every species.
///
/// Folds in, per school, abundance, length and weight bits, cell (or
/// `u32::MAX` when unlocated) and the trophic level at its current age.
/// Species ids and cohort ages are folded in at each boundary so empty
/// cohorts and school order both matter.
pub fn population_hash(species: &[Species]) -> u64 {
    let mut hash = FNV_OFFSET;
    for sp in species {
        hash = fnv1a_u32(hash, sp.id().0);
        for cohort in sp.cohorts() {
            let age = cohort.age();
            hash = fnv1a_u32(hash, age as u32);
            for s in cohort.schools() {
                hash = fnv1a_u64(hash, s.abundance());
                hash = fnv1a_u64(hash, s.length().to_bits());
                hash = fnv1a_u64(hash, s.weight().to_bits());
                hash = fnv1a_u32(hash, s.cell().map_or(u32::MAX, |c| c.0));
                hash = fnv1a_u64(hash, s.trophic_level(age).to_bits());
            }
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SpeciesParams;
    use crate::school::School;
    use shoal_core::{CellId, SpeciesId};

    fn species(abundance: u64, cell: Option<CellId>) -> Vec<Species> {
        let mut s = Species::new(SpeciesId(0), SpeciesParams::default(), 4);
        let mut school = School::new(abundance, 10.0, 12.0, 16, 3.0);
        school.set_cell(cell);
        s.cohorts[3].push(school);
        s.refresh();
        vec![s]
    }

    #[test]
    fn same_state_same_hash() {
        let a = species(100, Some(CellId(2)));
        let b = species(100, Some(CellId(2)));
        assert_eq!(population_hash(&a), population_hash(&b));
    }

    #[test]
    fn abundance_and_location_change_the_hash() {
        let base = population_hash(&species(100, Some(CellId(2))));
        assert_ne!(base, population_hash(&species(101, Some(CellId(2)))));
        assert_ne!(base, population_hash(&species(100, Some(CellId(3)))));
        assert_ne!(base, population_hash(&species(100, None)));
    }

    #[test]
    fn empty_input_hashes_to_offset() {
        assert_eq!(population_hash(&[]), FNV_OFFSET);
    }
}
