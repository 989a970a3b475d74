//! Criterion benchmarks for grid-level operations: patch growth, school
//! placement and occupancy sorting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shoal_bench::{build, reference_profile};
use shoal_core::CellId;
use shoal_space::{random_patch, CellOccupancy};

fn bench_random_patch(c: &mut Criterion) {
    let profile = reference_profile(7).unwrap();
    let grid = profile.grid;
    let size = grid.ocean_cell_count() / 2;
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    c.bench_function("random_patch_half_ocean", |b| {
        b.iter(|| {
            let patch = random_patch(&grid, size, &mut rng).unwrap();
            black_box(patch.len());
        });
    });
}

fn bench_occupancy_sort(c: &mut Criterion) {
    let sim = build(reference_profile(7).unwrap()).unwrap();
    let species = sim.species();
    let template = sim.occupancy().clone();

    c.bench_function("occupancy_sort_by_length", |b| {
        b.iter(|| {
            let mut occ = template.clone();
            occ.sort_each_by(|h| species[h.species.index()].school(h.cohort(), h.slot()).length());
            black_box(occ.total());
        });
    });
}

fn bench_occupancy_fill(c: &mut Criterion) {
    let cells = 40 * 40;
    c.bench_function("occupancy_fill_10k", |b| {
        b.iter(|| {
            let mut occ = CellOccupancy::new(cells);
            for i in 0..10_000u32 {
                occ.insert(CellId(i % cells as u32), i);
            }
            black_box(occ.total());
        });
    });
}

criterion_group!(
    benches,
    bench_random_patch,
    bench_occupancy_sort,
    bench_occupancy_fill
);
criterion_main!(benches);
