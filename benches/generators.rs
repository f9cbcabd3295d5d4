use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use prim_mazes::{
    generators,
    grid::build_grid,
    units::{ColumnsCount, RowsCount},
};
use rand::{rngs::StdRng, SeedableRng};

fn bench_prims_maze_32(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(32);
    c.bench_function("prims_maze_32", move |b| {
        b.iter_batched(|| build_grid(RowsCount(32), ColumnsCount(32)).unwrap(),
                       |mut g| generators::carve_maze_with_rng(&mut g, &mut rng),
                       BatchSize::SmallInput)
    });
}

fn bench_prims_maze_128(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(128);
    c.bench_function("prims_maze_128", move |b| {
        b.iter_batched(|| build_grid(RowsCount(128), ColumnsCount(128)).unwrap(),
                       |mut g| generators::carve_maze_with_rng(&mut g, &mut rng),
                       BatchSize::LargeInput)
    });
}

fn bench_build_grid_128(c: &mut Criterion) {
    c.bench_function("build_grid_128", |b| {
        b.iter(|| build_grid(RowsCount(128), ColumnsCount(128)))
    });
}

criterion_group!(
    benches,
    bench_prims_maze_32,
    bench_prims_maze_128,
    bench_build_grid_128
);
criterion_main!(benches);
