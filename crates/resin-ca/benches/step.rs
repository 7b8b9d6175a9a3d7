//! Benchmarks for stepping automata.
//!
//! Run with: cargo bench -p rhizome-resin-ca

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rhizome_resin_ca::{
    BoundaryGrid, Dimensions, Elementary, Grid1D, Grid2D, GridConfig, LifeLike, Neighbourhood,
    Runner, randomise1d, randomise2d,
};

fn life_grid(size: usize) -> Grid2D {
    let mut rng = StdRng::seed_from_u64(12345);
    let initial = randomise2d((size, size), 0.0, &[(1.0, 0.3)], &mut rng).unwrap();
    let config = GridConfig::default()
        .with_grid_dims(size, size)
        .with_initial_grid(initial);
    Grid2D::new(&config, LifeLike::conway(), ()).unwrap()
}

fn bench_life_step(c: &mut Criterion) {
    let mut grid = life_grid(200);
    c.bench_function("life_step_200x200", |b| {
        b.iter(|| {
            grid.step().unwrap();
            black_box(grid.grid());
        });
    });
}

fn bench_refresh_boundary(c: &mut Criterion) {
    let mut grid = life_grid(200);
    c.bench_function("refresh_boundary_200x200", |b| {
        b.iter(|| {
            grid.refresh_boundary();
            black_box(grid.padded());
        });
    });
}

fn bench_neighbour_counts(c: &mut Criterion) {
    let grid = life_grid(200);
    c.bench_function("count_neighbours_200x200", |b| {
        b.iter(|| {
            let views = grid.neighbour_states();
            black_box(grid.count_neighbours(&views));
        });
    });
}

fn bench_normalize_mask(c: &mut Criterion) {
    let mask = Neighbourhood::von_neumann().to_mask();
    c.bench_function("neighbourhood_normalize", |b| {
        b.iter(|| black_box(Neighbourhood::new(black_box(&mask), 2).unwrap()));
    });
}

fn bench_elementary_run(c: &mut Criterion) {
    let config = GridConfig::new(Dimensions::One, vec![0.0, 1.0]).with_generations(200);
    c.bench_function("rule_30_200_generations", |b| {
        b.iter(|| {
            let mut grid = Grid1D::new(&config, Elementary::new(30), ()).unwrap();
            let mut rng = StdRng::seed_from_u64(30);
            let seed = randomise1d(401, 0.0, &[(1.0, 0.5)], &mut rng).unwrap();
            grid.set_grid(&seed);
            black_box(Runner::new().run(&mut grid, 200).unwrap());
        });
    });
}

criterion_group!(
    benches,
    bench_life_step,
    bench_refresh_boundary,
    bench_neighbour_counts,
    bench_normalize_mask,
    bench_elementary_run,
);

criterion_main!(benches);
