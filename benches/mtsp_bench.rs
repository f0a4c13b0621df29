//! Criterion benchmarks for the route optimizer.
//!
//! Instances are random Euclidean stop sets with a fixed seed.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_mtsp::distance::{DistanceMatrix, DistanceProvider};
use u_mtsp::ga::{Chromosome, Direction, Optimizer, OptimizerConfig, Population};
use u_mtsp::models::{Stop, DEFAULT_COORDINATE_RANGE};
use u_mtsp::random::create_rng;

fn instance(n: usize) -> Arc<DistanceMatrix> {
    let stops = Stop::random_stops(
        n,
        DEFAULT_COORDINATE_RANGE,
        DEFAULT_COORDINATE_RANGE,
        &mut create_rng(7),
    );
    Arc::new(DistanceMatrix::from_stops(&stops))
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover");

    for &n in &[50usize, 150, 500] {
        let matrix = instance(n);
        let mut rng = create_rng(42);
        let p1 = Chromosome::random(3, 0, matrix.as_ref(), &mut rng).unwrap();
        let p2 = Chromosome::random(3, 0, matrix.as_ref(), &mut rng).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n), &(p1, p2), |b, (p1, p2)| {
            let mut rng = create_rng(1);
            b.iter(|| {
                let children = Chromosome::crossover(
                    black_box(p1),
                    black_box(p2),
                    Direction::Successor,
                    matrix.as_ref(),
                    &mut rng,
                );
                black_box(children)
            })
        });
    }
    group.finish();
}

fn bench_natural_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("natural_selection");
    group.sample_size(10);

    for &pop in &[100usize, 500, 2000] {
        let matrix = instance(150);
        let provider: Arc<dyn DistanceProvider> = matrix;
        let config = OptimizerConfig::default().with_population_size(pop);

        group.bench_function(BenchmarkId::from_parameter(pop), |b| {
            b.iter_batched(
                || {
                    let mut rng = create_rng(42);
                    let population = Population::new(&config, provider.clone(), &mut rng).unwrap();
                    let pool: Vec<Chromosome> = (0..pop / 2)
                        .map(|_| Chromosome::random(2, 0, provider.as_ref(), &mut rng).unwrap())
                        .collect();
                    (population, pool)
                },
                |(mut population, pool)| {
                    population.natural_selection(pool).unwrap();
                    black_box(population)
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");
    group.sample_size(10);

    for (n, pop, gen) in [(30usize, 50usize, 20usize), (150, 200, 10)] {
        let matrix = instance(n);
        let config = OptimizerConfig::default()
            .with_population_size(pop)
            .with_max_generations(gen)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_p{}_g{}", n, pop, gen), n),
            &config,
            |b, config| {
                b.iter(|| {
                    let result = Optimizer::run(black_box(config), matrix.clone());
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_crossover, bench_natural_selection, bench_run);
criterion_main!(benches);
