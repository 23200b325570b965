use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use picobot_genetics::Evaluator;
use picobot_genetics::fitness::CoverageEvaluator;
use picobot_genetics::ga::TruncationGa;
use picobot_genetics::program::Program;
use picobot_genetics::world::World;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;

// =============================================================================
// Program operator benchmarks
// =============================================================================

fn bench_program_random(c: &mut Criterion) {
    c.bench_function("Program/random", |b| {
        let mut rng = Pcg64::seed_from_u64(42);
        b.iter(|| black_box(Program::random(&mut rng)));
    });
}

fn bench_program_crossover(c: &mut Criterion) {
    c.bench_function("Program/crossover", |b| {
        let mut rng = Pcg64::seed_from_u64(42);
        let parent_a = Program::random(&mut rng);
        let parent_b = Program::random(&mut rng);
        b.iter(|| black_box(parent_a.crossover(&parent_b, &mut rng)));
    });
}

fn bench_program_mutate(c: &mut Criterion) {
    c.bench_function("Program/mutate", |b| {
        let mut rng = Pcg64::seed_from_u64(42);
        let mut program = Program::random(&mut rng);
        b.iter(|| black_box(program.mutate(&mut rng)));
    });
}

// =============================================================================
// Simulation benchmarks
// =============================================================================

fn bench_world_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("World/run");

    for steps in [100, 1000, 1111].iter() {
        group.throughput(Throughput::Elements(*steps as u64));
        group.bench_with_input(BenchmarkId::from_parameter(steps), steps, |b, &steps| {
            let mut rng = Pcg64::seed_from_u64(42);
            let program = Program::random(&mut rng);
            b.iter_batched(
                || World::new(12, 12, &program),
                |mut world| {
                    world.run(steps).unwrap();
                    black_box(world.coverage())
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("CoverageEvaluator/evaluate");

    for trials in [4, 16, 42].iter() {
        group.throughput(Throughput::Elements(*trials as u64));
        group.bench_with_input(BenchmarkId::from_parameter(trials), trials, |b, &trials| {
            let mut rng = Pcg64::seed_from_u64(42);
            let program = Program::random(&mut rng);
            let eval = CoverageEvaluator::new(trials, 1000);
            b.iter(|| black_box(eval.evaluate(&program, &mut rng)));
        });
    }
    group.finish();
}

// =============================================================================
// GA benchmarks
// =============================================================================

fn bench_ga_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("TruncationGa/step");
    group.sample_size(10);

    for pop_size in [10, 50].iter() {
        group.throughput(Throughput::Elements(*pop_size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(pop_size),
            pop_size,
            |b, &size| {
                // Reduced budget keeps the bench tractable; the loop shape
                // is the same as the production budgets.
                let eval = CoverageEvaluator::new(4, 200);
                let mut seeded = TruncationGa::new(size, 42);
                seeded.seed(&eval);
                b.iter_batched(
                    || seeded.clone(),
                    |mut ga| {
                        ga.step(&eval);
                        black_box(ga.best().map(|i| i.fitness))
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(
    program_benches,
    bench_program_random,
    bench_program_crossover,
    bench_program_mutate,
);

criterion_group!(world_benches, bench_world_run, bench_evaluate);

criterion_group!(ga_benches, bench_ga_step);

criterion_main!(program_benches, world_benches, ga_benches);
