//! Performance benchmarks for PROTOSOUP

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use protosoup::metrics::Summary;
use protosoup::{Config, Simulation};

const DT: f32 = 1.0 / 60.0;

fn benchmark_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    for total in [500, 2000, 5000].iter() {
        let mut config = Config::default();
        config.entities.total = *total;

        let mut sim = Simulation::with_seed(config, 42);

        // Warm up
        sim.run(10, DT);

        group.bench_with_input(BenchmarkId::new("entities", total), total, |b, _| {
            b.iter(|| {
                sim.step(DT);
            });
        });
    }

    group.finish();
}

fn benchmark_seeding(c: &mut Criterion) {
    let mut config = Config::default();
    config.entities.total = 2000;

    c.bench_function("simulation_seed_2000", |b| {
        b.iter(|| Simulation::with_seed(black_box(config.clone()), 42));
    });
}

fn benchmark_summary(c: &mut Criterion) {
    let mut config = Config::default();
    config.entities.total = 2000;
    let mut sim = Simulation::with_seed(config, 42);
    sim.run(60, DT);

    c.bench_function("summary_measure", |b| {
        b.iter(|| Summary::measure(black_box(sim.clock()), black_box(&sim.store.entities)));
    });
}

criterion_group!(benches, benchmark_step, benchmark_seeding, benchmark_summary);
criterion_main!(benches);
