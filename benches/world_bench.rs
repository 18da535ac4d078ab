use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use pigeon_colony::core::config::SimulationConfig;
use pigeon_colony::ecs::world::World;
use std::time::Duration;

fn seeded_world(pigeons: usize) -> World {
    let config = SimulationConfig {
        initial_pigeons: pigeons,
        seed: Some(0xBEEF),
        ..SimulationConfig::default()
    };
    World::new(config).expect("bench config is valid")
}

fn bench_world_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(10));

    // Frames per bench iteration (override via PIGEON_BENCH_STEPS)
    let steps: usize = std::env::var("PIGEON_BENCH_STEPS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(100);

    for pigeons in [100_usize, 449, 1000] {
        group.bench_function(format!("steps{}_pigeons{}", steps, pigeons), |b| {
            b.iter_batched(
                || {
                    let mut world = seeded_world(pigeons);
                    // Let food accumulate so foraging has something to scan
                    for _ in 0..200 {
                        world.step();
                    }
                    world
                },
                |mut world| {
                    for _ in 0..steps {
                        world.step();
                    }
                    world
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_fresh_colony(c: &mut Criterion) {
    c.bench_function("world_new_449", |b| {
        b.iter(|| seeded_world(449));
    });
}

criterion_group!(benches, bench_world_steps, bench_fresh_colony);
criterion_main!(benches);
