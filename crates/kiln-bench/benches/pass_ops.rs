//! Criterion micro-benchmarks for each pass run alone over the reference
//! scene.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use kiln_bench::reference_scene;
use kiln_engine::{Engine, EngineConfig};
use kiln_material::MaterialRegistry;
use kiln_pass::Pass;
use kiln_passes::default_passes;

/// The reference scene after a short warm-up, as loadable tiles.
fn reference_tiles() -> Vec<(kiln_core::MaterialId, f32)> {
    let mut engine = reference_scene(42).unwrap();
    engine.run(30).unwrap();
    let front = engine.front();
    front
        .mat
        .iter()
        .copied()
        .zip(front.temp.iter().copied())
        .collect()
}

fn bench_single_passes(c: &mut Criterion) {
    let tiles = reference_tiles();
    let mut group = c.benchmark_group("pass");
    for pass in default_passes() {
        let name = pass.name().to_string();
        let mut engine = Engine::with_passes(
            EngineConfig::new(128, 128).with_seed(42),
            MaterialRegistry::standard().unwrap(),
            vec![pass],
        )
        .unwrap();
        engine.load_tiles(&tiles).unwrap();

        group.bench_function(BenchmarkId::from_parameter(&name), |b| {
            b.iter(|| {
                // Reload so movement passes never run out of work.
                engine.load_tiles(&tiles).unwrap();
                black_box(engine.step().unwrap().total_us);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_passes);
criterion_main!(benches);
