//! Criterion benchmarks for power resolution.

use criterion::{Criterion, criterion_group, criterion_main};
use gridwright_core::entity::EntityStore;
use gridwright_core::id::PlayerId;
use gridwright_core::test_utils::*;
use gridwright_power::{DispatchConfig, PowerSnapshot, compile_grids, resolve};
use gridwright_spatial::{HexGrid, MapCell};

/// A row of `n` plants joined by a pole line, with a town every third hex.
fn make_world(n: i32) -> (EntityStore, HexGrid) {
    let mut store = EntityStore::new();
    let mut map = HexGrid::new();
    let corners: Vec<_> = (0..n).map(|q| north(q * 2, 0)).collect();
    add_pole_chain(&mut store, Some(PlayerId(1)), &corners);
    for q in 0..n {
        let price = 0.05 + f64::from(q % 7) * 0.01;
        store.insert(simple_plant(
            Some(PlayerId((q % 4) as u32)),
            hex(q * 2, -1),
            50.0,
            price,
        ));
    }
    for q in 0..n * 2 {
        let tier = if q % 3 == 0 { 2 } else { 0 };
        map.insert(hex(q, 0), MapCell::default().with_population(tier));
    }
    (store, map)
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.sample_size(50);

    let (store, map) = make_world(100);
    let config = DispatchConfig::default();

    // Benchmark: capture a snapshot of 100 plants and 100 poles.
    group.bench_function("capture_100_plants", |b| {
        b.iter(|| PowerSnapshot::capture(&store));
    });

    let snapshot = PowerSnapshot::capture(&store);

    // Benchmark: compile the single 100-plant grid.
    group.bench_function("compile_grids_100_plants", |b| {
        b.iter(|| compile_grids(&snapshot.plants, &snapshot.network));
    });

    // Benchmark: full cycle with ~67 towns sharing one grid.
    group.bench_function("resolve_100_plants", |b| {
        b.iter(|| resolve(&snapshot, &map, &config));
    });

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
