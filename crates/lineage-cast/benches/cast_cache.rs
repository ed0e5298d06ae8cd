use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lineage_cast::CastEngine;
use lineage_registry::{composable, Root, TypeRegistry};

#[derive(Default)]
struct Level0 {
    root: Root,
}

#[derive(Default)]
struct Level1 {
    parent: Level0,
}

#[derive(Default)]
struct Level2 {
    parent: Level1,
}

#[derive(Default)]
struct Level3 {
    parent: Level2,
}

#[derive(Default)]
struct Level4 {
    parent: Level3,
}

#[derive(Default)]
struct Unrelated {
    root: Root,
}

composable!(Level0: root => Root);
composable!(Level1: parent => Level0);
composable!(Level2: parent => Level1);
composable!(Level3: parent => Level2);
composable!(Level4: parent => Level3);
composable!(Unrelated: root => Root);

// ============================================================================
// Upcast to the far end of a five-level chain
// ============================================================================

fn bench_deep_upcast(c: &mut Criterion) {
    let registry = Arc::new(TypeRegistry::new());
    let cached = CastEngine::new(Arc::clone(&registry));
    let uncached = CastEngine::without_cache(Arc::clone(&registry));
    let handle = registry.init(Level4::default()).unwrap();

    c.bench_function("deep_upcast_cached", |b| {
        b.iter(|| cached.try_cast::<Level0, _>(black_box(&handle)).unwrap())
    });
    c.bench_function("deep_upcast_uncached", |b| {
        b.iter(|| uncached.try_cast::<Level0, _>(black_box(&handle)).unwrap())
    });
}

// ============================================================================
// Failing cast (full walk to the root on a miss)
// ============================================================================

fn bench_failed_cast(c: &mut Criterion) {
    let registry = Arc::new(TypeRegistry::new());
    let cached = CastEngine::new(Arc::clone(&registry));
    let uncached = CastEngine::without_cache(Arc::clone(&registry));
    let handle = registry.init(Level4::default()).unwrap();

    c.bench_function("failed_cast_cached", |b| {
        b.iter(|| cached.try_cast::<Unrelated, _>(black_box(&handle)).unwrap())
    });
    c.bench_function("failed_cast_uncached", |b| {
        b.iter(|| uncached.try_cast::<Unrelated, _>(black_box(&handle)).unwrap())
    });
}

criterion_group!(benches, bench_deep_upcast, bench_failed_cast);
criterion_main!(benches);
