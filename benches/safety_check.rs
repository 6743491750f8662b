use banker_rs::{is_safe, AllocationEngine, SessionConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Synthetic P×R instance with everything still to be requested.
fn synthetic_instance(processes: usize, resources: usize) -> (Vec<u32>, Vec<Vec<u32>>, Vec<Vec<u32>>) {
    let available = vec![64u32; resources];
    let allocation = vec![vec![0u32; resources]; processes];
    let need: Vec<Vec<u32>> = (0..processes)
        .map(|i| (0..resources).map(|j| ((i + j) % 9) as u32).collect())
        .collect();
    (available, allocation, need)
}

/// Benchmark the safety test across instance sizes
fn bench_safety_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("safety_test");

    group.bench_function("standard_5x3", |b| {
        let engine = AllocationEngine::new(SessionConfig::standard());
        b.iter(|| black_box(engine.check_safety()));
    });

    group.bench_function("synthetic_32x8", |b| {
        let (available, allocation, need) = synthetic_instance(32, 8);
        b.iter(|| black_box(is_safe(&available, &allocation, &need)));
    });

    group.bench_function("synthetic_128x8", |b| {
        let (available, allocation, need) = synthetic_instance(128, 8);
        b.iter(|| black_box(is_safe(&available, &allocation, &need)));
    });

    group.finish();
}

/// Benchmark a full speculate/commit request plus release
fn bench_request_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_cycle");

    group.bench_function("grant_and_release", |b| {
        let config = SessionConfig::standard();
        b.iter(|| {
            let mut engine = AllocationEngine::new(config.clone());
            engine.request(1, &[1, 0, 2]).unwrap();
            engine.release(1).unwrap();
        });
    });

    group.bench_function("denied_unsafe", |b| {
        // Granting P1 a unit here always leaves an unsafe state, so every
        // iteration exercises the speculation and rollback path.
        let config = SessionConfig::new(
            vec!["R".to_string()],
            vec![2],
            vec!["P0".to_string(), "P1".to_string()],
            vec![vec![2], vec![2]],
            Some(vec![vec![1], vec![0]]),
        )
        .unwrap();
        b.iter(|| {
            let mut engine = AllocationEngine::new(config.clone());
            let outcome = engine.request(1, &[1]).unwrap();
            assert!(!outcome.granted);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_safety_test, bench_request_cycle);
criterion_main!(benches);
