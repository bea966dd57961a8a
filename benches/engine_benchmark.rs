use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use std::thread;

use supercache::{
    fingerprint, function_id, Call, Engine, EvictionMode, MemoryEngine, Signature,
};

fn bench_put_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("put_sequential");

    for size in [10usize, 100, 1000].iter() {
        for mode in [EvictionMode::Fifo, EvictionMode::Lru, EvictionMode::Lfu] {
            group.bench_with_input(
                BenchmarkId::new(mode.to_string(), size),
                size,
                |b, &size| {
                    b.iter(|| {
                        let engine = MemoryEngine::new(mode).with_max_count(size);
                        for i in 0..size {
                            engine.put(&format!("key{}", i), black_box(i as i32), None);
                        }
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");

    for size in [100usize, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("LRU", size), size, |b, &size| {
            let engine = MemoryEngine::new(EvictionMode::Lru);
            for i in 0..size {
                engine.put(&format!("key{}", i), i as i32, None);
            }
            b.iter(|| {
                for i in 0..size {
                    let _ = black_box(engine.get(&format!("key{}", i)));
                }
            });
        });
    }

    group.finish();
}

fn bench_eviction_pressure(c: &mut Criterion) {
    let mut group = c.benchmark_group("eviction_pressure");

    for mode in [
        EvictionMode::Fifo,
        EvictionMode::Filo,
        EvictionMode::Lru,
        EvictionMode::Mru,
        EvictionMode::Lfu,
    ] {
        group.bench_function(BenchmarkId::new("over_count", mode.to_string()), |b| {
            b.iter(|| {
                let engine = MemoryEngine::new(mode).with_max_count(64);
                for i in 0..256 {
                    engine.put(&format!("key{}", i), black_box(i), None);
                }
            });
        });
    }

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut group = c.benchmark_group("fingerprint");

    let id = function_id!("bench_target");
    let sig = Signature::builder()
        .param("a")
        .param("b")
        .param_with_default("verbose", supercache::Value::from(false))
        .build();

    group.bench_function("three_args", |b| {
        let call = Call::new().arg(1).arg("payload").kwarg("verbose", true);
        b.iter(|| fingerprint(&id, &sig, black_box(&call), None, None).unwrap());
    });

    group.bench_function("defaults_only", |b| {
        let call = Call::new().arg(1).arg("payload");
        b.iter(|| fingerprint(&id, &sig, black_box(&call), None, None).unwrap());
    });

    group.finish();
}

fn bench_concurrent_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_access");

    group.bench_function("4_threads_mixed", |b| {
        b.iter(|| {
            let engine = Arc::new(MemoryEngine::<i32>::new(EvictionMode::Lru));
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let engine = Arc::clone(&engine);
                    thread::spawn(move || {
                        for i in 0..100 {
                            let key = format!("key{}", i % 25);
                            if t % 2 == 0 {
                                engine.put(&key, black_box(i), None);
                            } else {
                                let _ = black_box(engine.get(&key));
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_put_sequential,
    bench_get_hit,
    bench_eviction_pressure,
    bench_fingerprint,
    bench_concurrent_access
);
criterion_main!(benches);
