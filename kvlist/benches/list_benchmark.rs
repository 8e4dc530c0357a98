//! Benchmark for the three list disciplines under concurrent load.
//!
//! Run with: cargo bench --package kvlist --bench list_benchmark

use criterion::Criterion;
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use mimalloc::MiMalloc;
use rand::Rng;
use std::sync::Arc;
use std::thread;

use kvlist::{ConfiguredList, Discipline, KeyValueList, ListConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const THREAD_COUNTS: [usize; 4] = [1, 2, 4, 8];

fn prepopulated(discipline: Discipline, key_count: usize) -> Arc<ConfiguredList> {
    let list = ConfiguredList::new(&ListConfig::new(discipline));
    for i in 0..key_count {
        list.push(&format!("key_{}", i), &format!("value_{}", i)).unwrap();
    }
    Arc::new(list)
}

// ============================================================================
// Concurrent push benchmark
// ============================================================================

fn list_push(discipline: Discipline, thread_count: usize, iteration_count: usize) {
    let list = prepopulated(discipline, 0);
    let mut handles = vec![];

    for t in 0..thread_count {
        let list = Arc::clone(&list);
        handles.push(thread::spawn(move || {
            for i in 0..iteration_count {
                let key = format!("key_{}", t * iteration_count + i);
                list.push(&key, "value").unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(list.len(), thread_count * iteration_count);
}

// ============================================================================
// Read-mostly benchmark (90% find, 10% update)
// ============================================================================

fn list_read_mostly(
    list: &Arc<ConfiguredList>,
    key_count: usize,
    thread_count: usize,
    iteration_count: usize,
) {
    let mut handles = vec![];

    for _ in 0..thread_count {
        let list = Arc::clone(list);
        handles.push(thread::spawn(move || {
            let mut rng = rand::rng();
            let mut buf = [0u8; 32];
            for i in 0..iteration_count {
                let key = format!("key_{}", rng.random_range(0..key_count));
                if i % 10 == 0 {
                    list.update(&key, &format!("updated_{}", i)).unwrap();
                } else {
                    black_box(list.find(&key, &mut buf).unwrap());
                }
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

// ============================================================================
// High contention benchmark (every thread updates the same few keys)
// ============================================================================

fn list_contention(
    list: &Arc<ConfiguredList>,
    thread_count: usize,
    iteration_count: usize,
) {
    let mut handles = vec![];

    for _ in 0..thread_count {
        let list = Arc::clone(list);
        handles.push(thread::spawn(move || {
            for i in 0..iteration_count {
                let key = format!("key_{}", i % 4);
                list.update(&key, &format!("value_{}", i)).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }
}

// ============================================================================
// Criterion benchmark groups
// ============================================================================

fn concurrent_push_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_concurrent_push");

    for discipline in Discipline::ALL {
        for thread_count in THREAD_COUNTS {
            let bench_name = format!("{}_{:0>2}_2000", discipline, thread_count);
            group.bench_function(bench_name, |b| {
                b.iter(|| list_push(discipline, black_box(thread_count), black_box(2_000)))
            });
        }
    }

    group.finish();
}

fn read_mostly_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_read_mostly");
    let key_count = 256;

    for discipline in Discipline::ALL {
        let list = prepopulated(discipline, key_count);
        for thread_count in THREAD_COUNTS {
            let bench_name = format!("{}_{:0>2}_10000", discipline, thread_count);
            group.bench_function(bench_name, |b| {
                b.iter(|| {
                    list_read_mostly(&list, key_count, black_box(thread_count), black_box(10_000))
                })
            });
        }
    }

    group.finish();
}

fn contention_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_high_contention");

    for discipline in Discipline::ALL {
        let list = prepopulated(discipline, 64);
        for thread_count in THREAD_COUNTS {
            let bench_name = format!("{}_{:0>2}_5000", discipline, thread_count);
            group.bench_function(bench_name, |b| {
                b.iter(|| list_contention(&list, black_box(thread_count), black_box(5_000)))
            });
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    concurrent_push_benchmark,
    read_mostly_benchmark,
    contention_benchmark
);
criterion_main!(benches);
