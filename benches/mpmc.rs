//! # MPMC Queue Benchmarks: marea vs crossbeam vs flume vs kanal
//!
//! Run with: cargo bench --bench mpmc
//!
//! **Real-world scenario**: several writer threads feed work items to
//! several reader threads through one bounded queue.
//!
//! ```text
//! ┌──────────┐                          ┌──────────┐
//! │ Writer 0 │ ──┐                  ┌─► │ Reader 0 │
//! └──────────┘   │  ┌────────────┐  │   └──────────┘
//! ┌──────────┐   ├─►│  bounded   │──┤   ┌──────────┐
//! │ Writer 1 │ ──┘  │   queue    │  └─► │ Reader 1 │
//! └──────────┘      └────────────┘      └──────────┘
//! ```
//!
//! The channel crates have no notion of priority, so the comparison runs
//! marea at a single priority level; what it measures is the cost of the
//! mutex-and-condvar discipline against dedicated channel machinery. The
//! `priority_churn` bench then exercises what the channels cannot do at
//! all: mixed priorities creating and draining buckets.

use std::hint::black_box;

use criterion::{Bencher, Criterion, criterion_group, criterion_main};
use crossbeam_utils::thread::scope;
use marea::mpmc::MessageQueue;

const CAPACITY: usize = 1024;
const TOTAL_MESSAGES: usize = 100_000;

/// Writer/reader pairs per run, bounded so small machines don't thrash
fn pairs() -> usize {
    (num_cpus::get() / 2).clamp(1, 4)
}

/// Drives `pairs()` producer and consumer threads through one round of
/// `TOTAL_MESSAGES` per measured iteration. Threads park on rendezvous
/// channels between iterations, keeping spawn cost out of the
/// measurement.
fn run_pairs<P, C>(b: &mut Bencher<'_>, produce: P, consume: C)
where
    P: Fn(usize) + Sync,
    C: Fn() + Sync,
{
    let pairs = pairs();
    let per_thread = TOTAL_MESSAGES / pairs;

    let (start_producers_tx, start_producers_rx) = crossbeam_channel::bounded::<()>(0);
    let (start_consumers_tx, start_consumers_rx) = crossbeam_channel::bounded::<()>(0);
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);

    scope(|s| {
        for _ in 0..pairs {
            let start_rx = start_producers_rx.clone();
            let produce = &produce;
            s.spawn(move |_| {
                while start_rx.recv().is_ok() {
                    for i in 0..per_thread {
                        produce(i);
                    }
                }
            });

            let start_rx = start_consumers_rx.clone();
            let done_tx = done_tx.clone();
            let consume = &consume;
            s.spawn(move |_| {
                while start_rx.recv().is_ok() {
                    for _ in 0..per_thread {
                        consume();
                    }
                    done_tx.send(()).unwrap();
                }
            });
        }

        b.iter(|| {
            for _ in 0..pairs {
                start_producers_tx.send(()).unwrap();
            }
            for _ in 0..pairs {
                start_consumers_tx.send(()).unwrap();
            }
            for _ in 0..pairs {
                done_rx.recv().unwrap();
            }
        });

        drop(start_producers_tx);
        drop(start_consumers_tx);
    })
    .unwrap();
}

fn throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");

    group.bench_function("marea", |b| {
        let queue = MessageQueue::new(CAPACITY, 1, CAPACITY);
        queue.run();
        run_pairs(
            b,
            |i| queue.put(i, 0).unwrap(),
            || {
                black_box(queue.get().unwrap());
            },
        );
        queue.stop();
    });

    group.bench_function("crossbeam", |b| {
        let (tx, rx) = crossbeam_channel::bounded::<usize>(CAPACITY);
        run_pairs(
            b,
            |i| tx.send(i).unwrap(),
            || {
                black_box(rx.recv().unwrap());
            },
        );
    });

    group.bench_function("flume", |b| {
        let (tx, rx) = flume::bounded::<usize>(CAPACITY);
        run_pairs(
            b,
            |i| tx.send(i).unwrap(),
            || {
                black_box(rx.recv().unwrap());
            },
        );
    });

    group.bench_function("kanal", |b| {
        let (tx, rx) = kanal::bounded::<usize>(CAPACITY);
        run_pairs(
            b,
            |i| tx.send(i).unwrap(),
            || {
                black_box(rx.recv().unwrap());
            },
        );
    });

    group.finish();
}

/// Mixed priorities churning buckets: every push may create a bucket,
/// every pop may remove one. Single-threaded, isolates the storage
/// discipline from contention.
fn priority_churn(c: &mut Criterion) {
    const BURST: usize = 512;

    c.bench_function("priority_churn", |b| {
        let queue = MessageQueue::new(CAPACITY, 1, CAPACITY);
        queue.run();
        b.iter(|| {
            for i in 0..BURST {
                queue.put(i, (i % 8) as i32).unwrap();
            }
            for _ in 0..BURST {
                black_box(queue.get().unwrap());
            }
        });
        queue.stop();
    });
}

/// Construction cost, for callers creating queues per connection or per
/// request
fn create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    group.bench_function("marea", |b| {
        b.iter(|| MessageQueue::<usize>::new(CAPACITY, 1, CAPACITY));
    });

    group.bench_function("crossbeam", |b| {
        b.iter(|| crossbeam_channel::bounded::<usize>(CAPACITY));
    });

    group.bench_function("flume", |b| {
        b.iter(|| flume::bounded::<usize>(CAPACITY));
    });

    group.bench_function("kanal", |b| {
        b.iter(|| kanal::bounded::<usize>(CAPACITY));
    });

    group.finish();
}

criterion_group!(benches, throughput, priority_churn, create);
criterion_main!(benches);
