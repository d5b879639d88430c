//! Benchmarks for history derivation
//!
//! Run with: cargo bench

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use moodwell::entries::{Emotion, FilterCriteria, MoodEntry, SortField, SortOrder, Trigger};
use moodwell::history::{compute_stats, search};

fn create_test_entries(count: usize) -> Vec<MoodEntry> {
    let emotions = Emotion::all();
    let triggers = Trigger::all();
    let now = Utc::now();

    (0..count)
        .map(|i| {
            MoodEntry::new("bench", emotions[i % emotions.len()].label())
                .intensity((i % 10) as i32 + 1)
                .trigger(triggers[i % triggers.len()].label())
                .trigger(triggers[(i / 3) % triggers.len()].label())
                .description(format!("entry number {}", i))
                .created_at(now - Duration::minutes(i as i64))
        })
        .collect()
}

fn bench_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats");

    for size in [50, 1000, 10000] {
        let entries = create_test_entries(size);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("compute_{}", size), |b| {
            b.iter(|| compute_stats(black_box(&entries)))
        });

        group.bench_function(format!("search_then_compute_{}", size), |b| {
            b.iter(|| {
                let hits = search(black_box(&entries), "work");
                compute_stats(hits.into_iter())
            })
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");

    let entries = create_test_entries(10000);
    let criteria = FilterCriteria::new("bench")
        .emotion("Calm")
        .intensity_range(Some(3), Some(8))
        .sort(SortField::Intensity, SortOrder::Desc);
    let now = Utc::now();

    group.throughput(Throughput::Elements(entries.len() as u64));
    group.bench_function("apply_10000", |b| {
        b.iter(|| criteria.apply(black_box(entries.iter()), now))
    });

    group.finish();
}

criterion_group!(benches, bench_stats, bench_filter);
criterion_main!(benches);
