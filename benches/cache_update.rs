//! Update and read path benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::{Duration, UNIX_EPOCH};
use valcache_lib::cache::ValueCache;
use valcache_lib::core::{CacheConfig, DataSet, DataSource, RawValue, Sample, ValueIdentity, ValueKind};

fn if_octets() -> DataSet {
    DataSet::new(
        "if_octets",
        vec![
            DataSource::new("rx", ValueKind::Derive),
            DataSource::new("tx", ValueKind::Derive),
        ],
    )
}

fn sample(series: usize, step: u64) -> Sample {
    Sample::builder()
        .identity(ValueIdentity::new("bench", "interface", "if_octets").plugin_instance(format!("eth{}", series)))
        .time(UNIX_EPOCH + Duration::from_secs(step * 10))
        .interval(Duration::from_secs(10))
        .values(vec![RawValue::Derive(step as i64 * 1000), RawValue::Derive(step as i64 * 500)])
        .build()
        .unwrap()
}

/// Steady-state updates spread over a growing number of series
fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("update");
    let ds = if_octets();

    for series in [1usize, 100, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(series), &series, |b, &series| {
            let cache = ValueCache::new(CacheConfig::default()).unwrap();
            let samples: Vec<Sample> = (0..series).map(|s| sample(s, 1)).collect();
            for s in &samples {
                cache.update(&ds, s).unwrap();
            }

            let mut step = 2u64;
            b.iter(|| {
                for s in 0..series {
                    black_box(cache.update(&ds, &sample(s, step)).unwrap());
                }
                step += 1;
            });
        });
    }
    group.finish();
}

fn bench_reads(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");
    let ds = if_octets();
    let cache = ValueCache::new(CacheConfig::default()).unwrap();
    for step in 1..=20 {
        cache.update(&ds, &sample(0, step)).unwrap();
    }
    cache.get_history("bench/interface-eth0/if_octets", 10).unwrap();

    group.bench_function("get_rate", |b| {
        b.iter(|| black_box(cache.get_rate(black_box("bench/interface-eth0/if_octets"))));
    });

    group.bench_function("get_history_10", |b| {
        b.iter(|| black_box(cache.get_history("bench/interface-eth0/if_octets", 10).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_update, bench_reads);
criterion_main!(benches);
