use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use probe_hashset::HashSet;
use std::time::Duration;

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> String {
    format!("k{:016x}", n)
}

fn filled(seed: u64, n: usize) -> (HashSet<String>, Vec<String>) {
    let keys: Vec<String> = lcg(seed).take(n).map(key).collect();
    let mut s = HashSet::new();
    for k in &keys {
        let _ = s.insert(k.as_str());
    }
    (s, keys)
}

fn bench_insert_fresh_100k(c: &mut Criterion) {
    let keys: Vec<String> = lcg(1).take(100_000).map(key).collect();
    c.bench_function("hash_set::insert_fresh_100k", |b| {
        b.iter_batched(
            HashSet::<String>::new,
            |mut s| {
                for k in &keys {
                    let _ = s.insert(k.as_str());
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_contains_hit_100k(c: &mut Criterion) {
    let (s, keys) = filled(7, 100_000);
    c.bench_function("hash_set::contains_hit_100k", |b| {
        b.iter(|| {
            for k in &keys {
                black_box(s.contains(k.as_str()));
            }
        })
    });
}

// Misses exercise the chain-count early exit.
fn bench_contains_miss_100k(c: &mut Criterion) {
    let (s, _) = filled(11, 100_000);
    let misses: Vec<String> = lcg(0xdead_beef).take(100_000).map(key).collect();
    c.bench_function("hash_set::contains_miss_100k", |b| {
        b.iter(|| {
            for k in &misses {
                black_box(s.contains(k.as_str()));
            }
        })
    });
}

fn bench_erase_all_10k(c: &mut Criterion) {
    c.bench_function("hash_set::erase_all_10k", |b| {
        b.iter_batched(
            || filled(5, 10_000),
            |(mut s, keys)| {
                for k in &keys {
                    black_box(s.erase(k.as_str()));
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_churn_insert_erase_10k(c: &mut Criterion) {
    let (base, _) = filled(13, 10_000);
    let churn: Vec<String> = lcg(17).take(10_000).map(key).collect();
    c.bench_function("hash_set::churn_insert_erase_10k", |b| {
        b.iter_batched(
            || base.clone(),
            |mut s| {
                for k in &churn {
                    let _ = s.insert(k.as_str());
                    black_box(s.erase(k.as_str()));
                }
                black_box(s)
            },
            BatchSize::SmallInput,
        )
    });
}

fn configure() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(3))
}

criterion_group! {
    name = benches;
    config = configure();
    targets = bench_insert_fresh_100k,
        bench_contains_hit_100k,
        bench_contains_miss_100k,
        bench_erase_all_10k,
        bench_churn_insert_erase_10k
}
criterion_main!(benches);
