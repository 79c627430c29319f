//! Benchmarks for ring construction and key routing.

use chash_corelib::{RingBuilder, Upstream};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn upstreams(n: usize) -> Vec<Upstream> {
    (0..n)
        .map(|i| {
            let address = format!("10.0.{}.{}:80", i / 256, i % 256);
            Upstream::new(address, 1 + (i % 4) as u32)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_build");
    for &n in &[4usize, 32, 256] {
        let ups = upstreams(n);
        group.bench_with_input(BenchmarkId::new("sequential", n), &ups, |b, ups| {
            b.iter(|| RingBuilder::new().upstreams(ups.iter().cloned()).build());
        });
        group.bench_with_input(BenchmarkId::new("parallel", n), &ups, |b, ups| {
            b.iter(|| {
                RingBuilder::new()
                    .upstreams(ups.iter().cloned())
                    .parallel(true)
                    .build()
            });
        });
    }
    group.finish();
}

fn bench_route(c: &mut Criterion) {
    let ring = match RingBuilder::new().upstreams(upstreams(32)).build() {
        Ok(ring) => ring,
        Err(e) => panic!("bench ring: {e}"),
    };
    let keys: Vec<String> = (0..10_000).map(|i| format!("/api/v1/items/{i}")).collect();

    let mut group = c.benchmark_group("ring_route");
    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("10k_keys", |b| {
        b.iter(|| {
            keys.iter()
                .filter(|k| ring.route(k.as_bytes()).is_ok())
                .count()
        });
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_route);
criterion_main!(benches);
