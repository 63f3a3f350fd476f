//! Benchmarks for the pool's hot path

use criterion::{Criterion, criterion_group, criterion_main};
use esox_poolkit::{Pool, Pooled, Reusable};

#[derive(PartialEq)]
struct Shot;
impl Reusable for Shot {}

fn get_recover_cycle(c: &mut Criterion) {
    c.bench_function("get_recover_cycle", |b| {
        let mut pool = Pool::from_factory(|| Some(Pooled::new(Shot)))
            .capacity(64)
            .filled()
            .build()
            .unwrap();

        b.iter(|| {
            let shot = pool.get().unwrap();
            pool.recover(&shot).unwrap();
        });
    });
}

fn burst_then_recover_all(c: &mut Criterion) {
    c.bench_function("burst_then_recover_all", |b| {
        let mut pool = Pool::from_factory(|| Some(Pooled::new(Shot)))
            .capacity(128)
            .filled()
            .build()
            .unwrap();

        b.iter(|| {
            for _ in 0..128 {
                pool.get().unwrap();
            }
            pool.recover_all().unwrap();
        });
    });
}

criterion_group!(benches, get_recover_cycle, burst_then_recover_all);
criterion_main!(benches);
