//! Basic pooling examples

use esox_poolkit::{Pool, Pooled, Reusable};

#[derive(PartialEq)]
struct Particle {
    kind: u8,
}

impl Reusable for Particle {
    fn on_activate(&self) {
        println!("   spawned a particle of kind {}", self.kind);
    }

    fn on_recover(&self) {
        println!("   particle of kind {} back in the pool", self.kind);
    }
}

fn main() {
    println!("=== EsoxSolutions.PoolKit - Basic Examples ===\n");

    // Example 1: lazy pool
    lazy_pool();

    // Example 2: eager fill
    eager_fill();

    // Example 3: auto-dispose eviction
    auto_dispose();

    // Example 4: stats
    stats();
}

fn lazy_pool() {
    println!("1. Lazy Pool:");
    let mut pool = Pool::from_factory(|| Some(Pooled::new(Particle { kind: 1 })))
        .capacity(4)
        .build()
        .unwrap();

    println!("   Starts empty: {} items", pool.len());

    let p = pool.get().unwrap();
    println!("   After one get: {} items", pool.len());

    pool.recover(&p).unwrap();
    let _reused = pool.get().unwrap();
    println!("   Reused instead of growing: {} items\n", pool.len());
}

fn eager_fill() {
    println!("2. Eager Fill:");
    let pool = Pool::from_factory(|| Some(Pooled::new(Particle { kind: 2 })))
        .capacity(3)
        .filled()
        .build()
        .unwrap();

    println!("   Pre-populated: {} items", pool.len());
    println!("   Active after build: {}\n", pool.active_count());
}

fn auto_dispose() {
    println!("3. Auto-Dispose:");
    let mut pool = Pool::from_factory(|| Some(Pooled::new(Particle { kind: 3 })))
        .capacity(2)
        .auto_dispose()
        .build()
        .unwrap();

    let burst: Vec<_> = (0..5).map(|_| pool.get().unwrap()).collect();
    println!("   Burst grew the pool to {} items", pool.len());

    for p in &burst {
        pool.recover(p).unwrap();
    }
    pool.get().unwrap();
    println!("   After recovery the pool trimmed back to {} items\n", pool.len());
}

fn stats() {
    println!("4. Stats:");
    let mut pool = Pool::from_factory(|| Some(Pooled::new(Particle { kind: 4 })))
        .capacity(4)
        .build()
        .unwrap();

    let p = pool.get().unwrap();
    pool.recover(&p).unwrap();
    pool.get().unwrap();

    for (key, value) in pool.stats().export() {
        println!("   {key}: {value}");
    }
}
