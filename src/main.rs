// EsoxSolutions.PoolKit
// Lifecycle-managed object pooling for tick-driven applications

// This is just a binary wrapper - the actual library is in lib.rs
// Run examples with: cargo run --example basic

use esox_poolkit::{Pool, PoolItem, Pooled, Reusable};

struct Bullet;
impl Reusable for Bullet {}

fn main() {
    println!("=== EsoxSolutions.PoolKit ===");
    println!("See demos/ directory for usage examples");
    println!("Run: cargo run --example basic");
    println!();

    // Quick demo
    println!("Quick Demo:");
    let mut pool = Pool::from_factory(|| Some(Pooled::new(Bullet)))
        .capacity(4)
        .build()
        .expect("fresh builder");

    let bullet = pool.get().expect("factory always produces");
    println!("  Checked out a bullet, active: {}", bullet.is_active());

    pool.recover_all().expect("pool is live");
    println!("  Recovered, active: {}", bullet.is_active());
    println!("  Pool size: {}", pool.len());
}
