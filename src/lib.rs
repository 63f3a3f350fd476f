//! # EsoxSolutions.PoolKit
//!
//! Lifecycle-managed object pooling for single-threaded, tick-driven
//! applications, with the supporting cast such applications keep reaching
//! for: typed pub/sub dispatch, state machines, tick timers, an explicit
//! service registry, and small random/formatting helpers.
//!
//! ## Features
//!
//! - Object pool with explicit activate/recover/dispose item lifecycles
//! - Fluent builder with build-once enforcement
//! - Lazy growth or eager pre-population, soft capacity with auto-dispose
//!   eviction of idle surplus items
//! - Pool activity counters with plain text export
//! - Type-keyed publish/subscribe dispatcher with typed topic handles
//! - State machines driven by transition-returning update hooks
//! - Tick-driven delay/interval timers with pause/cancel handles
//! - Service registry with an explicit install/teardown lifecycle
//! - Precondition-checked random helpers and abbreviated number formatting
//!
//! ## Quick Start
//!
//! ```rust
//! use esox_poolkit::{Pool, PoolItem, Pooled, Reusable};
//!
//! struct Bullet;
//! impl Reusable for Bullet {}
//!
//! let mut pool = Pool::from_factory(|| Some(Pooled::new(Bullet)))
//!     .capacity(16)
//!     .build()
//!     .unwrap();
//!
//! let bullet = pool.get().unwrap();
//! assert!(bullet.is_active());
//!
//! pool.recover_all().unwrap();
//! assert!(!bullet.is_active());
//! ```

mod builder;
mod config;
mod dispatcher;
mod errors;
mod item;
mod machine;
mod pool;
pub mod random;
mod registry;
mod stats;
mod timers;
mod unitnum;

pub use builder::PoolBuilder;
pub use config::PoolConfig;
pub use dispatcher::{Dispatcher, Subscription, Topic};
pub use errors::{PoolError, PoolResult};
pub use item::{PoolItem, Pooled, Reusable};
pub use machine::{State, StateMachine, Transition};
pub use pool::Pool;
pub use registry::Registry;
pub use stats::PoolStats;
pub use timers::{TimerHandle, Timers};
pub use unitnum::UnitNumber;
