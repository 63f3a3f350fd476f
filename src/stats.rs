//! Pool activity counters

use std::collections::HashMap;

/// Snapshot of a pool's activity counters.
///
/// Returned by [`Pool::stats`](crate::Pool::stats). Counters are cumulative
/// over the pool's lifetime; the `live_items`/`active_items` fields reflect
/// the moment the snapshot was taken.
///
/// # Examples
///
/// ```
/// use esox_poolkit::{Pool, Pooled, Reusable};
///
/// #[derive(PartialEq)]
/// struct Shot;
/// impl Reusable for Shot {}
///
/// let mut pool = Pool::from_factory(|| Some(Pooled::new(Shot)))
///     .capacity(4)
///     .build()
///     .unwrap();
///
/// let shot = pool.get().unwrap();
/// pool.recover(&shot).unwrap();
/// pool.get().unwrap();
///
/// let stats = pool.stats();
/// assert_eq!(stats.created, 1);
/// assert_eq!(stats.reused, 1);
/// assert_eq!(stats.recovered, 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    /// Items synthesized by the factory, lazily or through eager fill.
    pub created: usize,

    /// Checkouts satisfied by reusing an idle item.
    pub reused: usize,

    /// Items returned to the idle state via recover / recover-all.
    pub recovered: usize,

    /// Surplus idle items evicted (and disposed) by auto-dispose scans.
    pub evicted: usize,

    /// Items dropped because their backing resource was gone.
    pub dropped_invalid: usize,

    /// Items owned by the pool at snapshot time.
    pub live_items: usize,

    /// Items active at snapshot time.
    pub active_items: usize,

    /// The pool's configured capacity hint.
    pub capacity: usize,
}

impl PoolStats {
    /// Active items as a fraction of capacity; 0.0 for a zero-capacity pool.
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.active_items as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Export the counters as printable key/value pairs.
    pub fn export(&self) -> HashMap<String, String> {
        let mut out = HashMap::new();
        out.insert("created".to_string(), self.created.to_string());
        out.insert("reused".to_string(), self.reused.to_string());
        out.insert("recovered".to_string(), self.recovered.to_string());
        out.insert("evicted".to_string(), self.evicted.to_string());
        out.insert(
            "dropped_invalid".to_string(),
            self.dropped_invalid.to_string(),
        );
        out.insert("live_items".to_string(), self.live_items.to_string());
        out.insert("active_items".to_string(), self.active_items.to_string());
        out.insert("capacity".to_string(), self.capacity.to_string());
        out.insert(
            "utilization".to_string(),
            format!("{:.2}", self.utilization()),
        );
        out
    }
}

/// Internal cumulative counters. Single-threaded like the pool itself, so
/// plain integers suffice.
#[derive(Debug, Default)]
pub(crate) struct StatsTracker {
    pub created: usize,
    pub reused: usize,
    pub recovered: usize,
    pub evicted: usize,
    pub dropped_invalid: usize,
}

impl StatsTracker {
    pub fn snapshot(&self, live_items: usize, active_items: usize, capacity: usize) -> PoolStats {
        PoolStats {
            created: self.created,
            reused: self.reused,
            recovered: self.recovered,
            evicted: self.evicted,
            dropped_invalid: self.dropped_invalid,
            live_items,
            active_items,
            capacity,
        }
    }
}
