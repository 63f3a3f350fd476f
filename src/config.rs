//! Pool configuration

/// Resolved configuration for a [`Pool`](crate::Pool).
///
/// Produced by [`PoolBuilder`](crate::PoolBuilder) and immutable once the
/// pool is built.
///
/// # Examples
///
/// ```
/// use esox_poolkit::{Pool, Pooled, Reusable};
///
/// struct Particle;
/// impl Reusable for Particle {}
///
/// let pool = Pool::from_factory(|| Some(Pooled::new(Particle)))
///     .capacity(8)
///     .auto_dispose()
///     .build()
///     .unwrap();
///
/// assert_eq!(pool.config().capacity, 8);
/// assert!(pool.config().auto_dispose);
/// assert!(!pool.config().fill_eagerly);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    /// Soft capacity hint: sizes the backing collection's reservation, is
    /// the eager-fill count, and is the threshold above which auto-dispose
    /// evicts idle items. Growth past it is not capped.
    pub capacity: usize,

    /// Evict (and dispose) idle surplus items beyond `capacity` during
    /// routine scans.
    pub auto_dispose: bool,

    /// Pre-populate the pool with `capacity` inactive items at build time
    /// instead of creating them lazily on first use.
    pub fill_eagerly: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            capacity: 0,
            auto_dispose: false,
            fill_eagerly: false,
        }
    }
}
