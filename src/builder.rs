//! Fluent pool construction

use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::item::PoolItem;
use crate::pool::Pool;

/// Accumulates pool configuration ahead of a one-time [`build`](Self::build).
///
/// Obtained from [`Pool::from_factory`]. Every configuration call returns
/// the builder again, so calls chain; `build` finalizes the configuration
/// exactly once and hands back the live pool.
///
/// Keeping the builder and the pool as two separate types means a
/// half-configured pool can never be used, and built-once is enforced
/// rather than asked for.
///
/// # Examples
///
/// ```
/// use esox_poolkit::{Pool, PoolError, Pooled, Reusable};
///
/// #[derive(Debug)]
/// struct Spark;
/// impl Reusable for Spark {}
///
/// let mut builder = Pool::from_factory(|| Some(Pooled::new(Spark)));
/// builder.capacity(4).filled();
///
/// let pool = builder.build().unwrap();
/// assert_eq!(pool.len(), 4);
///
/// // the builder is spent; the first pool keeps working
/// assert_eq!(builder.build().unwrap_err(), PoolError::AlreadyBuilt);
/// ```
pub struct PoolBuilder<T: PoolItem> {
    factory: Option<Box<dyn FnMut() -> Option<T>>>,
    config: PoolConfig,
}

impl<T: PoolItem> PoolBuilder<T> {
    pub(crate) fn new(factory: impl FnMut() -> Option<T> + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            config: PoolConfig::default(),
        }
    }

    /// Set the capacity hint. Also sizes the backing collection's initial
    /// reservation.
    pub fn capacity(&mut self, capacity: usize) -> &mut Self {
        self.config.capacity = capacity;
        self
    }

    /// Enable eviction of idle surplus items once the pool holds more than
    /// its capacity.
    pub fn auto_dispose(&mut self) -> &mut Self {
        self.config.auto_dispose = true;
        self
    }

    /// Pre-populate the pool to capacity with inactive items at build time.
    pub fn filled(&mut self) -> &mut Self {
        self.config.fill_eagerly = true;
        self
    }

    /// Finalize the configuration and return the live pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::AlreadyBuilt`] on any call after the first; the pool
    /// returned by the first call is unaffected.
    /// [`PoolError::FactoryReturnedNone`] if eager fill needed an item the
    /// factory did not produce.
    pub fn build(&mut self) -> PoolResult<Pool<T>> {
        match self.factory.take() {
            Some(factory) => Pool::with_factory(factory, self.config),
            None => Err(PoolError::AlreadyBuilt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Pooled, Reusable};

    #[derive(Debug)]
    struct Widget;
    impl Reusable for Widget {}

    fn factory() -> Option<Pooled<Widget>> {
        Some(Pooled::new(Widget))
    }

    #[test]
    fn defaults_are_lazy_with_zero_capacity() {
        let mut builder = Pool::from_factory(factory);
        let pool = builder.build().unwrap();

        assert_eq!(pool.config(), &PoolConfig::default());
        assert!(pool.is_empty());
    }

    #[test]
    fn chained_calls_accumulate() {
        let pool = Pool::from_factory(factory)
            .capacity(3)
            .auto_dispose()
            .filled()
            .build()
            .unwrap();

        assert_eq!(
            pool.config(),
            &PoolConfig {
                capacity: 3,
                auto_dispose: true,
                fill_eagerly: true,
            }
        );
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn second_build_fails_and_first_pool_survives() {
        let mut builder = Pool::from_factory(factory);
        builder.capacity(1);

        let mut pool = builder.build().unwrap();
        assert_eq!(builder.build().unwrap_err(), PoolError::AlreadyBuilt);

        pool.get().unwrap();
        assert_eq!(pool.len(), 1);
    }
}
