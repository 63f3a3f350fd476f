//! Core pool engine

use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::builder::PoolBuilder;
use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::item::PoolItem;
use crate::stats::{PoolStats, StatsTracker};

/// Capacity-hinted pool of reusable, lifecycle-managed items.
///
/// The pool exclusively owns every item it creates, in creation order, and
/// hands out shared [`Rc`] handles. Capacity is a soft hint: the pool grows
/// past it whenever demand exceeds it, and only the auto-dispose policy
/// shrinks it back.
///
/// Every scanning operation ([`get`](Self::get), [`all_active`](Self::all_active),
/// [`recover`](Self::recover), [`recover_all`](Self::recover_all)) walks the
/// items newest-to-oldest and compacts as it goes; there is no separate
/// compaction entry point.
///
/// The pool is single-threaded and tick-driven: no internal locking, every
/// operation completes synchronously. Sharing one across threads requires
/// external synchronization supplied by the caller.
///
/// # Examples
///
/// ```
/// use esox_poolkit::{Pool, PoolItem, Pooled, Reusable};
///
/// #[derive(PartialEq)]
/// struct Particle {
///     kind: u8,
/// }
/// impl Reusable for Particle {}
///
/// let mut pool = Pool::from_factory(|| Some(Pooled::new(Particle { kind: 0 })))
///     .capacity(2)
///     .build()
///     .unwrap();
///
/// let p = pool.get().unwrap();
/// assert!(p.is_active());
///
/// pool.recover(&p).unwrap();
/// assert!(!p.is_active());
///
/// // the recovered particle is reused instead of growing the pool
/// let q = pool.get().unwrap();
/// assert!(q.is_active());
/// assert_eq!(pool.len(), 1);
/// ```
pub struct Pool<T: PoolItem> {
    items: Vec<Rc<T>>,
    factory: Box<dyn FnMut() -> Option<T>>,
    config: PoolConfig,
    stats: StatsTracker,
    disposed: bool,
}

impl<T: PoolItem + fmt::Debug> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("items", &self.items)
            .field("config", &self.config)
            .field("stats", &self.stats)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl<T: PoolItem> Pool<T> {
    /// Start building a pool from a factory callback.
    ///
    /// The factory is invoked whenever the pool must grow; returning `None`
    /// surfaces [`PoolError::FactoryReturnedNone`] to the triggering call.
    pub fn from_factory(factory: impl FnMut() -> Option<T> + 'static) -> PoolBuilder<T> {
        PoolBuilder::new(factory)
    }

    pub(crate) fn with_factory(
        factory: Box<dyn FnMut() -> Option<T>>,
        config: PoolConfig,
    ) -> PoolResult<Self> {
        let mut pool = Self {
            items: Vec::with_capacity(config.capacity),
            factory,
            config,
            stats: StatsTracker::default(),
            disposed: false,
        };

        if pool.config.fill_eagerly {
            for _ in 0..pool.config.capacity {
                pool.synthesize(false)?;
            }
        }

        Ok(pool)
    }

    /// Check an item out of the pool.
    ///
    /// Scans newest-to-oldest for an idle item and activates it; when none
    /// is found the factory synthesizes a new one, which is activated and
    /// appended. Growth is the only path past capacity and is unbounded.
    ///
    /// # Errors
    ///
    /// [`PoolError::FactoryReturnedNone`] if the pool needed to grow and the
    /// factory yielded nothing (pool state is left unchanged), or
    /// [`PoolError::Disposed`] on a disposed pool.
    pub fn get(&mut self) -> PoolResult<Rc<T>> {
        self.check_disposed()?;

        let found = self.scan().find(|item| !item.is_active());
        match found {
            Some(item) => {
                item.activate()?;
                self.stats.reused += 1;
                Ok(item)
            }
            None => self.synthesize(true),
        }
    }

    /// Lazily iterate the currently-active items, newest first.
    ///
    /// The view is restartable (call again for a fresh pass) and never
    /// snapshots: items recovered or evicted between passes disappear from
    /// the next one. Iterating compacts the pool the same way [`get`](Self::get)
    /// does, so observing the pool can shrink it.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] on a disposed pool.
    pub fn all_active(&mut self) -> PoolResult<impl Iterator<Item = Rc<T>> + '_> {
        self.check_disposed()?;
        Ok(self.scan().filter(|item| item.is_active()))
    }

    /// Recover every active item structurally equal to `target`.
    ///
    /// Matching is by equality, not identity: if several distinct items
    /// compare equal, the scan recovers all of them.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] on a disposed pool.
    pub fn recover(&mut self, target: &T) -> PoolResult<()>
    where
        T: PartialEq,
    {
        self.check_disposed()?;

        let mut recovered = 0;
        for item in self.scan() {
            if item.is_active() && *item == *target {
                item.recover()?;
                recovered += 1;
            }
        }
        self.stats.recovered += recovered;
        Ok(())
    }

    /// Recover every currently-active item.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] on a disposed pool.
    pub fn recover_all(&mut self) -> PoolResult<()> {
        self.check_disposed()?;

        let mut recovered = 0;
        for item in self.scan() {
            if item.is_active() {
                item.recover()?;
                recovered += 1;
            }
        }
        self.stats.recovered += recovered;
        Ok(())
    }

    /// Dispose every owned item and empty the collection.
    ///
    /// The pool is not reusable afterwards: later operations surface
    /// [`PoolError::Disposed`]. Calling `dispose` again is a no-op. Dropping
    /// a pool without calling this leaves the items' disposal hooks un-run;
    /// teardown is explicit by design.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        let disposed_items = self.items.len();
        for item in self.items.drain(..) {
            item.dispose();
        }
        self.disposed = true;
        debug!(disposed_items, "pool disposed");
    }

    /// Number of items currently owned, active or not.
    ///
    /// Plain read; unlike the scanning operations it does not compact.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the pool currently owns no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of currently-active items. Plain read; does not compact.
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_active()).count()
    }

    /// The configuration this pool was built with.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Snapshot of the pool's activity counters.
    pub fn stats(&self) -> PoolStats {
        self.stats
            .snapshot(self.len(), self.active_count(), self.config.capacity)
    }

    /// Create one item via the factory, initialize it through the matching
    /// lifecycle path, and append it. Nothing is appended on failure.
    fn synthesize(&mut self, active: bool) -> PoolResult<Rc<T>> {
        let item = (self.factory)().ok_or(PoolError::FactoryReturnedNone)?;
        let item = Rc::new(item);

        if active {
            item.activate()?;
        } else {
            item.recover()?;
        }

        self.items.push(Rc::clone(&item));
        self.stats.created += 1;
        Ok(item)
    }

    fn scan(&mut self) -> Scan<'_, T> {
        let Self {
            items,
            config,
            stats,
            ..
        } = self;
        let cursor = items.len();
        Scan {
            items,
            config,
            stats,
            cursor,
        }
    }

    fn check_disposed(&self) -> PoolResult<()> {
        if self.disposed {
            Err(PoolError::Disposed("Pool"))
        } else {
            Ok(())
        }
    }
}

/// Newest-to-oldest traversal that compacts as it goes: when auto-dispose is
/// on and the pool exceeds capacity, idle items are evicted and disposed;
/// items whose backing resource is gone are dropped silently. Everything
/// else is yielded.
struct Scan<'a, T: PoolItem> {
    items: &'a mut Vec<Rc<T>>,
    config: &'a PoolConfig,
    stats: &'a mut StatsTracker,
    cursor: usize,
}

impl<T: PoolItem> Iterator for Scan<'_, T> {
    type Item = Rc<T>;

    fn next(&mut self) -> Option<Rc<T>> {
        while self.cursor > 0 {
            self.cursor -= 1;
            let index = self.cursor;
            let item = Rc::clone(&self.items[index]);

            if self.config.auto_dispose
                && !item.is_active()
                && self.items.len() > self.config.capacity
            {
                // the source dropped these without disposal; disposing here
                // keeps the hook contract for surplus items
                self.items.remove(index);
                item.dispose();
                self.stats.evicted += 1;
                trace!(index, "evicted surplus idle item");
            } else if !item.is_valid() {
                self.items.remove(index);
                self.stats.dropped_invalid += 1;
                trace!(index, "dropped item with destroyed backing resource");
            } else {
                return Some(item);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Pooled, Reusable};
    use std::cell::Cell;

    #[derive(Debug)]
    struct Probe {
        tag: u32,
        valid: Cell<bool>,
        activations: Cell<u32>,
        recoveries: Cell<u32>,
        disposals: Cell<u32>,
    }

    impl Probe {
        fn tagged(tag: u32) -> Self {
            Self {
                tag,
                valid: Cell::new(true),
                activations: Cell::new(0),
                recoveries: Cell::new(0),
                disposals: Cell::new(0),
            }
        }
    }

    impl Reusable for Probe {
        fn on_activate(&self) {
            self.activations.set(self.activations.get() + 1);
        }

        fn on_recover(&self) {
            self.recoveries.set(self.recoveries.get() + 1);
        }

        fn on_dispose(&self) {
            self.disposals.set(self.disposals.get() + 1);
        }

        fn is_valid(&self) -> bool {
            self.valid.get()
        }
    }

    impl PartialEq for Probe {
        fn eq(&self, other: &Self) -> bool {
            self.tag == other.tag
        }
    }

    /// Factory handing out probes with increasing tags.
    fn numbered() -> impl FnMut() -> Option<Pooled<Probe>> + 'static {
        let mut next = 0;
        move || {
            next += 1;
            Some(Pooled::new(Probe::tagged(next)))
        }
    }

    #[test]
    fn grows_one_item_per_unmatched_get() {
        let mut pool = Pool::from_factory(numbered()).capacity(4).build().unwrap();

        for expected in 1..=4 {
            pool.get().unwrap();
            assert_eq!(pool.len(), expected);
            assert!(pool.active_count() <= pool.len());
        }
        assert_eq!(pool.stats().created, 4);
        assert_eq!(pool.stats().reused, 0);
    }

    #[test]
    fn reuses_recovered_items_before_growing() {
        let mut pool = Pool::from_factory(numbered()).capacity(1).build().unwrap();

        let a = pool.get().unwrap();
        let b = pool.get().unwrap();
        assert!(a.is_active() && b.is_active());
        assert_eq!(pool.len(), 2);

        pool.recover(&a).unwrap();
        assert!(!a.is_active());

        let again = pool.get().unwrap();
        assert!(Rc::ptr_eq(&a, &again));
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().reused, 1);
    }

    #[test]
    fn factory_yielding_nothing_fails_get_without_growth() {
        let mut fuel = 1;
        let mut pool = Pool::from_factory(move || {
            if fuel > 0 {
                fuel -= 1;
                Some(Pooled::new(Probe::tagged(1)))
            } else {
                None
            }
        })
        .build()
        .unwrap();

        let a = pool.get().unwrap();
        assert_eq!(pool.get().unwrap_err(), PoolError::FactoryReturnedNone);
        assert_eq!(pool.len(), 1);
        assert!(a.is_active());
    }

    #[test]
    fn filled_build_prepopulates_inactive_items() {
        let mut pool = Pool::from_factory(numbered())
            .capacity(3)
            .filled()
            .build()
            .unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.all_active().unwrap().count(), 0);
        assert_eq!(pool.stats().created, 3);

        // pre-created items went through the recovery path, never activation
        let first = pool.get().unwrap();
        assert_eq!(first.activations.get(), 1);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn all_active_is_lazy_and_restartable() {
        let mut pool = Pool::from_factory(numbered()).capacity(4).build().unwrap();

        let a = pool.get().unwrap();
        let _b = pool.get().unwrap();
        assert_eq!(pool.all_active().unwrap().count(), 2);

        pool.recover(&a).unwrap();
        let tags: Vec<u32> = pool.all_active().unwrap().map(|item| item.tag).collect();
        assert_eq!(tags, [2]);
    }

    #[test]
    fn recover_matches_every_equal_active_item() {
        let mut pool = Pool::from_factory(|| Some(Pooled::new(Probe::tagged(7))))
            .build()
            .unwrap();

        let a = pool.get().unwrap();
        let b = pool.get().unwrap();

        pool.recover(&a).unwrap();
        assert!(!a.is_active());
        assert!(!b.is_active());
        assert_eq!(pool.stats().recovered, 2);
    }

    #[test]
    fn recover_all_idles_the_whole_pool() {
        let mut pool = Pool::from_factory(numbered()).capacity(3).build().unwrap();
        for _ in 0..3 {
            pool.get().unwrap();
        }

        pool.recover_all().unwrap();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn auto_dispose_trims_idle_surplus_and_disposes_it() {
        let mut pool = Pool::from_factory(numbered())
            .capacity(2)
            .auto_dispose()
            .build()
            .unwrap();

        let items: Vec<_> = (0..3).map(|_| pool.get().unwrap()).collect();
        assert_eq!(pool.len(), 3);

        for item in &items {
            pool.recover(item).unwrap();
        }
        pool.get().unwrap();

        assert!(pool.len() <= 2);
        // the evicted surplus item was disposed, not leaked
        let disposals: u32 = items.iter().map(|item| item.disposals.get()).sum();
        assert_eq!(disposals, 1);
        assert_eq!(pool.stats().evicted, 1);
    }

    #[test]
    fn without_auto_dispose_the_pool_never_shrinks() {
        let mut pool = Pool::from_factory(numbered()).capacity(1).build().unwrap();

        for _ in 0..3 {
            pool.get().unwrap();
        }
        pool.recover_all().unwrap();
        pool.get().unwrap();

        assert_eq!(pool.len(), 3);
        assert_eq!(pool.stats().evicted, 0);
    }

    #[test]
    fn invalid_items_are_dropped_silently_during_scans() {
        let mut pool = Pool::from_factory(numbered()).build().unwrap();

        let a = pool.get().unwrap();
        pool.recover(&a).unwrap();
        a.valid.set(false);

        let b = pool.get().unwrap();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.stats().dropped_invalid, 1);
        // dropped, not disposed: no hook ran
        assert_eq!(a.disposals.get(), 0);
    }

    #[test]
    fn dispose_empties_the_pool_and_rejects_further_use() {
        let mut pool = Pool::from_factory(numbered()).build().unwrap();
        let a = pool.get().unwrap();

        pool.dispose();
        assert_eq!(pool.len(), 0);
        assert_eq!(a.disposals.get(), 1);
        assert_eq!(a.recoveries.get(), 1);

        assert_eq!(pool.get().unwrap_err(), PoolError::Disposed("Pool"));
        assert_eq!(pool.recover_all().unwrap_err(), PoolError::Disposed("Pool"));
        assert!(pool.all_active().is_err());

        // a second dispose is a no-op
        pool.dispose();
        assert_eq!(a.disposals.get(), 1);
    }

    #[test]
    fn stats_snapshot_reflects_live_state() {
        let mut pool = Pool::from_factory(numbered()).capacity(2).build().unwrap();

        pool.get().unwrap();
        pool.get().unwrap();
        let stats = pool.stats();

        assert_eq!(stats.created, 2);
        assert_eq!(stats.live_items, 2);
        assert_eq!(stats.active_items, 2);
        assert_eq!(stats.capacity, 2);
        assert!((stats.utilization() - 1.0).abs() < f64::EPSILON);
    }
}
