//! Lifecycle contract for pool-managed items

use std::cell::Cell;
use std::fmt;
use std::ops::Deref;

use crate::errors::{PoolError, PoolResult};

/// Capability interface every pool-managed item implements.
///
/// An item moves Inactive -> Active on [`activate`](PoolItem::activate),
/// Active -> Inactive on [`recover`](PoolItem::recover), and from any state
/// to Disposed on [`dispose`](PoolItem::dispose). Disposed is terminal.
///
/// Most types implement this by wrapping themselves in [`Pooled`], which
/// carries the state flags and forwards to the [`Reusable`] hooks.
pub trait PoolItem {
    /// Whether the item is currently checked out.
    fn is_active(&self) -> bool;

    /// Transition the item to Active and run its activation hook.
    ///
    /// Calling this on an already-active item runs the hook again;
    /// re-activation semantics are the caller's responsibility.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] if the item was already disposed.
    fn activate(&self) -> PoolResult<()>;

    /// If the item is active, run its recovery hook and transition it to
    /// Inactive. No-op on an inactive item.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] if the item was already disposed.
    fn recover(&self) -> PoolResult<()>;

    /// Dispose the item permanently.
    ///
    /// Idempotent: the first call runs the recovery side effects (the
    /// recovery hook always precedes the disposal hook), then the disposal
    /// hook, then marks the item disposed. Later calls are no-ops, so the
    /// disposal hook runs exactly once.
    fn dispose(&self);

    /// Whether the item's backing resource still exists.
    ///
    /// Pool scans silently drop items reporting `false`. The default is
    /// `true`; only items bound to an externally-owned resource need to
    /// override this.
    fn is_valid(&self) -> bool {
        true
    }
}

/// Overridable lifecycle hooks for a [`Pooled`] item.
///
/// All hooks default to doing nothing. They are opaque caller-defined side
/// effects: no return value, and the pool does not catch panics raised by
/// them.
pub trait Reusable {
    /// Runs every time the item is activated.
    fn on_activate(&self) {}

    /// Runs when an active item is recovered, before it is marked inactive.
    fn on_recover(&self) {}

    /// Runs exactly once, when the item is disposed.
    fn on_dispose(&self) {}

    /// Whether the backing resource still exists. See [`PoolItem::is_valid`].
    fn is_valid(&self) -> bool {
        true
    }
}

/// Ready-made [`PoolItem`] carrier around a [`Reusable`] value.
///
/// Tracks the active/disposed flags and derefs to the wrapped value. Items
/// start inactive.
///
/// # Examples
///
/// ```
/// use esox_poolkit::{PoolItem, Pooled, Reusable};
///
/// struct Bullet {
///     damage: u32,
/// }
///
/// impl Reusable for Bullet {}
///
/// let bullet = Pooled::new(Bullet { damage: 5 });
/// assert!(!bullet.is_active());
///
/// bullet.activate().unwrap();
/// assert!(bullet.is_active());
/// assert_eq!(bullet.damage, 5);
///
/// bullet.dispose();
/// assert!(bullet.activate().is_err());
/// ```
pub struct Pooled<T: Reusable> {
    inner: T,
    active: Cell<bool>,
    disposed: Cell<bool>,
}

impl<T: Reusable> Pooled<T> {
    /// Wrap a value, starting in the Inactive state.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            active: Cell::new(false),
            disposed: Cell::new(false),
        }
    }

    /// Whether the item has been permanently disposed.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl<T: Reusable> PoolItem for Pooled<T> {
    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn activate(&self) -> PoolResult<()> {
        if self.disposed.get() {
            return Err(PoolError::Disposed("pooled item"));
        }
        // the active flag is visible to the hook
        self.active.set(true);
        self.inner.on_activate();
        Ok(())
    }

    fn recover(&self) -> PoolResult<()> {
        if self.disposed.get() {
            return Err(PoolError::Disposed("pooled item"));
        }
        if !self.active.get() {
            return Ok(());
        }
        self.inner.on_recover();
        self.active.set(false);
        Ok(())
    }

    fn dispose(&self) {
        if self.disposed.get() {
            return;
        }
        if self.active.get() {
            self.inner.on_recover();
            self.active.set(false);
        }
        self.inner.on_dispose();
        self.disposed.set(true);
    }

    fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }
}

impl<T: Reusable> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

/// Structural equality compares the wrapped values only; the lifecycle
/// flags are not part of an item's identity.
impl<T: Reusable + PartialEq> PartialEq for Pooled<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T: Reusable + fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("inner", &self.inner)
            .field("active", &self.active.get())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}
