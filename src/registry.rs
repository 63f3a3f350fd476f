//! Explicit service registry

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::warn;

use crate::errors::{PoolError, PoolResult};

/// Process-wide service registry with an explicit install/teardown
/// lifecycle.
///
/// One slot per service type, filled by [`install`](Self::install) during
/// startup and emptied by [`teardown`](Self::teardown) (or per-type
/// [`remove`](Self::remove)) during shutdown. The registry is handed by
/// reference into the constructors that need its services; there is no
/// global instance and nothing is created lazily on first access.
///
/// Lookups and installs are internally locked, so a registry can be shared
/// across threads even though the services it carries decide their own
/// synchronization.
///
/// # Examples
///
/// ```
/// use esox_poolkit::Registry;
///
/// struct Audio {
///     volume: u8,
/// }
///
/// let registry = Registry::new();
/// registry.install(Audio { volume: 80 }).unwrap();
///
/// let audio = registry.get::<Audio>().unwrap();
/// assert_eq!(audio.volume, 80);
///
/// registry.teardown();
/// assert!(registry.get::<Audio>().is_none());
/// ```
pub struct Registry {
    services: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Install a service, returning the shared handle.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidArgument`] if a service of this type is already
    /// installed; the existing one is kept.
    pub fn install<S: Any + Send + Sync>(&self, service: S) -> PoolResult<Arc<S>> {
        let mut services = self.services.write();
        let id = TypeId::of::<S>();

        if services.contains_key(&id) {
            warn!(service = type_name::<S>(), "service already installed");
            return Err(PoolError::InvalidArgument(format!(
                "service already installed: {}",
                type_name::<S>()
            )));
        }

        let service = Arc::new(service);
        services.insert(id, service.clone());
        Ok(service)
    }

    /// The installed service of type `S`, if any.
    pub fn get<S: Any + Send + Sync>(&self) -> Option<Arc<S>> {
        self.services
            .read()
            .get(&TypeId::of::<S>())
            .cloned()
            .and_then(|service| service.downcast::<S>().ok())
    }

    /// Remove the service of type `S`; true if one was installed.
    ///
    /// Holders of previously-returned handles keep theirs; the slot just
    /// frees up.
    pub fn remove<S: Any + Send + Sync>(&self) -> bool {
        self.services.write().remove(&TypeId::of::<S>()).is_some()
    }

    /// Empty every slot.
    pub fn teardown(&self) {
        self.services.write().clear();
    }

    /// Number of installed services.
    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Clock {
        frequency: u32,
    }

    struct Net;

    #[test]
    fn installed_services_come_back_typed() {
        let registry = Registry::new();
        registry.install(Clock { frequency: 60 }).unwrap();

        let clock = registry.get::<Clock>().unwrap();
        assert_eq!(clock.frequency, 60);
        assert!(registry.get::<Net>().is_none());
    }

    #[test]
    fn duplicate_installs_keep_the_first() {
        let registry = Registry::new();
        registry.install(Clock { frequency: 60 }).unwrap();

        let err = registry.install(Clock { frequency: 144 }).unwrap_err();
        assert!(matches!(err, PoolError::InvalidArgument(_)));
        assert_eq!(registry.get::<Clock>().unwrap().frequency, 60);
    }

    #[test]
    fn remove_frees_the_slot_for_reinstall() {
        let registry = Registry::new();
        registry.install(Clock { frequency: 60 }).unwrap();

        assert!(registry.remove::<Clock>());
        assert!(!registry.remove::<Clock>());

        registry.install(Clock { frequency: 144 }).unwrap();
        assert_eq!(registry.get::<Clock>().unwrap().frequency, 144);
    }

    #[test]
    fn teardown_clears_everything() {
        let registry = Registry::new();
        registry.install(Clock { frequency: 60 }).unwrap();
        registry.install(Net).unwrap();
        assert_eq!(registry.len(), 2);

        registry.teardown();
        assert!(registry.is_empty());
        assert!(registry.get::<Clock>().is_none());
    }

    #[test]
    fn a_registry_can_be_shared_across_threads() {
        let registry = Registry::new();
        registry.install(Clock { frequency: 60 }).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    assert_eq!(registry.get::<Clock>().unwrap().frequency, 60);
                });
            }
        });
    }
}
