//! Type-keyed publish/subscribe dispatch

use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::errors::{PoolError, PoolResult};

/// Broadcast dispatcher keyed by message type.
///
/// Each message type gets one [`Topic`]; the dispatcher maps the type's
/// identifier to an opaque handle and downcasts at the boundary. Delivery is
/// synchronous, in subscription order, with no contract beyond call-order
/// delivery.
///
/// # Examples
///
/// ```
/// use esox_poolkit::Dispatcher;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Damage(u32);
///
/// let mut dispatcher = Dispatcher::new();
/// let total = Rc::new(Cell::new(0));
///
/// let sink = Rc::clone(&total);
/// let topic = dispatcher.topic::<Damage>().unwrap();
/// let _sub = topic.subscribe(move |msg| sink.set(sink.get() + msg.0)).unwrap();
///
/// dispatcher.post(&Damage(3)).unwrap();
/// dispatcher.post(&Damage(4)).unwrap();
/// assert_eq!(total.get(), 7);
/// ```
pub struct Dispatcher {
    topics: HashMap<TypeId, Box<dyn AnyTopic>>,
    disposed: bool,
}

/// Capability surface the dispatcher keeps for an untyped topic entry.
trait AnyTopic {
    fn as_any(&self) -> &dyn Any;
    fn shut(&self);
}

impl<M: 'static> AnyTopic for Topic<M> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn shut(&self) {
        self.close();
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            topics: HashMap::new(),
            disposed: false,
        }
    }

    /// The topic for message type `M`, created on first use.
    ///
    /// The returned handle is cheap to clone and stays connected to this
    /// dispatcher's topic until [`dispose`](Self::dispose).
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] on a disposed dispatcher.
    pub fn topic<M: 'static>(&mut self) -> PoolResult<Topic<M>> {
        self.check_disposed()?;

        let id = TypeId::of::<M>();
        if let Some(existing) = self.downcast::<M>(id) {
            return Ok(existing);
        }

        let topic = Topic::<M>::new();
        self.topics.insert(id, Box::new(topic.clone()));
        Ok(topic)
    }

    /// Broadcast `msg` to the subscribers of `M`'s topic.
    ///
    /// Posting a type nobody has registered is a no-op.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] if the dispatcher is disposed, or if the
    /// topic was closed out from under it.
    pub fn post<M: 'static>(&mut self, msg: &M) -> PoolResult<()> {
        self.check_disposed()?;

        match self.downcast::<M>(TypeId::of::<M>()) {
            Some(topic) => topic.publish(msg),
            None => Ok(()),
        }
    }

    /// Broadcast `msg`, then close `M`'s topic: subscribers are detached
    /// and later publishes fail.
    ///
    /// # Errors
    ///
    /// Same conditions as [`post`](Self::post).
    pub fn post_final<M: 'static>(&mut self, msg: &M) -> PoolResult<()> {
        self.check_disposed()?;

        if let Some(topic) = self.downcast::<M>(TypeId::of::<M>()) {
            topic.publish(msg)?;
            topic.close();
        }
        Ok(())
    }

    /// Close every topic and drop the registry. Further use surfaces
    /// [`PoolError::Disposed`]; calling `dispose` again is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for (_, topic) in self.topics.drain() {
            topic.shut();
        }
        self.disposed = true;
    }

    fn downcast<M: 'static>(&self, id: TypeId) -> Option<Topic<M>> {
        self.topics
            .get(&id)
            .and_then(|entry| entry.as_any().downcast_ref::<Topic<M>>())
            .cloned()
    }

    fn check_disposed(&self) -> PoolResult<()> {
        if self.disposed {
            Err(PoolError::Disposed("Dispatcher"))
        } else {
            Ok(())
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed publish/subscribe handle for one message type.
///
/// Handles are cheap clones of the same underlying topic. Subscribers are
/// plain callbacks invoked synchronously on every publish, in subscription
/// order.
pub struct Topic<M> {
    inner: Rc<TopicInner<M>>,
}

struct TopicInner<M> {
    subscribers: RefCell<Vec<Subscriber<M>>>,
    next_id: Cell<u64>,
    closed: Cell<bool>,
}

struct Subscriber<M> {
    id: u64,
    callback: Rc<dyn Fn(&M)>,
}

impl<M: 'static> Topic<M> {
    fn new() -> Self {
        Self {
            inner: Rc::new(TopicInner {
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                closed: Cell::new(false),
            }),
        }
    }

    /// Attach a callback. It stays attached for the lifetime of the
    /// returned [`Subscription`] guard.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] on a closed topic.
    pub fn subscribe(&self, callback: impl Fn(&M) + 'static) -> PoolResult<Subscription<M>> {
        self.check_closed()?;

        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(callback),
        });

        Ok(Subscription {
            topic: Rc::downgrade(&self.inner),
            id,
        })
    }

    /// Deliver `msg` to every subscriber, in subscription order.
    ///
    /// Callbacks may subscribe or cancel reentrantly; the delivery pass
    /// uses the subscriber list as it stood when the publish began.
    ///
    /// # Errors
    ///
    /// [`PoolError::Disposed`] on a closed topic.
    pub fn publish(&self, msg: &M) -> PoolResult<()> {
        self.check_closed()?;

        let callbacks: Vec<Rc<dyn Fn(&M)>> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|sub| Rc::clone(&sub.callback))
            .collect();
        for callback in callbacks {
            callback(msg);
        }
        Ok(())
    }

    /// Detach every subscriber and refuse further publishes.
    pub fn close(&self) {
        self.inner.closed.set(true);
        self.inner.subscribers.borrow_mut().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Number of currently-attached subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.borrow().len()
    }

    fn check_closed(&self) -> PoolResult<()> {
        if self.inner.closed.get() {
            Err(PoolError::Disposed("Topic"))
        } else {
            Ok(())
        }
    }
}

impl<M> Clone for Topic<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Guard for one subscriber; dropping it (or calling
/// [`cancel`](Self::cancel)) detaches the callback.
pub struct Subscription<M> {
    topic: Weak<TopicInner<M>>,
    id: u64,
}

impl<M> Subscription<M> {
    /// Detach the callback now.
    pub fn cancel(self) {
        // Drop does the work
    }
}

impl<M> Drop for Subscription<M> {
    fn drop(&mut self) {
        if let Some(inner) = self.topic.upgrade() {
            inner.subscribers.borrow_mut().retain(|sub| sub.id != self.id);
        }
    }
}
