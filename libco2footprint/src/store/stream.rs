//! Latest-value broadcast stream
//!
//! Holds the most recent value and an ordered list of observers. A new
//! observer is called with the current value before `subscribe` returns;
//! afterwards every published value reaches all observers synchronously,
//! in the order they subscribed.
//!
//! Deliveries are serialised: a replay and a publish never interleave, so
//! each observer sees values in publication order. Observers may read the
//! stream or unsubscribe, but must not publish or subscribe on the stream
//! that is calling them.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::error::{Result, StoreError};

type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: T,
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
    closed: bool,
}

/// Shared handle to a latest-value stream
///
/// Clones refer to the same stream.
pub struct StateStream<T> {
    inner: Arc<Mutex<Inner<T>>>,
    delivery: Arc<Mutex<()>>,
}

impl<T> Clone for StateStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            delivery: Arc::clone(&self.delivery),
        }
    }
}

fn lock<T>(inner: &Mutex<T>) -> MutexGuard<'_, T> {
    // An observer panicking must not wedge the stream for everyone else
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<T: Clone + Send + 'static> StateStream<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                value: initial,
                observers: Vec::new(),
                next_id: 0,
                closed: false,
            })),
            delivery: Arc::new(Mutex::new(())),
        }
    }

    /// Latest published value
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Closed` once the stream has been closed.
    pub fn value(&self) -> Result<T> {
        let inner = lock(&self.inner);
        if inner.closed {
            return Err(StoreError::Closed.into());
        }
        Ok(inner.value.clone())
    }

    /// Register `observer` and replay the current value to it
    ///
    /// Subscribing to a closed stream returns an inactive subscription and
    /// never calls the observer.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let observer: Observer<T> = Arc::new(observer);
        let _delivery = lock(&self.delivery);

        let (id, current) = {
            let mut inner = lock(&self.inner);
            if inner.closed {
                return Subscription::detached();
            }
            let id = inner.next_id;
            inner.next_id += 1;
            inner.observers.push((id, Arc::clone(&observer)));
            (id, inner.value.clone())
        };

        observer(&current);

        let weak: Weak<Mutex<Inner<T>>> = Arc::downgrade(&self.inner);
        Subscription {
            id,
            remove: Some(Box::new(move |id| {
                if let Some(inner) = weak.upgrade() {
                    let mut inner = lock(&inner);
                    let before = inner.observers.len();
                    inner.observers.retain(|(observer_id, _)| *observer_id != id);
                    inner.observers.len() != before
                } else {
                    false
                }
            })),
        }
    }

    /// Store `value` as the latest and deliver it to every observer
    ///
    /// Observers are called outside the state lock, so they may read the stream
    /// or unsubscribe. Publishing to a closed stream does nothing.
    pub fn publish(&self, value: T) {
        let _delivery = lock(&self.delivery);
        self.deliver(value);
    }

    /// Publish `f(latest)`
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let _delivery = lock(&self.delivery);
        let next = {
            let inner = lock(&self.inner);
            if inner.closed {
                return;
            }
            f(&inner.value)
        };
        self.deliver(next);
    }

    /// Caller holds the delivery lock
    fn deliver(&self, value: T) {
        let observers: Vec<Observer<T>> = {
            let mut inner = lock(&self.inner);
            if inner.closed {
                return;
            }
            inner.value = value.clone();
            inner
                .observers
                .iter()
                .map(|(_, observer)| Arc::clone(observer))
                .collect()
        };

        for observer in observers {
            observer(&value);
        }
    }

    pub fn observer_count(&self) -> usize {
        lock(&self.inner).observers.len()
    }

    /// Detach all observers and refuse further reads
    pub fn close(&self) {
        let mut inner = lock(&self.inner);
        inner.closed = true;
        inner.observers.clear();
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }
}

/// Handle returned by [`StateStream::subscribe`]
///
/// Dropping the handle keeps the observer attached; call
/// [`Subscription::unsubscribe`] to stop delivery.
pub struct Subscription {
    id: u64,
    remove: Option<Box<dyn Fn(u64) -> bool + Send + Sync>>,
}

impl Subscription {
    fn detached() -> Self {
        Self { id: 0, remove: None }
    }

    /// Stop delivery to this observer; calling it again has no effect
    pub fn unsubscribe(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove(self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.remove.is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
