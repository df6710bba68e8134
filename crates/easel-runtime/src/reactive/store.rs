#![forbid(unsafe_code)]

//! Publish/subscribe value cell.
//!
//! # Design
//!
//! [`Store<T>`] is a handle to shared `Rc<RefCell<..>>` state: the value, a
//! version counter, and an insertion-ordered subscriber list. Cloning the
//! handle shares the state.
//!
//! Publishing snapshots the value and the subscriber list, releases the
//! borrow, then calls each subscriber. A `set` issued while a publish is in
//! progress updates the value immediately but queues its notification; the
//! outermost publish drains the queue in order. Every subscriber therefore
//! sees the same sequence of values, with no gaps and no reordering.
//!
//! # Failure Modes
//!
//! - **Transform error in `update`**: the value is left unchanged and the
//!   error is returned to the caller.
//! - **Overlapping `update` calls**: not serialized. Whichever transform
//!   resolves last publishes last and wins. Callers that need ordering must
//!   queue their updates.
//! - **Subscriber panics**: the panic propagates to the caller of `set`;
//!   the publish state is reset so later publishes still run.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};

use super::value::ValueLen;

type Handler<T> = Rc<dyn Fn(&T)>;

/// Opaque token identifying one subscriber of one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct StoreInner<T> {
    value: T,
    version: u64,
    next_subscription: u64,
    subscribers: Vec<(Subscription, Handler<T>)>,
    /// True while a publish loop is delivering notifications.
    publishing: bool,
    /// Version of the value subscribers are currently receiving.
    delivering: u64,
    /// Values set during a publish, awaiting delivery, with their versions.
    queued: VecDeque<(u64, T)>,
}

/// A shared value with ordered change notification.
pub struct Store<T> {
    inner: Rc<RefCell<StoreInner<T>>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Store")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Default + Clone + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Resets the publishing flag even if a subscriber unwinds.
struct PublishGuard<'a, T> {
    inner: &'a RefCell<StoreInner<T>>,
}

impl<T> Drop for PublishGuard<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.publishing = false;
        inner.queued.clear();
    }
}

impl<T: Clone + 'static> Store<T> {
    /// Create a store holding `initial`. There are no subscribers yet, so the
    /// initial publish reaches nobody.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                value: initial,
                version: 0,
                next_subscription: 0,
                subscribers: Vec::new(),
                publishing: false,
                delivering: 0,
                queued: VecDeque::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning.
    ///
    /// `f` must not call `set` on this store.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Number of `set` calls so far (successful `update`s included).
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Version of the value being handed to subscribers right now. Inside a
    /// subscriber this can lag [`version`](Store::version) when later sets
    /// are still queued.
    #[must_use]
    pub fn delivering_version(&self) -> u64 {
        self.inner.borrow().delivering
    }

    /// Replace the value and publish it to every subscriber.
    pub fn set(&self, value: T) {
        let version = {
            let mut inner = self.inner.borrow_mut();
            inner.value = value.clone();
            inner.version += 1;
            let version = inner.version;
            if inner.publishing {
                inner.queued.push_back((version, value));
                tracing::trace!(
                    message = "store.publish.queued",
                    version = inner.version,
                    queued = inner.queued.len(),
                );
                return;
            }
            inner.publishing = true;
            version
        };
        self.drain(version, value);
    }

    fn drain(&self, version: u64, first: T) {
        let _guard = PublishGuard {
            inner: self.inner.as_ref(),
        };
        let mut next = Some((version, first));
        while let Some((version, value)) = next {
            let handlers: Vec<Handler<T>> = {
                let mut inner = self.inner.borrow_mut();
                inner.delivering = version;
                tracing::trace!(
                    message = "store.publish",
                    version,
                    subscribers = inner.subscribers.len(),
                );
                inner.subscribers.iter().map(|(_, h)| Rc::clone(h)).collect()
            };
            for handler in handlers {
                handler(&value);
            }
            next = self.inner.borrow_mut().queued.pop_front();
        }
    }

    /// Replace the value with the result of an asynchronous transform.
    ///
    /// The transform receives a clone of the value current at call time. On
    /// success the result is published exactly like [`set`](Store::set); on
    /// failure the value is untouched and the error is returned.
    pub async fn update<F, Fut, E>(&self, transform: F) -> Result<(), E>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let current = self.get();
        match transform(current).await {
            Ok(next) => {
                self.set(next);
                Ok(())
            }
            Err(err) => {
                tracing::debug!(message = "store.update.failed", version = self.version());
                Err(err)
            }
        }
    }

    /// Register `handler`, call it once with the current value, and keep it
    /// for every later publish.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Subscription {
        let handler: Handler<T> = Rc::new(handler);
        let current = self.get();
        handler(&current);

        let mut inner = self.inner.borrow_mut();
        let id = Subscription(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, handler));
        id
    }

    /// Remove a subscriber. Returns `true` if it was registered.
    ///
    /// A subscriber removed during a publish may still receive the value
    /// being delivered; it receives nothing after that.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(id, _)| *id != subscription);
        inner.subscribers.len() < before
    }

    /// A non-owning handle.
    #[must_use]
    pub fn downgrade(&self) -> WeakStore<T> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T: ValueLen + Clone + 'static> Store<T> {
    /// Element count of the current value.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.borrow().value.value_len()
    }

    /// Whether the current value has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Non-owning counterpart of [`Store`], used by node listeners so a bound node
/// does not keep its store alive.
pub struct WeakStore<T> {
    inner: Weak<RefCell<StoreInner<T>>>,
}

impl<T> Clone for WeakStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for WeakStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStore")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<T> WeakStore<T> {
    /// Recover a strong handle if the store still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Store<T>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}
