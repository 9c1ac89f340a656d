#![forbid(unsafe_code)]

//! Observable value wrapper with change notification.
//!
//! [`Observable<T>`] carries the two notification streams of the system
//! (the current tour step and the orb-visibility flag) with
//! most-recent-value semantics: subscribers see each change once, in
//! registration order, and new reads always return the latest value.
//!
//! # Design
//!
//! The value lives in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). A publish that compares equal to the current value
//! (by `PartialEq`) is a no-op. Subscribers are held as weak references;
//! dropping the returned [`Subscription`] guard unsubscribes, and dead
//! entries are pruned lazily during the next notification.
//!
//! # Failure Modes
//!
//! - **Re-entrant publish from a subscriber**: supported; the interior
//!   borrow is released before callbacks run.
//! - **Leaked guards**: a `Subscription` stored forever keeps its callback
//!   alive; nothing else does.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;
use web_time::Instant;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct ObservableInner<T> {
    value: T,
    version: u64,
    /// Weak subscriber refs; dead entries are pruned on notify.
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` creates a new handle to the **same** inner
/// state; both handles see the same value and share subscribers.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable with the given initial value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Publish a new value. If it differs from the current value (by
    /// `PartialEq`), the version is incremented and all live subscribers
    /// are notified in registration order.
    pub fn set(&self, value: T) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
            true
        };
        if changed {
            self.notify();
        }
    }

    /// Subscribe to value changes. The callback is invoked with a
    /// reference to the new value each time it changes.
    ///
    /// Returns a [`Subscription`] guard; dropping it unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        let weak = Rc::downgrade(&strong);
        self.inner.borrow_mut().subscribers.push(weak);
        // `Rc<dyn Fn(&T)>` cannot coerce to `Rc<dyn Any>` directly, so the
        // guard type-erases through a Box instead.
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Current version. Increments by 1 on each value-changing publish.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (dead ones included until pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Notify live subscribers and prune dead ones.
    fn notify(&self) {
        // Collect live callbacks first so no borrow is held during calls.
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|w| w.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(|w| w.upgrade())
                .collect()
        };

        if callbacks.is_empty() {
            return;
        }

        let value = self.inner.borrow().value.clone();
        let started = Instant::now();
        for cb in &callbacks {
            cb(&value);
        }
        trace!(
            subscribers = callbacks.len(),
            duration_us = started.elapsed().as_micros() as u64,
            "stream propagation"
        );
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard makes the callback unreachable; the observable's
/// weak reference fails to upgrade on the next notification and is pruned.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
