//! Thread-safe observable value with change notification.
//!
//! An [`ObservableValue<T>`] is a single mutable slot. Writes compare the
//! incoming value against the stored one under a lock; only a real change is
//! stored, and the attached [`ChangeHandler`]s are then invoked with
//! `(old, new)` after the lock has been released.
//!
//! # Invariants
//!
//! 1. `set(v)` where `v == current` is a no-op: no store, no version bump,
//!    no notification.
//! 2. `version` increments by exactly 1 on each value-changing write.
//! 3. Handlers are invoked in attachment order, on the writer's thread.
//! 4. No lock is held while handler code runs, so a handler may read or
//!    write the same container without deadlocking.
//! 5. Each `(old, new)` pair is taken atomically with its write, so the pairs
//!    of concurrent writers always chain in write order. Delivery happens
//!    after the lock is released, so handlers of racing writers may run in a
//!    different order than the writes were stored.
//!
//! # Failure Modes
//!
//! - **Slow handler**: blocks the writer that triggered it. There is no
//!   timeout; dispatch from inside the handler if asynchrony is needed.
//! - **Handler leak**: handlers stay attached until `remove_handler` or
//!   `clear_handlers` is called. Nothing is collected automatically.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use smallvec::SmallVec;

type HandlerFn<T> = dyn Fn(&T, &T) + Send + Sync;

/// A change callback receiving `(old, new)`.
///
/// Cloning a `ChangeHandler` yields the same handler: equality is identity
/// of the shared allocation, so a clone can be used to detach the original.
pub struct ChangeHandler<T> {
    f: Arc<HandlerFn<T>>,
}

impl<T> ChangeHandler<T> {
    pub fn new(f: impl Fn(&T, &T) + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }

    /// Invoke the handler directly.
    pub fn call(&self, old: &T, new: &T) {
        (self.f)(old, new)
    }
}

impl<T> Clone for ChangeHandler<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> PartialEq for ChangeHandler<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl<T> Eq for ChangeHandler<T> {}

impl<T> fmt::Debug for ChangeHandler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChangeHandler")
            .field(&Arc::as_ptr(&self.f).cast::<()>())
            .finish()
    }
}

struct Inner<T> {
    value: T,
    version: u64,
    handlers: SmallVec<[ChangeHandler<T>; 2]>,
}

/// A value slot that notifies attached handlers when it really changes.
pub struct ObservableValue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> ObservableValue<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Inner {
                value,
                version: 0,
                handlers: SmallVec::new(),
            }),
        }
    }

    /// Access the current value by reference while holding the lock.
    ///
    /// `f` must not write to this container.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.lock().value)
    }

    /// Number of value-changing writes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.lock().version
    }

    /// Attach a handler. Attaching the same handler twice makes it fire twice.
    pub fn add_handler(&self, handler: &ChangeHandler<T>) {
        let mut inner = self.inner.lock();
        inner.handlers.push(handler.clone());
        log::trace!("handler attached ({} total)", inner.handlers.len());
    }

    /// Detach the most recent attachment of `handler`.
    ///
    /// Returns `false` (and does nothing) if it is not attached.
    pub fn remove_handler(&self, handler: &ChangeHandler<T>) -> bool {
        let mut inner = self.inner.lock();
        match inner.handlers.iter().rposition(|h| h == handler) {
            Some(idx) => {
                inner.handlers.remove(idx);
                log::trace!("handler detached ({} left)", inner.handlers.len());
                true
            }
            None => false,
        }
    }

    pub fn clear_handlers(&self) {
        self.inner.lock().handlers.clear();
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.lock().handlers.len()
    }
}

impl<T: Clone> ObservableValue<T> {
    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.lock().value.clone()
    }
}

impl<T: Clone + PartialEq> ObservableValue<T> {
    /// Store `next` if it differs from the current value, then notify.
    pub fn set(&self, next: T) {
        let (old, handlers) = {
            let mut inner = self.inner.lock();
            if inner.value == next {
                return;
            }
            let old = std::mem::replace(&mut inner.value, next.clone());
            inner.version += 1;
            (old, inner.handlers.clone())
        };
        Self::notify(&handlers, &old, &next);
    }

    /// Mutate the value in place. Handlers fire only if the result differs
    /// from the value before `f` ran.
    ///
    /// `f` runs under the lock and must not write to this container.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (old, new, handlers) = {
            let mut inner = self.inner.lock();
            let old = inner.value.clone();
            f(&mut inner.value);
            if inner.value == old {
                return;
            }
            inner.version += 1;
            (old, inner.value.clone(), inner.handlers.clone())
        };
        Self::notify(&handlers, &old, &new);
    }

    fn notify(handlers: &[ChangeHandler<T>], old: &T, new: &T) {
        log::trace!("notifying {} handler(s)", handlers.len());
        for h in handlers {
            h.call(old, new);
        }
    }
}

impl<T: Default> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for ObservableValue<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("ObservableValue")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("handler_count", &inner.handlers.len())
            .finish()
    }
}

/// Renders the current value's `Debug` form; an absent `Option` shows `None`.
impl<T: fmt::Debug> fmt::Display for ObservableValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner.lock().value)
    }
}

#[cfg(feature = "serde")]
impl<T: serde::Serialize> serde::Serialize for ObservableValue<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.lock().value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T: serde::Deserialize<'de>> serde::Deserialize<'de> for ObservableValue<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::new)
    }
}
