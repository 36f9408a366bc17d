//! # Binding registries
//!
//! A [`BindingRegistry<T>`] is a type-level list of `(slot, handler)`
//! subscriptions for the ViewModel type `T`. It is built once, then replayed
//! against whichever instance is active:
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use bindery_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Player {
//!     score: ObservableValue<i32>,
//! }
//!
//! impl ViewModel for Player {
//!     fn slots() -> SlotTable<Self> {
//!         slots!(Player { "Score" => score })
//!     }
//! }
//!
//! let shown = Arc::new(AtomicI32::new(0));
//! let mut registry = BindingRegistry::<Player>::new();
//! registry
//!     .add("Score", {
//!         let shown = shown.clone();
//!         move |_old: &i32, new: &i32| shown.store(*new, Ordering::SeqCst)
//!     })
//!     .unwrap();
//!
//! let vm = Player::default();
//! registry.bind(Some(&vm)).unwrap();
//! vm.score.set(5);
//! assert_eq!(shown.load(Ordering::SeqCst), 5);
//!
//! registry.unbind(Some(&vm)).unwrap();
//! vm.score.set(9);
//! assert_eq!(shown.load(Ordering::SeqCst), 5);
//! ```
//!
//! - Unknown slot names are rejected by [`BindingRegistry::add`].
//! - A slot whose value type differs from the handler's is rejected when the
//!   registry is first applied to an instance. `bind`/`unbind` check every
//!   entry before touching any, so a rejected call leaves the instance as it
//!   was.
//! - The registry keeps no reference to instances. Binding the same instance
//!   twice attaches every handler twice; each `unbind` removes one attachment.

use std::fmt;
use std::sync::Arc;

use crate::error::BindError;
use crate::observable::{ChangeHandler, ObservableValue};
use crate::slots::{SlotTable, ViewModel};

type Resolver<T, P> = Arc<dyn Fn(&T) -> Option<&ObservableValue<P>> + Send + Sync>;

fn resolver<T, P, F>(f: F) -> Resolver<T, P>
where
    T: 'static,
    P: 'static,
    F: Fn(&T) -> Option<&ObservableValue<P>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One registered `(slot, handler)` pair, erased over the slot's value type.
trait Entry<T>: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, vm: &T) -> Result<(), BindError>;
    fn attach(&self, vm: &T) -> Result<(), BindError>;
    fn detach(&self, vm: &T) -> Result<(), BindError>;
}

struct SlotBinding<T, P> {
    name: String,
    resolve: Resolver<T, P>,
    handler: ChangeHandler<P>,
}

impl<T: 'static, P: 'static> SlotBinding<T, P> {
    fn slot<'a>(&self, vm: &'a T) -> Result<&'a ObservableValue<P>, BindError> {
        (self.resolve)(vm).ok_or_else(|| BindError::type_mismatch::<T, P>(&self.name))
    }
}

impl<T: 'static, P: 'static> Entry<T> for SlotBinding<T, P> {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, vm: &T) -> Result<(), BindError> {
        self.slot(vm).map(|_| ())
    }

    fn attach(&self, vm: &T) -> Result<(), BindError> {
        self.slot(vm)?.add_handler(&self.handler);
        Ok(())
    }

    fn detach(&self, vm: &T) -> Result<(), BindError> {
        self.slot(vm)?.remove_handler(&self.handler);
        Ok(())
    }
}

/// Named slot subscriptions for ViewModel type `T`, replayable on any instance.
pub struct BindingRegistry<T> {
    slots: SlotTable<T>,
    entries: Vec<Box<dyn Entry<T>>>,
}

impl<T: ViewModel> BindingRegistry<T> {
    /// Registry over the slots `T` declares.
    pub fn new() -> Self {
        Self::with_slots(T::slots())
    }
}

impl<T: ViewModel> Default for BindingRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> BindingRegistry<T> {
    /// Registry over an explicit slot table.
    pub fn with_slots(slots: SlotTable<T>) -> Self {
        Self {
            slots,
            entries: Vec::new(),
        }
    }

    /// Subscribe `handler` to the slot called `name`.
    ///
    /// Fails with [`BindError::UnknownSlot`] if `T` declares no such slot.
    /// Whether the slot really holds an `ObservableValue<P>` is checked on
    /// the first `bind`/`unbind`.
    pub fn add<P: 'static>(
        &mut self,
        name: &str,
        handler: impl Fn(&P, &P) + Send + Sync + 'static,
    ) -> Result<&mut Self, BindError> {
        let Some(get) = self.slots.accessor(name).cloned() else {
            let err = BindError::unknown_slot::<T>(name);
            log::error!("{err}");
            return Err(err);
        };
        let resolve = resolver(move |vm: &T| get(vm).downcast_ref::<ObservableValue<P>>());
        Ok(self.push(name, resolve, ChangeHandler::new(handler)))
    }

    /// Subscribe `handler` to a slot reached through a typed accessor.
    ///
    /// The slot's type is checked by the compiler, so this cannot fail.
    /// `name` is only used in logs and [`names`](Self::names).
    pub fn add_slot<P, F>(
        &mut self,
        name: &str,
        accessor: F,
        handler: impl Fn(&P, &P) + Send + Sync + 'static,
    ) -> &mut Self
    where
        P: 'static,
        F: Fn(&T) -> &ObservableValue<P> + Send + Sync + 'static,
    {
        let resolve = resolver(move |vm: &T| Some(accessor(vm)));
        self.push(name, resolve, ChangeHandler::new(handler))
    }

    fn push<P: 'static>(
        &mut self,
        name: &str,
        resolve: Resolver<T, P>,
        handler: ChangeHandler<P>,
    ) -> &mut Self {
        log::debug!(
            "registered binding {}.{name} ({} total)",
            std::any::type_name::<T>(),
            self.entries.len() + 1
        );
        self.entries.push(Box::new(SlotBinding {
            name: name.to_owned(),
            resolve,
            handler,
        }));
        self
    }

    /// Attach every registered handler to `vm`. `None` is a no-op.
    ///
    /// Nothing is attached if any entry fails to resolve.
    pub fn bind(&self, vm: Option<&T>) -> Result<(), BindError> {
        let Some(vm) = vm else {
            return Ok(());
        };
        self.validate(vm)?;
        for entry in &self.entries {
            entry.attach(vm)?;
        }
        log::debug!(
            "bound {} handler(s) to {}",
            self.entries.len(),
            std::any::type_name::<T>()
        );
        Ok(())
    }

    /// Detach every registered handler from `vm`. `None` is a no-op, and so
    /// is detaching a handler that was never attached.
    pub fn unbind(&self, vm: Option<&T>) -> Result<(), BindError> {
        let Some(vm) = vm else {
            return Ok(());
        };
        self.validate(vm)?;
        for entry in &self.entries {
            entry.detach(vm)?;
        }
        log::debug!(
            "unbound {} handler(s) from {}",
            self.entries.len(),
            std::any::type_name::<T>()
        );
        Ok(())
    }

    /// Resolve every entry against `vm` without attaching anything.
    pub fn validate(&self, vm: &T) -> Result<(), BindError> {
        self.entries
            .iter()
            .try_for_each(|entry| entry.check(vm))
            .inspect_err(|err| log::warn!("binding rejected: {err}"))
    }

    pub fn slots(&self) -> &SlotTable<T> {
        &self.slots
    }

    /// Slot names in registration order; a name repeats once per `add`.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: 'static> fmt::Debug for BindingRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("view_model", &std::any::type_name::<T>())
            .field("bindings", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
