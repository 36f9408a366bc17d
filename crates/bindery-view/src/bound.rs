use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bindery_core::{BindError, BindingRegistry, ChangeHandler, ObservableValue, ViewModel};

use crate::ViewModelRef;

type Context<T> = Option<ViewModelRef<T>>;

/// Reaction to a binding-context swap: `(registry, old, new)`.
type ContextHook<T> = dyn Fn(&BindingRegistry<T>, Option<&T>, Option<&T>) + Send + Sync;

/// Keeps a [`BindingRegistry`] bound to whichever ViewModel is the current
/// binding context.
///
/// The context is itself an [`ObservableValue`]. On the first
/// [`set_context`](Self::set_context) the view attaches one handler to it
/// that runs the context hook, by default [`rebind`](Self::rebind): unbind
/// the previous ViewModel, bind the next. Dropping the view runs
/// [`teardown`](Self::teardown).
pub struct BoundView<T: ViewModel> {
    registry: Arc<BindingRegistry<T>>,
    context: ObservableValue<Context<T>>,
    on_context_change: ChangeHandler<Context<T>>,
    attached: AtomicBool,
}

impl<T: ViewModel> BoundView<T> {
    /// Take ownership of a fully built registry. No more bindings can be
    /// added after this.
    pub fn new(registry: BindingRegistry<T>) -> Self {
        Self::with_context_hook(registry, Self::rebind)
    }

    /// Like [`new`](Self::new), but run `hook` on every context swap instead
    /// of the plain [`rebind`](Self::rebind). A hook that still wants the
    /// registry moved to the new ViewModel calls `rebind` itself.
    pub fn with_context_hook<F>(registry: BindingRegistry<T>, hook: F) -> Self
    where
        F: Fn(&BindingRegistry<T>, Option<&T>, Option<&T>) + Send + Sync + 'static,
    {
        let registry = Arc::new(registry);
        let hook: Arc<ContextHook<T>> = Arc::new(hook);
        let on_context_change = {
            let registry = Arc::clone(&registry);
            ChangeHandler::new(move |old: &Context<T>, new: &Context<T>| {
                hook(&registry, old.as_deref(), new.as_deref())
            })
        };
        Self {
            registry,
            context: ObservableValue::new(None),
            on_context_change,
            attached: AtomicBool::new(false),
        }
    }

    /// Default context hook: unbind `old`, then bind `new`.
    pub fn rebind(registry: &BindingRegistry<T>, old: Option<&T>, new: Option<&T>) {
        if let Err(err) = registry.unbind(old) {
            log::error!("failed to unbind previous context: {err}");
        }
        if let Err(err) = registry.bind(new) {
            log::error!("failed to bind new context: {err}");
        }
    }

    /// Make `vm` the binding context.
    ///
    /// `vm` is checked against the registry first; if it does not fit, the
    /// current context stays bound and the error is returned. Setting the
    /// instance that is already the context does nothing.
    pub fn set_context(&self, vm: Context<T>) -> Result<(), BindError> {
        if let Some(vm) = &vm {
            self.registry.validate(vm)?;
        }
        if !self.attached.swap(true, Ordering::AcqRel) {
            self.context.add_handler(&self.on_context_change);
        }
        self.context.set(vm);
        Ok(())
    }

    pub fn context(&self) -> Context<T> {
        self.context.get()
    }

    /// The context slot, for callers that want to observe context swaps.
    pub fn context_value(&self) -> &ObservableValue<Context<T>> {
        &self.context
    }

    pub fn registry(&self) -> &BindingRegistry<T> {
        &self.registry
    }

    /// Stop following the context and unbind the current ViewModel.
    ///
    /// Safe to call more than once. A later `set_context` starts following
    /// again.
    pub fn teardown(&self) -> Result<(), BindError> {
        if !self.attached.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.context.remove_handler(&self.on_context_change);
        let current = self.context.get();
        self.context.set(None);
        self.registry.unbind(current.as_deref())
    }
}

impl<T: ViewModel> Drop for BoundView<T> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            log::error!("teardown of {} view failed: {err}", std::any::type_name::<T>());
        }
    }
}

impl<T: ViewModel> fmt::Debug for BoundView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundView")
            .field("registry", &self.registry)
            .field("context", &self.context.get())
            .field("attached", &self.attached.load(Ordering::Acquire))
            .finish()
    }
}

/// Something that presents a ViewModel through a [`BoundView`].
pub trait View {
    type Model: ViewModel;

    fn bound_view(&self) -> &BoundView<Self::Model>;

    fn binding_context(&self) -> Context<Self::Model> {
        self.bound_view().context()
    }

    fn set_binding_context(&self, vm: Context<Self::Model>) -> Result<(), BindError> {
        self.bound_view().set_context(vm)
    }
}
