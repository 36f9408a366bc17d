use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared handle to a ViewModel instance, compared by identity.
///
/// Two handles are equal only if they point at the same instance, so setting
/// a binding context to a different but structurally equal ViewModel is
/// still a change.
pub struct ViewModelRef<T>(Arc<T>);

impl<T> ViewModelRef<T> {
    pub fn new(vm: T) -> Self {
        Self(Arc::new(vm))
    }

    pub fn as_arc(&self) -> &Arc<T> {
        &self.0
    }
}

impl<T> Clone for ViewModelRef<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> PartialEq for ViewModelRef<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for ViewModelRef<T> {}

impl<T> Deref for ViewModelRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> From<Arc<T>> for ViewModelRef<T> {
    fn from(vm: Arc<T>) -> Self {
        Self(vm)
    }
}

impl<T> fmt::Debug for ViewModelRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", std::any::type_name::<T>(), Arc::as_ptr(&self.0))
    }
}
