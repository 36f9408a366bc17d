use thiserror::Error;

/// Shape mismatch between a binding registry and the ViewModel it targets.
///
/// Both variants are programmer errors; they are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// No slot with this name is declared for the ViewModel type.
    #[error("cannot find bindable slot '{view_model}.{name}'")]
    UnknownSlot {
        view_model: &'static str,
        name: String,
    },
    /// The slot exists but does not hold an `ObservableValue<expected>`.
    #[error("invalid bindable slot type '{view_model}.{name}': expected ObservableValue<{expected}>")]
    TypeMismatch {
        view_model: &'static str,
        name: String,
        expected: &'static str,
    },
}

impl BindError {
    pub fn unknown_slot<T: ?Sized>(name: &str) -> Self {
        Self::UnknownSlot {
            view_model: std::any::type_name::<T>(),
            name: name.to_owned(),
        }
    }

    pub fn type_mismatch<T: ?Sized, P: ?Sized>(name: &str) -> Self {
        Self::TypeMismatch {
            view_model: std::any::type_name::<T>(),
            name: name.to_owned(),
            expected: std::any::type_name::<P>(),
        }
    }

    /// Name of the slot the error is about.
    pub fn slot(&self) -> &str {
        match self {
            Self::UnknownSlot { name, .. } | Self::TypeMismatch { name, .. } => name,
        }
    }
}
