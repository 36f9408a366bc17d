pub use crate::binder::BindingRegistry;
pub use crate::error::BindError;
pub use crate::observable::{ChangeHandler, ObservableValue};
pub use crate::slots;
pub use crate::slots::{SlotTable, ViewModel};
