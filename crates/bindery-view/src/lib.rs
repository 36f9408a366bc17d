//! # View-side binding
//!
//! A view owns one [`BindingRegistry`] for its ViewModel type and a
//! "binding context": the ViewModel instance it currently shows. Changing the
//! context unbinds the registry from the old instance and binds it to the
//! new one.
//!
//! ```rust
//! use bindery_core::prelude::*;
//! use bindery_view::{BoundView, ViewModelRef};
//!
//! #[derive(Default)]
//! struct Counter {
//!     count: ObservableValue<u32>,
//! }
//!
//! impl ViewModel for Counter {
//!     fn slots() -> SlotTable<Self> {
//!         slots!(Counter { "Count" => count })
//!     }
//! }
//!
//! let mut registry = BindingRegistry::<Counter>::new();
//! registry
//!     .add("Count", |old: &u32, new: &u32| log::info!("count {old} -> {new}"))
//!     .unwrap();
//!
//! let view = BoundView::new(registry);
//! let first = ViewModelRef::new(Counter::default());
//! view.set_context(Some(first.clone())).unwrap();
//! first.count.set(1);
//!
//! // Swapping detaches `first`.
//! view.set_context(Some(ViewModelRef::new(Counter::default()))).unwrap();
//! assert_eq!(first.count.handler_count(), 0);
//! ```

mod bound;
mod view_model_ref;

pub use bindery_core::{BindError, BindingRegistry, ViewModel};
pub use bound::{BoundView, View};
pub use view_model_ref::ViewModelRef;
