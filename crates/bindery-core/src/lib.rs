//! # Observable values and binding registries
//!
//! Bindery wires a data model ("ViewModel") to a presentation layer without
//! either side naming the other's concrete type. There are two pieces:
//!
//! - `ObservableValue<T>` — a thread-safe value slot that notifies attached
//!   handlers with `(old, new)` only when a write really changes it.
//! - `BindingRegistry<T>` — a table of named slot subscriptions for a
//!   ViewModel type, replayed on any instance with `bind` / `unbind`.
//!
//! ## Observable values
//!
//! ```rust
//! use bindery_core::*;
//!
//! let hp = ObservableValue::new(10);
//! let on_change = ChangeHandler::new(|old: &i32, new: &i32| {
//!     log::info!("hp {old} -> {new}");
//! });
//! hp.add_handler(&on_change);
//!
//! hp.set(7);  // notifies (10, 7)
//! hp.set(7);  // equal, nothing happens
//! assert_eq!(hp.version(), 1);
//!
//! hp.remove_handler(&on_change);
//! ```
//!
//! Writes compare and store under a lock, and handlers run after the lock is
//! released, on the writer's thread.
//!
//! ## ViewModels
//!
//! A ViewModel declares its slots by name with the `slots!` macro; see the
//! [`slots`] module. Registries look slots up by that name, so a misspelled
//! name fails at registration, and a handler whose value type differs from
//! the slot's fails when first bound. See the [`binder`] module.

pub mod binder;
pub mod error;
pub mod observable;
pub mod prelude;
pub mod slots;
mod tests;

pub use binder::*;
pub use error::*;
pub use observable::*;
pub use slots::*;
