//! # Slot tables
//!
//! A ViewModel exposes its bindable state as named [`ObservableValue`] fields
//! ("slots"). Rust has no runtime field reflection, so each ViewModel type
//! declares an explicit [`SlotTable`] mapping a slot name to an accessor:
//!
//! ```rust
//! use bindery_core::prelude::*;
//!
//! #[derive(Default)]
//! struct Player {
//!     score: ObservableValue<i32>,
//!     name: ObservableValue<String>,
//! }
//!
//! impl ViewModel for Player {
//!     fn slots() -> SlotTable<Self> {
//!         slots!(Player {
//!             "Score" => score,
//!             "Name" => name,
//!         })
//!     }
//! }
//!
//! let table = Player::slots();
//! assert!(table.contains("Score"));
//! assert_eq!(table.names().collect::<Vec<_>>(), ["Score", "Name"]);
//! ```
//!
//! Accessors are stored type-erased, so a lookup by name can be checked
//! against the value type a caller expects at bind time.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::ObservableValue;

pub(crate) type Accessor<T> = Arc<dyn Fn(&T) -> &(dyn Any + 'static) + Send + Sync>;

fn erase<T, F>(f: F) -> Accessor<T>
where
    T: 'static,
    F: Fn(&T) -> &(dyn Any + 'static) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Declares which named slots a ViewModel type exposes.
pub trait ViewModel: Sized + Send + Sync + 'static {
    fn slots() -> SlotTable<Self>;
}

/// Name → accessor map for the slots of a ViewModel type `T`.
///
/// Names keep their declaration order. Inserting an existing name replaces
/// its accessor in place.
pub struct SlotTable<T> {
    entries: Vec<(&'static str, Accessor<T>)>,
}

impl<T: 'static> SlotTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Declare slot `name`, reached through `accessor`.
    pub fn insert<P, F>(&mut self, name: &'static str, accessor: F) -> &mut Self
    where
        P: 'static,
        F: Fn(&T) -> &ObservableValue<P> + Send + Sync + 'static,
    {
        let erased = erase(move |vm: &T| {
            let slot: &(dyn Any + 'static) = accessor(vm);
            slot
        });
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => {
                log::warn!(
                    "slot '{}.{name}' declared twice; keeping the last accessor",
                    std::any::type_name::<T>()
                );
                entry.1 = erased;
            }
            None => self.entries.push((name, erased)),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.accessor(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up slot `name` on `vm`, untyped.
    pub fn resolve<'a>(&self, vm: &'a T, name: &str) -> Option<&'a (dyn Any + 'static)> {
        self.accessor(name).map(|get| get(vm))
    }

    pub(crate) fn accessor(&self, name: &str) -> Option<&Accessor<T>> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, get)| get)
    }
}

impl<T: 'static> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SlotTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(n, _)| n))
            .finish()
    }
}

/// Build a [`SlotTable`] from `"Name" => field` pairs.
///
/// Every field must be an [`ObservableValue`] of some value type.
#[macro_export]
macro_rules! slots {
    ($vm:ty { $($name:literal => $field:ident),* $(,)? }) => {{
        #[allow(unused_mut)]
        let mut table = $crate::slots::SlotTable::<$vm>::new();
        $( table.insert($name, |vm: &$vm| &vm.$field); )*
        table
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Form {
        title: ObservableValue<String>,
        count: ObservableValue<u32>,
    }

    impl ViewModel for Form {
        fn slots() -> SlotTable<Self> {
            crate::slots!(Form { "Title" => title, "Count" => count })
        }
    }

    fn form() -> Form {
        Form {
            title: ObservableValue::new("draft".into()),
            count: ObservableValue::new(3),
        }
    }

    #[test]
    fn resolve_finds_declared_slot() {
        let table = Form::slots();
        let vm = form();

        let slot = table.resolve(&vm, "Count").unwrap();
        let count = slot.downcast_ref::<ObservableValue<u32>>().unwrap();
        assert_eq!(count.get(), 3);
        assert!(slot.downcast_ref::<ObservableValue<i64>>().is_none());
    }

    #[test]
    fn unknown_name_resolves_to_none() {
        let table = Form::slots();
        assert!(table.resolve(&form(), "count").is_none());
        assert!(!table.contains("Missing"));
    }

    #[test]
    fn redeclaring_keeps_order_and_replaces() {
        let mut table = Form::slots();
        table.insert("Title", |vm: &Form| &vm.title);
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), ["Title", "Count"]);
    }

    #[test]
    fn debug_lists_names() {
        assert_eq!(format!("{:?}", Form::slots()), r#"["Title", "Count"]"#);
    }
}
