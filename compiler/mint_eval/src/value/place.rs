//! Storage handles behind `Mainfold::Field`.

use std::fmt;

use super::{Mainfold, ObjectRef};
use crate::{LocalScope, Scope};

/// A storage location: a slot in a scope or a field of an object.
///
/// Scope slots are append-only and objects never change size, so an index
/// stays valid for as long as the handle keeps its owner alive.
#[derive(Clone)]
pub enum Place {
    Slot {
        scope: LocalScope<Scope>,
        slot: usize,
    },
    ObjectField {
        object: ObjectRef,
        index: usize,
    },
}

impl Place {
    /// Read the stored value.
    pub fn load(&self) -> Mainfold {
        let value = match self {
            Place::Slot { scope, slot } => scope.borrow().get(*slot),
            Place::ObjectField { object, index } => object.field(*index),
        };
        value.unwrap_or_default()
    }

    /// Overwrite the stored value in place.
    ///
    /// A `Field` is loaded first, so storage never holds a reference.
    pub fn store(&self, value: Mainfold) {
        let value = value.load();
        // Drop the old value only after the borrow is released.
        let _previous = match self {
            Place::Slot { scope, slot } => scope.borrow_mut().replace(*slot, value),
            Place::ObjectField { object, index } => object.replace_field(*index, value),
        };
    }

    /// Whether two handles name the same storage.
    pub fn same_location(&self, other: &Place) -> bool {
        match (self, other) {
            (Place::Slot { scope: a, slot: i }, Place::Slot { scope: b, slot: j }) => {
                a.ptr_eq(b) && i == j
            }
            (
                Place::ObjectField {
                    object: a,
                    index: i,
                },
                Place::ObjectField {
                    object: b,
                    index: j,
                },
            ) => a.ptr_eq(b) && i == j,
            _ => false,
        }
    }
}

impl fmt::Debug for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Place::Slot { slot, .. } => write!(f, "Slot({slot})"),
            Place::ObjectField { object, index } => {
                write!(f, "ObjectField({}, {index})", object.type_id())
            }
        }
    }
}
