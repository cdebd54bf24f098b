//! Heap objects created by `New`.
//!
//! Objects are reference counted: an object lives as long as any `Object`
//! value or `Field` handle into it. Reference cycles are never collected.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Mainfold;

/// Positional fields tagged with a type id.
#[derive(Debug)]
pub struct Object {
    type_id: u32,
    fields: Vec<Mainfold>,
}

/// Shared handle to an `Object`.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    pub fn new(type_id: u32, fields: Vec<Mainfold>) -> Self {
        ObjectRef(Rc::new(RefCell::new(Object { type_id, fields })))
    }

    #[inline]
    pub fn type_id(&self) -> u32 {
        self.0.borrow().type_id
    }

    /// Number of fields; fixed at creation.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn field(&self, index: usize) -> Option<Mainfold> {
        self.0.borrow().fields.get(index).cloned()
    }

    /// Overwrite a field, returning the previous value.
    ///
    /// Returns `None` without storing if `index` is out of range.
    pub fn replace_field(&self, index: usize, value: Mainfold) -> Option<Mainfold> {
        let mut object = self.0.borrow_mut();
        let slot = object.fields.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    #[inline]
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

// Fields are omitted: an object may (indirectly) contain itself.
impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object = self.0.borrow();
        f.debug_struct("ObjectRef")
            .field("type_id", &object.type_id)
            .field("fields", &object.fields.len())
            .finish()
    }
}
