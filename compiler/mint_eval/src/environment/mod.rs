//! Scope chain for name resolution and variable storage.
//!
//! Uses a scope stack (not cloning) for scope management. The top of the
//! stack is the current scope; each scope links to at most one parent.
//! Under dynamic scoping the parent is always the scope below it on the
//! stack, under lexical scoping a called body's parent is the scope its
//! `IR` value captured.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use mint_ir::Name;

use crate::{Mainfold, Place};

/// A single-threaded scope wrapper for reference-counted interior mutability.
///
/// All scope allocations go through `LocalScope::new()`. `Field` handles
/// into a scope hold one of these, so a scope's storage outlives its time
/// on the stack for as long as a handle into it survives.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope: named, append-only storage slots.
#[derive(Default)]
pub struct Scope {
    /// Name -> slot index (`FxHashMap` for faster hashing with `Name` keys).
    names: FxHashMap<Name, usize>,
    slots: Vec<Mainfold>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Declare `name` bound to `None`, or return its existing slot.
    pub fn declare(&mut self, name: Name) -> usize {
        if let Some(&slot) = self.names.get(&name) {
            return slot;
        }
        let slot = self.slots.len();
        self.slots.push(Mainfold::None);
        self.names.insert(name, slot);
        slot
    }

    /// Slot bound to `name` in this scope only.
    #[inline]
    pub fn slot_of(&self, name: Name) -> Option<usize> {
        self.names.get(&name).copied()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<Mainfold> {
        self.slots.get(slot).cloned()
    }

    /// Overwrite a slot, returning the previous value.
    pub fn replace(&mut self, slot: usize, value: Mainfold) -> Option<Mainfold> {
        self.slots
            .get_mut(slot)
            .map(|stored| std::mem::replace(stored, value))
    }

    #[inline]
    pub fn parent(&self) -> Option<LocalScope<Scope>> {
        self.parent.clone()
    }

    /// Number of declared names.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// Slots and parents are omitted: values may point back into this scope.
impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("slots", &self.slots.len())
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}

/// Walk from `start` outward to the root; the first binding wins.
pub fn resolve_from(start: LocalScope<Scope>, name: Name) -> Option<Place> {
    let mut cursor = start;
    loop {
        let parent = {
            let scope = cursor.borrow();
            if let Some(slot) = scope.slot_of(name) {
                drop(scope);
                return Some(Place::Slot {
                    scope: cursor,
                    slot,
                });
            }
            scope.parent()
        };
        cursor = parent?;
    }
}

/// Environment for the interpreter using a scope stack.
///
/// Empty outside of `interpret`; `push_root` installs the top-level scope.
#[derive(Default)]
pub struct Environment {
    /// Stack of active scopes, current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all scopes and install a fresh root.
    pub fn push_root(&mut self) {
        self.scopes.clear();
        self.scopes.push(LocalScope::new(Scope::new()));
    }

    /// Get the current scope depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a new scope chained to the current one.
    pub fn push_scope(&mut self) {
        let scope = match self.current() {
            Some(parent) => Scope::with_parent(parent),
            None => Scope::new(),
        };
        self.scopes.push(LocalScope::new(scope));
    }

    /// Push a new scope chained to `parent` instead of the current scope.
    pub fn push_scope_in(&mut self, parent: LocalScope<Scope>) {
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    /// Pop the current scope. No-op when the stack is empty.
    #[inline]
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    #[inline]
    pub fn current(&self) -> Option<LocalScope<Scope>> {
        self.scopes.last().cloned()
    }

    /// Declare `name` in the current scope.
    ///
    /// Returns `None` only when no scope is active.
    pub fn declare(&mut self, name: Name) -> Option<Place> {
        let scope = self.current()?;
        let slot = scope.borrow_mut().declare(name);
        Some(Place::Slot { scope, slot })
    }

    /// Declare `name` in the root scope.
    pub fn declare_root(&mut self, name: Name) -> Option<Place> {
        let scope = self.scopes.first()?.clone();
        let slot = scope.borrow_mut().declare(name);
        Some(Place::Slot { scope, slot })
    }

    /// Resolve `name` through the current scope's chain.
    pub fn resolve(&self, name: Name) -> Option<Place> {
        resolve_from(self.current()?, name)
    }

    /// Drop every scope.
    pub fn clear(&mut self) {
        self.scopes.clear();
    }
}
