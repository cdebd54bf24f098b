//! RAII scope guards for environment management.
//!
//! [`ScopedInterpreter`] pops the scope it pushed when dropped, so a scope
//! is released on every exit path: normal completion, early `Return`, a
//! propagated error, or a panic unwinding through evaluation.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`, so
//! evaluation continues through it as if it were the interpreter itself.
//!
//! ```text
//! interpreter.with_env_scope(|scoped| scoped.eval_block(body))
//! ```

use std::ops::{Deref, DerefMut};

use super::Interpreter;
use crate::{LocalScope, Scope};

/// Guard that pops the environment scope on drop.
pub struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
        tracing::trace!(depth = self.interpreter.env.depth(), "scope exit");
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope chained to the current one; popped when the guard drops.
    pub fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        tracing::trace!(depth = self.env.depth(), "scope enter");
        ScopedInterpreter { interpreter: self }
    }

    /// Push a scope chained to `parent`; popped when the guard drops.
    pub fn scoped_in(&mut self, parent: LocalScope<Scope>) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope_in(parent);
        tracing::trace!(depth = self.env.depth(), "captured scope enter");
        ScopedInterpreter { interpreter: self }
    }

    /// Run `f` in a new scope chained to the current one.
    pub fn with_env_scope<T, F>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped();
        f(&mut scoped)
    }

    /// Run `f` in a new scope chained to `parent`.
    pub fn with_scope_in<T, F>(&mut self, parent: LocalScope<Scope>, f: F) -> T
    where
        F: FnOnce(&mut ScopedInterpreter<'_, 'a>) -> T,
    {
        let mut scoped = self.scoped_in(parent);
        f(&mut scoped)
    }
}
