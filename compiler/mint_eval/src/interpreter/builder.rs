//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use super::{Interpreter, ScopingMode, UnresolvedSymbolPolicy};
use crate::arg_stack::DEFAULT_MAX_CALL_DEPTH;
use crate::{stdout_handler, ArgStack, Environment, Runtime, SharedPrintHandler};

/// Builder for creating Interpreter instances.
///
/// Defaults: stdout printing, a call depth limit of
/// `DEFAULT_MAX_CALL_DEPTH`, unresolved names are errors, and called
/// bodies are dynamically scoped.
pub struct InterpreterBuilder<'a> {
    runtime: &'a Runtime,
    print_handler: Option<SharedPrintHandler>,
    max_call_depth: Option<usize>,
    unresolved: UnresolvedSymbolPolicy,
    scoping: ScopingMode,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(runtime: &'a Runtime) -> Self {
        Self {
            runtime,
            print_handler: None,
            max_call_depth: Some(DEFAULT_MAX_CALL_DEPTH),
            unresolved: UnresolvedSymbolPolicy::default(),
            scoping: ScopingMode::default(),
        }
    }

    /// Set where `print` output goes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    /// Set the nested call limit; `None` removes it.
    #[must_use]
    pub fn max_call_depth(mut self, depth: Option<usize>) -> Self {
        self.max_call_depth = depth;
        self
    }

    #[must_use]
    pub fn unresolved_symbols(mut self, policy: UnresolvedSymbolPolicy) -> Self {
        self.unresolved = policy;
        self
    }

    #[must_use]
    pub fn scoping(mut self, mode: ScopingMode) -> Self {
        self.scoping = mode;
        self
    }

    /// Build the interpreter.
    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            runtime: self.runtime,
            env: Environment::new(),
            args: ArgStack::new(self.max_call_depth),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            unresolved: self.unresolved,
            scoping: self.scoping,
        }
    }
}
