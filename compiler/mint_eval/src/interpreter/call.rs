//! `Call` evaluation: the `print` fast path, argument frames, and dispatch
//! to `Scope` and `Native` callees.

use mint_ir::{Instruction, Opcode};

use super::{child, Interpreter, ScopingMode};
use crate::builtins::PRINT_BUILTIN;
use crate::errors::{arity_mismatch, no_argument_frame, not_callable, unresolved_native_call};
use crate::{EvalResult, Mainfold, NativeContext, NativeFunction, ScopeValue};

impl Interpreter<'_> {
    /// Evaluate a `Call` instruction.
    ///
    /// The target is evaluated once. A `String` target names a builtin and
    /// takes the fast path. Any other target has its arguments evaluated
    /// left to right into a new frame, is loaded, and is dispatched on its
    /// tag. The frame is popped whether the callee succeeds or fails.
    pub(super) fn eval_call(&mut self, instruction: &Instruction) -> EvalResult {
        let target_expr = child(instruction, 0)?;
        let arg_exprs = instruction.children().get(1..).unwrap_or_default();

        let target = self.eval(target_expr)?;
        if let Mainfold::String(name) = &target {
            return self.call_builtin(name, arg_exprs);
        }

        let mut args = Vec::with_capacity(arg_exprs.len());
        for arg in arg_exprs {
            args.push(self.eval(arg)?);
        }

        let callee_name = match target_expr.opcode() {
            Opcode::Var => target_expr.payload().as_name(),
            _ => None,
        };
        let callee = target.load();
        tracing::trace!(
            callee = callee.type_name(),
            args = args.len(),
            depth = self.args.depth(),
            "call"
        );

        self.args.push(callee_name, args)?;
        let result = match &callee {
            Mainfold::Scope(body) => self.call_scope(body),
            Mainfold::Native(native) => self.call_native(native),
            other => Err(not_callable(other.type_name())),
        };
        let result = result.map_err(|err| {
            self.args
                .attach_backtrace(err, self.runtime.interner())
        });
        self.args.pop();
        result
    }

    /// The `print` fast path: load the single argument and print it.
    fn call_builtin(&mut self, name: &str, arg_exprs: &[Instruction]) -> EvalResult {
        if name != PRINT_BUILTIN {
            return Err(unresolved_native_call(name));
        }
        let [arg] = arg_exprs else {
            return Err(arity_mismatch(PRINT_BUILTIN, 1, arg_exprs.len()));
        };
        let value = self.eval_value(arg)?;
        self.print_handler.println(&value.to_string());
        Ok(Mainfold::None)
    }

    /// Run a `Scope` callee's body in a fresh scope.
    fn call_scope(&mut self, callee: &ScopeValue) -> EvalResult {
        let body = callee.body();
        match (self.scoping, callee.captured()) {
            (ScopingMode::Lexical, Some(captured)) => {
                self.with_scope_in(captured, |scoped| scoped.eval_block(&body))
            }
            _ => self.with_env_scope(|scoped| scoped.eval_block(&body)),
        }
    }

    /// Invoke a host function with the top argument frame.
    fn call_native(&self, native: &NativeFunction) -> EvalResult {
        let args = self.args.top().ok_or_else(no_argument_frame)?;
        if let Some(expected) = native.arity {
            if args.len() != expected {
                return Err(arity_mismatch(native.name, expected, args.len()));
            }
        }
        let ctx = NativeContext::new(self.runtime, &self.print_handler);
        (native.func)(&ctx, args)
    }
}
