#![deny(clippy::arithmetic_side_effects)]
//! Mint Eval - instruction evaluator and native bridge for the Mint runtime.
//!
//! # Architecture
//!
//! - `Mainfold`: the tagged runtime value, with `Field` as its one
//!   indirection into storage (`Place`)
//! - `Environment`: scope stack with parent-linked, append-only scopes
//! - `ArgStack`: call-argument frames read by `Arg(i)`
//! - `Interpreter`: recursive evaluator, configured via `InterpreterBuilder`
//! - `Runtime`: interner, type registry, native table and prelude, shared
//!   by every interpreter
//! - `install_builtins`: the builtin types, methods and `print`
//!
//! ```text
//! let mut runtime = Runtime::new();
//! install_builtins(&mut runtime)?;
//! let mut interpreter = Interpreter::new(&runtime);
//! let result = interpreter.interpret(&program)?;
//! ```

mod arg_stack;
mod builtins;
mod environment;
pub mod errors;
pub mod interpreter;
mod operators;
mod print_handler;
mod runtime;
mod stack;
mod value;

use std::sync::Once;

pub use arg_stack::{ArgFrame, ArgStack, DEFAULT_MAX_CALL_DEPTH};
pub use builtins::{install_builtins, BuiltinTypes, PRINT_BUILTIN};
pub use environment::{resolve_from, Environment, LocalScope, Scope};
pub use errors::{
    BacktraceFrame, ControlFlow, EvalBacktrace, EvalError, EvalErrorKind, EvalResult,
};
pub use interpreter::{
    Interpreter, InterpreterBuilder, ScopedInterpreter, ScopingMode, UnresolvedSymbolPolicy,
};
pub use operators::{evaluate_binary, evaluate_unary};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler,
};
pub use runtime::{NativeContext, Runtime};
pub use stack::ensure_sufficient_stack;
pub use value::{Mainfold, NativeFn, NativeFunction, Object, ObjectRef, Place, ScopeValue};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `RUST_LOG`.
///
/// Safe to call more than once; only the first call has any effect, and
/// nothing is installed unless `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=mint_eval=trace my-host program.mint
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    reason = "test code: relaxed style for readability"
)]
mod tests;
