//! Evaluation errors and control signals.
//!
//! `EvalErrorKind` provides typed error categories. Factory functions
//! (e.g., `division_by_zero()`) are the public API; they populate both
//! `kind` and `message`.
//!
//! Every error is fatal to the `interpret` call it happens in. `Return` is
//! not an error: it travels on the same channel as a `ControlFlow` signal and
//! is caught by the nearest enclosing `Scope`.

use std::fmt;

use mint_ir::IrError;

use crate::Mainfold;

/// Result of evaluation.
pub type EvalResult = Result<Mainfold, EvalError>;

/// Control signals that unwind evaluation without being failures.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlFlow {
    /// Leave the innermost `Scope` with this value.
    Return(Mainfold),
}

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Resolution
    UndefinedSymbol {
        name: String,
    },
    UnresolvedNativeCall {
        name: String,
    },

    // Type/Operator
    TypeMismatch {
        expected: String,
        got: String,
    },
    NotCallable {
        type_name: String,
    },

    // Arithmetic
    DivisionByZero {
        operation: String,
    },
    IntegerOverflow {
        operation: String,
    },

    // Access
    IndexOutOfRange {
        index: usize,
        len: usize,
    },
    NoArgumentFrame,
    NoActiveScope,

    // Calls
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },
    StackOverflow {
        depth: usize,
    },
    NativeFailure {
        name: String,
        message: String,
    },

    /// The instruction tree does not have the shape its opcode requires.
    MalformedInstruction {
        reason: String,
    },

    Custom {
        message: String,
    },
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedSymbol { name } => write!(f, "undefined symbol: {name}"),
            Self::UnresolvedNativeCall { name } => {
                write!(f, "no builtin named `{name}`")
            }
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::DivisionByZero { operation } => {
                write!(f, "division by zero in `{operation}`")
            }
            Self::IntegerOverflow { operation } => {
                write!(f, "integer overflow in `{operation}`")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::NoArgumentFrame => write!(f, "`Arg` used outside of a call"),
            Self::NoActiveScope => write!(f, "no active scope"),
            Self::ArityMismatch {
                name,
                expected,
                got,
            } => {
                let arg_word = if *expected == 1 {
                    "argument"
                } else {
                    "arguments"
                };
                write!(f, "{name} expects {expected} {arg_word}, got {got}")
            }
            Self::StackOverflow { depth } => {
                write!(f, "maximum call depth exceeded (limit: {depth})")
            }
            Self::NativeFailure { name, message } => write!(f, "{name}: {message}"),
            Self::MalformedInstruction { reason } => {
                write!(f, "malformed instruction: {reason}")
            }
            Self::Custom { message } => write!(f, "{message}"),
        }
    }
}

/// A single frame in an evaluation backtrace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BacktraceFrame {
    /// Callee name, or `<anonymous>` when the call target was not a variable.
    pub name: String,
    /// Number of arguments the frame was called with.
    pub arg_count: usize,
}

/// Snapshot of the argument stack at an error site, innermost call first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalBacktrace {
    frames: Vec<BacktraceFrame>,
}

impl EvalBacktrace {
    pub fn new(frames: Vec<BacktraceFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[BacktraceFrame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }
}

impl fmt::Display for EvalBacktrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frames.is_empty() {
            return Ok(());
        }
        writeln!(f, "call backtrace:")?;
        for (i, frame) in self.frames.iter().enumerate() {
            writeln!(f, "  {i}: {} ({} args)", frame.name, frame.arg_count)?;
        }
        Ok(())
    }
}

/// Evaluation error.
#[derive(Clone, Debug)]
pub struct EvalError {
    /// Structured error category.
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for factory errors.
    pub message: String,
    /// Argument-stack snapshot taken where the error surfaced.
    pub backtrace: Option<EvalBacktrace>,
    /// Set when this is a control signal rather than a failure.
    pub control_flow: Option<ControlFlow>,
}

impl EvalError {
    /// Create an error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::from_kind(EvalErrorKind::Custom { message })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            message,
            backtrace: None,
            control_flow: None,
        }
    }

    /// Create a `Return` signal carrying `value`.
    pub fn return_with(value: Mainfold) -> Self {
        Self {
            kind: EvalErrorKind::Custom {
                message: "return".to_string(),
            },
            message: "return".to_string(),
            backtrace: None,
            control_flow: Some(ControlFlow::Return(value)),
        }
    }

    /// Turn a `Return` signal into its value; real errors pass through.
    pub fn into_return_value(self) -> Result<Mainfold, EvalError> {
        match self.control_flow {
            Some(ControlFlow::Return(value)) => Ok(value),
            None => Err(self),
        }
    }

    /// Attach a backtrace to this error.
    #[must_use]
    pub fn with_backtrace(mut self, backtrace: EvalBacktrace) -> Self {
        self.backtrace = Some(backtrace);
        self
    }

    /// Check if this error is a control flow signal.
    #[inline]
    pub fn is_control_flow(&self) -> bool {
        self.control_flow.is_some()
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(backtrace) = &self.backtrace {
            if !backtrace.is_empty() {
                write!(f, "\n{backtrace}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

impl From<IrError> for EvalError {
    fn from(err: IrError) -> Self {
        malformed_instruction(err.to_string())
    }
}

// Resolution Errors

#[cold]
pub fn undefined_symbol(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedSymbol {
        name: name.to_string(),
    })
}

#[cold]
pub fn unresolved_native_call(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnresolvedNativeCall {
        name: name.to_string(),
    })
}

// Type Errors

#[cold]
pub fn type_mismatch(expected: &str, got: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: type_name.to_string(),
    })
}

// Arithmetic Errors

/// `Div` or `Mod` with a zero divisor.
#[cold]
pub fn division_by_zero(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero {
        operation: operation.to_string(),
    })
}

#[cold]
pub fn integer_overflow(operation: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IntegerOverflow {
        operation: operation.to_string(),
    })
}

// Access Errors

#[cold]
pub fn index_out_of_range(index: usize, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfRange { index, len })
}

#[cold]
pub fn no_argument_frame() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoArgumentFrame)
}

#[cold]
pub fn no_active_scope() -> EvalError {
    EvalError::from_kind(EvalErrorKind::NoActiveScope)
}

// Call Errors

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

#[cold]
pub fn recursion_limit_exceeded(depth: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { depth })
}

/// Failure reported by a host function.
#[cold]
pub fn native_failure(name: &str, message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NativeFailure {
        name: name.to_string(),
        message: message.into(),
    })
}

// Structural Errors

#[cold]
pub fn malformed_instruction(reason: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MalformedInstruction {
        reason: reason.into(),
    })
}
