//! Call-argument frames.
//!
//! One frame is pushed per `Call` (except the `print` fast path) and popped
//! once the callee finishes, whether it succeeded or failed. `Arg(i)` only
//! reads the top frame, so nested calls shadow outer frames without any
//! explicit frame index.
//!
//! The stack also bounds call depth and captures backtraces at error sites.

use mint_ir::{Name, StringInterner};

use crate::errors::{
    index_out_of_range, no_argument_frame, recursion_limit_exceeded, BacktraceFrame,
    EvalBacktrace, EvalError, EvalResult,
};
use crate::Mainfold;

/// Default limit on nested calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// One call's evaluated arguments.
#[derive(Clone, Debug)]
pub struct ArgFrame {
    /// Callee variable name, when the call target was a `Var`.
    pub callee: Option<Name>,
    pub args: Vec<Mainfold>,
}

/// Stack of argument frames with a depth limit.
#[derive(Clone, Debug)]
pub struct ArgStack {
    frames: Vec<ArgFrame>,
    max_depth: Option<usize>,
}

impl ArgStack {
    /// `None` means unlimited.
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Push a frame, checking the depth limit.
    ///
    /// The frame is NOT pushed on overflow.
    pub fn push(&mut self, callee: Option<Name>, args: Vec<Mainfold>) -> Result<(), EvalError> {
        if let Some(max) = self.max_depth {
            if self.frames.len() >= max {
                return Err(recursion_limit_exceeded(max));
            }
        }
        self.frames.push(ArgFrame { callee, args });
        Ok(())
    }

    /// Pop the most recent frame. No-op on an empty stack.
    pub fn pop(&mut self) {
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Arguments of the innermost call.
    #[inline]
    pub fn top(&self) -> Option<&[Mainfold]> {
        self.frames.last().map(|frame| frame.args.as_slice())
    }

    /// The `index`-th argument of the innermost call.
    pub fn arg(&self, index: usize) -> EvalResult {
        let args = self.top().ok_or_else(no_argument_frame)?;
        args.get(index)
            .cloned()
            .ok_or_else(|| index_out_of_range(index, args.len()))
    }

    /// Snapshot the active frames, most recent call first.
    pub fn capture(&self, interner: &StringInterner) -> EvalBacktrace {
        let frames = self
            .frames
            .iter()
            .rev()
            .map(|frame| BacktraceFrame {
                name: frame.callee.map_or_else(
                    || "<anonymous>".to_string(),
                    |name| interner.lookup(name).to_string(),
                ),
                arg_count: frame.args.len(),
            })
            .collect();
        EvalBacktrace::new(frames)
    }

    /// Attach a backtrace to a failure that does not have one yet.
    ///
    /// Control signals pass through untouched.
    pub fn attach_backtrace(&self, err: EvalError, interner: &StringInterner) -> EvalError {
        if err.backtrace.is_some() || err.is_control_flow() {
            return err;
        }
        err.with_backtrace(self.capture(interner))
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for ArgStack {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_CALL_DEPTH))
    }
}
