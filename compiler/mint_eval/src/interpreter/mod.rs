//! Tree-walking evaluator for instruction trees.
//!
//! `eval` maps one `Instruction` to one `Mainfold`. Evaluation of a child
//! always completes before its parent inspects the result. Operators,
//! conditions, stored values, object fields and return values read their
//! operands through one level of `Field` indirection; call arguments are
//! passed exactly as evaluated, so `Var(x)` passes a reference to `x`.

mod builder;
mod call;
mod scope_guard;

use std::rc::Rc;

pub use builder::InterpreterBuilder;
pub use scope_guard::ScopedInterpreter;

use mint_ir::{Instruction, Name, Opcode, Payload};

use crate::errors::{
    index_out_of_range, malformed_instruction, no_active_scope, type_mismatch, undefined_symbol,
    EvalError, EvalResult,
};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::stack::ensure_sufficient_stack;
use crate::{
    ArgStack, Environment, Mainfold, ObjectRef, Place, Runtime, ScopeValue, SharedPrintHandler,
};

/// What `Var` does with a name no scope declares.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnresolvedSymbolPolicy {
    /// Fail with `UndefinedSymbol`.
    #[default]
    Error,
    /// Declare the name in the root scope, bound to `None`.
    DeclareGlobal,
}

/// Which environment a called `Scope` value resolves free names through.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum ScopingMode {
    /// The caller's environment at call time.
    #[default]
    Dynamic,
    /// The environment that was current when the `IR` value was produced.
    Lexical,
}

/// Tree-walking interpreter.
///
/// Holds the scope stack and the argument stack for one thread of control.
/// Both are empty outside of `interpret`.
pub struct Interpreter<'a> {
    pub(crate) runtime: &'a Runtime,
    pub(crate) env: Environment,
    pub(crate) args: ArgStack,
    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) unresolved: UnresolvedSymbolPolicy,
    pub(crate) scoping: ScopingMode,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with default configuration.
    pub fn new(runtime: &'a Runtime) -> Self {
        InterpreterBuilder::new(runtime).build()
    }

    #[inline]
    pub fn runtime(&self) -> &'a Runtime {
        self.runtime
    }

    #[inline]
    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Current scope depth (0 outside of `interpret`).
    #[inline]
    pub fn scope_depth(&self) -> usize {
        self.env.depth()
    }

    /// Current number of argument frames.
    #[inline]
    pub fn call_depth(&self) -> usize {
        self.args.depth()
    }

    /// Run a program from a fresh root scope.
    ///
    /// The tree is validated first. The runtime prelude runs in the new root
    /// before the program; the result is the program's last value, loaded.
    /// A top-level `Return` ends the program early with its value. The scope
    /// and argument stacks are empty again afterwards on every path.
    #[tracing::instrument(level = "debug", skip_all, fields(len = program.len()))]
    pub fn interpret(&mut self, program: &[Instruction]) -> EvalResult {
        for instruction in program {
            instruction.validate()?;
        }

        self.reset();
        self.env.push_root();
        let result = self.run_program(program);
        self.reset();

        if let Err(err) = &result {
            tracing::debug!(error = %err.message, "program failed");
        }
        result
    }

    fn run_program(&mut self, program: &[Instruction]) -> EvalResult {
        let runtime = self.runtime;
        self.eval_block(runtime.prelude())?;
        Ok(self.eval_block(program)?.load())
    }

    fn reset(&mut self) {
        self.env.clear();
        self.args.clear();
    }

    /// Evaluate one instruction.
    pub fn eval(&mut self, instruction: &Instruction) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(instruction))
    }

    /// Evaluate one instruction and read through a resulting `Field`.
    pub fn eval_value(&mut self, instruction: &Instruction) -> EvalResult {
        Ok(self.eval(instruction)?.load())
    }

    /// Evaluate instructions in order in the current scope.
    ///
    /// A `Return` anywhere inside stops the block with its value. Otherwise
    /// the result is the last instruction's value, `None` for an empty block.
    pub fn eval_block(&mut self, body: &[Instruction]) -> EvalResult {
        let mut last = Mainfold::None;
        for instruction in body {
            match self.eval(instruction) {
                Ok(value) => last = value,
                Err(err) => return err.into_return_value(),
            }
        }
        Ok(last)
    }

    fn eval_inner(&mut self, instruction: &Instruction) -> EvalResult {
        let children = instruction.children();
        match instruction.opcode() {
            Opcode::Ir => {
                let body: Rc<[Instruction]> = children.into();
                let captured = match self.scoping {
                    ScopingMode::Dynamic => None,
                    ScopingMode::Lexical => self.env.current(),
                };
                Ok(Mainfold::Scope(ScopeValue::new(body, captured)))
            }
            Opcode::If => {
                let cond = self.eval_value(child(instruction, 0)?)?;
                let taken = cond
                    .as_bool()
                    .ok_or_else(|| type_mismatch("Bool", cond.type_name()))?;
                match (taken, children.get(2)) {
                    (true, _) => self.eval(child(instruction, 1)?),
                    (false, Some(otherwise)) => self.eval(otherwise),
                    (false, None) => Ok(Mainfold::None),
                }
            }
            Opcode::Call => self.eval_call(instruction),
            Opcode::Arg => {
                let index = index_payload(instruction)?;
                self.args.arg(index)
            }
            Opcode::Scope => self.with_env_scope(|scoped| scoped.eval_block(children)),
            Opcode::Return => {
                let value = match children.first() {
                    Some(value) => self.eval_value(value)?,
                    None => Mainfold::None,
                };
                Err(EvalError::return_with(value))
            }
            Opcode::Decl => {
                let name = name_payload(instruction)?;
                self.env.declare(name).ok_or_else(no_active_scope)?;
                Ok(Mainfold::None)
            }
            Opcode::Set => {
                let place = match self.eval(child(instruction, 0)?)? {
                    Mainfold::Field(place) => place,
                    other => return Err(type_mismatch("Field", other.type_name())),
                };
                let value = self.eval_value(child(instruction, 1)?)?;
                place.store(value);
                Ok(Mainfold::None)
            }
            Opcode::Var => {
                let name = name_payload(instruction)?;
                self.resolve(name).map(Mainfold::Field)
            }
            Opcode::New => {
                let type_id = u32::try_from(int_payload(instruction)?)
                    .map_err(|_| malformed_instruction("`New` type id out of range"))?;
                let fields = children
                    .iter()
                    .map(|field| self.eval_value(field))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Mainfold::Object(ObjectRef::new(type_id, fields)))
            }
            Opcode::Field => {
                let index = index_payload(instruction)?;
                let object = match self.eval_value(child(instruction, 0)?)? {
                    Mainfold::Object(object) => object,
                    other => return Err(type_mismatch("Object", other.type_name())),
                };
                if index >= object.len() {
                    return Err(index_out_of_range(index, object.len()));
                }
                Ok(Mainfold::Field(Place::ObjectField { object, index }))
            }
            Opcode::Native => match instruction.payload() {
                Payload::Native(id) => self
                    .runtime
                    .native(*id)
                    .map(|native| Mainfold::Native(*native))
                    .ok_or_else(|| malformed_instruction(format!("unknown native handle {id}"))),
                other => Err(payload_mismatch(instruction, other)),
            },
            Opcode::And | Opcode::Or => self.eval_short_circuit(instruction),
            Opcode::Not => {
                let operand = self.eval_value(child(instruction, 0)?)?;
                evaluate_unary(&operand, Opcode::Not)
            }
            op @ (Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Xor
            | Opcode::Shl
            | Opcode::Shr
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Leq
            | Opcode::Geq) => {
                let left = self.eval_value(child(instruction, 0)?)?;
                let right = self.eval_value(child(instruction, 1)?)?;
                evaluate_binary(&left, &right, op)
            }
            Opcode::Int => int_payload(instruction).map(Mainfold::Int),
            Opcode::Float => match instruction.payload() {
                Payload::Float(x) => Ok(Mainfold::Float(*x)),
                other => Err(payload_mismatch(instruction, other)),
            },
            Opcode::String => match instruction.payload() {
                Payload::Text(text) => Ok(Mainfold::String(Rc::clone(text))),
                other => Err(payload_mismatch(instruction, other)),
            },
            Opcode::Bool => match instruction.payload() {
                Payload::Bool(b) => Ok(Mainfold::Bool(*b)),
                other => Err(payload_mismatch(instruction, other)),
            },
        }
    }

    /// `And`/`Or`: the right operand is evaluated only when it decides the
    /// result.
    fn eval_short_circuit(&mut self, instruction: &Instruction) -> EvalResult {
        let op = instruction.opcode();
        let left = self.eval_value(child(instruction, 0)?)?;
        match (op, &left) {
            (Opcode::And, Mainfold::Bool(false)) => return Ok(Mainfold::Bool(false)),
            (Opcode::Or, Mainfold::Bool(true)) => return Ok(Mainfold::Bool(true)),
            _ => {}
        }
        let right = self.eval_value(child(instruction, 1)?)?;
        evaluate_binary(&left, &right, op)
    }

    /// Find the storage for `name`, applying the unresolved-symbol policy.
    fn resolve(&mut self, name: Name) -> Result<Place, EvalError> {
        if let Some(place) = self.env.resolve(name) {
            return Ok(place);
        }
        match self.unresolved {
            UnresolvedSymbolPolicy::Error => {
                Err(undefined_symbol(self.runtime.interner().lookup(name)))
            }
            UnresolvedSymbolPolicy::DeclareGlobal => {
                tracing::trace!(name = self.runtime.interner().lookup(name), "implicit global");
                self.env.declare_root(name).ok_or_else(no_active_scope)
            }
        }
    }
}

// Payload and child accessors. Validated trees never fail these; direct
// `eval` callers may pass unvalidated nodes.

fn child(instruction: &Instruction, index: usize) -> Result<&Instruction, EvalError> {
    instruction.child(index).ok_or_else(|| {
        malformed_instruction(format!(
            "`{}` is missing child {index}",
            instruction.opcode()
        ))
    })
}

#[cold]
fn payload_mismatch(instruction: &Instruction, got: &Payload) -> EvalError {
    malformed_instruction(format!(
        "`{}` expects a {} payload, got {}",
        instruction.opcode(),
        instruction.opcode().payload_kind(),
        got.kind()
    ))
}

fn int_payload(instruction: &Instruction) -> Result<i64, EvalError> {
    instruction
        .payload()
        .as_int()
        .ok_or_else(|| payload_mismatch(instruction, instruction.payload()))
}

fn index_payload(instruction: &Instruction) -> Result<usize, EvalError> {
    let raw = int_payload(instruction)?;
    usize::try_from(raw).map_err(|_| {
        malformed_instruction(format!(
            "`{}` index must not be negative, got {raw}",
            instruction.opcode()
        ))
    })
}

fn name_payload(instruction: &Instruction) -> Result<Name, EvalError> {
    instruction
        .payload()
        .as_name()
        .ok_or_else(|| payload_mismatch(instruction, instruction.payload()))
}
