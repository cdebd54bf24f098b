//! Instruction tree nodes.
//!
//! An `Instruction` exclusively owns its children; dropping a node drops its
//! whole subtree. Trees are built bottom-up with the constructor functions
//! below and checked with `validate` before evaluation.

use std::fmt;
use std::rc::Rc;

use crate::{Arity, Name, Opcode, PayloadKind};

/// Handle to a host function registered with the runtime's native table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NativeId(u32);

impl NativeId {
    /// Create a handle from a table index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NativeId(index)
    }

    /// Table index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native#{}", self.0)
    }
}

/// Scalar payload carried by an instruction.
///
/// Exactly one variant is meaningful per opcode, see `Opcode::payload_kind`.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Empty,
    /// Integer literal, argument index, object type id, or field index.
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Identifier for `Decl` and `Var`.
    Name(Name),
    /// String literal text.
    Text(Rc<str>),
    Native(NativeId),
}

impl Payload {
    /// The kind of this payload.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Payload::Empty => PayloadKind::Empty,
            Payload::Int(_) => PayloadKind::Int,
            Payload::Float(_) => PayloadKind::Float,
            Payload::Bool(_) => PayloadKind::Bool,
            Payload::Name(_) => PayloadKind::Name,
            Payload::Text(_) => PayloadKind::Text,
            Payload::Native(_) => PayloadKind::Native,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Payload::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_name(&self) -> Option<Name> {
        match self {
            Payload::Name(name) => Some(*name),
            _ => None,
        }
    }
}

/// Structural error found by `Instruction::validate`.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum IrError {
    #[error("`{opcode}` expects {expected} children, got {got}")]
    WrongArity {
        opcode: Opcode,
        expected: Arity,
        got: usize,
    },
    #[error("`{opcode}` expects a {expected} payload, got {got}")]
    WrongPayload {
        opcode: Opcode,
        expected: PayloadKind,
        got: PayloadKind,
    },
    #[error("`{opcode}` index must not be negative, got {value}")]
    NegativeIndex { opcode: Opcode, value: i64 },
}

/// One IR tree node: opcode + payload + ordered owned children.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    opcode: Opcode,
    payload: Payload,
    children: Vec<Instruction>,
}

impl Instruction {
    /// Create a node from its parts. No shape check happens here.
    pub fn new(opcode: Opcode, payload: Payload, children: Vec<Instruction>) -> Self {
        Instruction {
            opcode,
            payload,
            children,
        }
    }

    #[inline]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    #[inline]
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    #[inline]
    pub fn children(&self) -> &[Instruction] {
        &self.children
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&Instruction> {
        self.children.get(index)
    }

    /// Check the whole tree against each opcode's arity and payload kind.
    ///
    /// Walks iteratively so validation cannot overflow on deep trees.
    pub fn validate(&self) -> Result<(), IrError> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            node.validate_node()?;
            pending.extend(node.children.iter());
        }
        Ok(())
    }

    fn validate_node(&self) -> Result<(), IrError> {
        let expected = self.opcode.arity();
        if !expected.accepts(self.children.len()) {
            return Err(IrError::WrongArity {
                opcode: self.opcode,
                expected,
                got: self.children.len(),
            });
        }
        let payload = self.opcode.payload_kind();
        if self.payload.kind() != payload {
            return Err(IrError::WrongPayload {
                opcode: self.opcode,
                expected: payload,
                got: self.payload.kind(),
            });
        }
        if let (Opcode::Arg | Opcode::New | Opcode::Field, Payload::Int(value)) =
            (self.opcode, &self.payload)
        {
            if *value < 0 {
                return Err(IrError::NegativeIndex {
                    opcode: self.opcode,
                    value: *value,
                });
            }
        }
        Ok(())
    }
}

// Constructors

impl Instruction {
    fn leaf(opcode: Opcode, payload: Payload) -> Self {
        Instruction::new(opcode, payload, Vec::new())
    }

    fn nested(opcode: Opcode, children: Vec<Instruction>) -> Self {
        Instruction::new(opcode, Payload::Empty, children)
    }

    pub fn int(value: i64) -> Self {
        Self::leaf(Opcode::Int, Payload::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::leaf(Opcode::Float, Payload::Float(value))
    }

    pub fn string(value: &str) -> Self {
        Self::leaf(Opcode::String, Payload::Text(Rc::from(value)))
    }

    pub fn bool(value: bool) -> Self {
        Self::leaf(Opcode::Bool, Payload::Bool(value))
    }

    pub fn native(id: NativeId) -> Self {
        Self::leaf(Opcode::Native, Payload::Native(id))
    }

    pub fn decl(name: Name) -> Self {
        Self::leaf(Opcode::Decl, Payload::Name(name))
    }

    pub fn var(name: Name) -> Self {
        Self::leaf(Opcode::Var, Payload::Name(name))
    }

    pub fn set(target: Instruction, value: Instruction) -> Self {
        Self::nested(Opcode::Set, vec![target, value])
    }

    /// Read argument `index` of the innermost call frame.
    pub fn arg(index: u32) -> Self {
        Self::leaf(Opcode::Arg, Payload::Int(i64::from(index)))
    }

    pub fn call(target: Instruction, args: Vec<Instruction>) -> Self {
        let mut children = Vec::with_capacity(args.len() + 1);
        children.push(target);
        children.extend(args);
        Self::nested(Opcode::Call, children)
    }

    pub fn scope(body: Vec<Instruction>) -> Self {
        Self::nested(Opcode::Scope, body)
    }

    /// A deferred callable body.
    pub fn ir(body: Vec<Instruction>) -> Self {
        Self::nested(Opcode::Ir, body)
    }

    pub fn ret(value: Option<Instruction>) -> Self {
        Self::nested(Opcode::Return, value.into_iter().collect())
    }

    pub fn if_then(cond: Instruction, then: Instruction, otherwise: Option<Instruction>) -> Self {
        let mut children = vec![cond, then];
        children.extend(otherwise);
        Self::nested(Opcode::If, children)
    }

    pub fn new_object(type_id: u32, fields: Vec<Instruction>) -> Self {
        Instruction::new(Opcode::New, Payload::Int(i64::from(type_id)), fields)
    }

    pub fn field(object: Instruction, index: u32) -> Self {
        Instruction::new(Opcode::Field, Payload::Int(i64::from(index)), vec![object])
    }

    /// A two-operand operator node such as `Add` or `Lt`.
    pub fn binary(op: Opcode, lhs: Instruction, rhs: Instruction) -> Self {
        debug_assert!(op.is_binary_operator(), "{op} is not a binary operator");
        Self::nested(op, vec![lhs, rhs])
    }

    pub fn not(operand: Instruction) -> Self {
        Self::nested(Opcode::Not, vec![operand])
    }
}

#[cfg(test)]
mod tests;
