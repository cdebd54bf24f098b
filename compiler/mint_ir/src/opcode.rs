//! The closed instruction set and the shape each opcode requires.

use std::fmt;

/// Instruction opcode.
///
/// The set is closed: the evaluator matches on it exhaustively.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Callables and control
    /// Wrap the children as a deferred callable body without running them.
    Ir,
    /// `cond, then, [else]`.
    If,
    /// `target, args...`.
    Call,
    /// Read the i-th value of the innermost argument frame.
    Arg,
    /// Run children in a fresh environment chained to the current one.
    Scope,
    /// Stop the innermost `Scope`, yielding the optional child.
    Return,

    // Variables
    Decl,
    Set,
    Var,

    // Objects
    New,
    Field,

    /// Literal handle to a registered host function.
    Native,

    // Integer arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Boolean logic
    And,
    Or,
    Xor,
    Not,

    // Bit shifts
    Shl,
    Shr,

    // Comparisons
    Eq,
    Neq,
    Lt,
    Gt,
    Leq,
    Geq,

    // Literals
    Int,
    Float,
    String,
    Bool,
}

/// Number of children an opcode accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many children.
    Exact(usize),
    /// Between `min` and `max` children, inclusive.
    Between(usize, usize),
    /// Any number of children.
    Variadic,
    /// At least this many children.
    AtLeast(usize),
}

impl Arity {
    /// Check whether `count` children satisfy this arity.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Between(min, max) => (min..=max).contains(&count),
            Arity::Variadic => true,
            Arity::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Between(min, max) => write!(f, "{min} to {max}"),
            Arity::Variadic => write!(f, "any number of"),
            Arity::AtLeast(min) => write!(f, "at least {min}"),
        }
    }
}

/// Which scalar payload an opcode reads.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Empty,
    Int,
    Float,
    Bool,
    /// An interned identifier (`Decl`, `Var`).
    Name,
    /// Owned literal text (`String`).
    Text,
    Native,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PayloadKind::Empty => "no payload",
            PayloadKind::Int => "integer",
            PayloadKind::Float => "float",
            PayloadKind::Bool => "bool",
            PayloadKind::Name => "name",
            PayloadKind::Text => "text",
            PayloadKind::Native => "native handle",
        };
        f.write_str(s)
    }
}

impl Opcode {
    /// Required child count.
    pub const fn arity(self) -> Arity {
        match self {
            Opcode::Ir | Opcode::Scope | Opcode::New => Arity::Variadic,
            Opcode::If => Arity::Between(2, 3),
            Opcode::Call => Arity::AtLeast(1),
            Opcode::Return => Arity::Between(0, 1),
            Opcode::Field | Opcode::Not => Arity::Exact(1),
            Opcode::Set
            | Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Shl
            | Opcode::Shr
            | Opcode::Eq
            | Opcode::Neq
            | Opcode::Lt
            | Opcode::Gt
            | Opcode::Leq
            | Opcode::Geq => Arity::Exact(2),
            Opcode::Arg
            | Opcode::Decl
            | Opcode::Var
            | Opcode::Native
            | Opcode::Int
            | Opcode::Float
            | Opcode::String
            | Opcode::Bool => Arity::Exact(0),
        }
    }

    /// Required payload kind.
    pub const fn payload_kind(self) -> PayloadKind {
        match self {
            Opcode::Arg | Opcode::New | Opcode::Field | Opcode::Int => PayloadKind::Int,
            Opcode::Decl | Opcode::Var => PayloadKind::Name,
            Opcode::Native => PayloadKind::Native,
            Opcode::Float => PayloadKind::Float,
            Opcode::String => PayloadKind::Text,
            Opcode::Bool => PayloadKind::Bool,
            _ => PayloadKind::Empty,
        }
    }

    /// Two-operand operators evaluated by the operator table.
    pub const fn is_binary_operator(self) -> bool {
        matches!(
            self,
            Opcode::Add
                | Opcode::Sub
                | Opcode::Mul
                | Opcode::Div
                | Opcode::Mod
                | Opcode::And
                | Opcode::Or
                | Opcode::Xor
                | Opcode::Shl
                | Opcode::Shr
                | Opcode::Eq
                | Opcode::Neq
                | Opcode::Lt
                | Opcode::Gt
                | Opcode::Leq
                | Opcode::Geq
        )
    }

    /// Opcode mnemonic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Opcode::Ir => "IR",
            Opcode::If => "If",
            Opcode::Call => "Call",
            Opcode::Arg => "Arg",
            Opcode::Scope => "Scope",
            Opcode::Return => "Return",
            Opcode::Decl => "Decl",
            Opcode::Set => "Set",
            Opcode::Var => "Var",
            Opcode::New => "New",
            Opcode::Field => "Field",
            Opcode::Native => "Native",
            Opcode::Add => "Add",
            Opcode::Sub => "Sub",
            Opcode::Mul => "Mul",
            Opcode::Div => "Div",
            Opcode::Mod => "Mod",
            Opcode::And => "And",
            Opcode::Or => "Or",
            Opcode::Xor => "Xor",
            Opcode::Not => "Not",
            Opcode::Shl => "Shl",
            Opcode::Shr => "Shr",
            Opcode::Eq => "Eq",
            Opcode::Neq => "Neq",
            Opcode::Lt => "Lt",
            Opcode::Gt => "Gt",
            Opcode::Leq => "Leq",
            Opcode::Geq => "Geq",
            Opcode::Int => "Int",
            Opcode::Float => "Float",
            Opcode::String => "String",
            Opcode::Bool => "Bool",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
