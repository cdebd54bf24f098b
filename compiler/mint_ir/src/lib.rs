//! Mint IR - the instruction tree consumed by the Mint evaluator.
//!
//! This crate contains the data structures shared between a lowering stage
//! and the evaluator:
//! - `Name` and `StringInterner` for interned identifiers
//! - `Opcode`, the closed instruction set, with its per-opcode shape
//! - `Instruction`, one tree node: opcode + payload + owned children
//! - `NativeId`, a handle to a host function registered with the runtime
//!
//! # Binary Contract
//!
//! The arity and payload kind of every opcode (see `Opcode::arity` and
//! `Opcode::payload_kind`) is the contract between a lowering stage and the
//! evaluator. `Instruction::validate` checks a whole tree against it.

mod instruction;
mod interner;
mod name;
mod opcode;

pub use instruction::{Instruction, IrError, NativeId, Payload};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use opcode::{Arity, Opcode, PayloadKind};
