//! Operator implementations for the evaluator.
//!
//! Direct enum-based dispatch on `(Mainfold, Mainfold, Opcode)`. Operands
//! arrive already loaded. No operator coerces between tags: arithmetic,
//! shifts and ordering are `Int` only, logic is `Bool` only, and equality
//! accepts any matching pair of scalar tags.

use mint_ir::Opcode;

use crate::errors::{
    division_by_zero, integer_overflow, malformed_instruction, type_mismatch, EvalError,
    EvalResult,
};
use crate::Mainfold;

/// Checked arithmetic result with overflow handling.
#[inline]
fn checked_int(result: Option<i64>, op: Opcode) -> EvalResult {
    result
        .map(Mainfold::Int)
        .ok_or_else(|| integer_overflow(op.as_str()))
}

/// Shift amounts outside `0..64` overflow.
fn shift_amount(amount: i64, op: Opcode) -> Result<u32, EvalError> {
    u32::try_from(amount)
        .ok()
        .filter(|&bits| bits < i64::BITS)
        .ok_or_else(|| integer_overflow(op.as_str()))
}

fn mismatch(expected: &str, left: &Mainfold, right: &Mainfold) -> EvalError {
    let got = if left.type_name() == expected {
        right.type_name()
    } else {
        left.type_name()
    };
    type_mismatch(expected, got)
}

/// Evaluate a binary operator.
pub fn evaluate_binary(left: &Mainfold, right: &Mainfold, op: Opcode) -> EvalResult {
    match op {
        Opcode::Add
        | Opcode::Sub
        | Opcode::Mul
        | Opcode::Div
        | Opcode::Mod
        | Opcode::Shl
        | Opcode::Shr
        | Opcode::Lt
        | Opcode::Gt
        | Opcode::Leq
        | Opcode::Geq => match (left, right) {
            (Mainfold::Int(a), Mainfold::Int(b)) => eval_int_binary(*a, *b, op),
            _ => Err(mismatch("Int", left, right)),
        },
        Opcode::And | Opcode::Or | Opcode::Xor => match (left, right) {
            (Mainfold::Bool(a), Mainfold::Bool(b)) => Ok(Mainfold::Bool(match op {
                Opcode::And => *a && *b,
                Opcode::Or => *a || *b,
                _ => a ^ b,
            })),
            _ => Err(mismatch("Bool", left, right)),
        },
        Opcode::Eq | Opcode::Neq => {
            let equal = scalar_eq(left, right)?;
            Ok(Mainfold::Bool(if op == Opcode::Eq { equal } else { !equal }))
        }
        _ => Err(malformed_instruction(format!(
            "`{op}` is not a binary operator"
        ))),
    }
}

fn eval_int_binary(a: i64, b: i64, op: Opcode) -> EvalResult {
    match op {
        Opcode::Add => checked_int(a.checked_add(b), op),
        Opcode::Sub => checked_int(a.checked_sub(b), op),
        Opcode::Mul => checked_int(a.checked_mul(b), op),
        // Truncates toward zero.
        Opcode::Div if b == 0 => Err(division_by_zero(op.as_str())),
        Opcode::Div => checked_int(a.checked_div(b), op),
        Opcode::Mod if b == 0 => Err(division_by_zero(op.as_str())),
        Opcode::Mod => checked_int(a.checked_rem(b), op),
        Opcode::Shl => {
            let bits = shift_amount(b, op)?;
            // Bits shifted out (or into the sign) overflow.
            checked_int(
                a.checked_shl(bits)
                    .filter(|&r| r.checked_shr(bits) == Some(a)),
                op,
            )
        }
        Opcode::Shr => checked_int(a.checked_shr(shift_amount(b, op)?), op),
        Opcode::Lt => Ok(Mainfold::Bool(a < b)),
        Opcode::Gt => Ok(Mainfold::Bool(a > b)),
        Opcode::Leq => Ok(Mainfold::Bool(a <= b)),
        Opcode::Geq => Ok(Mainfold::Bool(a >= b)),
        _ => Err(malformed_instruction(format!(
            "`{op}` is not an integer operator"
        ))),
    }
}

#[allow(clippy::float_cmp, reason = "Float equality is IEEE equality")]
fn scalar_eq(left: &Mainfold, right: &Mainfold) -> Result<bool, EvalError> {
    match (left, right) {
        (Mainfold::Int(a), Mainfold::Int(b)) => Ok(a == b),
        (Mainfold::Bool(a), Mainfold::Bool(b)) => Ok(a == b),
        (Mainfold::String(a), Mainfold::String(b)) => Ok(a == b),
        (Mainfold::Float(a), Mainfold::Float(b)) => Ok(a == b),
        // Same non-scalar tag on both sides, e.g. two objects.
        _ if left.type_name() == right.type_name() => {
            Err(type_mismatch("scalar", left.type_name()))
        }
        _ => Err(type_mismatch(left.type_name(), right.type_name())),
    }
}

/// Evaluate a unary operator. `Not` is the only one.
pub fn evaluate_unary(operand: &Mainfold, op: Opcode) -> EvalResult {
    match (op, operand) {
        (Opcode::Not, Mainfold::Bool(b)) => Ok(Mainfold::Bool(!b)),
        (Opcode::Not, other) => Err(type_mismatch("Bool", other.type_name())),
        _ => Err(malformed_instruction(format!(
            "`{op}` is not a unary operator"
        ))),
    }
}
