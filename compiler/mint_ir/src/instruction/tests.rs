use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn test_constructors_produce_valid_trees() {
    let interner = StringInterner::new();
    let x = interner.intern("x");

    let program = Instruction::scope(vec![
        Instruction::decl(x),
        Instruction::set(Instruction::var(x), Instruction::int(2)),
        Instruction::if_then(
            Instruction::binary(Opcode::Lt, Instruction::var(x), Instruction::int(3)),
            Instruction::ret(Some(Instruction::string("small"))),
            None,
        ),
        Instruction::call(
            Instruction::ir(vec![Instruction::arg(0)]),
            vec![Instruction::float(1.5), Instruction::bool(true)],
        ),
        Instruction::field(Instruction::new_object(7, vec![Instruction::int(1)]), 0),
        Instruction::not(Instruction::bool(false)),
        Instruction::native(NativeId::new(0)),
    ]);

    assert_eq!(program.validate(), Ok(()));
}

#[test]
fn test_children_keep_order() {
    let call = Instruction::call(
        Instruction::string("print"),
        vec![Instruction::int(1), Instruction::int(2)],
    );
    let opcodes: Vec<_> = call.children().iter().map(Instruction::opcode).collect();
    assert_eq!(opcodes, vec![Opcode::String, Opcode::Int, Opcode::Int]);
    assert_eq!(call.child(2).map(|c| c.payload().as_int()), Some(Some(2)));
    assert!(call.child(3).is_none());
}

#[test]
fn test_validate_rejects_wrong_arity() {
    let bad = Instruction::new(Opcode::Add, Payload::Empty, vec![Instruction::int(1)]);
    assert_eq!(
        bad.validate(),
        Err(IrError::WrongArity {
            opcode: Opcode::Add,
            expected: Arity::Exact(2),
            got: 1,
        })
    );
}

#[test]
fn test_validate_rejects_wrong_payload() {
    let bad = Instruction::new(Opcode::Var, Payload::Int(3), Vec::new());
    assert_eq!(
        bad.validate(),
        Err(IrError::WrongPayload {
            opcode: Opcode::Var,
            expected: PayloadKind::Name,
            got: PayloadKind::Int,
        })
    );
}

#[test]
fn test_validate_reaches_nested_children() {
    let bad_leaf = Instruction::new(Opcode::Arg, Payload::Int(-1), Vec::new());
    let tree = Instruction::scope(vec![Instruction::scope(vec![bad_leaf])]);
    assert_eq!(
        tree.validate(),
        Err(IrError::NegativeIndex {
            opcode: Opcode::Arg,
            value: -1,
        })
    );
}

#[test]
fn test_if_accepts_optional_else() {
    let without = Instruction::if_then(Instruction::bool(true), Instruction::int(1), None);
    let with = Instruction::if_then(
        Instruction::bool(true),
        Instruction::int(1),
        Some(Instruction::int(2)),
    );
    assert_eq!(without.children().len(), 2);
    assert_eq!(with.children().len(), 3);
    assert!(without.validate().is_ok());
    assert!(with.validate().is_ok());

    let too_many = Instruction::new(
        Opcode::If,
        Payload::Empty,
        vec![Instruction::bool(true); 4],
    );
    assert!(too_many.validate().is_err());
}

#[test]
fn test_call_requires_target() {
    let empty_call = Instruction::new(Opcode::Call, Payload::Empty, Vec::new());
    assert_eq!(
        empty_call.validate(),
        Err(IrError::WrongArity {
            opcode: Opcode::Call,
            expected: Arity::AtLeast(1),
            got: 0,
        })
    );
}

#[test]
fn test_ir_error_messages() {
    let err = IrError::WrongArity {
        opcode: Opcode::If,
        expected: Arity::Between(2, 3),
        got: 1,
    };
    assert_eq!(err.to_string(), "`If` expects 2 to 3 children, got 1");
}

#[test]
fn test_return_with_and_without_value() {
    assert!(Instruction::ret(None).children().is_empty());
    assert_eq!(Instruction::ret(Some(Instruction::int(1))).children().len(), 1);
}
