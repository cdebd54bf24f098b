use mint_ir::{Instruction, Opcode};
use pretty_assertions::assert_eq;

use super::{print, Harness};
use crate::{EvalErrorKind, Mainfold, ScopingMode, UnresolvedSymbolPolicy};

#[test]
fn literals_yield_their_payload() {
    let h = Harness::new();
    for (instruction, expected) in [
        (Instruction::int(-3), Mainfold::Int(-3)),
        (Instruction::float(0.25), Mainfold::Float(0.25)),
        (Instruction::string("s"), Mainfold::string("s")),
        (Instruction::bool(false), Mainfold::Bool(false)),
    ] {
        assert_eq!(h.run(&[instruction]).0.unwrap(), expected);
    }
}

#[test]
fn empty_program_yields_none() {
    let h = Harness::new();
    assert_eq!(h.run(&[]).0.unwrap(), Mainfold::None);
}

#[test]
fn if_runs_only_the_taken_branch() {
    let h = Harness::new();
    let program = [Instruction::if_then(
        Instruction::bool(false),
        print(Instruction::string("then")),
        Some(print(Instruction::string("else"))),
    )];
    let (result, output) = h.run(&program);
    assert_eq!(result.unwrap(), Mainfold::None);
    assert_eq!(output, "else\n");
}

#[test]
fn if_yields_branch_value_or_none() {
    let h = Harness::new();
    let taken = Instruction::if_then(Instruction::bool(true), Instruction::int(1), None);
    let skipped = Instruction::if_then(Instruction::bool(false), Instruction::int(1), None);
    assert_eq!(h.run(&[taken]).0.unwrap(), Mainfold::Int(1));
    assert_eq!(h.run(&[skipped]).0.unwrap(), Mainfold::None);
}

#[test]
fn if_condition_must_be_bool() {
    let h = Harness::new();
    let program = [Instruction::if_then(
        Instruction::int(1),
        Instruction::int(2),
        None,
    )];
    assert_eq!(
        h.run(&program).0.unwrap_err().kind,
        EvalErrorKind::TypeMismatch {
            expected: "Bool".to_string(),
            got: "Int".to_string()
        }
    );
}

#[test]
fn if_condition_reads_through_variables() {
    let h = Harness::new();
    let mut program = h.let_("flag", Instruction::bool(true)).to_vec();
    program.push(Instruction::if_then(
        h.var("flag"),
        Instruction::string("yes"),
        Some(Instruction::string("no")),
    ));
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::string("yes"));
}

#[test]
fn scope_yields_last_value() {
    let h = Harness::new();
    let full = Instruction::scope(vec![Instruction::int(1), Instruction::int(2)]);
    let empty = Instruction::scope(vec![]);
    assert_eq!(h.run(&[full]).0.unwrap(), Mainfold::Int(2));
    assert_eq!(h.run(&[empty]).0.unwrap(), Mainfold::None);
}

#[test]
fn early_return_skips_trailing_side_effects() {
    let h = Harness::new();
    let a = h.name("a");
    let body = Instruction::scope(vec![
        Instruction::decl(a),
        Instruction::ret(Some(Instruction::var(a))),
        print(Instruction::string("unreachable")),
    ]);
    let (result, output) = h.run(&[body]);
    assert_eq!(result.unwrap(), Mainfold::None);
    assert_eq!(output, "");
}

#[test]
fn return_inside_if_leaves_enclosing_scope() {
    let h = Harness::new();
    let body = Instruction::scope(vec![
        Instruction::if_then(
            Instruction::bool(true),
            Instruction::ret(Some(Instruction::int(7))),
            None,
        ),
        print(Instruction::string("unreachable")),
        Instruction::int(0),
    ]);
    let (result, output) = h.run(&[body, print(Instruction::string("after"))]);
    // The outer program continues after the inner scope returns.
    assert_eq!(result.unwrap(), Mainfold::None);
    assert_eq!(output, "after\n");
}

#[test]
fn return_stops_only_the_innermost_scope() {
    let h = Harness::new();
    let program = [Instruction::scope(vec![
        Instruction::scope(vec![Instruction::ret(Some(Instruction::int(1)))]),
        Instruction::int(2),
    ])];
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::Int(2));
}

#[test]
fn bare_return_yields_none() {
    let h = Harness::new();
    let program = [Instruction::scope(vec![
        Instruction::int(5),
        Instruction::ret(None),
    ])];
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::None);
}

#[test]
fn top_level_return_ends_program() {
    let h = Harness::new();
    let program = [
        Instruction::ret(Some(Instruction::int(3))),
        print(Instruction::string("unreachable")),
    ];
    let (result, output) = h.run(&program);
    assert_eq!(result.unwrap(), Mainfold::Int(3));
    assert_eq!(output, "");
}

#[test]
fn decl_does_not_reset_existing_binding() {
    let h = Harness::new();
    let mut program = h.let_("x", Instruction::int(4)).to_vec();
    program.push(Instruction::decl(h.name("x")));
    program.push(h.var("x"));
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::Int(4));
}

#[test]
fn inner_declaration_shadows_then_disappears() {
    let h = Harness::new();
    let mut program = h.let_("x", Instruction::int(1)).to_vec();
    let mut inner = h.let_("x", Instruction::int(2)).to_vec();
    inner.push(print(h.var("x")));
    program.push(Instruction::scope(inner));
    program.push(print(h.var("x")));
    assert_eq!(h.run(&program).1, "2\n1\n");
}

#[test]
fn set_without_decl_assigns_outer_binding() {
    let h = Harness::new();
    let mut program = h.let_("x", Instruction::int(1)).to_vec();
    program.push(Instruction::scope(vec![Instruction::set(
        h.var("x"),
        Instruction::int(9),
    )]));
    program.push(h.var("x"));
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::Int(9));
}

#[test]
fn set_copies_the_loaded_value() {
    let h = Harness::new();
    let mut program = h.let_("x", Instruction::int(1)).to_vec();
    program.extend(h.let_("y", h.var("x")));
    program.push(Instruction::set(h.var("x"), Instruction::int(2)));
    program.push(h.var("y"));
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::Int(1));
}

#[test]
fn set_target_must_be_a_field() {
    let h = Harness::new();
    let program = [Instruction::set(Instruction::int(1), Instruction::int(2))];
    assert_eq!(
        h.run(&program).0.unwrap_err().kind,
        EvalErrorKind::TypeMismatch {
            expected: "Field".to_string(),
            got: "Int".to_string()
        }
    );
}

#[test]
fn set_yields_none() {
    let h = Harness::new();
    let [decl, set] = h.let_("x", Instruction::int(1));
    assert_eq!(h.run(&[decl, set]).0.unwrap(), Mainfold::None);
}

#[test]
fn undefined_variable_fails_by_default() {
    let h = Harness::new();
    let err = h.run(&[h.var("ghost")]).0.unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedSymbol {
            name: "ghost".to_string()
        }
    );
}

#[test]
fn declare_global_policy_creates_root_binding() {
    let h = Harness::new();
    let program = [
        Instruction::scope(vec![Instruction::set(h.var("g"), Instruction::int(8))]),
        h.var("g"),
    ];
    let (result, _) = h.run_with(
        &program,
        ScopingMode::Dynamic,
        UnresolvedSymbolPolicy::DeclareGlobal,
    );
    assert_eq!(result.unwrap(), Mainfold::Int(8));
}

#[test]
fn declare_global_policy_reads_none() {
    let h = Harness::new();
    let (result, _) = h.run_with(
        &[h.var("fresh")],
        ScopingMode::Dynamic,
        UnresolvedSymbolPolicy::DeclareGlobal,
    );
    assert_eq!(result.unwrap(), Mainfold::None);
}

#[test]
fn runs_do_not_share_bindings() {
    let h = Harness::new();
    let first = h.let_("x", Instruction::int(1));
    assert!(h.run(&first).0.is_ok());
    assert!(h.run(&[h.var("x")]).0.is_err());
}

#[test]
fn native_literal_yields_registered_function() {
    let h = Harness::new();
    let value = h.run(&[h.var("print")]).0.unwrap();
    assert_eq!(value.to_string(), "{native.print}");
}

#[test]
fn ir_defers_execution() {
    let h = Harness::new();
    let program = [Instruction::ir(vec![print(Instruction::string("later"))])];
    let (result, output) = h.run(&program);
    assert_eq!(result.unwrap().to_string(), "{scope}");
    assert_eq!(output, "");
}

#[test]
fn not_and_logic() {
    let h = Harness::new();
    let program = [Instruction::binary(
        Opcode::Xor,
        Instruction::not(Instruction::bool(false)),
        Instruction::bool(false),
    )];
    assert_eq!(h.run(&program).0.unwrap(), Mainfold::Bool(true));
}

#[test]
fn and_or_short_circuit() {
    let h = Harness::new();
    let noisy = || {
        Instruction::scope(vec![
            print(Instruction::string("evaluated")),
            Instruction::bool(true),
        ])
    };
    let program = [
        Instruction::binary(Opcode::And, Instruction::bool(false), noisy()),
        Instruction::binary(Opcode::Or, Instruction::bool(true), noisy()),
    ];
    let (result, output) = h.run(&program);
    assert_eq!(result.unwrap(), Mainfold::Bool(true));
    assert_eq!(output, "");

    let program = [Instruction::binary(
        Opcode::And,
        Instruction::bool(true),
        noisy(),
    )];
    assert_eq!(h.run(&program).1, "evaluated\n");
}

#[test]
fn deep_nesting_does_not_overflow() {
    let h = Harness::new();
    let mut tree = Instruction::int(0);
    for _ in 0..3_000 {
        tree = Instruction::binary(Opcode::Add, tree, Instruction::int(1));
    }
    assert_eq!(h.run(&[tree]).0.unwrap(), Mainfold::Int(3_000));
}
