use mint_ir::{Instruction, Name, Opcode};
use mint_types::TypeId;
use pretty_assertions::assert_eq;

use super::{print, Harness};
use crate::{
    buffer_handler, install_builtins, EvalErrorKind, EvalResult, InterpreterBuilder, Mainfold,
    NativeContext, Runtime,
};

/// Link name a lowering stage would emit for `receiver.method(..)`.
fn link(h: &Harness, ty: TypeId, method: &str) -> Name {
    h.runtime
        .types()
        .method(ty, h.name(method))
        .map(|def| def.link_name)
        .unwrap()
}

#[test]
fn to_str_concat_print() {
    let h = Harness::new();
    let to_str = link(&h, h.types.int, "ToStr");
    let concat = link(&h, h.types.str, "Concat");

    let mut program = h.let_("x", Instruction::int(2)).to_vec();
    program.push(print(Instruction::call(
        Instruction::var(concat),
        vec![
            Instruction::call(Instruction::var(to_str), vec![h.var("x")]),
            Instruction::string("!"),
        ],
    )));

    let (result, output) = h.run(&program);
    assert_eq!(result.unwrap(), Mainfold::None);
    assert_eq!(output, "2!\n");
}

#[test]
fn same_program_through_bound_print() {
    let h = Harness::new();
    let mut program = h.let_("x", Instruction::int(2)).to_vec();
    program.push(h.call(
        "print",
        vec![h.call(
            "mstrConcat",
            vec![
                h.call("mintToStr", vec![h.var("x")]),
                Instruction::string("!"),
            ],
        )],
    ));
    assert_eq!(h.run(&program).1, "2!\n");
}

#[test]
fn method_arity_includes_receiver() {
    let h = Harness::new();
    let program = [h.call("mstrConcat", vec![Instruction::string("only")])];
    assert_eq!(
        h.run(&program).0.unwrap_err().kind,
        EvalErrorKind::ArityMismatch {
            name: "mstrConcat".to_string(),
            expected: 2,
            got: 1
        }
    );
}

#[test]
fn native_type_errors_surface_from_interpret() {
    let h = Harness::new();
    let program = [h.call("mintToStr", vec![Instruction::string("2")])];
    assert!(matches!(
        h.run(&program).0.unwrap_err().kind,
        EvalErrorKind::TypeMismatch { .. }
    ));
}

fn sum_args(_: &NativeContext<'_>, args: &[Mainfold]) -> EvalResult {
    let mut total: i64 = 0;
    for arg in args {
        total = total
            .checked_add(arg.int_value()?)
            .ok_or_else(|| crate::errors::integer_overflow("sum"))?;
    }
    Ok(Mainfold::Int(total))
}

fn shout(ctx: &NativeContext<'_>, args: &[Mainfold]) -> EvalResult {
    let [text] = args else {
        return Err(crate::errors::arity_mismatch("shout", 1, args.len()));
    };
    ctx.println(&text.str_value()?.to_uppercase());
    Ok(Mainfold::None)
}

#[test]
fn host_registered_natives() {
    let mut runtime = Runtime::new();
    let types = install_builtins(&mut runtime).unwrap();
    // Variadic: no arity recorded.
    let sum = runtime.register_native("sum", None, sum_args).unwrap();
    runtime.bind_native("sum", sum);
    runtime
        .define_function("shout", &[types.void, types.str], shout)
        .unwrap();

    let name = |s: &str| runtime.interner().intern(s);
    let program = [
        Instruction::call(
            Instruction::var(name("shout")),
            vec![Instruction::string("hey")],
        ),
        Instruction::call(
            Instruction::var(name("sum")),
            vec![Instruction::int(1), Instruction::int(2), Instruction::int(3)],
        ),
    ];

    let handler = buffer_handler();
    let mut interp = InterpreterBuilder::new(&runtime)
        .print_handler(handler.clone())
        .build();
    assert_eq!(interp.interpret(&program).unwrap(), Mainfold::Int(6));
    assert_eq!(handler.get_output(), "HEY\n");
}

#[test]
fn native_literal_can_be_called_without_binding() {
    let mut runtime = Runtime::new();
    let sum = runtime.register_native("sum", None, sum_args).unwrap();
    let program = [Instruction::call(
        Instruction::native(sum),
        vec![Instruction::int(4), Instruction::int(5)],
    )];
    let mut interp = InterpreterBuilder::new(&runtime)
        .print_handler(buffer_handler())
        .build();
    assert_eq!(interp.interpret(&program).unwrap(), Mainfold::Int(9));
}

#[test]
fn unknown_native_handle_is_malformed() {
    let runtime = Runtime::new();
    let program = [Instruction::native(mint_ir::NativeId::new(3))];
    let mut interp = InterpreterBuilder::new(&runtime).build();
    assert!(matches!(
        interp.interpret(&program).unwrap_err().kind,
        EvalErrorKind::MalformedInstruction { .. }
    ));
}

#[test]
fn fizzbuzz_style_program() {
    let h = Harness::new();
    let n = || Instruction::arg(0);
    let divisible = |d: i64| {
        Instruction::binary(
            Opcode::Eq,
            Instruction::binary(Opcode::Mod, n(), Instruction::int(d)),
            Instruction::int(0),
        )
    };
    let mut program = h
        .let_(
            "classify",
            Instruction::ir(vec![
                Instruction::if_then(
                    divisible(15),
                    Instruction::ret(Some(Instruction::string("FizzBuzz"))),
                    None,
                ),
                Instruction::if_then(
                    divisible(3),
                    Instruction::ret(Some(Instruction::string("Fizz"))),
                    None,
                ),
                Instruction::if_then(
                    divisible(5),
                    Instruction::ret(Some(Instruction::string("Buzz"))),
                    None,
                ),
                h.call("mintToStr", vec![n()]),
            ]),
        )
        .to_vec();
    for i in [3, 5, 7, 15] {
        program.push(print(h.call("classify", vec![Instruction::int(i)])));
    }
    assert_eq!(h.run(&program).1, "Fizz\nBuzz\n7\nFizzBuzz\n");
}

#[test]
fn tracing_init_is_repeatable() {
    crate::init_tracing();
    crate::init_tracing();
    let h = Harness::new();
    let (result, output) = h.run(&[print(Instruction::int(3))]);
    assert_eq!(result.unwrap(), Mainfold::None);
    assert_eq!(output, "3\n");
}
