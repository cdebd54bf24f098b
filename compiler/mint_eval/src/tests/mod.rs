//! Evaluation tests against whole instruction trees.

mod eval_tests;
mod scenario_tests;

use mint_ir::{Instruction, Name};

use crate::{
    buffer_handler, install_builtins, BuiltinTypes, EvalResult, InterpreterBuilder, Runtime,
    ScopingMode, UnresolvedSymbolPolicy,
};

/// A runtime with builtins installed.
pub(crate) struct Harness {
    pub runtime: Runtime,
    pub types: BuiltinTypes,
}

impl Harness {
    pub fn new() -> Self {
        let mut runtime = Runtime::new();
        let types = install_builtins(&mut runtime).unwrap();
        Harness { runtime, types }
    }

    pub fn name(&self, s: &str) -> Name {
        self.runtime.interner().intern(s)
    }

    /// Run with default settings, returning the result and printed output.
    pub fn run(&self, program: &[Instruction]) -> (EvalResult, String) {
        self.run_with(program, ScopingMode::Dynamic, UnresolvedSymbolPolicy::Error)
    }

    pub fn run_with(
        &self,
        program: &[Instruction],
        scoping: ScopingMode,
        unresolved: UnresolvedSymbolPolicy,
    ) -> (EvalResult, String) {
        let handler = buffer_handler();
        let mut interp = InterpreterBuilder::new(&self.runtime)
            .print_handler(handler.clone())
            .scoping(scoping)
            .unresolved_symbols(unresolved)
            .build();
        let result = interp.interpret(program);
        (result, handler.get_output())
    }

    /// `Decl(name)` + `Set(Var(name), value)`.
    pub fn let_(&self, name: &str, value: Instruction) -> [Instruction; 2] {
        let name = self.name(name);
        [
            Instruction::decl(name),
            Instruction::set(Instruction::var(name), value),
        ]
    }

    pub fn var(&self, name: &str) -> Instruction {
        Instruction::var(self.name(name))
    }

    /// `Call(Var(name), args)`.
    pub fn call(&self, name: &str, args: Vec<Instruction>) -> Instruction {
        Instruction::call(self.var(name), args)
    }
}

/// `Call(String("print"), [value])`.
pub(crate) fn print(value: Instruction) -> Instruction {
    Instruction::call(Instruction::string("print"), vec![value])
}
