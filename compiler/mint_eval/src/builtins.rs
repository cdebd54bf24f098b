//! The builtin root: core types, their methods, and `print`.

use mint_types::{RegistryError, TypeId, FUNCTION_TYPE};

use crate::errors::{arity_mismatch, EvalResult};
use crate::{Mainfold, NativeContext, Runtime};

/// The one callee name the `Call` fast path recognizes.
pub const PRINT_BUILTIN: &str = "print";

/// Handles for the types `install_builtins` registers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuiltinTypes {
    pub module: TypeId,
    pub function: TypeId,
    pub str: TypeId,
    pub null: TypeId,
    pub void: TypeId,
    pub int: TypeId,
    pub float: TypeId,
    pub bool: TypeId,
}

/// Register the builtin types and bind their natives.
///
/// Binds `mstrConcat` (`str.Concat`, `(str) -> str`), `mintToStr`
/// (`int.ToStr`, `() -> str`) and `print` (`(str) -> void`).
pub fn install_builtins(runtime: &mut Runtime) -> Result<BuiltinTypes, RegistryError> {
    let module = runtime.define_type("Module", &[])?;
    let function = runtime.define_function_type(FUNCTION_TYPE)?;

    let str = runtime.define_type("str", &[])?;
    runtime.define_method(str, "Concat", &[str, str], str_concat)?;

    let null = runtime.define_type("null", &[])?;
    let void = runtime.define_type("void", &[])?;

    let int = runtime.define_type("int", &[])?;
    runtime.define_method(int, "ToStr", &[str], int_to_str)?;

    let float = runtime.define_type("float", &[])?;
    let bool = runtime.define_type("bool", &[])?;

    runtime.define_function(PRINT_BUILTIN, &[void, str], builtin_print)?;

    tracing::debug!(
        types = runtime.types().len(),
        natives = runtime.native_count(),
        "installed builtins"
    );
    Ok(BuiltinTypes {
        module,
        function,
        str,
        null,
        void,
        int,
        float,
        bool,
    })
}

/// Print any value followed by a newline.
fn builtin_print(ctx: &NativeContext<'_>, args: &[Mainfold]) -> EvalResult {
    let [value] = args else {
        return Err(arity_mismatch(PRINT_BUILTIN, 1, args.len()));
    };
    ctx.println(&value.load().to_string());
    Ok(Mainfold::None)
}

fn str_concat(_: &NativeContext<'_>, args: &[Mainfold]) -> EvalResult {
    let [receiver, other] = args else {
        return Err(arity_mismatch("mstrConcat", 2, args.len()));
    };
    let mut joined = receiver.str_value()?.to_string();
    joined.push_str(&other.str_value()?);
    Ok(Mainfold::string(joined))
}

fn int_to_str(_: &NativeContext<'_>, args: &[Mainfold]) -> EvalResult {
    let [receiver] = args else {
        return Err(arity_mismatch("mintToStr", 1, args.len()));
    };
    Ok(Mainfold::string(receiver.int_value()?.to_string()))
}
