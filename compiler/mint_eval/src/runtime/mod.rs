//! Runtime context: interner, type registry and native bridge.
//!
//! A `Runtime` is built once, populated during start-up, and then borrowed
//! immutably by every `Interpreter`. There is no global state.
//!
//! # Native binding protocol
//!
//! A host function is stored in the native table and made visible to
//! interpreted code under a name. Binding appends
//! `Decl(name)` + `Set(Var(name), Native(id))` to the prelude, which each
//! `interpret` run evaluates in its fresh root scope before the program.
//! At the call site a bound native is indistinguishable from a `Scope`
//! callable except by its tag.

use mint_ir::{Instruction, NativeId, SharedInterner, StringInterner};
use mint_types::{MethodDef, RegistryError, TypeId, TypeRegistry};

use crate::{NativeFn, NativeFunction, SharedPrintHandler};

/// What a host function can see while it runs.
pub struct NativeContext<'a> {
    runtime: &'a Runtime,
    print_handler: &'a SharedPrintHandler,
}

impl<'a> NativeContext<'a> {
    pub(crate) fn new(runtime: &'a Runtime, print_handler: &'a SharedPrintHandler) -> Self {
        NativeContext {
            runtime,
            print_handler,
        }
    }

    /// Write a line through the interpreter's print handler.
    pub fn println(&self, msg: &str) {
        self.print_handler.println(msg);
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        self.runtime.interner()
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        self.runtime.types()
    }
}

/// Registration state shared by all interpreters.
#[derive(Default)]
pub struct Runtime {
    interner: SharedInterner,
    types: TypeRegistry,
    natives: Vec<NativeFunction>,
    prelude: Vec<Instruction>,
}

impl Runtime {
    /// Create an empty runtime with no types and no natives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runtime sharing an existing interner.
    pub fn with_interner(interner: SharedInterner) -> Self {
        Runtime {
            interner,
            ..Self::default()
        }
    }

    #[inline]
    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    #[inline]
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    #[inline]
    pub fn types_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Instructions every `interpret` run evaluates before the program.
    #[inline]
    pub fn prelude(&self) -> &[Instruction] {
        &self.prelude
    }

    /// Look up a native by handle.
    #[inline]
    pub fn native(&self, id: NativeId) -> Option<&NativeFunction> {
        self.natives.get(id.index())
    }

    pub fn native_count(&self) -> usize {
        self.natives.len()
    }

    /// Add a host function to the native table without binding a name.
    pub fn register_native(
        &mut self,
        name: &str,
        arity: Option<usize>,
        func: NativeFn,
    ) -> Result<NativeId, RegistryError> {
        let raw = u32::try_from(self.natives.len()).map_err(|_| RegistryError::Full)?;
        let id = NativeId::new(raw);
        let name = self.interner.lookup(self.interner.intern(name));
        self.natives.push(NativeFunction { name, arity, func });
        tracing::debug!(name, %id, ?arity, "registered native");
        Ok(id)
    }

    /// Make a registered native visible to interpreted code as `name`.
    pub fn bind_native(&mut self, name: &str, id: NativeId) {
        let name = self.interner.intern(name);
        self.prelude.push(Instruction::decl(name));
        self.prelude.push(Instruction::set(
            Instruction::var(name),
            Instruction::native(id),
        ));
    }

    /// Register a named type with a positional field layout.
    pub fn define_type(&mut self, name: &str, fields: &[&str]) -> Result<TypeId, RegistryError> {
        let name = self.interner.intern(name);
        let fields = fields.iter().map(|f| self.interner.intern(f)).collect();
        self.types.register_type(name, fields)
    }

    /// Register the generic type that owns every function variant.
    pub fn define_function_type(&mut self, name: &str) -> Result<TypeId, RegistryError> {
        let name = self.interner.intern(name);
        self.types.register_function_type(name)
    }

    /// Register and bind a global host function.
    ///
    /// `shape` is the variant shape: return type first, then parameters.
    /// Calls are checked against the parameter count.
    pub fn define_function(
        &mut self,
        name: &str,
        shape: &[TypeId],
        func: NativeFn,
    ) -> Result<NativeId, RegistryError> {
        let variant = self.types.function_variant(shape)?;
        let arity = self
            .types
            .signature(variant)
            .map(mint_types::Signature::arity);
        let id = self.register_native(name, arity, func)?;
        self.bind_native(name, id);
        Ok(id)
    }

    /// Attach a host-implemented method to a type.
    ///
    /// The native is bound under its link name (see `method_link_name`) and
    /// takes the receiver as its first argument, so its arity is the
    /// variant's parameter count plus one.
    pub fn define_method(
        &mut self,
        ty: TypeId,
        method: &str,
        shape: &[TypeId],
        func: NativeFn,
    ) -> Result<MethodDef, RegistryError> {
        let link = self.method_link_name(ty, method)?;
        let variant = self.types.function_variant(shape)?;
        let def = MethodDef {
            link_name: self.interner.intern(&link),
            variant,
        };
        let method_name = self.interner.intern(method);
        self.types.set_method(ty, method_name, def)?;

        let arity = self
            .types
            .signature(variant)
            .map(|sig| sig.arity().saturating_add(1));
        let id = self.register_native(&link, arity, func)?;
        self.bind_native(&link, id);
        Ok(def)
    }

    /// Link name of a method: `m` + type name + method name.
    pub fn method_link_name(&self, ty: TypeId, method: &str) -> Result<String, RegistryError> {
        let descriptor = self.types.get(ty).ok_or(RegistryError::UnknownType(ty))?;
        Ok(format!(
            "m{}{method}",
            self.interner.lookup(descriptor.name())
        ))
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("types", &self.types.len())
            .field("natives", &self.natives.len())
            .field("prelude", &self.prelude.len())
            .finish()
    }
}
