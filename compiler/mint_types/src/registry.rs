//! Registry of named types, their methods, and `Function` variants.
//!
//! # Design
//!
//! - Types are stored densely; `TypeId` is the index into that storage
//! - Name index: O(1) lookup of a type by its interned name
//! - Variant cache: one `Signature` per distinct shape, keyed by the shape

use mint_ir::Name;
use rustc_hash::FxHashMap;

use crate::{Signature, TypeId, VariantId};

/// Name of the generic function type that owns all variants.
pub const FUNCTION_TYPE: &str = "Function";

/// Error raised while registering types, methods or variants.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown type {0}")]
    UnknownType(TypeId),
    #[error("a function variant needs at least a return type")]
    EmptyVariant,
    #[error("the `Function` type must be registered before requesting variants")]
    MissingFunctionType,
    #[error("method {method:?} is already defined on {ty}")]
    DuplicateMethod { ty: TypeId, method: Name },
    #[error("unknown function variant {0:?}")]
    UnknownVariant(VariantId),
    #[error("type registry is full")]
    Full,
}

/// A method attached to a type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDef {
    /// Global name the native implementation is bound to.
    pub link_name: Name,
    /// Signature of the method, excluding the receiver.
    pub variant: VariantId,
}

/// Static description of a registered type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: Name,
    /// Field names in layout order; objects store fields by position.
    fields: Vec<Name>,
    methods: FxHashMap<Name, MethodDef>,
}

impl TypeDescriptor {
    fn new(name: Name, fields: Vec<Name>) -> Self {
        TypeDescriptor {
            name,
            fields,
            methods: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn name(&self) -> Name {
        self.name
    }

    #[inline]
    pub fn fields(&self) -> &[Name] {
        &self.fields
    }

    /// Position of a named field, for lowering stages that resolve field
    /// access to `Field(index)`.
    pub fn field_index(&self, field: Name) -> Option<usize> {
        self.fields.iter().position(|&f| f == field)
    }

    #[inline]
    pub fn method(&self, method: Name) -> Option<&MethodDef> {
        self.methods.get(&method)
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }
}

/// Process-wide table of types, populated once before any program runs.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: Vec<TypeDescriptor>,
    by_name: FxHashMap<Name, TypeId>,
    /// The generic `Function` type, once registered.
    function: Option<TypeId>,
    /// Shape (return type first) -> memoized variant.
    variants: FxHashMap<Vec<TypeId>, VariantId>,
    signatures: Vec<Signature>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named type with a positional field layout.
    ///
    /// Registering a name twice returns the existing type unchanged.
    pub fn register_type(&mut self, name: Name, fields: Vec<Name>) -> Result<TypeId, RegistryError> {
        if let Some(&existing) = self.by_name.get(&name) {
            return Ok(existing);
        }
        let raw = u32::try_from(self.types.len()).map_err(|_| RegistryError::Full)?;
        let id = TypeId::from_raw(raw);
        self.types.push(TypeDescriptor::new(name, fields));
        self.by_name.insert(name, id);
        tracing::debug!(?name, %id, "registered type");
        Ok(id)
    }

    /// Register the generic function type that owns all variants.
    pub fn register_function_type(&mut self, name: Name) -> Result<TypeId, RegistryError> {
        let id = self.register_type(name, Vec::new())?;
        self.function = Some(id);
        Ok(id)
    }

    /// The generic function type, if registered.
    #[inline]
    pub fn function_type(&self) -> Option<TypeId> {
        self.function
    }

    /// Attach a method to a registered type.
    pub fn set_method(&mut self, ty: TypeId, method: Name, def: MethodDef) -> Result<(), RegistryError> {
        if def.variant.index() >= self.signatures.len() {
            return Err(RegistryError::UnknownVariant(def.variant));
        }
        let descriptor = self
            .types
            .get_mut(ty.index())
            .ok_or(RegistryError::UnknownType(ty))?;
        if descriptor.methods.contains_key(&method) {
            return Err(RegistryError::DuplicateMethod { ty, method });
        }
        descriptor.methods.insert(method, def);
        tracing::debug!(%ty, ?method, link_name = ?def.link_name, "registered method");
        Ok(())
    }

    /// Get (or create) the `Function` variant for a shape.
    ///
    /// `shape[0]` is the return type, the rest are parameter types.
    pub fn function_variant(&mut self, shape: &[TypeId]) -> Result<VariantId, RegistryError> {
        if self.function.is_none() {
            return Err(RegistryError::MissingFunctionType);
        }
        let (&ret, params) = shape.split_first().ok_or(RegistryError::EmptyVariant)?;
        if let Some(&unknown) = shape.iter().find(|ty| ty.index() >= self.types.len()) {
            return Err(RegistryError::UnknownType(unknown));
        }
        if let Some(&variant) = self.variants.get(shape) {
            return Ok(variant);
        }

        let raw = u32::try_from(self.signatures.len()).map_err(|_| RegistryError::Full)?;
        let variant = VariantId::from_raw(raw);
        self.signatures.push(Signature::from_shape(ret, params));
        self.variants.insert(shape.to_vec(), variant);
        tracing::trace!(?shape, ?variant, "instantiated function variant");
        Ok(variant)
    }

    /// Signature of a variant.
    #[inline]
    pub fn signature(&self, variant: VariantId) -> Option<&Signature> {
        self.signatures.get(variant.index())
    }

    /// Number of distinct variants instantiated so far.
    pub fn variant_count(&self) -> usize {
        self.signatures.len()
    }

    // === Lookup Methods ===

    #[inline]
    pub fn get(&self, ty: TypeId) -> Option<&TypeDescriptor> {
        self.types.get(ty.index())
    }

    #[inline]
    pub fn lookup(&self, name: Name) -> Option<TypeId> {
        self.by_name.get(&name).copied()
    }

    /// Look up a method by type and method name.
    pub fn method(&self, ty: TypeId, method: Name) -> Option<&MethodDef> {
        self.get(ty)?.method(method)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests unwrap for brevity")]
mod tests;
