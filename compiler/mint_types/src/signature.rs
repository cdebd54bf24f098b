//! Handles for registered types and instantiated function signatures.

use std::fmt;

/// Handle to a registered type.
///
/// The raw value doubles as the type tag stored on runtime objects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Handle to a memoized `Function` variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariantId(u32);

impl VariantId {
    #[inline]
    pub(crate) const fn from_raw(raw: u32) -> Self {
        VariantId(raw)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A concrete instantiation of the generic `Function` type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    ret: TypeId,
    params: Vec<TypeId>,
}

impl Signature {
    pub(crate) fn from_shape(ret: TypeId, params: &[TypeId]) -> Self {
        Signature {
            ret,
            params: params.to_vec(),
        }
    }

    /// Return type.
    #[inline]
    pub fn ret(&self) -> TypeId {
        self.ret
    }

    /// Parameter types, in call order.
    #[inline]
    pub fn params(&self) -> &[TypeId] {
        &self.params
    }

    /// Number of parameters.
    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}
