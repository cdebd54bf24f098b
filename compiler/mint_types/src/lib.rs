//! Type registration for Mint.
//!
//! The registry here exists for registration and dispatch, not inference:
//! a host registers named types, attaches methods to them, and asks the
//! generic `Function` type for memoized concrete signatures ("variants").
//!
//! # Variants
//!
//! One `Function` descriptor stands for every call shape. A shape is a type
//! list whose first entry is the return type and whose remaining entries are
//! the parameter types, so `[str, str]` is `(str) -> str`. Requesting the
//! same shape twice yields the same `VariantId`.

mod registry;
mod signature;

pub use registry::{MethodDef, RegistryError, TypeDescriptor, TypeRegistry, FUNCTION_TYPE};
pub use signature::{Signature, TypeId, VariantId};
