//! The Mainfold runtime value.
//!
//! Every intermediate and stored result is a `Mainfold`. Exactly one tag is
//! active per value and operators never coerce between tags.
//!
//! `Field` is the one indirection: it names a storage location (a scope slot
//! or an object field) and is the only way a variable or field is read or
//! written. Storage never holds a `Field`, so one `load` always reaches data.

mod object;
mod place;

use std::fmt;
use std::rc::Rc;

use mint_ir::Instruction;

pub use object::{Object, ObjectRef};
pub use place::Place;

use crate::errors::{type_mismatch, EvalError, EvalResult};
use crate::runtime::NativeContext;
use crate::{LocalScope, Scope};

/// Host callback: receives the call's argument frame, returns one value.
pub type NativeFn = fn(&NativeContext<'_>, &[Mainfold]) -> EvalResult;

/// A host function exposed to interpreted code.
#[derive(Copy, Clone, Debug)]
pub struct NativeFunction {
    /// Name the function was registered under (a link name for methods).
    pub name: &'static str,
    /// Expected argument count, checked at the call site when known.
    pub arity: Option<usize>,
    pub func: NativeFn,
}

/// A callable body produced by an `IR` instruction.
///
/// The body runs in a fresh scope on every call. `captured` is only set
/// when the interpreter runs with lexical scoping.
#[derive(Clone)]
pub struct ScopeValue {
    body: Rc<[Instruction]>,
    captured: Option<LocalScope<Scope>>,
}

impl ScopeValue {
    pub fn new(body: Rc<[Instruction]>, captured: Option<LocalScope<Scope>>) -> Self {
        ScopeValue { body, captured }
    }

    #[inline]
    pub fn body(&self) -> Rc<[Instruction]> {
        Rc::clone(&self.body)
    }

    #[inline]
    pub fn captured(&self) -> Option<LocalScope<Scope>> {
        self.captured.clone()
    }

    /// Identity comparison: two values are the same callable only if they
    /// share one body allocation.
    pub fn ptr_eq(&self, other: &ScopeValue) -> bool {
        Rc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Debug for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeValue")
            .field("len", &self.body.len())
            .field("captured", &self.captured.is_some())
            .finish()
    }
}

/// Runtime value.
#[derive(Clone, Default)]
pub enum Mainfold {
    #[default]
    None,
    Int(i64),
    Float(f64),
    String(Rc<str>),
    Bool(bool),
    /// Reference to storage, never data itself.
    Field(Place),
    Object(ObjectRef),
    Native(NativeFunction),
    Scope(ScopeValue),
}

impl Mainfold {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Mainfold::String(s.into())
    }

    /// Tag name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Mainfold::None => "None",
            Mainfold::Int(_) => "Int",
            Mainfold::Float(_) => "Float",
            Mainfold::String(_) => "String",
            Mainfold::Bool(_) => "Bool",
            Mainfold::Field(_) => "Field",
            Mainfold::Object(_) => "Object",
            Mainfold::Native(_) => "Native",
            Mainfold::Scope(_) => "Scope",
        }
    }

    /// Read through a `Field`; any other value is returned as is.
    pub fn load(&self) -> Mainfold {
        match self {
            Mainfold::Field(place) => place.load(),
            other => other.clone(),
        }
    }

    #[inline]
    pub fn is_field(&self) -> bool {
        matches!(self, Mainfold::Field(_))
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Mainfold::Int(n) => Some(*n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Mainfold::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Mainfold::String(s) => Some(s),
            _ => None,
        }
    }

    // Loading accessors for host functions, which receive arguments as the
    // caller evaluated them (possibly still behind a `Field`).

    /// Load and read an `Int`.
    pub fn int_value(&self) -> Result<i64, EvalError> {
        let loaded = self.load();
        loaded
            .as_int()
            .ok_or_else(|| type_mismatch("Int", loaded.type_name()))
    }

    /// Load and read a `Bool`.
    pub fn bool_value(&self) -> Result<bool, EvalError> {
        let loaded = self.load();
        loaded
            .as_bool()
            .ok_or_else(|| type_mismatch("Bool", loaded.type_name()))
    }

    /// Load and read a `String`.
    pub fn str_value(&self) -> Result<Rc<str>, EvalError> {
        match self.load() {
            Mainfold::String(s) => Ok(s),
            other => Err(type_mismatch("String", other.type_name())),
        }
    }
}

impl PartialEq for Mainfold {
    #[allow(clippy::float_cmp, reason = "Float equality is IEEE equality")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Mainfold::None, Mainfold::None) => true,
            (Mainfold::Int(a), Mainfold::Int(b)) => a == b,
            (Mainfold::Float(a), Mainfold::Float(b)) => a == b,
            (Mainfold::String(a), Mainfold::String(b)) => a == b,
            (Mainfold::Bool(a), Mainfold::Bool(b)) => a == b,
            (Mainfold::Field(a), Mainfold::Field(b)) => a.same_location(b),
            (Mainfold::Object(a), Mainfold::Object(b)) => a.ptr_eq(b),
            (Mainfold::Native(a), Mainfold::Native(b)) => a.name == b.name,
            (Mainfold::Scope(a), Mainfold::Scope(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Mainfold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mainfold::None => write!(f, "None"),
            Mainfold::Int(n) => write!(f, "Int({n})"),
            Mainfold::Float(x) => write!(f, "Float({x:?})"),
            Mainfold::String(s) => write!(f, "String({s:?})"),
            Mainfold::Bool(b) => write!(f, "Bool({b})"),
            Mainfold::Field(place) => write!(f, "Field({place:?})"),
            Mainfold::Object(object) => write!(f, "Object({object:?})"),
            Mainfold::Native(native) => write!(f, "Native({})", native.name),
            Mainfold::Scope(scope) => write!(f, "Scope({scope:?})"),
        }
    }
}

/// The text `print` writes for a value.
impl fmt::Display for Mainfold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mainfold::None => write!(f, "None"),
            Mainfold::Int(n) => write!(f, "{n}"),
            Mainfold::Float(x) => write!(f, "{x}"),
            Mainfold::String(s) => write!(f, "{s}"),
            Mainfold::Bool(b) => write!(f, "{b}"),
            Mainfold::Field(place) => write!(f, "{}", place.load()),
            Mainfold::Object(object) => write!(f, "{{object.{}}}", object.type_id()),
            Mainfold::Native(native) => write!(f, "{{native.{}}}", native.name),
            Mainfold::Scope(_) => write!(f, "{{scope}}"),
        }
    }
}
