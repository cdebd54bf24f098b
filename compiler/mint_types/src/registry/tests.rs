use super::*;
use mint_ir::StringInterner;
use pretty_assertions::assert_eq;

struct Fixture {
    interner: StringInterner,
    registry: TypeRegistry,
    function: TypeId,
    str_: TypeId,
    int: TypeId,
}

fn fixture() -> Fixture {
    let interner = StringInterner::new();
    let mut registry = TypeRegistry::new();
    let function = registry
        .register_function_type(interner.intern(FUNCTION_TYPE))
        .unwrap();
    let str_ = registry.register_type(interner.intern("str"), vec![]).unwrap();
    let int = registry.register_type(interner.intern("int"), vec![]).unwrap();
    Fixture {
        interner,
        registry,
        function,
        str_,
        int,
    }
}

#[test]
fn register_and_lookup_type() {
    let f = fixture();
    let name = f.interner.intern("str");
    assert_eq!(f.registry.lookup(name), Some(f.str_));
    assert_eq!(f.registry.get(f.str_).map(TypeDescriptor::name), Some(name));
    assert_eq!(f.registry.function_type(), Some(f.function));
    assert_eq!(f.registry.len(), 3);
}

#[test]
fn register_type_twice_returns_existing() {
    let mut f = fixture();
    let again = f
        .registry
        .register_type(f.interner.intern("int"), vec![])
        .unwrap();
    assert_eq!(again, f.int);
    assert_eq!(f.registry.len(), 3);
}

#[test]
fn variants_are_memoized_per_shape() {
    let mut f = fixture();
    let concat = f.registry.function_variant(&[f.str_, f.str_]).unwrap();
    let again = f.registry.function_variant(&[f.str_, f.str_]).unwrap();
    let to_str = f.registry.function_variant(&[f.str_]).unwrap();

    assert_eq!(concat, again);
    assert_ne!(concat, to_str);
    assert_eq!(f.registry.variant_count(), 2);

    let sig = f.registry.signature(concat).unwrap();
    assert_eq!(sig.ret(), f.str_);
    assert_eq!(sig.params(), &[f.str_]);
    assert_eq!(sig.arity(), 1);
    assert_eq!(f.registry.signature(to_str).unwrap().arity(), 0);
}

#[test]
fn variant_order_matters() {
    let mut f = fixture();
    let a = f.registry.function_variant(&[f.int, f.str_]).unwrap();
    let b = f.registry.function_variant(&[f.str_, f.int]).unwrap();
    assert_ne!(a, b);
}

#[test]
fn empty_variant_is_rejected() {
    let mut f = fixture();
    assert_eq!(
        f.registry.function_variant(&[]),
        Err(RegistryError::EmptyVariant)
    );
}

#[test]
fn variant_with_unknown_type_is_rejected() {
    let mut f = fixture();
    let bogus = TypeId::from_raw(99);
    assert_eq!(
        f.registry.function_variant(&[f.str_, bogus]),
        Err(RegistryError::UnknownType(bogus))
    );
}

#[test]
fn variants_require_function_type() {
    let interner = StringInterner::new();
    let mut registry = TypeRegistry::new();
    let int = registry.register_type(interner.intern("int"), vec![]).unwrap();
    assert_eq!(
        registry.function_variant(&[int]),
        Err(RegistryError::MissingFunctionType)
    );
}

#[test]
fn methods_attach_to_their_type() {
    let mut f = fixture();
    let variant = f.registry.function_variant(&[f.str_, f.str_]).unwrap();
    let concat = f.interner.intern("Concat");
    let def = MethodDef {
        link_name: f.interner.intern("mstrConcat"),
        variant,
    };

    f.registry.set_method(f.str_, concat, def).unwrap();

    assert_eq!(f.registry.method(f.str_, concat), Some(&def));
    assert_eq!(f.registry.method(f.int, concat), None);
    assert_eq!(f.registry.get(f.str_).unwrap().method_count(), 1);
}

#[test]
fn duplicate_method_is_rejected() {
    let mut f = fixture();
    let variant = f.registry.function_variant(&[f.str_]).unwrap();
    let to_str = f.interner.intern("ToStr");
    let def = MethodDef {
        link_name: f.interner.intern("mintToStr"),
        variant,
    };
    f.registry.set_method(f.int, to_str, def).unwrap();
    assert_eq!(
        f.registry.set_method(f.int, to_str, def),
        Err(RegistryError::DuplicateMethod {
            ty: f.int,
            method: to_str,
        })
    );
}

#[test]
fn method_on_unknown_type_is_rejected() {
    let mut f = fixture();
    let variant = f.registry.function_variant(&[f.str_]).unwrap();
    let bogus = TypeId::from_raw(42);
    let def = MethodDef {
        link_name: f.interner.intern("mbogusX"),
        variant,
    };
    assert_eq!(
        f.registry.set_method(bogus, f.interner.intern("X"), def),
        Err(RegistryError::UnknownType(bogus))
    );
}

#[test]
fn field_layout_resolves_positions() {
    let mut f = fixture();
    let x = f.interner.intern("x");
    let y = f.interner.intern("y");
    let point = f
        .registry
        .register_type(f.interner.intern("Point"), vec![x, y])
        .unwrap();
    let descriptor = f.registry.get(point).unwrap();
    assert_eq!(descriptor.field_index(y), Some(1));
    assert_eq!(descriptor.field_index(f.interner.intern("z")), None);
    assert_eq!(descriptor.fields(), &[x, y]);
}
