//! Scenario- and law-level tests exercising the public `lattice_types` API
//! end to end (spec §8 "Testable properties").

use lattice_types::{NativeKind, TypeRegistry};

#[test]
fn union_canonicalization_is_order_independent() {
    let mut registry = TypeRegistry::new();
    let number = registry.get_native(NativeKind::Number);
    let string = registry.get_native(NativeKind::String);
    let boolean = registry.get_native(NativeKind::Boolean);

    let u1 = registry.create_union(vec![number, string, boolean]);
    let u2 = registry.create_union(vec![boolean, string, number]);
    let u3 = registry.create_union(vec![string, boolean, number]);

    // Spec §8 invariant 5: same TypeId, not just the same rendered text.
    assert_eq!(u1, u2);
    assert_eq!(u1, u3);
    assert_eq!(registry.render(u1), "(boolean|number|string)");
}

#[test]
fn nominal_identity_first_declaration_wins() {
    let mut registry = TypeRegistry::new();
    let foo1 = registry.create_object(Some("Foo"), None);
    let foo2 = registry.create_object(Some("Foo"), None);
    assert_eq!(foo1, foo2);
}

#[test]
fn property_reverse_index_closure() {
    let mut registry = TypeRegistry::new();
    let number = registry.get_native(NativeKind::Number);
    let foo = registry.create_object(Some("Foo"), None);
    registry.declare_property(foo, "bar", number, true, false);
    assert!(registry.types_with_property("bar").contains(&foo));
}

#[test]
fn enum_element_renders_and_is_subtype_of_element_type() {
    let mut registry = TypeRegistry::new();
    let number = registry.get_native(NativeKind::Number);
    let foo_enum = registry.create_enum("Foo", number);
    let bar = registry.add_enum_member(foo_enum, "BAR");
    assert_eq!(registry.render(bar), "Foo.<number>");
    assert!(registry.is_subtype(bar, number));
}

#[test]
fn constructor_prototype_and_instance_are_created_together() {
    let mut registry = TypeRegistry::new();
    let number = registry.get_native(NativeKind::Number);
    let ctor = registry.create_function(
        Some("A"),
        vec![],
        vec![],
        number,
        None,
        true,
        false,
    );
    let instance = registry
        .resolve_named("A")
        .expect("A registers under its own name as the constructor");
    assert_eq!(instance, ctor);
}

#[test]
fn subtype_reflexivity_holds_for_constructors_and_instances() {
    let mut registry = TypeRegistry::new();
    let number = registry.get_native(NativeKind::Number);
    let a = registry.create_function(Some("A"), vec![], vec![], number, None, true, false);
    let lattice_types::TypeKind::Function(af) = registry.kind(a) else {
        unreachable!()
    };
    let a_instance = af.instance_type.expect("constructor has an instance type");
    assert!(registry.is_subtype(a, a));
    assert!(registry.is_subtype(a_instance, a_instance));
}
