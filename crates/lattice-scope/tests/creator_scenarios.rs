//! End-to-end scope-creator scenarios (spec §8 "End-to-end scenarios"
//! 1-4 — the ones resolvable without flow-sensitive inference).

use lattice_common::Span;
use lattice_scope::{
    DocInfo, Expr, FunctionLit, Literal, NominalKind, ObjectProp, Stmt, TypedScopeCreator,
};
use lattice_types::{NativeKind, TypeKind, TypeRegistry};

fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(Box::new(obj), prop.to_string())
}

#[test]
fn bare_stub_reference_updates_reverse_index_without_an_own_property() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let stmts = vec![
        Stmt::FunctionDecl(FunctionLit {
            name: Some("Foo".into()),
            params: vec![],
            doc: DocInfo::empty(),
            body: vec![],
            span: Span::NONE,
        }),
        Stmt::ExprStmt {
            expr: member(ident("Foo"), "bar"),
            span: Span::NONE,
            doc: DocInfo::empty(),
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);

    let foo = tree.lookup(scope, "Foo").unwrap().ty;
    assert!(matches!(registry.kind(foo), TypeKind::Function(_)));
    assert!(registry.own_property_type(foo, "bar").is_none());
    assert!(registry.types_with_property("bar").contains(&foo));
}

#[test]
fn constructor_prototype_assignment_and_new_produce_an_inferred_instance_property() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let ctor_doc = DocInfo {
        nominal_kind: Some(NominalKind::Constructor),
        ..DocInfo::empty()
    };
    let stmts = vec![
        Stmt::VarDecl {
            name: "Foo".into(),
            init: Some(Expr::Function(Box::new(FunctionLit {
                name: None,
                params: vec![],
                doc: DocInfo::empty(),
                body: vec![],
                span: Span::NONE,
            }))),
            doc: ctor_doc,
            span: Span::NONE,
        },
        Stmt::ExprStmt {
            expr: Expr::Assign(
                Box::new(member(member(ident("Foo"), "prototype"), "bar")),
                Box::new(Expr::Literal(Literal::Number(1.0))),
            ),
            span: Span::NONE,
            doc: DocInfo::empty(),
        },
        Stmt::VarDecl {
            name: "x".into(),
            init: Some(Expr::New(Box::new(ident("Foo")), vec![])),
            doc: DocInfo::empty(),
            span: Span::NONE,
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);

    let foo = tree.lookup(scope, "Foo").unwrap().ty;
    let x = tree.lookup(scope, "x").unwrap();
    assert!(!x.declared);
    assert_eq!(Some(x.ty), registry.function_instance(foo));

    let prototype = registry.function_prototype(foo).unwrap();
    let number = registry.get_native(NativeKind::Number);
    let bar_slot = registry.own_property_slot(prototype, "bar").unwrap();
    assert_eq!(bar_slot.ty, number);
    assert!(!bar_slot.declared);
}

#[test]
fn enum_binding_aliases_by_identity_and_renders_its_element() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let enum_doc = DocInfo {
        nominal_kind: Some(NominalKind::Enum),
        declared_type: Some(lattice_scope::TypeExpr::Name("number".into())),
        ..DocInfo::empty()
    };
    let stmts = vec![
        Stmt::VarDecl {
            name: "Foo".into(),
            init: Some(Expr::ObjectLiteral(vec![ObjectProp {
                key: "BAR".into(),
                value: Expr::Literal(Literal::Number(1.0)),
                doc: DocInfo::empty(),
            }])),
            doc: enum_doc,
            span: Span::NONE,
        },
        Stmt::VarDecl {
            name: "f".into(),
            init: Some(ident("Foo")),
            doc: DocInfo::empty(),
            span: Span::NONE,
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);

    let foo = tree.lookup(scope, "Foo").unwrap().ty;
    let f = tree.lookup(scope, "f").unwrap();
    assert_eq!(f.ty, foo);

    let TypeKind::Enum(e) = registry.kind(foo) else {
        panic!("expected an enum type");
    };
    let bar = *e.members.get("BAR").unwrap();
    assert_eq!(registry.render(bar), "Foo.<number>");
}

#[test]
fn mixed_prototype_literal_and_member_assignment_splits_ownership() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let ctor_doc = DocInfo {
        nominal_kind: Some(NominalKind::Constructor),
        ..DocInfo::empty()
    };
    let stmts = vec![
        Stmt::FunctionDecl(FunctionLit {
            name: Some("A".into()),
            params: vec![],
            doc: ctor_doc,
            body: vec![],
            span: Span::NONE,
        }),
        Stmt::ExprStmt {
            expr: Expr::Assign(
                Box::new(member(ident("A"), "prototype")),
                Box::new(Expr::ObjectLiteral(vec![
                    ObjectProp {
                        key: "m1".into(),
                        value: Expr::Literal(Literal::Number(5.0)),
                        doc: DocInfo::empty(),
                    },
                    ObjectProp {
                        key: "m2".into(),
                        value: Expr::Literal(Literal::Bool(true)),
                        doc: DocInfo::empty(),
                    },
                ])),
            ),
            span: Span::NONE,
            doc: DocInfo::empty(),
        },
        Stmt::ExprStmt {
            expr: Expr::Assign(
                Box::new(member(member(ident("A"), "prototype"), "m3")),
                Box::new(Expr::Literal(Literal::Str("x".into()))),
            ),
            span: Span::NONE,
            doc: DocInfo::empty(),
        },
        Stmt::VarDecl {
            name: "x".into(),
            init: Some(Expr::New(Box::new(ident("A")), vec![])),
            doc: DocInfo::empty(),
            span: Span::NONE,
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);

    let a = tree.lookup(scope, "A").unwrap().ty;
    let prototype = registry.function_prototype(a).unwrap();

    // `m3` is owned directly by the FunctionPrototype object...
    assert!(registry.own_property_type(prototype, "m3").is_some());
    assert!(registry.own_property_type(prototype, "m1").is_none());
    assert!(registry.own_property_type(prototype, "m2").is_none());

    // ...while `m1`/`m2` live on the anonymous object one link further up.
    let TypeKind::Object(proto_obj) = registry.kind(prototype) else {
        panic!("expected the prototype to be an object type");
    };
    let anonymous = proto_obj.implicit_prototype.unwrap();
    let number = registry.get_native(NativeKind::Number);
    let boolean = registry.get_native(NativeKind::Boolean);
    assert_eq!(registry.own_property_type(anonymous, "m1"), Some(number));
    assert_eq!(registry.own_property_type(anonymous, "m2"), Some(boolean));

    let x = tree.lookup(scope, "x").unwrap();
    assert_eq!(Some(x.ty), registry.function_instance(a));
}
