//! End-to-end dataflow scenarios (spec §8 "End-to-end scenarios" 5-7 —
//! the ones that need flow-sensitive inference, not just the scope
//! creator's first pass).

use lattice_common::{LatticeOptions, Span};
use lattice_infer::infer_function_body;
use lattice_scope::{DocInfo, Expr, FunctionLit, Literal, NominalKind, Stmt, TypedScopeCreator, TypeExpr};
use lattice_types::TypeRegistry;

fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(Box::new(obj), prop.to_string())
}

#[test]
fn reassigning_a_var_through_three_primitive_types_joins_them_all() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let stmts = vec![
        Stmt::VarDecl {
            name: "x".into(),
            init: Some(Expr::Literal(Literal::Number(3.0))),
            doc: DocInfo::empty(),
            span: Span::NONE,
        },
        Stmt::ExprStmt {
            expr: Expr::Assign(Box::new(ident("x")), Box::new(Expr::Literal(Literal::Str("x".into())))),
            span: Span::NONE,
            doc: DocInfo::empty(),
        },
        Stmt::ExprStmt {
            expr: Expr::Assign(Box::new(ident("x")), Box::new(Expr::Literal(Literal::Bool(true)))),
            span: Span::NONE,
            doc: DocInfo::empty(),
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);
    infer_function_body(&mut registry, &mut tree, scope, None, &stmts, &LatticeOptions::default());

    let x = tree.lookup(scope, "x").unwrap();
    assert!(!x.declared);
    assert_eq!(registry.render(x.ty), "(boolean|number|string)");
}

#[test]
fn declared_nullable_type_is_not_widened_and_propagates_through_a_plain_alias() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let stmts = vec![
        Stmt::VarDecl {
            name: "x".into(),
            init: Some(Expr::Literal(Literal::Number(3.0))),
            doc: DocInfo {
                declared_type: Some(TypeExpr::Nullable(Box::new(TypeExpr::Name("number".into())))),
                ..DocInfo::empty()
            },
            span: Span::NONE,
        },
        Stmt::VarDecl {
            name: "y".into(),
            init: Some(ident("x")),
            doc: DocInfo::empty(),
            span: Span::NONE,
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);
    infer_function_body(&mut registry, &mut tree, scope, None, &stmts, &LatticeOptions::default());

    let x = tree.lookup(scope, "x").unwrap();
    assert!(x.declared);
    assert_eq!(registry.render(x.ty), "(null|number)");

    let y = tree.lookup(scope, "y").unwrap();
    assert_eq!(registry.render(y.ty), "(null|number)");
}

#[test]
fn for_loop_fixpoint_joins_the_initial_and_looped_back_types() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let stmts = vec![Stmt::For {
        init: vec![
            Stmt::VarDecl {
                name: "y".into(),
                init: Some(Expr::Literal(Literal::Number(3.0))),
                doc: DocInfo::empty(),
                span: Span::NONE,
            },
            Stmt::VarDecl {
                name: "x".into(),
                init: Some(Expr::Literal(Literal::Bool(true))),
                doc: DocInfo::empty(),
                span: Span::NONE,
            },
        ],
        test: Some(ident("x")),
        update: Some(Expr::Assign(Box::new(ident("y")), Box::new(ident("x")))),
        body: vec![],
    }];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);
    infer_function_body(&mut registry, &mut tree, scope, None, &stmts, &LatticeOptions::default());

    let y = tree.lookup(scope, "y").unwrap();
    assert!(!y.declared);
    assert_eq!(registry.render(y.ty), "(boolean|number)");
}

#[test]
fn reading_through_prototype_during_inference_sees_the_real_prototype_object() {
    let mut registry = TypeRegistry::new();
    let mut tree = lattice_scope::ScopeTree::new();
    let ctor_doc = DocInfo { nominal_kind: Some(NominalKind::Constructor), ..DocInfo::empty() };
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
            name: "y".into(),
            init: Some(member(member(ident("Foo"), "prototype"), "bar")),
            doc: DocInfo::empty(),
            span: Span::NONE,
        },
    ];
    let scope = TypedScopeCreator::create_scope(&mut registry, &mut tree, &stmts, None, None, false);
    infer_function_body(&mut registry, &mut tree, scope, None, &stmts, &LatticeOptions::default());

    let foo = tree.lookup(scope, "Foo").unwrap().ty;
    let y = tree.lookup(scope, "y").unwrap();
    assert_eq!(registry.render(y.ty), "number");

    let prototype = registry.function_prototype(foo).unwrap();
    let bar_slot = registry.own_property_slot(prototype, "bar").unwrap();
    assert_eq!(registry.render(bar_slot.ty), "number");
    assert!(!registry.types_with_property("bar").iter().any(|t| registry.render(*t) == "?"));
}
