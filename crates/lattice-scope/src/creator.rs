//! Typed scope creator (spec §4.D): the two-phase AST walk that materializes
//! nominal types, declares variables, and assigns property types.

use crate::alias;
use crate::ast::{Expr, FunctionLit, Literal, PathRoot, Stmt};
use crate::doc_info::{DocInfo, DocInfoAdapter, NominalKind};
use crate::scope::{ScopeId, ScopeTree};
use lattice_common::diagnostics::{Diagnostic, DiagnosticCode};
use lattice_common::Span;
use lattice_types::{NativeKind, TypeId, TypeRegistry};

const ADAPTER: DocInfoAdapter = DocInfoAdapter;

/// A function body collected during phase 1, queued for phase-2 recursion
/// once its enclosing scope's own declarations have settled.
struct PendingFunction {
    lit: FunctionLit,
    this_type: Option<TypeId>,
}

pub struct TypedScopeCreator;

impl TypedScopeCreator {
    /// Create (or extend) a scope from `stmts`. Pass `parent = None` only
    /// for the single root/global scope of a compilation unit.
    pub fn create_scope(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        stmts: &[Stmt],
        parent: Option<ScopeId>,
        this_type: Option<TypeId>,
        is_extern: bool,
    ) -> ScopeId {
        let scope = match parent {
            Some(p) => tree.create_child(p),
            None => tree.root(),
        };
        tracing::trace!(is_extern, stmt_count = stmts.len(), "create_scope: phase 1 starting");

        let mut pending = Vec::new();
        Self::collect(registry, tree, scope, stmts, this_type, is_extern, &mut pending);

        // Phase 2: recurse into nested function bodies only after this
        // scope's own declarations are fully settled (spec §4.D, §5).
        for pending_fn in pending {
            let fn_scope = Self::create_scope(
                registry,
                tree,
                &pending_fn.lit.body,
                Some(scope),
                pending_fn.this_type,
                is_extern,
            );
            tree.record_function_scope(fn_scope, pending_fn.lit.body.clone(), pending_fn.this_type);
        }

        scope
    }

    fn collect(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        scope: ScopeId,
        stmts: &[Stmt],
        this_type: Option<TypeId>,
        is_extern: bool,
        pending: &mut Vec<PendingFunction>,
    ) {
        for stmt in stmts {
            match stmt {
                Stmt::VarDecl { name, init, doc, span } => {
                    Self::handle_var_decl(
                        registry, tree, scope, name, init.as_ref(), doc, *span, this_type,
                        is_extern, pending,
                    );
                }
                Stmt::FunctionDecl(lit) => {
                    let Some(name) = lit.name.clone() else { continue };
                    let init = Expr::Function(Box::new(lit.clone()));
                    Self::handle_var_decl(
                        registry, tree, scope, &name, Some(&init), &lit.doc, lit.span,
                        this_type, is_extern, pending,
                    );
                }
                Stmt::ExprStmt { expr, span, doc } => {
                    Self::handle_expr_stmt(
                        registry, tree, scope, expr, doc, *span, this_type, is_extern, pending,
                    );
                }
                Stmt::Block(body) => {
                    Self::collect(registry, tree, scope, body, this_type, is_extern, pending);
                }
                Stmt::If { then_branch, else_branch, .. } => {
                    Self::collect(registry, tree, scope, then_branch, this_type, is_extern, pending);
                    Self::collect(registry, tree, scope, else_branch, this_type, is_extern, pending);
                }
                Stmt::For { init, body, .. } => {
                    Self::collect(registry, tree, scope, init, this_type, is_extern, pending);
                    Self::collect(registry, tree, scope, body, this_type, is_extern, pending);
                }
                Stmt::Return(_) => {}
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_var_decl(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        scope: ScopeId,
        name: &str,
        init: Option<&Expr>,
        doc: &DocInfo,
        span: Span,
        this_type: Option<TypeId>,
        is_extern: bool,
        pending: &mut Vec<PendingFunction>,
    ) {
        if let Some(Expr::Function(lit)) = init {
            let is_ctor = doc.nominal_kind == Some(NominalKind::Constructor);
            let is_iface = doc.nominal_kind == Some(NominalKind::Interface);
            let func_ty = Self::create_function_type(registry, Some(name), lit, doc, is_ctor, is_iface, is_extern);
            tree.declare(registry, scope, name, func_ty, true, span);
            let fn_this_type = registry.function_instance(func_ty).or(this_type);
            pending.push(PendingFunction {
                lit: (**lit).clone(),
                this_type: if is_ctor || is_iface { fn_this_type } else { None },
            });
            return;
        }

        if doc.nominal_kind == Some(NominalKind::Enum)
            && let Some(Expr::ObjectLiteral(props)) = init
        {
            let element_ty = doc
                .declared_type
                .as_ref()
                .map(|t| ADAPTER.realize(registry, t))
                .unwrap_or_else(|| registry.get_native(NativeKind::Unknown));
            let enum_ty = registry.create_enum(name, element_ty);
            for prop in props {
                registry.add_enum_member(enum_ty, &prop.key);
            }
            tree.declare(registry, scope, name, enum_ty, true, span);
            return;
        }

        if let Some(rhs) = init {
            if let Some((root, segments)) = rhs.flatten_path()
                && let Some(rhs_ty) = Self::resolve_path(registry, tree, scope, this_type, &root, &segments)
                && alias::should_alias(registry, rhs, rhs_ty)
            {
                tree.declare(registry, scope, name, rhs_ty, true, span);
                return;
            }
            if let Expr::New(callee, _args) = rhs
                && let Some((root, segments)) = callee.flatten_path()
                && let Some(ctor_ty) = Self::resolve_path(registry, tree, scope, this_type, &root, &segments)
                && let Some(instance_ty) = registry.function_instance(ctor_ty)
            {
                tree.declare(registry, scope, name, instance_ty, false, span);
                return;
            }
            if let Expr::Call(callee, args) = rhs
                && Self::is_goog_reflect_object(callee)
            {
                let ty = Self::handle_goog_reflect(registry, tree, scope, this_type, args, span);
                tree.declare(registry, scope, name, ty, true, span);
                return;
            }
        }

        let declared = doc.declared_type.is_some();
        let ty = match &doc.declared_type {
            Some(expr) => ADAPTER.realize(registry, expr),
            // No annotation: start inferred vars at bottom; `lattice-infer`
            // joins in the types of every assignment it observes (spec
            // §4.G "Variable type finalization").
            None => init
                .map(|e| Self::infer_literal_type(registry, e))
                .unwrap_or_else(|| registry.get_native(NativeKind::No)),
        };
        tree.declare(registry, scope, name, ty, declared, span);
    }

    #[allow(clippy::too_many_arguments)]
    fn create_function_type(
        registry: &mut TypeRegistry,
        name: Option<&str>,
        lit: &FunctionLit,
        doc: &DocInfo,
        is_ctor: bool,
        is_iface: bool,
        is_extern: bool,
    ) -> TypeId {
        let param_types: Vec<TypeId> = lit
            .params
            .iter()
            .map(|p| {
                doc.params
                    .iter()
                    .find(|(n, _)| n == p)
                    .map(|(_, t)| ADAPTER.realize(registry, t))
                    .unwrap_or_else(|| registry.get_native(NativeKind::Unknown))
            })
            .collect();
        let return_ty = doc
            .return_type
            .as_ref()
            .map(|t| ADAPTER.realize(registry, t))
            .unwrap_or_else(|| registry.get_native(NativeKind::Unknown));
        let func_ty = registry.create_function_with_extern(
            name,
            param_types,
            lit.params.clone(),
            return_ty,
            None,
            is_ctor,
            is_iface,
            is_extern,
        );

        if !doc.template_params.is_empty() {
            registry.set_type_parameters(func_ty, doc.template_params.clone());
        }

        if let Some(extends_expr) = &doc.extends
            && (is_ctor || is_iface)
        {
            let base_ty = ADAPTER.realize(registry, extends_expr);
            match (registry.function_prototype(func_ty), registry.function_prototype(base_ty)) {
                (Some(own_proto), Some(base_proto)) => {
                    registry.set_implicit_prototype(own_proto, Some(base_proto));
                }
                (Some(own_proto), None) => {
                    // Unknown supertype (spec §4.G failure semantics): leave
                    // the chain pointing at Unknown rather than resolved.
                    let unknown = registry.get_native(NativeKind::Unknown);
                    registry.set_implicit_prototype(own_proto, Some(unknown));
                }
                _ => {}
            }
        }

        for iface_expr in &doc.implements {
            let iface_ty = ADAPTER.realize(registry, iface_expr);
            registry.add_implemented_interface(func_ty, iface_ty);
        }

        func_ty
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_expr_stmt(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        scope: ScopeId,
        expr: &Expr,
        doc: &DocInfo,
        span: Span,
        this_type: Option<TypeId>,
        is_extern: bool,
        pending: &mut Vec<PendingFunction>,
    ) {
        match expr {
            Expr::Assign(target, value) => {
                let Some((root, segments)) = target.flatten_path() else { return };
                match (&root, segments.as_slice()) {
                    (PathRoot::Name(f), [only]) if only == "prototype" => {
                        Self::handle_prototype_literal_assign(registry, tree, scope, f, value, is_extern);
                    }
                    (PathRoot::Name(f), [p0, member]) if p0 == "prototype" => {
                        Self::handle_prototype_member_assign(
                            registry, tree, scope, f, member, value, doc, is_extern,
                        );
                    }
                    (PathRoot::This, [member]) => {
                        if let Some(instance) = this_type {
                            let ty = match &doc.declared_type {
                                Some(expr) => ADAPTER.realize(registry, expr),
                                None => Self::infer_literal_type(registry, value),
                            };
                            registry.declare_property(
                                instance,
                                member,
                                ty,
                                doc.declared_type.is_some(),
                                is_extern,
                            );
                        }
                    }
                    (PathRoot::Name(ns), [sub]) => {
                        if let Expr::Function(lit) = value.as_ref()
                            && lit.doc.nominal_kind == Some(NominalKind::Constructor)
                            && let Some(ns_ty) = tree.lookup(scope, ns).map(|v| v.ty)
                            && registry.is_object(ns_ty)
                        {
                            let qualified = format!("{ns}.{sub}");
                            let func_ty = Self::create_function_type(
                                registry,
                                Some(&qualified),
                                lit,
                                &lit.doc,
                                true,
                                false,
                                is_extern,
                            );
                            registry.declare_property(ns_ty, sub, func_ty, true, is_extern);
                            let fn_this_type = registry.function_instance(func_ty);
                            pending.push(PendingFunction {
                                lit: (**lit).clone(),
                                this_type: fn_this_type,
                            });
                        }
                    }
                    _ => {}
                }
            }
            Expr::Member(obj, prop) => {
                // Bare stub reference: `/** @type T */ x.y;` (spec §4.D).
                if let Some((root, segments)) = obj.flatten_path()
                    && let Some(owner) = Self::resolve_path(registry, tree, scope, this_type, &root, &segments)
                {
                    let ty = match &doc.declared_type {
                        Some(expr) => ADAPTER.realize(registry, expr),
                        None => registry.get_native(NativeKind::Unknown),
                    };
                    registry.declare_property(owner, prop, ty, doc.declared_type.is_some(), is_extern);
                }
            }
            _ => {}
        }
        let _ = span;
    }

    /// `F.prototype = { m1: ..., m2: ... }`: the literal's own anonymous
    /// object becomes `F.prototype`'s new implicit prototype (spec §4.D,
    /// §8 scenario 4).
    fn handle_prototype_literal_assign(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        scope: ScopeId,
        ctor_name: &str,
        value: &Expr,
        is_extern: bool,
    ) {
        let Some(ctor_var) = tree.lookup(scope, ctor_name) else { return };
        let ctor_ty = ctor_var.ty;
        if !registry.is_nominal_function(ctor_ty) {
            return;
        }
        let Some(prototype_id) = registry.function_prototype(ctor_ty) else { return };
        let Expr::ObjectLiteral(props) = value else { return };

        let anonymous = registry.create_object(None, None);
        for prop in props {
            let declared = prop.doc.declared_type.is_some();
            let ty = match &prop.doc.declared_type {
                Some(expr) => ADAPTER.realize(registry, expr),
                None => Self::infer_literal_type(registry, &prop.value),
            };
            registry.declare_property(anonymous, &prop.key, ty, declared, is_extern);
        }
        registry.set_implicit_prototype(prototype_id, Some(anonymous));
    }

    /// `F.prototype.m = expr`.
    fn handle_prototype_member_assign(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        scope: ScopeId,
        ctor_name: &str,
        member: &str,
        value: &Expr,
        doc: &DocInfo,
        is_extern: bool,
    ) {
        let Some(ctor_var) = tree.lookup(scope, ctor_name) else { return };
        let ctor_ty = ctor_var.ty;
        let Some(prototype_id) = registry.function_prototype(ctor_ty) else { return };
        let ty = match &doc.declared_type {
            Some(expr) => ADAPTER.realize(registry, expr),
            None => Self::infer_literal_type(registry, value),
        };
        registry.declare_property(prototype_id, member, ty, doc.declared_type.is_some(), is_extern);
    }

    fn resolve_path(
        registry: &TypeRegistry,
        tree: &ScopeTree,
        scope: ScopeId,
        this_type: Option<TypeId>,
        root: &PathRoot,
        segments: &[String],
    ) -> Option<TypeId> {
        let mut current = match root {
            PathRoot::This => this_type?,
            PathRoot::Name(name) => tree.lookup(scope, name)?.ty,
        };
        for seg in segments {
            if seg == "prototype"
                && let Some(proto) = registry.function_prototype(current)
            {
                current = proto;
                continue;
            }
            current = registry.own_property_type(current, seg)?;
        }
        Some(current)
    }

    fn is_goog_reflect_object(callee: &Expr) -> bool {
        match callee.flatten_path() {
            Some((PathRoot::Name(root), segments)) => {
                root == "goog" && segments.len() == 2 && segments[0] == "reflect" && segments[1] == "object"
            }
            _ => false,
        }
    }

    fn handle_goog_reflect(
        registry: &mut TypeRegistry,
        tree: &mut ScopeTree,
        scope: ScopeId,
        this_type: Option<TypeId>,
        args: &[Expr],
        span: Span,
    ) -> TypeId {
        let unknown = registry.get_native(NativeKind::Unknown);
        if args.len() != 2 {
            return unknown;
        }
        let ctor_ty = args[0]
            .flatten_path()
            .and_then(|(root, segments)| Self::resolve_path(registry, tree, scope, this_type, &root, &segments))
            .filter(|t| registry.is_nominal_function(*t));
        let Some(ctor_ty) = ctor_ty else {
            registry.report(Diagnostic::new(
                DiagnosticCode::ConstructorExpected,
                "goog.reflect.object expects a constructor as its first argument",
                span,
            ));
            return unknown;
        };
        if !matches!(&args[1], Expr::ObjectLiteral(_)) {
            registry.report(Diagnostic::new(
                DiagnosticCode::ObjectLiteralExpected,
                "goog.reflect.object expects an object literal as its second argument",
                span,
            ));
            return unknown;
        }
        registry.function_instance(ctor_ty).unwrap_or(unknown)
    }

    fn infer_literal_type(registry: &mut TypeRegistry, expr: &Expr) -> TypeId {
        match expr {
            Expr::Literal(Literal::Number(_)) => registry.get_native(NativeKind::Number),
            Expr::Literal(Literal::Str(_)) => registry.get_native(NativeKind::String),
            Expr::Literal(Literal::Bool(_)) => registry.get_native(NativeKind::Boolean),
            Expr::Literal(Literal::Null) => registry.get_native(NativeKind::Null),
            Expr::Literal(Literal::Undefined) => registry.get_native(NativeKind::Void),
            _ => registry.get_native(NativeKind::Unknown),
        }
    }
}
