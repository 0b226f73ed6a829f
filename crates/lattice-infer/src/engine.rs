//! Type inference engine (spec §4.G): the monotone dataflow pass over a
//! function body, using the scope tree (B), the registry (A), and the
//! reverse abstract interpreter (F) for branch-sensitive narrowing.

use crate::flow_state::FlowState;
use crate::reverse_interpreter::refine;
use lattice_common::LatticeOptions;
use lattice_scope::{Expr, Literal, PathRoot, ScopeId, ScopeTree, Stmt};
use lattice_types::{NativeKind, PrimitiveKind, TypeId, TypeKind, TypeRegistry};

/// Threads two parallel `Var -> Type` maps through a function body:
/// `narrowed` is the branch-local refinement state the reverse
/// interpreter reads and writes; `accumulated` only ever grows via
/// `join`, and seeds the "variable type finalization" step (spec §4.G) —
/// narrowing must never permanently shrink a variable's reported type.
#[derive(Clone)]
struct DataflowState {
    narrowed: FlowState,
    accumulated: FlowState,
}

impl DataflowState {
    fn seed(tree: &ScopeTree, scope: ScopeId) -> Self {
        let mut narrowed = FlowState::new();
        let mut accumulated = FlowState::new();
        for var in tree.own_vars(scope) {
            narrowed.set(&var.name, var.ty);
            accumulated.set(&var.name, var.ty);
        }
        DataflowState { narrowed, accumulated }
    }

    fn assign(&mut self, registry: &mut TypeRegistry, tree: &ScopeTree, scope: ScopeId, name: &str, ty: TypeId) {
        let is_declared = tree.lookup(scope, name).map(|v| v.declared).unwrap_or(false);
        if is_declared {
            // Declared vars' types are fixed by their annotation; an
            // assigned value never changes what a later read sees (spec
            // §4.G: "for a declared var, type stays fixed").
            return;
        }
        let joined = match self.accumulated.get(name) {
            Some(existing) => registry.join(existing, ty),
            None => ty,
        };
        self.accumulated.set(name, joined);
        self.narrowed.set(name, joined);
    }

    fn merge(&self, registry: &mut TypeRegistry, other: &DataflowState) -> DataflowState {
        DataflowState {
            narrowed: self.narrowed.join(registry, &other.narrowed),
            accumulated: self.accumulated.join(registry, &other.accumulated),
        }
    }
}

/// Runs inference over one function (or the top-level program) body and
/// finalizes every inferred variable's type in `scope` (spec §4.G
/// "Variable type finalization").
pub fn infer_function_body(
    registry: &mut TypeRegistry,
    tree: &mut ScopeTree,
    scope: ScopeId,
    this_type: Option<TypeId>,
    body: &[Stmt],
    options: &LatticeOptions,
) {
    tracing::debug!(stmt_count = body.len(), "infer_function_body: starting");
    let mut state = DataflowState::seed(tree, scope);
    run_block(registry, tree, scope, this_type, body, &mut state, options);

    let names: Vec<String> = tree.own_vars(scope).map(|v| v.name.clone()).collect();
    for name in names {
        let declared = tree.lookup(scope, &name).map(|v| v.declared).unwrap_or(true);
        if declared {
            continue;
        }
        if let Some(ty) = state.accumulated.get(&name) {
            tree.set_final_type(scope, &name, ty);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_block(
    registry: &mut TypeRegistry,
    tree: &mut ScopeTree,
    scope: ScopeId,
    this_type: Option<TypeId>,
    stmts: &[Stmt],
    state: &mut DataflowState,
    options: &LatticeOptions,
) {
    for stmt in stmts {
        run_stmt(registry, tree, scope, this_type, stmt, state, options);
    }
}

#[allow(clippy::too_many_arguments)]
fn run_stmt(
    registry: &mut TypeRegistry,
    tree: &mut ScopeTree,
    scope: ScopeId,
    this_type: Option<TypeId>,
    stmt: &Stmt,
    state: &mut DataflowState,
    options: &LatticeOptions,
) {
    match stmt {
        Stmt::VarDecl { name, init, .. } => {
            if let Some(init_expr) = init {
                let ty = eval_expr(registry, tree, scope, this_type, state, init_expr, options);
                state.assign(registry, tree, scope, name, ty);
            }
        }
        Stmt::FunctionDecl(_) => {
            // Declaration (and its body's own inference pass) already
            // happened in the typed scope creator / its own recursive
            // `infer_function_body` call; nothing to do at this site.
        }
        Stmt::ExprStmt { expr, .. } => {
            eval_expr(registry, tree, scope, this_type, state, expr, options);
        }
        Stmt::Block(body) => {
            run_block(registry, tree, scope, this_type, body, state, options);
        }
        Stmt::If { test, then_branch, else_branch } => {
            eval_expr(registry, tree, scope, this_type, state, test, options);
            let mut then_state = DataflowState {
                narrowed: refine(registry, &state.narrowed, test, true),
                accumulated: state.accumulated.clone(),
            };
            run_block(registry, tree, scope, this_type, then_branch, &mut then_state, options);

            let mut else_state = DataflowState {
                narrowed: refine(registry, &state.narrowed, test, false),
                accumulated: state.accumulated.clone(),
            };
            run_block(registry, tree, scope, this_type, else_branch, &mut else_state, options);

            *state = then_state.merge(registry, &else_state);
        }
        Stmt::For { init, test, update, body } => {
            run_block(registry, tree, scope, this_type, init, state, options);

            let mut iterations = 0;
            loop {
                let body_narrowed_in = match test {
                    Some(t) => refine(registry, &state.narrowed, t, true),
                    None => state.narrowed.clone(),
                };
                let mut body_state = DataflowState {
                    narrowed: body_narrowed_in,
                    accumulated: state.accumulated.clone(),
                };
                run_block(registry, tree, scope, this_type, body, &mut body_state, options);
                if let Some(update_expr) = update {
                    eval_expr(registry, tree, scope, this_type, &mut body_state, update_expr, options);
                }

                let next = state.merge(registry, &body_state);
                iterations += 1;
                let converged = next.accumulated.vars_eq(&state.accumulated) && next.narrowed.vars_eq(&state.narrowed);
                *state = next;
                if converged {
                    tracing::trace!(iterations, "for-loop dataflow fixpoint converged");
                    break;
                }
                if iterations >= options.max_fixpoint_iterations {
                    tracing::debug!(iterations, "for-loop dataflow hit the fixpoint iteration cap");
                    break;
                }
            }

            if let Some(t) = test {
                state.narrowed = refine(registry, &state.narrowed, t, false);
            }
        }
        Stmt::Return(expr) => {
            if let Some(e) = expr {
                eval_expr(registry, tree, scope, this_type, state, e, options);
            }
        }
    }
}

/// Post-order expression evaluation (spec §4.G).
#[allow(clippy::too_many_arguments)]
fn eval_expr(
    registry: &mut TypeRegistry,
    tree: &mut ScopeTree,
    scope: ScopeId,
    this_type: Option<TypeId>,
    state: &mut DataflowState,
    expr: &Expr,
    options: &LatticeOptions,
) -> TypeId {
    match expr {
        Expr::Literal(lit) => literal_type(registry, lit),
        Expr::Ident(name) => state
            .narrowed
            .get(name)
            .or_else(|| tree.lookup(scope, name).map(|v| v.ty))
            .unwrap_or_else(|| registry.get_native(NativeKind::Unknown)),
        Expr::This => this_type.unwrap_or_else(|| registry.get_native(NativeKind::Unknown)),
        Expr::Member(obj, prop) => {
            let obj_ty = eval_expr(registry, tree, scope, this_type, state, obj, options);
            property_type(registry, obj_ty, prop, options)
        }
        Expr::Call(callee, args) => {
            let callee_ty = eval_expr(registry, tree, scope, this_type, state, callee, options);
            let arg_types: Vec<TypeId> = args
                .iter()
                .map(|a| eval_expr(registry, tree, scope, this_type, state, a, options))
                .collect();
            match registry.kind(callee_ty) {
                TypeKind::Function(_) => registry.instantiate(callee_ty, &arg_types),
                _ => registry.get_native(NativeKind::Unknown),
            }
        }
        Expr::New(callee, args) => {
            for a in args {
                eval_expr(registry, tree, scope, this_type, state, a, options);
            }
            let ctor_ty = eval_expr(registry, tree, scope, this_type, state, callee, options);
            registry.function_instance(ctor_ty).unwrap_or_else(|| registry.get_native(NativeKind::Unknown))
        }
        Expr::Assign(target, value) => {
            apply_assignment(registry, tree, scope, this_type, state, target, value, options)
        }
        Expr::Function(_) => registry.get_native(NativeKind::Unknown),
        Expr::ObjectLiteral(props) => {
            for p in props {
                eval_expr(registry, tree, scope, this_type, state, &p.value, options);
            }
            registry.get_native(NativeKind::Object)
        }
        Expr::Binary(op, left, right) => {
            let l = eval_expr(registry, tree, scope, this_type, state, left, options);
            let r = eval_expr(registry, tree, scope, this_type, state, right, options);
            binary_result(registry, *op, l, r)
        }
        Expr::Logical(_, left, right) => {
            eval_expr(registry, tree, scope, this_type, state, left, options);
            eval_expr(registry, tree, scope, this_type, state, right, options)
        }
        Expr::Not(e) => {
            eval_expr(registry, tree, scope, this_type, state, e, options);
            registry.get_native(NativeKind::Boolean)
        }
        Expr::Eq { left, right, .. } => {
            eval_expr(registry, tree, scope, this_type, state, left, options);
            eval_expr(registry, tree, scope, this_type, state, right, options);
            registry.get_native(NativeKind::Boolean)
        }
        Expr::Typeof(e) => {
            eval_expr(registry, tree, scope, this_type, state, e, options);
            registry.get_native(NativeKind::String)
        }
        Expr::InstanceOf(obj, ctor) => {
            eval_expr(registry, tree, scope, this_type, state, obj, options);
            eval_expr(registry, tree, scope, this_type, state, ctor, options);
            registry.get_native(NativeKind::Boolean)
        }
    }
}

fn literal_type(registry: &mut TypeRegistry, lit: &Literal) -> TypeId {
    match lit {
        Literal::Number(_) => registry.get_native(NativeKind::Number),
        Literal::Str(_) => registry.get_native(NativeKind::String),
        Literal::Bool(_) => registry.get_native(NativeKind::Boolean),
        Literal::Null => registry.get_native(NativeKind::Null),
        Literal::Undefined => registry.get_native(NativeKind::Void),
    }
}

fn binary_result(registry: &mut TypeRegistry, op: lattice_scope::BinOp, left: TypeId, right: TypeId) -> TypeId {
    use lattice_scope::BinOp;
    let unknown = registry.get_native(NativeKind::Unknown);
    if left == unknown || right == unknown {
        return unknown;
    }
    match op {
        BinOp::Add => {
            let string = registry.get_native(NativeKind::String);
            let is_string = |t: TypeId, reg: &TypeRegistry| reg.is_subtype(t, string);
            if is_string(left, registry) || is_string(right, registry) {
                string
            } else {
                registry.get_native(NativeKind::Number)
            }
        }
        BinOp::Sub | BinOp::Mul | BinOp::Div => registry.get_native(NativeKind::Number),
        BinOp::Lt | BinOp::Gt | BinOp::Le | BinOp::Ge => registry.get_native(NativeKind::Boolean),
    }
}

/// Dereference `owner` for property access: strip null/void, autobox
/// primitives, then walk the prototype chain (spec §4.G "Property access
/// `e.p`"). Stripping null/void only happens under `strict_null_checks`;
/// otherwise a possibly-nullish owner is expected to have been narrowed by
/// an explicit guard already, and is looked up as-is.
fn property_type(registry: &mut TypeRegistry, owner: TypeId, name: &str, options: &LatticeOptions) -> TypeId {
    let stripped = if options.strict_null_checks {
        registry.restrict_not_null_or_void(owner)
    } else {
        owner
    };
    let unknown = registry.get_native(NativeKind::Unknown);
    let no = registry.get_native(NativeKind::No);
    if stripped == no {
        return unknown;
    }
    if name == "prototype"
        && let Some(proto) = registry.function_prototype(stripped)
    {
        return proto;
    }
    let boxed = match registry.kind(stripped) {
        TypeKind::Primitive(PrimitiveKind::Number) => registry.get_native(NativeKind::NumberObject),
        TypeKind::Primitive(PrimitiveKind::String) => registry.get_native(NativeKind::StringObject),
        TypeKind::Primitive(PrimitiveKind::Boolean) => registry.get_native(NativeKind::BooleanObject),
        _ => stripped,
    };
    if let TypeKind::Record(r) = registry.kind(boxed) {
        if let Some((_, ty)) = r.fields.iter().find(|(n, _)| n == name) {
            return *ty;
        }
        return unknown;
    }
    registry.property_type_through_chain(boxed, name).unwrap_or(unknown)
}

#[allow(clippy::too_many_arguments)]
fn apply_assignment(
    registry: &mut TypeRegistry,
    tree: &mut ScopeTree,
    scope: ScopeId,
    this_type: Option<TypeId>,
    state: &mut DataflowState,
    target: &Expr,
    value: &Expr,
    options: &LatticeOptions,
) -> TypeId {
    let value_ty = eval_expr(registry, tree, scope, this_type, state, value, options);
    match target.flatten_path() {
        Some((PathRoot::Name(name), segments)) if segments.is_empty() => {
            state.assign(registry, tree, scope, &name, value_ty);
        }
        Some((root, segments)) if !segments.is_empty() => {
            let (owner_path, member) = segments.split_at(segments.len() - 1);
            let owner_ty = resolve_owner(registry, tree, scope, this_type, state, &root, owner_path, options);
            if let Some(owner_ty) = owner_ty {
                assign_property(registry, owner_ty, &member[0], value_ty);
            }
        }
        _ => {}
    }
    value_ty
}

#[allow(clippy::too_many_arguments)]
fn resolve_owner(
    registry: &mut TypeRegistry,
    tree: &mut ScopeTree,
    scope: ScopeId,
    this_type: Option<TypeId>,
    state: &mut DataflowState,
    root: &PathRoot,
    segments: &[String],
    options: &LatticeOptions,
) -> Option<TypeId> {
    let mut current = match root {
        PathRoot::This => this_type?,
        PathRoot::Name(name) => eval_expr(registry, tree, scope, this_type, state, &Expr::Ident(name.clone()), options),
    };
    for seg in segments {
        if seg == "prototype"
            && let Some(proto) = registry.function_prototype(current)
        {
            current = proto;
            continue;
        }
        current = property_type(registry, current, seg, options);
    }
    Some(current)
}

/// Assignment through `obj.p` (spec §4.G): inferred properties join with
/// their prior type; declared properties are unaffected.
fn assign_property(registry: &mut TypeRegistry, owner: TypeId, name: &str, value_ty: TypeId) {
    match registry.own_property_slot(owner, name) {
        Some(slot) if slot.declared => {}
        Some(slot) => {
            let joined = registry.join(slot.ty, value_ty);
            registry.declare_property(owner, name, joined, false, false);
        }
        None => {
            registry.declare_property(owner, name, value_ty, false, false);
        }
    }
}
