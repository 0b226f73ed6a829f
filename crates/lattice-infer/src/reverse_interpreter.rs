//! Reverse abstract interpreter (spec §4.F): given an expression and a
//! desired boolean outcome, restricts the flow state's variable types to
//! those consistent with that outcome.

use crate::flow_state::FlowState;
use lattice_scope::{Expr, Literal, LogicalOp};
use lattice_types::{NativeKind, TypeRegistry};

/// The subject variable of a refinable leaf expression: a bare name or
/// `this`-rooted path with no further member access. Property chains
/// (`x.y`) aren't tracked as independent flow-state slots in this core, so
/// they refine to nothing.
fn subject_name(expr: &Expr) -> Option<String> {
    let (root, segments) = expr.flatten_path()?;
    if !segments.is_empty() {
        return None;
    }
    match root {
        lattice_scope::PathRoot::Name(name) => Some(name),
        lattice_scope::PathRoot::This => Some("this".to_string()),
    }
}

fn null_or_undefined_literal(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal(Literal::Null | Literal::Undefined))
}

/// Refine `state` under the assumption that `expr` evaluated to `outcome`
/// (spec §4.F's table, one row per `Expr` shape).
pub fn refine(registry: &mut TypeRegistry, state: &FlowState, expr: &Expr, outcome: bool) -> FlowState {
    match expr {
        Expr::Not(inner) => refine(registry, state, inner, !outcome),

        Expr::Logical(LogicalOp::And, a, b) => {
            if outcome {
                let a_true = refine(registry, state, a, true);
                refine(registry, &a_true, b, true)
            } else {
                let a_false = refine(registry, state, a, false);
                let a_true = refine(registry, state, a, true);
                let a_true_b_false = refine(registry, &a_true, b, false);
                a_false.join(registry, &a_true_b_false)
            }
        }

        Expr::Logical(LogicalOp::Or, a, b) => {
            if outcome {
                let a_true = refine(registry, state, a, true);
                let a_false = refine(registry, state, a, false);
                let a_false_b_true = refine(registry, &a_false, b, true);
                a_true.join(registry, &a_false_b_true)
            } else {
                let a_false = refine(registry, state, a, false);
                refine(registry, &a_false, b, false)
            }
        }

        Expr::Eq { strict, left, right } => refine_equality(registry, state, *strict, left, right, outcome),

        Expr::InstanceOf(obj, ctor) => refine_instanceof(registry, state, obj, ctor, outcome),

        _ => {
            // Bare-value refinement: `x` (spec §4.F row 1).
            let Some(name) = subject_name(expr) else { return state.clone() };
            let Some(ty) = state.get(&name) else { return state.clone() };
            let mut next = state.clone();
            next.set(&name, registry.restrict_by_truthy(ty, outcome));
            next
        }
    }
}

fn refine_equality(
    registry: &mut TypeRegistry,
    state: &FlowState,
    strict: bool,
    left: &Expr,
    right: &Expr,
    outcome: bool,
) -> FlowState {
    // `typeof x == "T"` / `typeof x != "T"`.
    if let Expr::Typeof(inner) = left
        && let Expr::Literal(Literal::Str(tag)) = right
    {
        return refine_typeof(registry, state, inner, tag, outcome);
    }
    if let Expr::Typeof(inner) = right
        && let Expr::Literal(Literal::Str(tag)) = left
    {
        return refine_typeof(registry, state, inner, tag, outcome);
    }

    // `x == null` / `x === null` (and the symmetric `null == x`).
    let (subject, is_null_compare) = if null_or_undefined_literal(right) {
        (Some(left), true)
    } else if null_or_undefined_literal(left) {
        (Some(right), true)
    } else {
        (None, false)
    };
    if is_null_compare
        && let Some(subject) = subject
        && let Some(name) = subject_name(subject)
        && let Some(ty) = state.get(&name)
    {
        let mut next = state.clone();
        let narrowed = if strict {
            if outcome { registry.restrict_to_null(ty) } else { registry.exclude_null(ty) }
        } else if outcome {
            let null = registry.get_native(NativeKind::Null);
            let void = registry.get_native(NativeKind::Void);
            registry.create_union(vec![null, void])
        } else {
            registry.restrict_not_null_or_void(ty)
        };
        next.set(&name, narrowed);
        return next;
    }

    state.clone()
}

fn refine_typeof(registry: &mut TypeRegistry, state: &FlowState, subject: &Expr, tag: &str, outcome: bool) -> FlowState {
    let Some(name) = subject_name(subject) else { return state.clone() };
    let Some(ty) = state.get(&name) else { return state.clone() };
    let mut next = state.clone();
    let narrowed = if outcome { registry.restrict_by_typeof(ty, tag) } else { registry.exclude_by_typeof(ty, tag) };
    next.set(&name, narrowed);
    next
}

fn refine_instanceof(registry: &mut TypeRegistry, state: &FlowState, obj: &Expr, ctor: &Expr, outcome: bool) -> FlowState {
    let Some(name) = subject_name(obj) else { return state.clone() };
    let Some(ty) = state.get(&name) else { return state.clone() };
    let Some(ctor_name) = subject_name(ctor) else { return state.clone() };
    let Some(ctor_ty) = registry.resolve_named(&ctor_name) else { return state.clone() };
    let Some(instance_ty) = registry.function_instance(ctor_ty) else { return state.clone() };

    let mut next = state.clone();
    let narrowed = if outcome {
        registry.meet(ty, instance_ty)
    } else {
        registry.exclude_instance_of(ty, instance_ty)
    };
    next.set(&name, narrowed);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_types::NativeKind;

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    #[test]
    fn bare_name_truthy_narrowing_drops_nullish() {
        let mut registry = TypeRegistry::new();
        let string = registry.get_native(NativeKind::String);
        let null = registry.get_native(NativeKind::Null);
        let union = registry.create_union(vec![string, null]);
        let mut state = FlowState::new();
        state.set("x", union);

        let narrowed = refine(&mut registry, &state, &ident("x"), true);
        assert_eq!(narrowed.get("x"), Some(string));
    }

    #[test]
    fn strict_null_equality_true_branch_narrows_to_null() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(NativeKind::Number);
        let null = registry.get_native(NativeKind::Null);
        let union = registry.create_union(vec![number, null]);
        let mut state = FlowState::new();
        state.set("x", union);

        let expr = Expr::Eq {
            strict: true,
            left: Box::new(ident("x")),
            right: Box::new(Expr::Literal(Literal::Null)),
        };
        let narrowed = refine(&mut registry, &state, &expr, true);
        assert_eq!(narrowed.get("x"), Some(null));
        let complement = refine(&mut registry, &state, &expr, false);
        assert_eq!(complement.get("x"), Some(number));
    }

    #[test]
    fn typeof_equality_narrows_to_matching_alternate() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(NativeKind::Number);
        let string = registry.get_native(NativeKind::String);
        let union = registry.create_union(vec![number, string]);
        let mut state = FlowState::new();
        state.set("x", union);

        let expr = Expr::Eq {
            strict: false,
            left: Box::new(Expr::Typeof(Box::new(ident("x")))),
            right: Box::new(Expr::Literal(Literal::Str("number".into()))),
        };
        let narrowed = refine(&mut registry, &state, &expr, true);
        assert_eq!(narrowed.get("x"), Some(number));
    }

    #[test]
    fn logical_and_false_branch_unions_both_refutation_paths() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(NativeKind::Number);
        let string = registry.get_native(NativeKind::String);
        let null = registry.get_native(NativeKind::Null);
        let x_union = registry.create_union(vec![number, null]);
        let y_union = registry.create_union(vec![string, null]);
        let mut state = FlowState::new();
        state.set("x", x_union);
        state.set("y", y_union);

        // `x && y` is false: either x was falsy, or x was truthy and y was falsy.
        let expr = Expr::Logical(LogicalOp::And, Box::new(ident("x")), Box::new(ident("y")));
        let narrowed = refine(&mut registry, &state, &expr, false);
        // x: (falsy x) union (truthy x) == original union, since both were possible.
        assert_eq!(registry.render(narrowed.get("x").unwrap()), "(null|number)");
    }
}
