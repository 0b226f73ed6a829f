//! Alias-vs-fork-nominal handling (spec §4.D "Alias handling", §9 open
//! question).
//!
//! Resolved per §9: preserve the observable behavior in the scenarios
//! rather than re-derive a fully general rule. `var A = B` aliases `A` to
//! `B`'s identity exactly when `B` is a pure name/qualified-path reference
//! (no call, `new`, or literal) that resolves to an existing nominal type —
//! a constructor, interface, or enum. Any other right-hand shape (`new B()`,
//! a fresh function/object literal, a property access off a non-nominal
//! object) forks a new type instead of sharing identity.

use crate::ast::Expr;
use lattice_types::TypeRegistry;
use lattice_types::TypeId;

/// Whether `expr` is a pure name/qualified-path reference (no call, `new`,
/// or literal construction anywhere in the chain).
#[must_use]
pub fn is_pure_reference(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::This) || matches!(expr, Expr::Member(obj, _) if is_pure_reference(obj))
}

/// Whether `ty` is a nominal type eligible to be aliased (constructor,
/// interface, or enum — not a plain object or instance).
#[must_use]
pub fn is_aliasable_nominal(registry: &TypeRegistry, ty: TypeId) -> bool {
    registry.is_nominal_function(ty) || matches!(registry.kind(ty), lattice_types::TypeKind::Enum(_))
}

/// Decide whether `var name = rhs_expr` (with `rhs_ty` the type `rhs_expr`
/// resolved to) should alias rather than fork.
#[must_use]
pub fn should_alias(registry: &TypeRegistry, rhs_expr: &Expr, rhs_ty: TypeId) -> bool {
    is_pure_reference(rhs_expr) && is_aliasable_nominal(registry, rhs_ty)
}
