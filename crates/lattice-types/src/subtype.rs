//! Subtyping (spec §4.A).
//!
//! Rules are applied in the order documented in the spec; each rule short-
//! circuits before the next is tried.

use crate::id::TypeId;
use crate::kind::{ObjectRole, TypeKind};
use crate::registry::{NativeKind, TypeRegistry};
use lattice_common::limits::MAX_PROTOTYPE_CHAIN_DEPTH;

impl TypeRegistry {
    /// `a <: b`.
    #[must_use]
    pub fn is_subtype(&self, a: TypeId, b: TypeId) -> bool {
        self.is_subtype_rec(a, b, 0)
    }

    fn is_subtype_rec(&self, a: TypeId, b: TypeId, depth: usize) -> bool {
        if depth > MAX_PROTOTYPE_CHAIN_DEPTH {
            // Internal invariant: a well-formed lattice has finite chains.
            debug_assert!(false, "subtype recursion exceeded max depth — likely a cycle");
            return false;
        }

        // Rule 1
        if matches!(self.kind(b), TypeKind::Unknown | TypeKind::All) {
            return true;
        }
        if matches!(self.kind(a), TypeKind::No) {
            return true;
        }
        if matches!(self.kind(a), TypeKind::NoObject) && self.is_object_like(b) {
            return true;
        }
        // `Unknown` is also bottom (spec §4.A "Failure modes" + invariant 4).
        if matches!(self.kind(a), TypeKind::Unknown) {
            return true;
        }

        // Rule 2
        if a == b {
            return true;
        }

        // Rule 3
        if let TypeKind::Union(u) = self.kind(a) {
            return u.alternates.iter().all(|alt| self.is_subtype_rec(*alt, b, depth + 1));
        }

        // Rule 4
        if let TypeKind::Union(u) = self.kind(b) {
            return u.alternates.iter().any(|alt| self.is_subtype_rec(a, *alt, depth + 1));
        }

        // Rule 5
        if let TypeKind::Named(_) = self.kind(b) {
            let resolved_b = self.resolve(b);
            if resolved_b != b {
                return self.is_subtype_rec(a, resolved_b, depth + 1);
            }
            return true; // unresolved Named behaves as Unknown
        }
        if let TypeKind::Named(_) = self.kind(a) {
            let resolved_a = self.resolve(a);
            if resolved_a != a {
                return self.is_subtype_rec(resolved_a, b, depth + 1);
            }
            return true;
        }

        // Rule 8 (checked before rule 6 since EnumElement is object-shaped
        // in name only, not in representation)
        if let TypeKind::EnumElement(elem) = self.kind(a) {
            return self.is_subtype_rec(elem.element_type, b, depth + 1);
        }

        // Primitive/boxed equivalence: identity already handled above; no
        // further coercive subtyping exists between them per spec §3.

        match (self.kind(a), self.kind(b)) {
            (TypeKind::Object(_), TypeKind::Object(_)) => self.object_subtype(a, b, depth),
            (TypeKind::Function(_), TypeKind::Object(_)) => self.object_subtype(a, b, depth),
            (TypeKind::Object(_), TypeKind::Record(rec)) => self.record_subtype(a, rec, depth),
            (TypeKind::Function(fa), TypeKind::Function(fb)) => {
                self.function_subtype(fa, fb, depth)
            }
            _ => false,
        }
    }

    fn is_object_like(&self, id: TypeId) -> bool {
        matches!(self.kind(id), TypeKind::Object(_) | TypeKind::Function(_))
    }

    /// Rule 6: nominal prototype-chain reachability, interface
    /// implementation, or structural record conformance.
    fn object_subtype(&self, a: TypeId, b: TypeId, depth: usize) -> bool {
        if self.prototype_chain_reaches(a, b) {
            return true;
        }

        let is_interface = matches!(
            self.kind(b),
            TypeKind::Function(f) if f.is_interface
        );
        if is_interface && self.implements_interface(a, b, depth) {
            return true;
        }

        false
    }

    fn prototype_chain_reaches(&self, start: TypeId, target: TypeId) -> bool {
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(id) = current {
            if id == target {
                return true;
            }
            steps += 1;
            if steps > MAX_PROTOTYPE_CHAIN_DEPTH {
                break;
            }
            current = match self.kind(id) {
                TypeKind::Object(o) => o.implicit_prototype,
                _ => None,
            };
        }
        false
    }

    fn implements_interface(&self, a: TypeId, iface: TypeId, depth: usize) -> bool {
        let Some(ctor) = self.owning_constructor(a) else {
            return false;
        };
        let TypeKind::Function(f) = self.kind(ctor) else {
            return false;
        };
        for implemented in &f.implemented_interfaces {
            if *implemented == iface {
                return true;
            }
            if self.is_subtype_rec(*implemented, iface, depth + 1) {
                return true;
            }
        }
        false
    }

    fn owning_constructor(&self, object_or_instance: TypeId) -> Option<TypeId> {
        match self.kind(object_or_instance) {
            TypeKind::Object(o) if o.role == ObjectRole::Instance => o.constructor,
            _ => None,
        }
    }

    fn record_subtype(&self, a: TypeId, record: &crate::kind::RecordType, depth: usize) -> bool {
        let TypeKind::Object(object) = self.kind(a) else {
            return false;
        };
        record.fields.iter().all(|(name, field_ty)| {
            object
                .properties
                .get(name)
                .is_some_and(|slot| self.is_subtype_rec(slot.ty, *field_ty, depth + 1))
        })
    }

    /// Rule 7: contravariant params, covariant return, covariant `this`.
    fn function_subtype(
        &self,
        a: &crate::kind::FunctionType,
        b: &crate::kind::FunctionType,
        depth: usize,
    ) -> bool {
        let arity_ok = a.params.len() == b.params.len() || b.is_variadic || a.is_variadic;
        if !arity_ok {
            return false;
        }
        let n = a.params.len().min(b.params.len());
        for i in 0..n {
            // Contravariant: b's param must be a subtype of a's param.
            if !self.is_subtype_rec(b.params[i], a.params[i], depth + 1) {
                return false;
            }
        }
        if !self.is_subtype_rec(a.return_type, b.return_type, depth + 1) {
            return false;
        }
        match (a.this_type, b.this_type) {
            (Some(at), Some(bt)) => self.is_subtype_rec(at, bt, depth + 1),
            (None, None) => true,
            // A function with a default (global) `this` is covariant with
            // one that has an explicit, compatible `this` — matching the
            // teacher's treatment of "omit this: when default global".
            (Some(_), None) | (None, Some(_)) => true,
        }
    }

    /// `possible_to_boolean_outcomes`-independent helper used by narrowing
    /// and by the assignability checks downstream passes build on: are `a`
    /// and `b` mutual subtypes (semantic equality for non-identity types
    /// like two structurally-equal unions built independently)?
    #[must_use]
    pub fn type_equals(&self, a: TypeId, b: TypeId) -> bool {
        a == b || (self.is_subtype(a, b) && self.is_subtype(b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NativeKind::{Boolean, Null, Number, String as Str, Void};

    #[test]
    fn reflexivity_holds_for_natives() {
        let registry = TypeRegistry::new();
        for kind in [Number, Str, Boolean, Null, Void] {
            let t = registry.get_native(kind);
            assert!(registry.is_subtype(t, t));
        }
    }

    #[test]
    fn unknown_is_top_and_bottom() {
        let registry = TypeRegistry::new();
        let unknown = registry.get_native(NativeKind::Unknown);
        let number = registry.get_native(Number);
        assert!(registry.is_subtype(number, unknown));
        assert!(registry.is_subtype(unknown, number));
    }

    #[test]
    fn no_is_bottom() {
        let registry = TypeRegistry::new();
        let no = registry.get_native(NativeKind::No);
        let number = registry.get_native(Number);
        assert!(registry.is_subtype(no, number));
    }

    #[test]
    fn void_and_null_are_distinct() {
        let registry = TypeRegistry::new();
        let void = registry.get_native(Void);
        let null = registry.get_native(Null);
        assert!(!registry.is_subtype(void, null));
        assert!(!registry.is_subtype(null, void));
    }

    #[test]
    fn union_subtyping_rules_3_and_4() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        let boolean = registry.get_native(Boolean);
        let union = registry.create_union(vec![number, string]);
        // rule 4: number <: (number|string)
        assert!(registry.is_subtype(number, union));
        // rule 3: (number|string) <: (number|string|boolean)
        let wider = registry.create_union(vec![number, string, boolean]);
        assert!(registry.is_subtype(union, wider));
        assert!(!registry.is_subtype(wider, union));
    }
}
