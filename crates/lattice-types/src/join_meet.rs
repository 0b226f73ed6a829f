//! Join (least supertype) and meet (greatest subtype), spec §4.A.

use crate::id::TypeId;
use crate::kind::{ObjectRole, TypeKind};
use crate::registry::{NativeKind, TypeRegistry};
use lattice_common::limits::MAX_PROTOTYPE_CHAIN_DEPTH;

impl TypeRegistry {
    /// Least supertype of `a` and `b`.
    pub fn join(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if a == b {
            return a;
        }
        if let TypeKind::Union(_) = self.kind(a) {
            return self.join_into_union(a, b);
        }
        if let TypeKind::Union(_) = self.kind(b) {
            return self.join_into_union(b, a);
        }

        let all = self.get_native(NativeKind::All);
        let no = self.get_native(NativeKind::No);
        if a == all || b == all {
            return all;
        }
        if a == no {
            return b;
        }
        if b == no {
            return a;
        }
        if self.is_subtype(a, b) {
            return b;
        }
        if self.is_subtype(b, a) {
            return a;
        }

        // Instances of the same nominal hierarchy collapse to their common
        // ancestor rather than forming a union.
        if let Some(ancestor) = self.common_instance_ancestor(a, b) {
            return ancestor;
        }

        self.create_union(vec![a, b])
    }

    fn join_into_union(&mut self, union_id: TypeId, other: TypeId) -> TypeId {
        let mut alts = match self.kind(union_id) {
            TypeKind::Union(u) => u.alternates.clone(),
            _ => unreachable!(),
        };
        match self.kind(other) {
            TypeKind::Union(u) => alts.extend(u.alternates.iter().copied()),
            _ => alts.push(other),
        }
        self.create_union(alts)
    }

    fn common_instance_ancestor(&self, a: TypeId, b: TypeId) -> Option<TypeId> {
        let is_instance = |id: TypeId, reg: &TypeRegistry| {
            matches!(reg.kind(id), TypeKind::Object(o) if o.role == ObjectRole::Instance)
        };
        if !is_instance(a, self) || !is_instance(b, self) {
            return None;
        }
        let chain_a = self.prototype_chain(a);
        let chain_b: std::collections::HashSet<TypeId> =
            self.prototype_chain(b).into_iter().collect();
        chain_a.into_iter().find(|id| chain_b.contains(id))
    }

    fn prototype_chain(&self, start: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut current = Some(start);
        let mut steps = 0;
        while let Some(id) = current {
            chain.push(id);
            steps += 1;
            if steps > MAX_PROTOTYPE_CHAIN_DEPTH {
                break;
            }
            current = match self.kind(id) {
                TypeKind::Object(o) => o.implicit_prototype,
                _ => None,
            };
        }
        chain
    }

    /// Greatest subtype of `a` and `b`.
    pub fn meet(&mut self, a: TypeId, b: TypeId) -> TypeId {
        if a == b {
            return a;
        }
        let unknown = self.get_native(NativeKind::Unknown);
        if a == unknown {
            return b;
        }
        if b == unknown {
            return a;
        }
        if self.is_subtype(a, b) {
            return a;
        }
        if self.is_subtype(b, a) {
            return b;
        }
        let both_objects = matches!(self.kind(a), TypeKind::Object(_) | TypeKind::Function(_))
            && matches!(self.kind(b), TypeKind::Object(_) | TypeKind::Function(_));
        if both_objects {
            self.get_native(NativeKind::NoObject)
        } else {
            self.get_native(NativeKind::No)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NativeKind::{Boolean, Number, String as Str};

    #[test]
    fn join_is_commutative_and_idempotent() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        let a = registry.join(number, string);
        let b = registry.join(string, number);
        assert!(registry.type_equals(a, b));
        assert!(registry.type_equals(registry.join(number, number), number));
    }

    #[test]
    fn meet_is_commutative_and_idempotent() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        let a = registry.meet(number, string);
        let b = registry.meet(string, number);
        assert!(registry.type_equals(a, b));
        assert!(registry.type_equals(registry.meet(number, number), number));
    }

    #[test]
    fn absorption_law() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        let boolean = registry.get_native(Boolean);
        let _ = boolean;
        let meet = registry.meet(number, string);
        let joined_back = registry.join(number, meet);
        assert!(registry.type_equals(joined_back, number));
    }
}
