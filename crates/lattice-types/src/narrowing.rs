//! Type narrowing helpers used by the reverse abstract interpreter
//! (spec §4.A "Narrowing", consumed by `lattice-infer`'s `F`).

use crate::id::TypeId;
use crate::kind::{BoxedKind, PrimitiveKind, TypeKind};
use crate::registry::{NativeKind, TypeRegistry};

/// A two-bit set of boolean-coercion outcomes a type's values could
/// produce (spec §4.A `possible_to_boolean_outcomes`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoolOutcomes(u8);

impl BoolOutcomes {
    pub const NONE: BoolOutcomes = BoolOutcomes(0);
    pub const TRUE: BoolOutcomes = BoolOutcomes(1);
    pub const FALSE: BoolOutcomes = BoolOutcomes(2);
    pub const BOTH: BoolOutcomes = BoolOutcomes(3);

    #[must_use]
    pub const fn contains(self, outcome: bool) -> bool {
        if outcome {
            (self.0 & Self::TRUE.0) != 0
        } else {
            (self.0 & Self::FALSE.0) != 0
        }
    }

    #[must_use]
    pub const fn union(self, other: BoolOutcomes) -> BoolOutcomes {
        BoolOutcomes(self.0 | other.0)
    }
}

impl TypeRegistry {
    /// `possible_to_boolean_outcomes` (spec §4.A).
    #[must_use]
    pub fn possible_to_boolean_outcomes(&self, t: TypeId) -> BoolOutcomes {
        match self.kind(t) {
            TypeKind::Union(u) => u
                .alternates
                .iter()
                .fold(BoolOutcomes::NONE, |acc, alt| {
                    acc.union(self.possible_to_boolean_outcomes(*alt))
                }),
            TypeKind::Primitive(PrimitiveKind::Null | PrimitiveKind::Void) => BoolOutcomes::FALSE,
            TypeKind::Object(_) | TypeKind::Function(_) | TypeKind::Boxed(_)
            | TypeKind::Enum(_) | TypeKind::EnumElement(_) | TypeKind::Record(_) => {
                BoolOutcomes::TRUE
            }
            TypeKind::Primitive(PrimitiveKind::Number | PrimitiveKind::String | PrimitiveKind::Boolean) => {
                BoolOutcomes::BOTH
            }
            TypeKind::Named(n) => match n.resolved.get() {
                Some(resolved) if resolved != t => self.possible_to_boolean_outcomes(resolved),
                _ => BoolOutcomes::BOTH,
            },
            TypeKind::All | TypeKind::No | TypeKind::NoObject | TypeKind::Unknown
            | TypeKind::Template(_) => BoolOutcomes::BOTH,
        }
    }

    /// `restrict_not_null_or_void` (spec §4.A).
    pub fn restrict_not_null_or_void(&mut self, t: TypeId) -> TypeId {
        let TypeKind::Union(u) = self.kind(t) else {
            return t;
        };
        let kept: Vec<TypeId> = u
            .alternates
            .iter()
            .copied()
            .filter(|alt| {
                !matches!(
                    self.kind(*alt),
                    TypeKind::Primitive(PrimitiveKind::Null | PrimitiveKind::Void)
                )
            })
            .collect();
        self.create_union(kept)
    }

    /// `restrict_by_truthy` (spec §4.A).
    pub fn restrict_by_truthy(&mut self, t: TypeId, outcome: bool) -> TypeId {
        if let TypeKind::Union(u) = self.kind(t) {
            let kept: Vec<TypeId> = u
                .alternates
                .iter()
                .copied()
                .filter(|alt| self.possible_to_boolean_outcomes(*alt).contains(outcome))
                .collect();
            return self.create_union(kept);
        }
        if self.possible_to_boolean_outcomes(t).contains(outcome) {
            t
        } else {
            self.get_native(NativeKind::No)
        }
    }

    fn typeof_tag(&self, t: TypeId) -> Option<&'static str> {
        match self.kind(t) {
            TypeKind::Primitive(PrimitiveKind::Number) => Some("number"),
            TypeKind::Primitive(PrimitiveKind::String) => Some("string"),
            TypeKind::Primitive(PrimitiveKind::Boolean) => Some("boolean"),
            TypeKind::Primitive(PrimitiveKind::Void) => Some("undefined"),
            // Famous JS quirk: typeof null === "object".
            TypeKind::Primitive(PrimitiveKind::Null) => Some("object"),
            TypeKind::Boxed(BoxedKind::NumberObject | BoxedKind::StringObject | BoxedKind::BooleanObject) => {
                Some("object")
            }
            TypeKind::Object(_) | TypeKind::Enum(_) | TypeKind::EnumElement(_) | TypeKind::Record(_) => {
                Some("object")
            }
            TypeKind::Function(_) => Some("function"),
            TypeKind::Named(n) => match n.resolved.get() {
                Some(resolved) if resolved != t => self.typeof_tag(resolved),
                _ => None,
            },
            TypeKind::Union(_) | TypeKind::All | TypeKind::No | TypeKind::NoObject
            | TypeKind::Unknown | TypeKind::Template(_) => None,
        }
    }

    /// `restrict_by_typeof` (spec §4.A). `tag` is one of "number", "string",
    /// "boolean", "function", "object", "undefined".
    pub fn restrict_by_typeof(&mut self, t: TypeId, tag: &str) -> TypeId {
        if let TypeKind::Union(u) = self.kind(t) {
            let alts = u.alternates.clone();
            let kept: Vec<TypeId> = alts
                .into_iter()
                .filter(|alt| match self.typeof_tag(*alt) {
                    Some(alt_tag) => alt_tag == tag,
                    // Ambiguous alternates (Unknown, Named-unresolved, ...)
                    // are kept conservatively: they might match.
                    None => true,
                })
                .collect();
            return self.create_union(kept);
        }
        match self.typeof_tag(t) {
            Some(t_tag) if t_tag == tag => t,
            Some(_) => self.get_native(NativeKind::No),
            None => t,
        }
    }

    /// `x === null` TRUE branch: narrow to the `Null` alternate alone,
    /// unlike `restrict_not_null_or_void` which strips both `Null` and
    /// `Void` (spec §4.F `x === null`).
    pub fn restrict_to_null(&mut self, t: TypeId) -> TypeId {
        let null = self.get_native(NativeKind::Null);
        if let TypeKind::Union(u) = self.kind(t) {
            return if u.alternates.contains(&null) {
                null
            } else {
                self.get_native(NativeKind::No)
            };
        }
        if t == null {
            null
        } else {
            self.get_native(NativeKind::No)
        }
    }

    /// `x === null` FALSE branch ("minus_null"): strips only the `Null`
    /// alternate, leaving `Void` in place.
    pub fn exclude_null(&mut self, t: TypeId) -> TypeId {
        let TypeKind::Union(u) = self.kind(t) else {
            let null = self.get_native(NativeKind::Null);
            return if t == null { self.get_native(NativeKind::No) } else { t };
        };
        let kept: Vec<TypeId> = u
            .alternates
            .iter()
            .copied()
            .filter(|alt| !matches!(self.kind(*alt), TypeKind::Primitive(PrimitiveKind::Null)))
            .collect();
        self.create_union(kept)
    }

    /// `x instanceof C` FALSE branch: drop alternates that are `<: instance_ty`.
    pub fn exclude_instance_of(&mut self, t: TypeId, instance_ty: TypeId) -> TypeId {
        if let TypeKind::Union(u) = self.kind(t) {
            let alts = u.alternates.clone();
            let kept: Vec<TypeId> = alts
                .into_iter()
                .filter(|alt| !self.is_subtype(*alt, instance_ty))
                .collect();
            return self.create_union(kept);
        }
        if self.is_subtype(t, instance_ty) {
            self.get_native(NativeKind::No)
        } else {
            t
        }
    }

    /// The complement of `restrict_by_typeof`: alternates whose typeof-tag
    /// does *not* equal `tag`. Used for the `typeof x == "T"` FALSE branch.
    pub fn exclude_by_typeof(&mut self, t: TypeId, tag: &str) -> TypeId {
        if let TypeKind::Union(u) = self.kind(t) {
            let alts = u.alternates.clone();
            let kept: Vec<TypeId> = alts
                .into_iter()
                .filter(|alt| match self.typeof_tag(*alt) {
                    Some(alt_tag) => alt_tag != tag,
                    None => true,
                })
                .collect();
            return self.create_union(kept);
        }
        match self.typeof_tag(t) {
            Some(t_tag) if t_tag == tag => self.get_native(NativeKind::No),
            _ => t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NativeKind::{Boolean, Null, Number, String as Str, Void};

    #[test]
    fn not_null_or_void_strips_from_union() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let null = registry.get_native(Null);
        let void = registry.get_native(Void);
        let nullable = registry.create_union(vec![number, null, void]);
        let narrowed = registry.restrict_not_null_or_void(nullable);
        assert_eq!(narrowed, number);
    }

    #[test]
    fn truthy_narrowing_drops_nullish_alternates() {
        let mut registry = TypeRegistry::new();
        let string = registry.get_native(Str);
        let null = registry.get_native(Null);
        let union = registry.create_union(vec![string, null]);
        let narrowed = registry.restrict_by_truthy(union, true);
        assert_eq!(narrowed, string);
    }

    #[test]
    fn typeof_narrows_union_to_matching_alternate() {
        let mut registry = TypeRegistry::new();
        let number = registry.get_native(Number);
        let string = registry.get_native(Str);
        let union = registry.create_union(vec![number, string]);
        let narrowed = registry.restrict_by_typeof(union, "string");
        assert_eq!(narrowed, string);
    }

    #[test]
    fn typeof_null_is_object() {
        let mut registry = TypeRegistry::new();
        let null = registry.get_native(Null);
        let boolean = registry.get_native(Boolean);
        let union = registry.create_union(vec![null, boolean]);
        let narrowed = registry.restrict_by_typeof(union, "object");
        assert_eq!(narrowed, null);
    }
}
